// WHY: Prompt export as line-delimited JSON records ({task, prompt} per line)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "prompt.jsonl";

/// Kind of task the prompt is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskType {
    #[default]
    Summarization,
    #[serde(rename = "Question Answering")]
    QuestionAnswering,
    Classification,
    #[serde(rename = "Creative Writing")]
    CreativeWriting,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::Summarization,
        TaskType::QuestionAnswering,
        TaskType::Classification,
        TaskType::CreativeWriting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Summarization => "Summarization",
            TaskType::QuestionAnswering => "Question Answering",
            TaskType::Classification => "Classification",
            TaskType::CreativeWriting => "Creative Writing",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    /// Accepts the display name or a kebab/snake-case alias, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c.to_ascii_lowercase() })
            .collect();

        TaskType::ALL
            .into_iter()
            .find(|task| task.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                let choices: Vec<_> = TaskType::ALL.iter().map(TaskType::as_str).collect();
                format!("unknown task type {:?} (expected one of: {})", s, choices.join(", "))
            })
    }
}

/// One exported prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub task: TaskType,
    pub prompt: String,
}

impl PromptRecord {
    pub fn new(task: TaskType, prompt: impl Into<String>) -> Self {
        Self { task, prompt: prompt.into() }
    }

    /// Compact JSON object terminated by exactly one newline
    pub fn to_jsonl_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self).context("Failed to serialize prompt record")?;
        line.push('\n');
        Ok(line)
    }
}

/// Write records to `path`, one JSON object per line, replacing existing content
pub async fn write_jsonl(path: &Path, records: &[PromptRecord]) -> Result<()> {
    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create export file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        writer.write_all(record.to_jsonl_line()?.as_bytes()).await?;
    }

    writer.flush().await?;
    info!("Exported {} prompt records to {}", records.len(), path.display());
    Ok(())
}
