use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fairprompt::completion::{CompletionClient, CompletionConfig};
use fairprompt::export::{write_jsonl, PromptRecord, TaskType, DEFAULT_EXPORT_FILE};
use fairprompt::report::{CheckReport, Style};
use fairprompt::{highlight, BiasDetector, Catalog};

#[derive(Parser, Debug)]
#[command(name = "fairprompt")]
#[command(about = "Write prompts, flag bias-prone terms, export as JSONL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flag bias-prone terms in a prompt
    Check {
        #[command(flatten)]
        input: PromptInput,

        /// Task the prompt is written for
        #[arg(long, default_value_t = TaskType::default())]
        task: TaskType,

        /// TOML term catalog replacing the built-in one
        #[arg(long, env = "FAIRPROMPT_CATALOG")]
        catalog: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Mark flagged words with brackets instead of colour
        #[arg(long)]
        plain: bool,

        /// Exit with status 1 when any term is flagged
        #[arg(long)]
        fail_on_issues: bool,
    },
    /// Write the prompt as a single JSONL record
    Export {
        #[command(flatten)]
        input: PromptInput,

        #[arg(long, default_value_t = TaskType::default())]
        task: TaskType,

        /// Output file
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        out: PathBuf,
    },
    /// Send the prompt to the hosted model for a preview completion
    Complete {
        #[command(flatten)]
        input: PromptInput,

        /// Model id overriding the configured one
        #[arg(long)]
        model: Option<String>,
    },
    /// List the available task types
    Tasks,
}

#[derive(ClapArgs, Debug)]
struct PromptInput {
    /// Prompt text; read from --file or stdin when omitted
    prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(long, conflicts_with = "prompt")]
    file: Option<PathBuf>,
}

impl PromptInput {
    fn read(&self) -> Result<String> {
        if let Some(prompt) = &self.prompt {
            return Ok(prompt.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read prompt file {}", path.display()));
        }

        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read prompt from stdin")?;
        Ok(buffer)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: stdout carries the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Command::Check { input, task, catalog, json, plain, fail_on_issues } => {
            let prompt = input.read()?;
            let catalog = match catalog {
                Some(path) => Catalog::load(&path)?,
                None => Catalog::builtin(),
            };
            let detector = BiasDetector::new(catalog)?;
            info!("Checking {} bytes against {} catalog terms", prompt.len(), detector.catalog().len());

            let matches = detector.detect(&prompt);
            let segments = highlight(&prompt, &matches);
            let occurrences = detector.occurrences(&prompt);
            info!("Flagged {} terms in {} occurrences", matches.len(), occurrences.len());

            let report = CheckReport { task, matches, segments, occurrences };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let style = if plain { Style::Marked } else { Style::Ansi };
                print!("{}", report.to_text(style));
            }
            if fail_on_issues && report.has_issues() {
                std::io::stdout().flush()?;
                std::process::exit(1);
            }
        }
        Command::Export { input, task, out } => {
            let prompt = input.read()?;
            let record = PromptRecord::new(task, prompt);
            write_jsonl(&out, std::slice::from_ref(&record)).await?;
            println!("Exported {} prompt to {}", task, out.display());
        }
        Command::Complete { input, model } => {
            let prompt = input.read()?;
            let mut config = CompletionConfig::from_env()?;
            if let Some(model) = model {
                config.model = model;
            }
            let client = CompletionClient::new(config);
            info!("Previewing completion with model {}", client.config().model);
            let completion = client.complete(&prompt).await?;
            println!("{completion}");
        }
        Command::Tasks => {
            for task in TaskType::ALL {
                println!("{task}");
            }
        }
    }

    Ok(())
}
