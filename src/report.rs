// WHY: Terminal and JSON rendering of detector and highlighter output for the CLI

use serde::Serialize;

use crate::detector::{Match, Occurrence};
use crate::export::TaskType;
use crate::highlighter::Segment;

/// Summary line shown when nothing was flagged
pub const NO_ISSUES: &str = "No potential bias detected.";

const ANSI_FLAG: &str = "\x1b[1;33m";
const ANSI_RESET: &str = "\x1b[0m";

/// How flagged segments are emphasised in inline output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Bold yellow escape codes around the token
    Ansi,
    /// `[token → suggestion]`, readable without colour support
    Marked,
}

/// One line per match, or the neutral indicator when empty
pub fn summary_lines(matches: &[Match]) -> Vec<String> {
    if matches.is_empty() {
        return vec![NO_ISSUES.to_string()];
    }

    matches
        .iter()
        .map(|m| format!("{} ({}) → {}", m.term, m.category, m.suggestion))
        .collect()
}

/// Rebuild the text with flagged segments emphasised
pub fn render_inline(segments: &[Segment], style: Style) -> String {
    let mut out = String::new();
    for segment in segments {
        match (segment, style) {
            (Segment::Plain { text }, _) => out.push_str(text),
            (Segment::Flagged { text, .. }, Style::Ansi) => {
                out.push_str(ANSI_FLAG);
                out.push_str(text);
                out.push_str(ANSI_RESET);
            }
            (Segment::Flagged { text, suggestion, .. }, Style::Marked) => {
                out.push_str(&format!("[{text} → {suggestion}]"));
            }
        }
    }
    out
}

/// Machine-readable result of checking one prompt
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub task: TaskType,
    pub matches: Vec<Match>,
    pub segments: Vec<Segment>,
    pub occurrences: Vec<Occurrence>,
}

impl CheckReport {
    pub fn has_issues(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Human-readable report: summary panel followed by the inline view
    pub fn to_text(&self, style: Style) -> String {
        let mut out = format!("Task: {}\n\n", self.task);

        out.push_str("Bias check:\n");
        for line in summary_lines(&self.matches) {
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }

        if !self.occurrences.is_empty() {
            out.push_str("\nLocations:\n");
            for hit in &self.occurrences {
                out.push_str(&format!(
                    "  {}:{} {:?}\n",
                    hit.span.start_line, hit.span.start_col, hit.text
                ));
            }
        }

        out.push_str("\nPrompt:\n");
        out.push_str(&render_inline(&self.segments, style));
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}
