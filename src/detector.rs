// WHY: Whole-word, case-insensitive catalog lookup over arbitrary prompt text
// One compiled regex-automata pattern per catalog entry, boundaries checked on candidates

use anyhow::{Context, Result};
use regex_automata::{meta::Regex, util::syntax, Input};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, TermEntry};

/// Catalog entry confirmed present in a text (presence only, no position)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub term: String,
    pub suggestion: String,
    pub category: String,
}

impl From<&TermEntry> for Match {
    fn from(entry: &TermEntry) -> Self {
        Self {
            term: entry.term.clone(),
            suggestion: entry.suggestion.clone(),
            category: entry.category.clone(),
        }
    }
}

/// Position in the input using 1-based lines and character columns (end is inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

/// One located hit of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Index into the detector's catalog
    pub entry: usize,
    /// The input text covered by this hit
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub span: Span,
}

/// Bias-term detector bound to one catalog
pub struct BiasDetector {
    catalog: Catalog,
    patterns: Vec<Regex>,
}

impl BiasDetector {
    /// Compile one case-insensitive pattern per catalog entry
    pub fn new(catalog: Catalog) -> Result<Self> {
        info!("Compiling {} catalog terms for bias detection", catalog.len());

        let mut patterns = Vec::with_capacity(catalog.len());
        for entry in catalog.entries() {
            let pattern = term_pattern(&entry.term);
            let regex = Regex::builder()
                .syntax(syntax::Config::new().case_insensitive(true))
                .build(&pattern)
                .with_context(|| format!("Failed to compile pattern for term {:?}", entry.term))?;
            debug!("Compiled term {:?} as pattern {}", entry.term, pattern);
            patterns.push(regex);
        }

        Ok(Self { catalog, patterns })
    }

    /// Detector over the built-in catalog
    pub fn with_builtin_catalog() -> Result<Self> {
        Self::new(Catalog::builtin())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Report every catalog entry present at least once, in catalog order
    pub fn detect(&self, text: &str) -> Vec<Match> {
        let matches: Vec<Match> = self
            .catalog
            .entries()
            .iter()
            .zip(&self.patterns)
            .filter(|(_, regex)| find_whole_word(regex, text, 0).is_some())
            .map(|(entry, _)| Match::from(entry))
            .collect();

        debug!("Detected {} flagged terms in {} bytes", matches.len(), text.len());
        matches
    }

    /// Locate every whole-word hit, ordered by start offset then catalog order
    pub fn occurrences(&self, text: &str) -> Vec<Occurrence> {
        let mut hits = Vec::new();

        for (index, regex) in self.patterns.iter().enumerate() {
            let mut from = 0;
            while let Some((start, end)) = find_whole_word(regex, text, from) {
                hits.push((index, start, end));
                from = end;
            }
        }
        hits.sort_unstable_by_key(|&(index, start, _)| (start, index));

        let lines = LineIndex::new(text);
        hits.into_iter()
            .map(|(entry, start, end)| Occurrence {
                entry,
                text: text[start..end].to_string(),
                start,
                end,
                span: lines.span(text, start, end),
            })
            .collect()
    }
}

/// Escape the term literally; interior whitespace runs match exactly one whitespace character
fn term_pattern(term: &str) -> String {
    term.split_whitespace()
        .map(regex_syntax::escape)
        .collect::<Vec<_>>()
        .join(r"\s")
}

/// Neither neighbour of `start..end` may be alphanumeric
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// First boundary-valid hit at or after byte offset `from`
fn find_whole_word(regex: &Regex, text: &str, from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    while pos <= text.len() {
        let found = regex.search(&Input::new(text).range(pos..))?;
        if is_whole_word(text, found.start(), found.end()) {
            return Some((found.start(), found.end()));
        }
        // WHY: resume one character later so an overlapping candidate is still tried
        pos = found.start() + text[found.start()..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Byte offsets of line starts for offset -> line/col conversion
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn line_col(&self, text: &str, byte_pos: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&byte_pos) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };
        let col = text[self.starts[line]..byte_pos].chars().count() + 1;
        (line + 1, col)
    }

    fn span(&self, text: &str, start: usize, end: usize) -> Span {
        let last_char = text[..end].char_indices().next_back().map_or(start, |(i, _)| i.max(start));
        let (start_line, start_col) = self.line_col(text, start);
        let (end_line, end_col) = self.line_col(text, last_char);
        Span { start_line, start_col, end_line, end_col }
    }
}
