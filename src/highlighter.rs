// WHY: Inline annotation of detector output without altering a single input character
// Token-level lookup: only single-word terms can flag a token

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::detector::Match;

/// Trailing punctuation ignored when comparing a token against matched terms
pub const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Contiguous chunk of the original text, plain or flagged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Plain {
        text: String,
    },
    Flagged {
        text: String,
        suggestion: String,
        category: String,
    },
}

impl Segment {
    /// Original text covered by this segment
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } | Segment::Flagged { text, .. } => text,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Segment::Flagged { .. })
    }
}

/// Whitespace run or non-whitespace run borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub is_whitespace: bool,
}

/// Split into alternating whitespace / non-whitespace runs; concatenation reproduces `text`
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut run_is_whitespace = None;

    for (i, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        match run_is_whitespace {
            Some(current) if current != ws => {
                tokens.push(Token { text: &text[run_start..i], is_whitespace: current });
                run_start = i;
                run_is_whitespace = Some(ws);
            }
            Some(_) => {}
            None => run_is_whitespace = Some(ws),
        }
    }

    if let Some(current) = run_is_whitespace {
        tokens.push(Token { text: &text[run_start..], is_whitespace: current });
    }

    tokens
}

/// Comparison key for a word token: one trailing punctuation mark dropped, lowercased
fn comparison_key(token: &str) -> String {
    let stripped = token.strip_suffix(TRAILING_PUNCTUATION).unwrap_or(token);
    stripped.to_lowercase()
}

/// Tag tokens of `text` whose comparison key is one of the matched terms
///
/// `matches` should come from detecting the same `text`. Multi-word terms never
/// equal a single token, so phrases are reported by the detector but not flagged here.
/// When two matches share a lowercased term the first one wins.
pub fn highlight(text: &str, matches: &[Match]) -> Vec<Segment> {
    let mut lookup: HashMap<String, &Match> = HashMap::with_capacity(matches.len());
    for m in matches {
        lookup.entry(m.term.to_lowercase()).or_insert(m);
    }

    tokenize(text)
        .into_iter()
        .map(|token| {
            let hit = if token.is_whitespace {
                None
            } else {
                lookup.get(&comparison_key(token.text))
            };

            match hit {
                Some(m) => Segment::Flagged {
                    text: token.text.to_string(),
                    suggestion: m.suggestion.clone(),
                    category: m.category.clone(),
                },
                None => Segment::Plain { text: token.text.to_string() },
            }
        })
        .collect()
}
