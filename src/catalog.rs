// WHY: Term catalog is read-only configuration handed to the detector at construction
// Built-in table covers the default prompt checks; TOML files replace it wholesale

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Built-in (term, suggestion, category) rows in detection order
pub const BUILTIN_TERMS: &[(&str, &str, &str)] = &[
    ("chairman", "chairperson", "gendered"),
    ("housewife", "homemaker", "gendered"),
    ("manpower", "workforce", "gendered"),
    ("he", "they", "gendered pronoun"),
    ("she", "they", "gendered pronoun"),
    ("crazy", "mentally unwell", "mental health"),
    ("insane", "irrational", "mental health"),
    ("illegal alien", "undocumented immigrant", "racial"),
    ("blacklist", "blocklist", "racial undertone"),
    ("whitelist", "allowlist", "racial undertone"),
    ("manmade", "human-made", "gendered"),
    ("native", "local", "racial"),
];

/// One flagged term with its suggested replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub suggestion: String,
    pub category: String,
}

impl TermEntry {
    pub fn new(term: impl Into<String>, suggestion: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            suggestion: suggestion.into(),
            category: category.into(),
        }
    }
}

/// On-disk layout: a list of `[[term]]` tables
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "term")]
    terms: Vec<TermEntry>,
}

/// Ordered, immutable set of flagged terms
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<TermEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting empty terms and case-insensitive duplicates
    ///
    /// Terms are stored with whitespace collapsed to single spaces, the form the
    /// detector compiles and the highlighter compares against.
    pub fn new(mut entries: Vec<TermEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in &mut entries {
            let normalized = normalize_term(&entry.term);
            if normalized.is_empty() {
                bail!("Catalog entry has an empty term (suggestion: {:?})", entry.suggestion);
            }
            // WHY: duplicates would make detection order observable
            if !seen.insert(normalized.to_lowercase()) {
                bail!("Duplicate catalog term: {:?}", entry.term);
            }
            entry.term = normalized;
        }

        debug!("Validated catalog with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Catalog with the built-in term table
    pub fn builtin() -> Self {
        let entries = BUILTIN_TERMS
            .iter()
            .map(|&(term, suggestion, category)| TermEntry::new(term, suggestion, category))
            .collect();
        Self { entries }
    }

    /// Parse a TOML document of `[[term]]` tables
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(source).context("Failed to parse catalog TOML")?;
        Self::new(file.terms)
    }

    /// Load a TOML catalog from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid catalog file {}", path.display()))?;

        info!("Loaded {} catalog terms from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by term
    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        let needle = normalize_term(term).to_lowercase();
        self.entries.iter().find(|entry| entry.term.to_lowercase() == needle)
    }
}

/// Trim and collapse interior whitespace runs to one space
fn normalize_term(term: &str) -> String {
    term.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let validated = Catalog::new(builtin.entries().to_vec());
        assert!(validated.is_ok(), "Built-in table must pass validation");
        assert_eq!(builtin.len(), BUILTIN_TERMS.len());
    }

    #[test]
    fn test_builtin_anchor_terms() {
        let catalog = Catalog::builtin();

        let chairman = catalog.get("chairman").expect("chairman should be built in");
        assert_eq!(chairman.suggestion, "chairperson");
        assert_eq!(chairman.category, "gendered");

        let phrase = catalog.get("ILLEGAL ALIEN").expect("lookup is case-insensitive");
        assert_eq!(phrase.suggestion, "undocumented immigrant");

        assert!(catalog.get("teacher").is_none());
    }

    #[test]
    fn test_duplicate_terms_rejected() {
        let entries = vec![
            TermEntry::new("Chairman", "chairperson", "gendered"),
            TermEntry::new("chairman", "chair", "gendered title"),
        ];
        let err = Catalog::new(entries).unwrap_err();
        assert!(err.to_string().contains("Duplicate"), "unexpected error: {err}");
    }

    #[test]
    fn test_terms_stored_with_collapsed_whitespace() {
        let catalog = Catalog::new(vec![
            TermEntry::new(" he ", "they", "gendered pronoun"),
            TermEntry::new("illegal \t alien", "undocumented immigrant", "racial"),
        ])
        .unwrap();
        let terms: Vec<_> = catalog.entries().iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, ["he", "illegal alien"]);
        assert!(catalog.get("illegal   alien").is_some());
    }

    #[test]
    fn test_whitespace_variants_are_duplicates() {
        let entries = vec![
            TermEntry::new("illegal alien", "undocumented immigrant", "racial"),
            TermEntry::new("illegal  alien", "undocumented person", "racial"),
        ];
        assert!(Catalog::new(entries).is_err());

        let entries = vec![
            TermEntry::new("he", "they", "gendered pronoun"),
            TermEntry::new(" HE ", "them", "gendered pronoun"),
        ];
        assert!(Catalog::new(entries).is_err());
    }

    #[test]
    fn test_empty_term_rejected() {
        let entries = vec![TermEntry::new("   ", "nothing", "blank")];
        assert!(Catalog::new(entries).is_err());
    }

    #[test]
    fn test_from_toml_preserves_order() {
        let source = r#"
[[term]]
term = "guys"
suggestion = "everyone"
category = "gendered"

[[term]]
term = "master branch"
suggestion = "main branch"
category = "racial undertone"
"#;
        let catalog = Catalog::from_toml_str(source).unwrap();
        let terms: Vec<_> = catalog.entries().iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, ["guys", "master branch"]);
    }

    #[test]
    fn test_from_toml_missing_field() {
        let source = "[[term]]\nterm = \"guys\"\ncategory = \"gendered\"\n";
        assert!(Catalog::from_toml_str(source).is_err());
    }

    #[test]
    fn test_from_toml_empty_document() {
        let catalog = Catalog::from_toml_str("").unwrap();
        assert!(catalog.is_empty());
    }
}
