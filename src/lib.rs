pub mod catalog;
pub mod detector;
pub mod highlighter;
pub mod report;
pub mod export;
pub mod completion;

// Re-export core types for convenient access
pub use catalog::{Catalog, TermEntry};
pub use detector::{BiasDetector, Match, Occurrence, Span};
pub use highlighter::{highlight, tokenize, Segment};

// Re-export prompt export and completion types
pub use export::{write_jsonl, PromptRecord, TaskType};
pub use completion::{CompletionClient, CompletionConfig};
