// authorcheck Core Services

pub mod text_processor;
pub mod config_store;
pub mod detection;
pub mod discovery;
pub mod document_reader;

pub use text_processor::{RuleTokenizer, Tokenizer};
pub use config_store::*;
pub use discovery::discover_files;
pub use document_reader::{ContentReader, FileContentReader, ReadError};

pub use detection::{
    analyze_text,
    extract_features,
    label_for_score,
    score_features,
    summarize,
    BatchAnalyzer,
};
