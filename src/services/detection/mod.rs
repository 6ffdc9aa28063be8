// Detection Module
// Heuristic authorship scoring organized into specialized submodules:
// - features: lexical and structural signals for one document
// - scoring: weighted composite score and label bands
// - aggregation: folder pipeline and summary statistics

pub mod features;
pub mod scoring;
pub mod aggregation;

// Re-export commonly used functions
pub use features::{extract_features, extract_features_with_min, DEFAULT_MIN_CHARS};
pub use scoring::{
    composite_score,
    label_for_score,
    score_features,
    score_features_with,
    AMBIGUOUS_THRESHOLD,
    LIKELY_AI_THRESHOLD,
};
pub use aggregation::{analyze_text, summarize, BatchAnalyzer};
