// authorcheck Data Models
// Value objects produced and consumed within a single batch run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ============ Features ============

/// Surface-level heuristics computed for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Character count of the raw (untrimmed) text.
    pub text_length: usize,
    pub sentence_count: usize,
    /// Type-token ratio, in [0, 1].
    pub lexical_diversity: f64,
    /// Coefficient of variation of sentence lengths. Not bounded above.
    pub burstiness: f64,
    /// Flesch reading ease over the raw text.
    pub readability: f64,
    /// Share of the most frequent token, in (0, 1].
    pub repetition_ratio: f64,
    /// Population variance of sentence lengths.
    pub perplexity_proxy: f64,
}

impl FeatureVector {
    /// Copy with the precision used in reports.
    pub fn rounded_for_display(&self) -> Self {
        Self {
            text_length: self.text_length,
            sentence_count: self.sentence_count,
            lexical_diversity: round_to(self.lexical_diversity, 3),
            burstiness: round_to(self.burstiness, 3),
            readability: round_to(self.readability, 2),
            repetition_ratio: round_to(self.repetition_ratio, 3),
            perplexity_proxy: round_to(self.perplexity_proxy, 2),
        }
    }
}

// ============ Score ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuthorshipLabel {
    #[serde(rename = "human-authored")]
    Human,
    #[serde(rename = "ambiguous / mixed or edited")]
    Ambiguous,
    #[serde(rename = "high-probability AI-generated")]
    LikelyAi,
}

impl AuthorshipLabel {
    pub const ALL: [AuthorshipLabel; 3] = [Self::Human, Self::Ambiguous, Self::LikelyAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human-authored",
            Self::Ambiguous => "ambiguous / mixed or edited",
            Self::LikelyAi => "high-probability AI-generated",
        }
    }
}

impl fmt::Display for AuthorshipLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Composite score scaled to 0-100 and rounded to two decimals.
    pub ai_score: f64,
    pub label: AuthorshipLabel,
}

// ============ Batch ============

/// A file handed to the aggregator by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSource {
    pub path: PathBuf,
    pub display_name: String,
}

impl DocumentSource {
    pub fn new(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display_name }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub file_name: String,
    pub features: FeatureVector,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum SkipReason {
    /// The content reader failed; carries the reader's message.
    Unreadable(String),
    /// Too short, whitespace only, or no word tokens.
    InsufficientContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(msg) => write!(f, "unreadable: {}", msg),
            Self::InsufficientContent => f.write_str("not enough content to analyze"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub reason: SkipReason,
}

/// Per-file result of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Included(DocumentRecord),
    Skipped(SkippedFile),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCounts {
    pub likely_ai: usize,
    pub ambiguous: usize,
    pub human: usize,
}

impl LabelCounts {
    pub fn get(&self, label: AuthorshipLabel) -> usize {
        match label {
            AuthorshipLabel::Human => self.human,
            AuthorshipLabel::Ambiguous => self.ambiguous,
            AuthorshipLabel::LikelyAi => self.likely_ai,
        }
    }

    pub fn increment(&mut self, label: AuthorshipLabel) {
        match label {
            AuthorshipLabel::Human => self.human += 1,
            AuthorshipLabel::Ambiguous => self.ambiguous += 1,
            AuthorshipLabel::LikelyAi => self.likely_ai += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub total: usize,
    pub mean_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub label_counts: LabelCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub run_id: uuid::Uuid,
    pub generated_at: String,
    pub version: String,
    pub source_root: Option<PathBuf>,
}

impl RunMetadata {
    pub fn new(source_root: Option<PathBuf>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            generated_at: chrono::Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            source_root,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub metadata: RunMetadata,
    pub records: Vec<DocumentRecord>,
    pub summary: SummaryStatistics,
    #[serde(default)]
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyReason {
    NoEligibleFiles,
    NoAnalyzableContent,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligibleFiles => f.write_str("no eligible files"),
            Self::NoAnalyzableContent => f.write_str("no analyzable content"),
        }
    }
}

/// Result of a folder run. Empty outcomes are notices, not failures.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Completed(BatchReport),
    Empty {
        reason: EmptyReason,
        skipped: Vec<SkippedFile>,
    },
}

impl BatchOutcome {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Empty { .. } => None,
        }
    }
}

/// Round to `decimals` places, halves to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
