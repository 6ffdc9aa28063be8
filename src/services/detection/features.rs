// Feature Extraction
// Computes the lexical and structural signals for one document

use crate::models::FeatureVector;
use crate::services::text_processor::Tokenizer;
use std::collections::HashMap;

/// Minimum trimmed character count for a document to carry enough signal.
pub const DEFAULT_MIN_CHARS: usize = 50;

/// Extract features with the default minimum length.
pub fn extract_features(text: &str, tokenizer: &dyn Tokenizer) -> Option<FeatureVector> {
    extract_features_with_min(text, tokenizer, DEFAULT_MIN_CHARS)
}

/// Extract features, returning `None` when the text is too short or has no tokens.
pub fn extract_features_with_min(
    text: &str,
    tokenizer: &dyn Tokenizer,
    min_chars: usize,
) -> Option<FeatureVector> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() < min_chars {
        return None;
    }

    let sentences = tokenizer.sentences(text);
    let words = tokenizer.words(text);
    if words.is_empty() {
        return None;
    }

    let total = words.len() as f64;

    let mut freq: HashMap<&str, usize> = HashMap::new();
    for w in &words {
        *freq.entry(w.as_str()).or_insert(0) += 1;
    }
    let lexical_diversity = freq.len() as f64 / total;
    let top_count = freq.values().copied().max().unwrap_or(0);
    let repetition_ratio = top_count as f64 / total;

    let sentence_lengths: Vec<f64> = sentences
        .iter()
        .map(|s| tokenizer.words(s).len() as f64)
        .collect();
    let (mean, variance) = mean_and_variance(&sentence_lengths);
    let burstiness = if mean > 0.0 { variance.sqrt() / mean } else { 0.0 };

    Some(FeatureVector {
        text_length: text.chars().count(),
        sentence_count: sentences.len(),
        lexical_diversity,
        burstiness,
        readability: tokenizer.readability_ease(text),
        repetition_ratio,
        perplexity_proxy: variance,
    })
}

/// Population mean and variance; both 0 for an empty slice.
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}
