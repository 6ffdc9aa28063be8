// Scoring
// Combines features into the 0-100 AI-likelihood score and its label.
// The label only depends on the rounded score, never on raw features.

use crate::models::{round_to, AuthorshipLabel, FeatureVector, ScoreResult};
use crate::services::config_store::ScoringConfig;

/// Scores at or above this are at least ambiguous.
pub const AMBIGUOUS_THRESHOLD: f64 = 40.0;
/// Scores at or above this are likely AI-generated.
pub const LIKELY_AI_THRESHOLD: f64 = 70.0;

/// Score with the default weights.
pub fn score_features(fv: &FeatureVector) -> ScoreResult {
    score_features_with(fv, &ScoringConfig::default())
}

pub fn score_features_with(fv: &FeatureVector, config: &ScoringConfig) -> ScoreResult {
    let ai_score = round_to(composite_score(fv, config) * 100.0, 2);
    ScoreResult {
        ai_score,
        label: label_for_score(ai_score),
    }
}

/// Weighted sum before scaling. Burstiness stays unclamped unless configured,
/// so the burstiness term may go negative.
pub fn composite_score(fv: &FeatureVector, config: &ScoringConfig) -> f64 {
    let burstiness = if config.clamp_burstiness {
        fv.burstiness.clamp(0.0, 1.0)
    } else {
        fv.burstiness
    };
    let low_perplexity = if fv.perplexity_proxy < config.perplexity_threshold {
        1.0
    } else {
        0.0
    };

    config.diversity_weight * (1.0 - fv.lexical_diversity)
        + config.burstiness_weight * (1.0 - burstiness)
        + config.repetition_weight * fv.repetition_ratio
        + config.perplexity_weight * low_perplexity
}

/// Closed-open bands: [.., 40) human, [40, 70) ambiguous, [70, ..) likely AI.
pub fn label_for_score(ai_score: f64) -> AuthorshipLabel {
    if ai_score < AMBIGUOUS_THRESHOLD {
        AuthorshipLabel::Human
    } else if ai_score < LIKELY_AI_THRESHOLD {
        AuthorshipLabel::Ambiguous
    } else {
        AuthorshipLabel::LikelyAi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(diversity: f64, burstiness: f64, repetition: f64, perplexity: f64) -> FeatureVector {
        FeatureVector {
            text_length: 500,
            sentence_count: 10,
            lexical_diversity: diversity,
            burstiness,
            readability: 60.0,
            repetition_ratio: repetition,
            perplexity_proxy: perplexity,
        }
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(label_for_score(0.0), AuthorshipLabel::Human);
        assert_eq!(label_for_score(39.99), AuthorshipLabel::Human);
        assert_eq!(label_for_score(40.0), AuthorshipLabel::Ambiguous);
        assert_eq!(label_for_score(69.99), AuthorshipLabel::Ambiguous);
        assert_eq!(label_for_score(70.0), AuthorshipLabel::LikelyAi);
        assert_eq!(label_for_score(100.0), AuthorshipLabel::LikelyAi);
    }

    #[test]
    fn test_label_total_over_grid() {
        let mut last = AuthorshipLabel::Human;
        for i in 0..=10_000 {
            let score = i as f64 / 100.0;
            let label = label_for_score(score);
            assert!(label >= last, "labels must be monotonic at {}", score);
            last = label;
        }
        assert_eq!(last, AuthorshipLabel::LikelyAi);
    }

    #[test]
    fn test_weighted_composite() {
        // 0.3*0.5 + 0.2*0.6 + 0.2*0.1 + 0.3*1 = 0.59
        let result = score_features(&features(0.5, 0.4, 0.1, 20.0));
        assert_eq!(result.ai_score, 59.0);
        assert_eq!(result.label, AuthorshipLabel::Ambiguous);
    }

    #[test]
    fn test_perplexity_indicator_is_strict() {
        let below = score_features(&features(0.5, 0.4, 0.1, 99.99));
        let at = score_features(&features(0.5, 0.4, 0.1, 100.0));
        assert_eq!(below.ai_score - at.ai_score, 30.0);
    }

    #[test]
    fn test_score_rounds_to_two_decimals() {
        let result = score_features(&features(0.12345, 0.0, 0.0, 500.0));
        // 0.3*0.87655 + 0.2 = 0.462965 -> 46.2965 -> 46.3
        assert_eq!(result.ai_score, 46.3);
    }

    #[test]
    fn test_unclamped_burstiness_allows_negative_scores() {
        // Achievable range: high diversity plus burstiness well above 1
        // pushes the composite below zero; such documents read as human.
        let result = score_features(&features(1.0, 3.0, 0.02, 400.0));
        // 0 + 0.2*(1-3) + 0.2*0.02 + 0 = -0.396
        assert_eq!(result.ai_score, -39.6);
        assert_eq!(result.label, AuthorshipLabel::Human);

        // Upper end: single repeated token, no burstiness, tight sentences.
        let top = score_features(&features(0.01, 0.0, 1.0, 0.0));
        assert!(top.ai_score <= 100.0);
        assert_eq!(top.label, AuthorshipLabel::LikelyAi);
    }

    #[test]
    fn test_clamped_burstiness_floors_the_term() {
        let config = ScoringConfig {
            clamp_burstiness: true,
            ..ScoringConfig::default()
        };
        let result = score_features_with(&features(1.0, 3.0, 0.02, 400.0), &config);
        // 0 + 0.2*0 + 0.2*0.02 + 0 = 0.004
        assert_eq!(result.ai_score, 0.4);
    }

    #[test]
    fn test_scoring_is_pure() {
        let fv = features(0.42, 0.73, 0.08, 150.0);
        assert_eq!(score_features(&fv), score_features(&fv));
    }
}
