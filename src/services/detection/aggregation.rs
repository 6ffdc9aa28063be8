// Aggregation Logic
// Runs extraction and scoring over a folder and summarizes the results

use crate::models::{
    round_to, BatchOutcome, BatchReport, DocumentRecord, DocumentSource, EmptyReason,
    FeatureVector, FileOutcome, LabelCounts, RunMetadata, ScoreResult, SkipReason, SkippedFile,
    SummaryStatistics,
};
use crate::services::config_store::{AnalysisConfig, ScoringConfig};
use crate::services::discovery::discover_files;
use crate::services::document_reader::ContentReader;
use crate::services::text_processor::Tokenizer;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use super::features::extract_features_with_min;
use super::scoring::score_features_with;

/// Features and score for one text, or `None` when there is not enough signal.
pub fn analyze_text(
    text: &str,
    tokenizer: &dyn Tokenizer,
    scoring: &ScoringConfig,
    min_chars: usize,
) -> Option<(FeatureVector, ScoreResult)> {
    let features = extract_features_with_min(text, tokenizer, min_chars)?;
    let score = score_features_with(&features, scoring);
    Some((features, score))
}

/// Summary over all records; `None` when there are none.
pub fn summarize(records: &[DocumentRecord]) -> Option<SummaryStatistics> {
    if records.is_empty() {
        return None;
    }

    let scores = records.iter().map(|r| r.score.ai_score);
    let total_score: f64 = scores.clone().sum();
    let max_score = scores.clone().fold(f64::NEG_INFINITY, f64::max);
    let min_score = scores.fold(f64::INFINITY, f64::min);

    let mut label_counts = LabelCounts::default();
    for r in records {
        label_counts.increment(r.score.label);
    }

    Some(SummaryStatistics {
        total: records.len(),
        mean_score: round_to(total_score / records.len() as f64, 2),
        max_score,
        min_score,
        label_counts,
    })
}

/// Batch pipeline: discover, read, extract, score, summarize.
pub struct BatchAnalyzer<'a> {
    tokenizer: &'a dyn Tokenizer,
    reader: &'a dyn ContentReader,
    scoring: ScoringConfig,
    analysis: AnalysisConfig,
    show_progress: bool,
}

impl<'a> BatchAnalyzer<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer, reader: &'a dyn ContentReader) -> Self {
        Self {
            tokenizer,
            reader,
            scoring: ScoringConfig::default(),
            analysis: AnalysisConfig::default(),
            show_progress: false,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Analyze every eligible file under `root`.
    pub fn analyze_folder(&self, root: &Path) -> BatchOutcome {
        let sources = discover_files(root, &self.analysis.extensions);
        info!(
            root = %root.display(),
            files = sources.len(),
            "[BATCH] Discovery finished"
        );
        self.analyze_sources(&sources, Some(root))
    }

    /// Analyze an already-discovered list; records keep the list's order.
    pub fn analyze_sources(&self, sources: &[DocumentSource], root: Option<&Path>) -> BatchOutcome {
        if sources.is_empty() {
            return BatchOutcome::Empty {
                reason: EmptyReason::NoEligibleFiles,
                skipped: Vec::new(),
            };
        }

        let t0 = Instant::now();
        let progress = self.progress_bar(sources.len());

        let outcomes: Vec<FileOutcome> = if self.analysis.parallel {
            sources
                .par_iter()
                .map(|source| {
                    let outcome = self.analyze_document(source);
                    progress.inc(1);
                    outcome
                })
                .collect()
        } else {
            sources
                .iter()
                .map(|source| {
                    let outcome = self.analyze_document(source);
                    progress.inc(1);
                    outcome
                })
                .collect()
        };
        progress.finish_and_clear();

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Included(record) => records.push(record),
                FileOutcome::Skipped(file) => skipped.push(file),
            }
        }

        info!(
            analyzed = records.len(),
            skipped = skipped.len(),
            parallel = self.analysis.parallel,
            elapsed_ms = t0.elapsed().as_millis(),
            "[BATCH] Analysis finished"
        );

        match summarize(&records) {
            Some(summary) => BatchOutcome::Completed(BatchReport {
                metadata: RunMetadata::new(root.map(Path::to_path_buf)),
                records,
                summary,
                skipped,
            }),
            None => BatchOutcome::Empty {
                reason: EmptyReason::NoAnalyzableContent,
                skipped,
            },
        }
    }

    /// Read, extract and score a single file.
    pub fn analyze_document(&self, source: &DocumentSource) -> FileOutcome {
        let skip = |reason: SkipReason| {
            debug!(file = %source.display_name, reason = %reason, "[BATCH] Skipped");
            FileOutcome::Skipped(SkippedFile {
                path: source.path.clone(),
                file_name: source.display_name.clone(),
                reason,
            })
        };

        let text = match self.reader.read(&source.path) {
            Ok(text) => text,
            Err(e) => return skip(SkipReason::Unreadable(e.to_string())),
        };

        match analyze_text(&text, self.tokenizer, &self.scoring, self.analysis.min_chars) {
            Some((features, score)) => {
                debug!(
                    file = %source.display_name,
                    ai_score = score.ai_score,
                    label = %score.label,
                    "[BATCH] Scored"
                );
                FileOutcome::Included(DocumentRecord {
                    file_name: source.display_name.clone(),
                    features: features.rounded_for_display(),
                    score,
                })
            }
            None => skip(SkipReason::InsufficientContent),
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})") {
            pb.set_style(style.progress_chars("=> "));
        }
        pb.set_message("Analyzing documents");
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorshipLabel;
    use crate::services::document_reader::ReadError;
    use crate::services::text_processor::RuleTokenizer;
    use std::collections::HashMap;
    use std::path::PathBuf;

    const REPEATED: &str = "The quick brown fox jumps over the lazy dog. ";
    const VARIED: &str = "Rain fell. Across the harbor, fishermen hauled dripping nets onto \
        weathered decks while gulls circled overhead, screaming at anyone foolish enough to \
        leave bait unattended near splintered crates. Why? Because winter was coming early, \
        and every captain knew that storms would soon close this coast for months.";

    /// Reader serving in-memory content keyed by path.
    struct MapReader(HashMap<PathBuf, Option<String>>);

    impl ContentReader for MapReader {
        fn read(&self, path: &Path) -> Result<String, ReadError> {
            match self.0.get(path) {
                Some(Some(text)) => Ok(text.clone()),
                _ => Err(ReadError::Docx("corrupt".to_string())),
            }
        }
    }

    fn record(name: &str, score: f64, label: AuthorshipLabel) -> DocumentRecord {
        DocumentRecord {
            file_name: name.to_string(),
            features: FeatureVector {
                text_length: 100,
                sentence_count: 3,
                lexical_diversity: 0.5,
                burstiness: 0.5,
                readability: 50.0,
                repetition_ratio: 0.1,
                perplexity_proxy: 10.0,
            },
            score: ScoreResult { ai_score: score, label },
        }
    }

    fn sources(names: &[&str]) -> Vec<DocumentSource> {
        names.iter().map(|n| DocumentSource::new(PathBuf::from(n))).collect()
    }

    #[test]
    fn test_summary_statistics() {
        let records = vec![
            record("a", 10.0, AuthorshipLabel::Human),
            record("b", 50.0, AuthorshipLabel::Ambiguous),
            record("c", 90.0, AuthorshipLabel::LikelyAi),
        ];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.mean_score, 50.0);
        assert_eq!(summary.max_score, 90.0);
        assert_eq!(summary.min_score, 10.0);
        for label in AuthorshipLabel::ALL {
            assert_eq!(summary.label_counts.get(label), 1);
        }
    }

    #[test]
    fn test_summary_mean_rounds_ties_to_even() {
        let records = vec![
            record("a", 10.25, AuthorshipLabel::Human),
            record("b", 10.0, AuthorshipLabel::Human),
        ];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.mean_score, 10.12);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_order_is_discovery_order_and_empty_files_are_skipped() {
        let mut map = HashMap::new();
        map.insert(PathBuf::from("a.txt"), Some(REPEATED.repeat(20)));
        map.insert(PathBuf::from("b.txt"), Some(String::new()));
        map.insert(PathBuf::from("c.txt"), Some(VARIED.to_string()));
        let reader = MapReader(map);

        let analyzer = BatchAnalyzer::new(&RuleTokenizer, &reader);
        let outcome = analyzer.analyze_sources(&sources(&["a.txt", "b.txt", "c.txt"]), None);
        let report = outcome.report().expect("completed");

        let names: Vec<&str> = report.records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "c.txt"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].file_name, "b.txt");
        assert_eq!(report.skipped[0].reason, SkipReason::InsufficientContent);
        assert_eq!(report.summary.total, 2);
    }

    #[test]
    fn test_unreadable_files_do_not_abort_the_batch() {
        let mut map = HashMap::new();
        map.insert(PathBuf::from("broken.docx"), None);
        map.insert(PathBuf::from("ok.txt"), Some(VARIED.to_string()));
        let reader = MapReader(map);

        let analyzer = BatchAnalyzer::new(&RuleTokenizer, &reader);
        let outcome = analyzer.analyze_sources(&sources(&["broken.docx", "ok.txt"]), None);
        let report = outcome.report().expect("completed");
        assert_eq!(report.records.len(), 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::Unreadable(_)));
    }

    #[test]
    fn test_empty_input_signals() {
        let reader = MapReader(HashMap::new());
        let analyzer = BatchAnalyzer::new(&RuleTokenizer, &reader);

        let none = analyzer.analyze_sources(&[], None);
        assert!(matches!(
            none,
            BatchOutcome::Empty { reason: EmptyReason::NoEligibleFiles, .. }
        ));

        let unreadable = analyzer.analyze_sources(&sources(&["x.txt", "y.txt"]), None);
        match unreadable {
            BatchOutcome::Empty { reason, skipped } => {
                assert_eq!(reason, EmptyReason::NoAnalyzableContent);
                assert_eq!(skipped.len(), 2);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut map = HashMap::new();
        let names: Vec<String> = (0..24).map(|i| format!("doc{:02}.txt", i)).collect();
        for (i, name) in names.iter().enumerate() {
            let text = if i % 3 == 0 {
                REPEATED.repeat(5 + i)
            } else if i % 3 == 1 {
                VARIED.to_string()
            } else {
                "tiny".to_string()
            };
            map.insert(PathBuf::from(name), Some(text));
        }
        let reader = MapReader(map);
        let list: Vec<&str> = names.iter().map(String::as_str).collect();
        let list = sources(&list);

        let sequential = BatchAnalyzer::new(&RuleTokenizer, &reader).analyze_sources(&list, None);
        let parallel = BatchAnalyzer::new(&RuleTokenizer, &reader)
            .with_analysis(AnalysisConfig {
                parallel: true,
                ..AnalysisConfig::default()
            })
            .analyze_sources(&list, None);

        let (seq, par) = (sequential.report().unwrap(), parallel.report().unwrap());
        assert_eq!(seq.records, par.records);
        assert_eq!(seq.summary, par.summary);
        assert_eq!(seq.skipped, par.skipped);
    }

    #[test]
    fn test_records_carry_display_rounding() {
        let mut map = HashMap::new();
        map.insert(PathBuf::from("v.txt"), Some(VARIED.to_string()));
        let reader = MapReader(map);
        let outcome = BatchAnalyzer::new(&RuleTokenizer, &reader)
            .analyze_sources(&sources(&["v.txt"]), None);
        let fv = &outcome.report().unwrap().records[0].features;
        assert_eq!(fv.lexical_diversity, round_to(fv.lexical_diversity, 3));
        assert_eq!(fv.readability, round_to(fv.readability, 2));
    }
}
