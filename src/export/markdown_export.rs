use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::export::{Exporter, DISCLAIMER, INTERPRETATION_BANDS};
use crate::models::BatchReport;

#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    out_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn render(report: &BatchReport) -> String {
        let mut md = String::new();
        let s = &report.summary;

        let _ = writeln!(md, "# AI Text Screening Report\n");
        let _ = writeln!(md, "- Run: `{}`", report.metadata.run_id);
        let _ = writeln!(md, "- Generated: {}", report.metadata.generated_at);
        if let Some(root) = &report.metadata.source_root {
            let _ = writeln!(md, "- Source: `{}`", root.display());
        }

        let _ = writeln!(md, "\n## Summary\n");
        let _ = writeln!(md, "| Documents | Mean score | Max | Min | Likely AI | Ambiguous | Human |");
        let _ = writeln!(md, "|---|---|---|---|---|---|---|");
        let _ = writeln!(
            md,
            "| {} | {:.2} | {:.2} | {:.2} | {} | {} | {} |",
            s.total,
            s.mean_score,
            s.max_score,
            s.min_score,
            s.label_counts.likely_ai,
            s.label_counts.ambiguous,
            s.label_counts.human
        );

        let _ = writeln!(md, "\n## Details\n");
        let _ = writeln!(
            md,
            "| File | Length | Sentences | Diversity | Burstiness | Readability | Repetition | Perplexity proxy | AI score | Result |"
        );
        let _ = writeln!(md, "|---|---|---|---|---|---|---|---|---|---|");
        for r in &report.records {
            let f = &r.features;
            let _ = writeln!(
                md,
                "| {} | {} | {} | {:.3} | {:.3} | {:.2} | {:.3} | {:.2} | {:.2} | {} |",
                escape_cell(&r.file_name),
                f.text_length,
                f.sentence_count,
                f.lexical_diversity,
                f.burstiness,
                f.readability,
                f.repetition_ratio,
                f.perplexity_proxy,
                r.score.ai_score,
                r.score.label
            );
        }

        if !report.skipped.is_empty() {
            let _ = writeln!(md, "\n## Skipped files\n");
            for skipped in &report.skipped {
                let _ = writeln!(md, "- {}: {}", escape_cell(&skipped.file_name), skipped.reason);
            }
        }

        let _ = writeln!(md, "\n## Reading the score\n");
        for band in INTERPRETATION_BANDS {
            let _ = writeln!(md, "- {}", band);
        }
        let _ = writeln!(md, "\n> {}", DISCLAIMER);

        md
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

impl Exporter for MarkdownExporter {
    fn export(&self, report: &BatchReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("report.md");
        fs::write(&path, Self::render(report))?;
        Ok(path)
    }
}
