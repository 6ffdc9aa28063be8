use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::export::Exporter;
use crate::models::{BatchReport, DocumentRecord, RunMetadata, SkippedFile, SummaryStatistics};

/// Report laid out as a workbook: one array of rows per sheet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook<'a> {
    pub metadata: &'a RunMetadata,
    pub summary: Vec<SummaryRow>,
    pub details: Vec<DetailRow<'a>>,
    pub skipped: &'a [SkippedFile],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub total_documents: usize,
    pub mean_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub likely_ai_count: usize,
    pub ambiguous_count: usize,
    pub human_count: usize,
}

impl From<&SummaryStatistics> for SummaryRow {
    fn from(s: &SummaryStatistics) -> Self {
        Self {
            total_documents: s.total,
            mean_score: s.mean_score,
            max_score: s.max_score,
            min_score: s.min_score,
            likely_ai_count: s.label_counts.likely_ai,
            ambiguous_count: s.label_counts.ambiguous,
            human_count: s.label_counts.human,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRow<'a> {
    pub file_name: &'a str,
    pub text_length: usize,
    pub sentence_count: usize,
    pub lexical_diversity: f64,
    pub burstiness: f64,
    pub readability: f64,
    pub repetition_ratio: f64,
    pub perplexity_proxy: f64,
    pub ai_score: f64,
    pub label: &'static str,
}

impl<'a> From<&'a DocumentRecord> for DetailRow<'a> {
    fn from(r: &'a DocumentRecord) -> Self {
        Self {
            file_name: &r.file_name,
            text_length: r.features.text_length,
            sentence_count: r.features.sentence_count,
            lexical_diversity: r.features.lexical_diversity,
            burstiness: r.features.burstiness,
            readability: r.features.readability,
            repetition_ratio: r.features.repetition_ratio,
            perplexity_proxy: r.features.perplexity_proxy,
            ai_score: r.score.ai_score,
            label: r.score.label.as_str(),
        }
    }
}

pub fn build_workbook(report: &BatchReport) -> Workbook<'_> {
    Workbook {
        metadata: &report.metadata,
        summary: vec![SummaryRow::from(&report.summary)],
        details: report.records.iter().map(DetailRow::from).collect(),
        skipped: &report.skipped,
    }
}

#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, report: &BatchReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("report.json");
        let data = serde_json::to_string_pretty(&build_workbook(report))?;
        fs::write(&path, data)?;
        Ok(path)
    }
}
