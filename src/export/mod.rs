pub mod json_export;
pub mod markdown_export;
pub mod svg_chart;

use std::path::PathBuf;

use anyhow::Result;

use crate::models::BatchReport;

pub use json_export::JsonExporter;
pub use markdown_export::MarkdownExporter;
pub use svg_chart::{ChartStyle, SvgChartExporter};

pub const INTERPRETATION_BANDS: [&str; 3] = [
    "0-40: likely human-authored",
    "40-70: ambiguous (possibly mixed or edited)",
    "70-100: high probability of AI generation",
];

pub const DISCLAIMER: &str =
    "Scores are heuristic and advisory only; do not treat them as the sole basis for judging authorship.";

pub trait Exporter {
    /// Write the artifact and return its path.
    fn export(&self, report: &BatchReport) -> Result<PathBuf>;
}
