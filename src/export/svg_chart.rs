use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::export::Exporter;
use crate::models::BatchReport;
use crate::services::config_store::ReportConfig;

const WIDTH: f64 = 1000.0;
const LABEL_WIDTH: f64 = 240.0;
const RIGHT_MARGIN: f64 = 40.0;
const TOP: f64 = 70.0;
const BOTTOM: f64 = 60.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 8.0;
const TICK_STEP: f64 = 10.0;

/// Visual settings passed in per render instead of process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub font_family: String,
    pub bar_color: String,
}

impl From<&ReportConfig> for ChartStyle {
    fn from(cfg: &ReportConfig) -> Self {
        Self {
            font_family: cfg.chart_font.clone(),
            bar_color: cfg.bar_color.clone(),
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

/// Horizontal bar per file with a dashed reference line at the mean score.
#[derive(Debug, Clone)]
pub struct SvgChartExporter {
    out_dir: PathBuf,
    style: ChartStyle,
}

impl SvgChartExporter {
    pub fn new(out_dir: PathBuf, style: ChartStyle) -> Self {
        Self { out_dir, style }
    }

    pub fn render(report: &BatchReport, style: &ChartStyle) -> String {
        let records = &report.records;
        let plot_height = records.len() as f64 * (BAR_HEIGHT + BAR_GAP);
        let height = TOP + plot_height + BOTTOM;

        // Scores below zero are reachable, so the axis follows the data.
        let lo = (report.summary.min_score.min(0.0) / TICK_STEP).floor() * TICK_STEP;
        let hi = (report.summary.max_score.max(100.0) / TICK_STEP).ceil() * TICK_STEP;
        let plot_width = WIDTH - LABEL_WIDTH - RIGHT_MARGIN;
        let x_of = |v: f64| LABEL_WIDTH + (v - lo) / (hi - lo) * plot_width;

        let font = html_escape::encode_double_quoted_attribute(&style.font_family);
        let color = html_escape::encode_double_quoted_attribute(&style.bar_color);

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
            w = WIDTH,
            h = height,
            font = font,
        );
        svg.push_str(&format!(
            r#"<rect width="{w}" height="{h}" fill="white"/><text x="{cx}" y="32" font-size="18" font-weight="bold" text-anchor="middle">AI Text Detection Results</text>"#,
            w = WIDTH,
            h = height,
            cx = WIDTH / 2.0,
        ));

        let mut tick = lo;
        while tick <= hi + 1e-9 {
            let x = x_of(tick);
            svg.push_str(&format!(
                r##"<line x1="{x:.1}" y1="{y0}" x2="{x:.1}" y2="{y1}" stroke="#e0e0e0"/><text x="{x:.1}" y="{ty}" font-size="11" text-anchor="middle">{label}</text>"##,
                x = x,
                y0 = TOP - 6.0,
                y1 = TOP + plot_height,
                ty = TOP + plot_height + 16.0,
                label = tick,
            ));
            tick += TICK_STEP;
        }

        let zero = x_of(0.0);
        for (i, r) in records.iter().enumerate() {
            let y = TOP + i as f64 * (BAR_HEIGHT + BAR_GAP);
            let end = x_of(r.score.ai_score);
            let (bx, bw) = if end >= zero { (zero, end - zero) } else { (end, zero - end) };
            svg.push_str(&format!(
                r#"<text x="{lx}" y="{ty:.1}" font-size="12" text-anchor="end">{name}</text><rect x="{bx:.1}" y="{y:.1}" width="{bw:.1}" height="{bh}" fill="{color}"><title>{score:.2}</title></rect>"#,
                lx = LABEL_WIDTH - 8.0,
                ty = y + BAR_HEIGHT * 0.7,
                name = html_escape::encode_text(&r.file_name),
                bx = bx,
                y = y,
                bw = bw,
                bh = BAR_HEIGHT,
                color = color,
                score = r.score.ai_score,
            ));
        }

        let mean = report.summary.mean_score;
        let mx = x_of(mean);
        svg.push_str(&format!(
            r##"<line x1="{mx:.1}" y1="{y0}" x2="{mx:.1}" y2="{y1}" stroke="red" stroke-width="2" stroke-dasharray="6,4"/><text x="{tx:.1}" y="{ly}" font-size="12" fill="red">Mean {mean:.2}</text>"##,
            mx = mx,
            y0 = TOP - 10.0,
            y1 = TOP + plot_height,
            tx = mx + 4.0,
            ly = TOP - 14.0,
            mean = mean,
        ));

        svg.push_str(&format!(
            r#"<text x="{cx}" y="{y}" font-size="13" text-anchor="middle">AI generation likelihood score</text></svg>"#,
            cx = LABEL_WIDTH + plot_width / 2.0,
            y = height - 16.0,
        ));
        svg
    }
}

impl Exporter for SvgChartExporter {
    fn export(&self, report: &BatchReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("ai_score_chart.svg");
        fs::write(&path, Self::render(report, &self.style))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AuthorshipLabel, DocumentRecord, FeatureVector, LabelCounts, RunMetadata, ScoreResult,
        SummaryStatistics,
    };

    fn report(scores: &[(&str, f64)]) -> BatchReport {
        let records: Vec<DocumentRecord> = scores
            .iter()
            .map(|(name, score)| DocumentRecord {
                file_name: name.to_string(),
                features: FeatureVector {
                    text_length: 100,
                    sentence_count: 2,
                    lexical_diversity: 0.5,
                    burstiness: 0.5,
                    readability: 50.0,
                    repetition_ratio: 0.1,
                    perplexity_proxy: 5.0,
                },
                score: ScoreResult {
                    ai_score: *score,
                    label: crate::services::label_for_score(*score),
                },
            })
            .collect();
        let mut label_counts = LabelCounts::default();
        for r in &records {
            label_counts.increment(r.score.label);
        }
        let total: f64 = scores.iter().map(|(_, s)| s).sum();
        BatchReport {
            metadata: RunMetadata::new(None),
            summary: SummaryStatistics {
                total: records.len(),
                mean_score: total / records.len() as f64,
                max_score: scores.iter().map(|(_, s)| *s).fold(f64::MIN, f64::max),
                min_score: scores.iter().map(|(_, s)| *s).fold(f64::MAX, f64::min),
                label_counts,
            },
            records,
            skipped: vec![],
        }
    }

    #[test]
    fn test_one_bar_per_file_and_mean_line() {
        let rep = report(&[("a.txt", 20.0), ("b <draft>.docx", 80.0)]);
        let svg = SvgChartExporter::render(&rep, &ChartStyle::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<title>").count(), 2);
        assert!(svg.contains("Mean 50.00"));
        assert!(svg.contains("b &lt;draft&gt;.docx"));
        assert_eq!(rep.records[1].score.label, AuthorshipLabel::LikelyAi);
    }

    #[test]
    fn test_font_comes_from_style() {
        let rep = report(&[("a.txt", 55.0)]);
        let style = ChartStyle {
            font_family: "Noto Sans".to_string(),
            bar_color: "#123456".to_string(),
        };
        let svg = SvgChartExporter::render(&rep, &style);
        assert!(svg.contains(r#"font-family="Noto Sans""#));
        assert!(svg.contains(r##"fill="#123456""##));
    }

    #[test]
    fn test_negative_scores_extend_axis() {
        let rep = report(&[("neg.txt", -12.5), ("pos.txt", 30.0)]);
        let svg = SvgChartExporter::render(&rep, &ChartStyle::default());
        assert!(svg.contains(">-20</text>"));
    }
}
