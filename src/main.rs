use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use authorcheck_lib::export::{
    ChartStyle, Exporter, JsonExporter, MarkdownExporter, SvgChartExporter, DISCLAIMER,
    INTERPRETATION_BANDS,
};
use authorcheck_lib::models::{BatchOutcome, BatchReport, FeatureVector, ScoreResult};
use authorcheck_lib::services::discovery::SUPPORTED_EXTENSIONS;
use authorcheck_lib::services::{
    analyze_text, AppConfig, BatchAnalyzer, ConfigStore, ContentReader, FileContentReader,
    RuleTokenizer,
};

#[derive(Parser, Debug)]
#[command(name = "authorcheck")]
#[command(version, about = "Heuristic screening of documents for AI-generated text", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/authorcheck/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every .txt/.docx file under a folder
    Scan {
        /// Folder to analyze (searched recursively)
        folder: PathBuf,

        /// Output directory for the report and chart (default: ./authorcheck_report)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format(s) to generate (default: from config)
        #[arg(short, long, value_enum)]
        format: Vec<Format>,

        /// Analyze files on all cores
        #[arg(long)]
        parallel: bool,

        /// Disable progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print features and score of a single file as JSON
    Inspect {
        /// Input file path
        input: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Json,
    Markdown,
    Svg,
}

impl Format {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "svg" | "chart" => Some(Self::Svg),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    authorcheck_lib::init_logging(default_log_level(cli.verbose));

    let store = match &cli.config {
        Some(path) => ConfigStore::from_file(path.clone()),
        None => ConfigStore::new(
            ConfigStore::default_config_dir().unwrap_or_else(|| PathBuf::from(".authorcheck")),
        ),
    };
    let config = store.load().map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Scan {
            folder,
            output,
            format,
            parallel,
            quiet,
        } => scan(config, folder, output, format, parallel, quiet),
        Commands::Inspect { input } => inspect(&config, input),
        Commands::Config { init } => show_config(&store, &config, init),
    }
}

/// Filter used when `RUST_LOG` is unset.
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn scan(
    mut config: AppConfig,
    folder: PathBuf,
    output: Option<PathBuf>,
    formats: Vec<Format>,
    parallel: bool,
    quiet: bool,
) -> Result<()> {
    if !folder.exists() {
        anyhow::bail!("Input folder does not exist: {}", folder.display());
    }
    if !folder.is_dir() {
        anyhow::bail!("Input is not a folder: {}", folder.display());
    }
    for ext in &config.analysis.extensions {
        if !SUPPORTED_EXTENSIONS.contains(&ext.trim_start_matches('.').to_lowercase().as_str()) {
            eprintln!("[!] Extension '{}' has no reader; matching files will be skipped", ext);
        }
    }

    config.analysis.parallel |= parallel;
    let formats = if formats.is_empty() {
        config
            .report
            .formats
            .iter()
            .filter_map(|f| Format::from_name(f))
            .collect()
    } else {
        formats
    };
    let output_dir = output.unwrap_or_else(|| PathBuf::from("authorcheck_report"));

    if !quiet {
        println!("[*] Analyzing: {}", folder.display());
    }

    let tokenizer = RuleTokenizer;
    let reader = FileContentReader;
    let analyzer = BatchAnalyzer::new(&tokenizer, &reader)
        .with_scoring(config.scoring.clone())
        .with_analysis(config.analysis.clone())
        .with_progress(!quiet);

    let report = match analyzer.analyze_folder(&folder) {
        BatchOutcome::Completed(report) => report,
        BatchOutcome::Empty { reason, skipped } => {
            println!("[i] Nothing to report: {}", reason);
            if !skipped.is_empty() {
                println!("[i] {} file(s) were skipped:", skipped.len());
                for s in &skipped {
                    println!("    {}: {}", s.file_name, s.reason);
                }
            }
            return Ok(());
        }
    };

    let mut written = Vec::new();
    for format in &formats {
        let exporter: Box<dyn Exporter> = match format {
            Format::Json => Box::new(JsonExporter::new(output_dir.clone())),
            Format::Markdown => Box::new(MarkdownExporter::new(output_dir.clone())),
            Format::Svg => Box::new(SvgChartExporter::new(
                output_dir.clone(),
                ChartStyle::from(&config.report),
            )),
        };
        let path = exporter
            .export(&report)
            .with_context(|| format!("Failed to export {:?} to: {}", format, output_dir.display()))?;
        written.push(path);
    }

    print_summary(&report);
    for path in &written {
        println!("[✓] Wrote: {}", path.display());
    }
    println!();
    for band in INTERPRETATION_BANDS {
        println!("    {}", band);
    }
    println!("[!] {}", DISCLAIMER);

    Ok(())
}

fn print_summary(report: &BatchReport) {
    let s = &report.summary;
    println!("\n[*] Summary");
    println!("    Documents analyzed: {}", s.total);
    println!("    Mean AI score:      {:.2}", s.mean_score);
    println!("    Highest / lowest:   {:.2} / {:.2}", s.max_score, s.min_score);
    println!("    Likely AI:          {}", s.label_counts.likely_ai);
    println!("    Ambiguous:          {}", s.label_counts.ambiguous);
    println!("    Likely human:       {}", s.label_counts.human);
    if !report.skipped.is_empty() {
        println!("    Skipped files:      {}", report.skipped.len());
    }
}

fn inspect(config: &AppConfig, input: PathBuf) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let text = FileContentReader
        .read(&input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Output {
        file: String,
        features: Option<FeatureVector>,
        score: Option<ScoreResult>,
    }

    let analysis = analyze_text(&text, &RuleTokenizer, &config.scoring, config.analysis.min_chars);
    let out = Output {
        file: input.display().to_string(),
        features: analysis.as_ref().map(|(f, _)| f.clone()),
        score: analysis.map(|(_, s)| s),
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    if out.score.is_none() {
        eprintln!("[i] Not enough content to analyze");
    }
    Ok(())
}

fn show_config(store: &ConfigStore, config: &AppConfig, init: bool) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if init {
        store.save(config).map_err(anyhow::Error::msg)?;
        println!("[✓] Saved: {}", store.config_file().display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(false), "info");
        assert_eq!(default_log_level(true), "debug");
    }

    #[test]
    fn test_format_names_from_config() {
        assert_eq!(Format::from_name(" Markdown "), Some(Format::Markdown));
        assert_eq!(Format::from_name("chart"), Some(Format::Svg));
        assert_eq!(Format::from_name("xlsx"), None);
    }
}
