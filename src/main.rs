mod anchor;
mod augment;
mod config;
mod diagnostics;
mod disambiguate;
mod error;
mod table;
mod types;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use augment::FillSummary;
use config::{Config, FieldLayout};
use diagnostics::{Diagnostic, DiagnosticSink, LoggingSink};
use table::RowKind;

#[derive(Parser)]
#[command(
    name = "year_fill",
    about = "Complete the missing year of month/day date columns in published case tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill one CSV → <stem>_c.csv with YYYY/MM/DD columns appended
    Fill {
        /// Input CSV (first column: release date "<M>月<D>日")
        input: PathBuf,
        /// Output path [default: <stem>_c.csv next to the input]
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write diagnostics as JSON for manual review
        #[arg(long)]
        report: Option<PathBuf>,
        #[command(flatten)]
        tunables: Tunables,
    },
    /// Fill every CSV in a directory that is not already an output
    Batch {
        dir: PathBuf,
        /// Descend into subdirectories
        #[arg(long)]
        recursive: bool,
        #[command(flatten)]
        tunables: Tunables,
    },
    /// Flag rows that start with neither the header marker nor a date
    Check {
        input: PathBuf,
        #[arg(long, default_value = config::DEFAULT_ENCODING)]
        encoding: String,
    },
}

#[derive(Args, Clone)]
struct Tunables {
    /// Year of the first release date in the file
    #[arg(long, default_value_t = config::DEFAULT_BASE_YEAR)]
    base_year: i32,
    /// Warn when a resolved date is more than this many days from the release date
    #[arg(long, default_value_t = config::DEFAULT_WARN_THRESHOLD_DAYS)]
    warn_days: i64,
    /// Encoding of input and output (WHATWG label)
    #[arg(long, default_value = config::DEFAULT_ENCODING)]
    encoding: String,
    /// Appended to the input stem to name the output
    #[arg(long, default_value = config::DEFAULT_OUTPUT_SUFFIX)]
    suffix: String,
    /// Column (0-based) holding the release date
    #[arg(long, default_value_t = 0)]
    release_field: usize,
    /// Column (0-based) holding the onset date
    #[arg(long, default_value_t = 7)]
    onset_field: usize,
    /// Column (0-based) holding the confirmation date
    #[arg(long, default_value_t = 8)]
    confirmed_field: usize,
}

impl From<Tunables> for Config {
    fn from(t: Tunables) -> Self {
        Config {
            base_year: t.base_year,
            warn_threshold_days: t.warn_days,
            encoding: t.encoding,
            output_suffix: t.suffix,
            layout: FieldLayout {
                release: t.release_field,
                onset: t.onset_field,
                confirmed: t.confirmed_field,
            },
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Fill {
            input,
            out,
            report,
            tunables,
        } => run_fill(&input, out, report, &tunables.into()),
        Command::Batch {
            dir,
            recursive,
            tunables,
        } => run_batch(&dir, recursive, &tunables.into()),
        Command::Check { input, encoding } => run_check(&input, &encoding),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  FILL: load whole table, run the pass, write whole table
// ═══════════════════════════════════════════════════════════════════════

fn fill_file(
    input: &Path,
    output: &Path,
    config: &Config,
    sink: &mut impl DiagnosticSink,
) -> Result<FillSummary> {
    let encoding = table::encoding_for(&config.encoding)?;
    let mut records = table::read_table(input, encoding)
        .with_context(|| format!("cannot read {}", input.display()))?;

    let summary = augment::augment_records(&mut records, config, sink)
        .with_context(|| format!("{}: nothing written", input.display()))?;

    table::write_table(output, &records, encoding)
        .with_context(|| format!("cannot write {}", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        header = summary.has_header,
        rows = summary.data_rows,
        rollovers = summary.rollovers,
        empty_dates = summary.empty_secondary,
        "filled"
    );
    Ok(summary)
}

fn run_fill(
    input: &Path,
    out: Option<PathBuf>,
    report: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let output = out.unwrap_or_else(|| table::output_path(input, &config.output_suffix));
    let mut sink = LoggingSink::new();
    let result = fill_file(input, &output, config, &mut sink);

    // The report is still useful when the pass aborts part-way.
    if let Some(path) = report {
        write_report(&path, sink.events())?;
    }
    result?;

    let review: Vec<usize> = sink
        .events()
        .iter()
        .filter(|d| !matches!(d, Diagnostic::NewYear { .. }))
        .map(Diagnostic::row)
        .collect();
    if !review.is_empty() {
        warn!("{} row(s) need manual review: {review:?}", review.len());
    }
    Ok(())
}

fn write_report(path: &Path, events: &[Diagnostic]) -> Result<()> {
    let json = serde_json::to_string_pretty(events).context("diagnostics serialization")?;
    std::fs::write(path, &json).with_context(|| format!("cannot write {}", path.display()))?;
    info!("  {} ({} bytes)", path.display(), json.len());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  BATCH: one independent pass per file
// ═══════════════════════════════════════════════════════════════════════

fn batch_inputs(dir: &Path, recursive: bool, suffix: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .filter(|p| !table::is_output_file(p, suffix))
        .collect()
}

fn run_batch(dir: &Path, recursive: bool, config: &Config) -> Result<()> {
    let inputs = batch_inputs(dir, recursive, &config.output_suffix);
    if inputs.is_empty() {
        warn!(dir = %dir.display(), "no input CSV files found");
        return Ok(());
    }

    let mut failed = 0usize;
    for input in &inputs {
        let output = table::output_path(input, &config.output_suffix);
        let mut sink = LoggingSink::new();
        if let Err(e) = fill_file(input, &output, config, &mut sink) {
            error!("{e:#}");
            failed += 1;
        }
    }

    info!("{} file(s), {} failed", inputs.len(), failed);
    if failed > 0 {
        bail!("{failed} of {} file(s) failed", inputs.len());
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  CHECK: row classification only, nothing written
// ═══════════════════════════════════════════════════════════════════════

fn run_check(input: &Path, encoding: &str) -> Result<()> {
    let encoding = table::encoding_for(encoding)?;
    let records = table::read_table(input, encoding)
        .with_context(|| format!("cannot read {}", input.display()))?;

    let mut sink = LoggingSink::new();
    let (mut headers, mut data) = (0usize, 0usize);
    for (idx, record) in records.iter().enumerate() {
        match table::classify_row(record) {
            RowKind::Header => headers += 1,
            RowKind::Data => data += 1,
            RowKind::Unrecognized => sink.emit(Diagnostic::UnrecognizedRow {
                row: idx + 1,
                first_field: record.first().cloned().unwrap_or_default(),
            }),
        }
    }

    info!(
        "{}: {} header, {} data, {} flagged",
        input.display(),
        headers,
        data,
        sink.warning_count()
    );
    if headers > 1 {
        warn!("{headers} header rows; only the first is expected");
    }
    Ok(())
}
