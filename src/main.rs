use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use spoof_eer::input::load_scores;
use spoof_eer::metrics::{compute_eer, det_curve};
use spoof_eer::report::{EerSummary, write_reports};
use spoof_eer::training::{JsonlMetricsLogger, Metrics, MetricsLogger};

#[derive(Debug, Parser)]
#[command(name = "spoof-eer", version, about = "Equal error rate for spoof/bona-fide scores")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the EER of a score file.
    Eer(EerArgs),
}

#[derive(Debug, Clone, Args)]
struct EerArgs {
    /// Score file: `[id] <score> <label>` per line, optionally gzipped.
    #[arg(long)]
    scores: PathBuf,

    /// Output directory for summary.json and report.txt.
    #[arg(long)]
    out: PathBuf,

    /// Split name used in reports and metric keys.
    #[arg(long, default_value = "eval")]
    split: String,

    /// Also write det_curve.tsv.
    #[arg(long)]
    curve: bool,

    /// Append `<split>_eer` to this JSON-lines metrics log.
    #[arg(long)]
    metrics_log: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    spoof_eer::logging::init(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Eer(args) => run_eer(&args),
    }
}

fn run_eer(args: &EerArgs) -> Result<(), String> {
    let table = load_scores(&args.scores).map_err(|e| e.to_string())?;
    let result = compute_eer(&table.scores, &table.labels).map_err(|e| e.to_string())?;
    tracing::info!(
        split = %args.split,
        eer = result.eer,
        threshold = result.threshold,
        "EER computed"
    );

    let curve = if args.curve {
        Some(det_curve(&table.scores, &table.labels).map_err(|e| e.to_string())?)
    } else {
        None
    };

    let summary = EerSummary::new(
        &args.split,
        &args.scores,
        table.count_label(1),
        table.count_label(0),
        result,
    );
    write_reports(&summary, curve.as_deref(), &args.out).map_err(|e| e.to_string())?;

    if let Some(path) = &args.metrics_log {
        log_metric(path, &args.split, result.eer).map_err(|e| e.to_string())?;
    }

    println!(
        "{}: EER={:.6} threshold={:.6} ({} trials)",
        args.split,
        result.eer,
        result.threshold,
        table.len()
    );
    Ok(())
}

fn log_metric(path: &Path, split: &str, eer: f64) -> Result<(), spoof_eer::training::LoggerError> {
    let mut logger = JsonlMetricsLogger::open(path)?;
    let mut record = Metrics::new();
    record.insert(format!("{split}_eer"), eer);
    logger.log(&record)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
