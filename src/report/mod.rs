use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::metrics::{DetPoint, EerResult};

pub mod json;
pub mod text;

use json::render_summary_json;
use text::{render_curve_tsv, render_report_text};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EerSummary {
    pub tool: String,
    pub version: String,
    pub split: String,
    pub scores_path: String,
    pub n_trials: usize,
    pub n_bonafide: usize,
    pub n_spoof: usize,
    pub eer: f64,
    pub threshold: f64,
}

impl EerSummary {
    pub fn new(
        split: &str,
        scores_path: &Path,
        n_bonafide: usize,
        n_spoof: usize,
        result: EerResult,
    ) -> Self {
        Self {
            tool: "spoof-eer".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            split: split.to_string(),
            scores_path: scores_path.display().to_string(),
            n_trials: n_bonafide + n_spoof,
            n_bonafide,
            n_spoof,
            eer: result.eer,
            threshold: result.threshold,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

/// Writes `summary.json`, `report.txt` and, with a curve, `det_curve.tsv`.
pub fn write_reports(
    summary: &EerSummary,
    curve: Option<&[DetPoint]>,
    out_dir: &Path,
) -> Result<(), ReportError> {
    fs::create_dir_all(out_dir)?;

    write_text(&out_dir.join("summary.json"), &render_summary_json(summary)?)?;
    write_text(&out_dir.join("report.txt"), &render_report_text(summary))?;
    if let Some(points) = curve {
        write_text(&out_dir.join("det_curve.tsv"), &render_curve_tsv(points))?;
    }
    tracing::info!(out = %out_dir.display(), "reports written");
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(contents.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
