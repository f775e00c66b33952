use std::fmt::Write;

use crate::metrics::DetPoint;
use crate::report::{EerSummary, format_f64_6};

pub fn render_report_text(summary: &EerSummary) -> String {
    let mut out = String::new();

    out.push_str("Equal Error Rate Report\n");
    out.push_str("=======================\n\n");

    let _ = writeln!(out, "Split: {}", summary.split);
    let _ = writeln!(out, "Scores: {}", summary.scores_path);
    let _ = writeln!(
        out,
        "Trials: {} ({} bona-fide, {} spoof)\n",
        summary.n_trials, summary.n_bonafide, summary.n_spoof
    );

    let _ = writeln!(
        out,
        "EER: {} ({:.2}%)",
        format_f64_6(summary.eer),
        summary.eer * 100.0
    );
    let _ = writeln!(out, "Threshold: {}", format_f64_6(summary.threshold));
    let _ = writeln!(out, "Verdict: {}", verdict(summary.eer));

    out
}

pub fn render_curve_tsv(points: &[DetPoint]) -> String {
    let mut out = String::from("threshold\tfrr\tfar\n");
    for p in points {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            format_f64_6(p.threshold),
            format_f64_6(p.frr),
            format_f64_6(p.far)
        );
    }
    out
}

fn verdict(eer: f64) -> &'static str {
    if eer == 0.0 {
        "perfect separation"
    } else if eer < 0.05 {
        "strong separation"
    } else if eer < 0.25 {
        "partial separation"
    } else if eer < 0.5 {
        "weak separation"
    } else {
        "no discriminative power"
    }
}
