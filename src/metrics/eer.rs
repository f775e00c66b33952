//! Equal error rate over a set of scored, labelled trials.
//!
//! Label 1 is the positive (bona-fide) class, label 0 the negative (spoof)
//! class. At threshold `t` a positive is rejected when `score < t` and a
//! negative is accepted when `score >= t`. Candidate thresholds are the
//! distinct observed scores, so the crossing is evaluated exactly.

use serde::Serialize;

use crate::metrics::EerError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EerResult {
    pub eer: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetPoint {
    pub threshold: f64,
    pub frr: f64,
    pub far: f64,
}

impl DetPoint {
    fn gap(&self) -> f64 {
        (self.frr - self.far).abs()
    }

    fn mean(&self) -> f64 {
        (self.frr + self.far) / 2.0
    }
}

struct Partition {
    positives: Vec<f64>,
    negatives: Vec<f64>,
}

fn partition(scores: &[f64], labels: &[i64]) -> Result<Partition, EerError> {
    if scores.len() != labels.len() {
        return Err(EerError::LengthMismatch {
            scores: scores.len(),
            labels: labels.len(),
        });
    }
    if scores.is_empty() {
        return Err(EerError::EmptyInput);
    }
    if let Some((index, &value)) = labels
        .iter()
        .enumerate()
        .find(|(_, l)| **l != 0 && **l != 1)
    {
        return Err(EerError::InvalidLabel { index, value });
    }
    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(EerError::NonFiniteScore { index });
    }

    let mut positives = Vec::new();
    let mut negatives = Vec::new();
    for (&score, &label) in scores.iter().zip(labels) {
        // -0.0 + 0.0 == +0.0, keeps total_cmp from splitting a tie.
        let score = score + 0.0;
        if label == 1 {
            positives.push(score);
        } else {
            negatives.push(score);
        }
    }
    if positives.is_empty() || negatives.is_empty() {
        return Err(EerError::DegenerateInput {
            positives: positives.len(),
            negatives: negatives.len(),
        });
    }

    positives.sort_by(f64::total_cmp);
    negatives.sort_by(f64::total_cmp);
    Ok(Partition {
        positives,
        negatives,
    })
}

/// FRR/FAR at every distinct observed score, ascending by threshold.
pub fn det_curve(scores: &[f64], labels: &[i64]) -> Result<Vec<DetPoint>, EerError> {
    let Partition {
        positives,
        negatives,
    } = partition(scores, labels)?;

    let mut candidates = Vec::with_capacity(positives.len() + negatives.len());
    candidates.extend_from_slice(&positives);
    candidates.extend_from_slice(&negatives);
    candidates.sort_by(f64::total_cmp);
    candidates.dedup();

    let n_pos = positives.len() as f64;
    let n_neg = negatives.len() as f64;
    let mut pos_below = 0usize;
    let mut neg_below = 0usize;

    let mut curve = Vec::with_capacity(candidates.len());
    for t in candidates {
        while pos_below < positives.len() && positives[pos_below] < t {
            pos_below += 1;
        }
        while neg_below < negatives.len() && negatives[neg_below] < t {
            neg_below += 1;
        }
        curve.push(DetPoint {
            threshold: t,
            frr: pos_below as f64 / n_pos,
            far: (negatives.len() - neg_below) as f64 / n_neg,
        });
    }
    Ok(curve)
}

/// Picks the DET point closest to FRR == FAR.
///
/// Ties on `|FRR - FAR|` go to the lower `(FRR + FAR) / 2`, then to the
/// lower threshold. The selection key is symmetric in FRR and FAR, so
/// swapping the class roles (flip labels, negate scores) yields the same EER.
pub fn compute_eer(scores: &[f64], labels: &[i64]) -> Result<EerResult, EerError> {
    let curve = det_curve(scores, labels)?;
    let mut best = curve[0];
    for point in &curve[1..] {
        let (gap, best_gap) = (point.gap(), best.gap());
        if gap < best_gap || (gap == best_gap && point.mean() < best.mean()) {
            best = *point;
        }
    }
    Ok(EerResult {
        eer: best.mean(),
        threshold: best.threshold,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/metrics/eer.rs"]
mod tests;
