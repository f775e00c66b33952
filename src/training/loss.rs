use crate::training::{ClassScores, Criterion, LossOutput, TrainError};

/// Two-class softmax cross-entropy on raw scores.
///
/// With class weights the batch loss is `sum(w_y * l) / sum(w_y)`, the same
/// weighted mean a weighted `CrossEntropyLoss` uses.
#[derive(Debug, Clone, Copy)]
pub struct CrossEntropyLoss {
    pub weights: [f64; 2],
}

impl Default for CrossEntropyLoss {
    fn default() -> Self {
        Self { weights: [1.0, 1.0] }
    }
}

impl CrossEntropyLoss {
    pub fn weighted(spoof: f64, bonafide: f64) -> Self {
        Self {
            weights: [spoof, bonafide],
        }
    }
}

impl Criterion for CrossEntropyLoss {
    fn loss(&self, scores: &[ClassScores], labels: &[i64]) -> Result<LossOutput, TrainError> {
        if scores.len() != labels.len() {
            return Err(TrainError::ShapeMismatch {
                scores: scores.len(),
                labels: labels.len(),
            });
        }
        if scores.is_empty() {
            return Err(TrainError::Loss("empty batch".to_string()));
        }

        let mut total = 0.0f64;
        let mut weight_sum = 0.0f64;
        let mut grad = Vec::with_capacity(scores.len());
        for (row, &label) in scores.iter().zip(labels) {
            let class = match label {
                0 | 1 => label as usize,
                other => return Err(TrainError::Loss(format!("label {other} out of range"))),
            };
            let w = self.weights[class];
            let (a, b) = (row[0] as f64, row[1] as f64);
            let m = a.max(b);
            let log_z = m + ((a - m).exp() + (b - m).exp()).ln();
            let logp = [a - log_z, b - log_z];
            total += -w * logp[class];
            weight_sum += w;

            let mut g = [logp[0].exp(), logp[1].exp()];
            g[class] -= 1.0;
            grad.push([(w * g[0]) as f32, (w * g[1]) as f32]);
        }
        if weight_sum <= 0.0 {
            return Err(TrainError::Loss("class weights sum to zero".to_string()));
        }

        for g in &mut grad {
            g[0] = (g[0] as f64 / weight_sum) as f32;
            g[1] = (g[1] as f64 / weight_sum) as f32;
        }
        Ok(LossOutput {
            value: total / weight_sum,
            grad,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/training/loss.rs"]
mod tests;
