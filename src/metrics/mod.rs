pub mod eer;

pub use eer::{DetPoint, EerResult, compute_eer, det_curve};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EerError {
    #[error("empty input: no scores to evaluate")]
    EmptyInput,
    #[error("length mismatch: {scores} scores vs {labels} labels")]
    LengthMismatch { scores: usize, labels: usize },
    #[error(
        "degenerate input: EER needs both classes ({positives} bona-fide, {negatives} spoof)"
    )]
    DegenerateInput { positives: usize, negatives: usize },
    #[error("invalid label {value} at index {index} (expected 0 or 1)")]
    InvalidLabel { index: usize, value: i64 },
    #[error("non-finite score at index {index}")]
    NonFiniteScore { index: usize },
}
