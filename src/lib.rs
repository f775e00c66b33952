pub mod input;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod training;

pub use metrics::{DetPoint, EerError, EerResult, compute_eer, det_curve};
