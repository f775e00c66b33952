//! Training and validation loop for a two-class spoof detector.
//!
//! The tensor library, autograd and experiment tracker are kept behind
//! traits: a `Model` maps an input batch to per-sample class scores, a
//! `Criterion` turns scores into a loss and its gradient, an `Optimizer`
//! updates the model, and checkpoints/metrics go to injected sinks.

use std::collections::BTreeMap;

pub mod checkpoint;
pub mod logger;
pub mod loss;
pub mod runner;

pub use checkpoint::{CheckpointError, CheckpointState, Checkpointer, JsonCheckpointer};
pub use logger::{
    JsonlMetricsLogger, LoggerError, MemoryMetricsLogger, Metrics, MetricsLogger,
    TracingMetricsLogger,
};
pub use loss::CrossEntropyLoss;
pub use runner::{
    EpochSummary, Loaders, SplitEval, TrainConfig, train, train_epoch, val_epoch,
};

use crate::metrics::EerError;

/// Raw per-sample scores for `[spoof, bona-fide]`.
pub type ClassScores = [f32; 2];

/// Column of `ClassScores` used as the detection score.
pub const POSITIVE_CLASS: usize = 1;

/// Named, flattened parameter buffers.
pub type StateDict = BTreeMap<String, Vec<f32>>;

#[derive(Debug, Clone)]
pub struct Batch<I> {
    pub inputs: I,
    pub labels: Vec<i64>,
}

impl<I> Batch<I> {
    pub fn new(inputs: I, labels: Vec<i64>) -> Self {
        Self { inputs, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LossOutput {
    pub value: f64,
    /// d(loss)/d(scores), one row per sample.
    pub grad: Vec<ClassScores>,
}

pub trait Model {
    type Input;

    fn forward(&mut self, input: &Self::Input) -> Result<Vec<ClassScores>, TrainError>;
    /// Accumulates parameter gradients from the gradient of the last `forward` output.
    fn backward(&mut self, grad: &[ClassScores]) -> Result<(), TrainError>;
    fn train_mode(&mut self);
    fn eval_mode(&mut self);
    fn state_dict(&self) -> StateDict;
}

pub trait Optimizer<M: Model> {
    fn step(&mut self, model: &mut M) -> Result<(), TrainError>;
    fn zero_grad(&mut self, model: &mut M);
    fn state_dict(&self) -> StateDict;
}

pub trait Criterion {
    fn loss(&self, scores: &[ClassScores], labels: &[i64]) -> Result<LossOutput, TrainError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("model error: {0}")]
    Model(String),
    #[error("optimizer error: {0}")]
    Optimizer(String),
    #[error("loss error: {0}")]
    Loss(String),
    #[error("{part} loader produced no samples")]
    EmptyLoader { part: String },
    #[error("model returned {scores} score rows for a batch of {labels} labels")]
    ShapeMismatch { scores: usize, labels: usize },
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Logger(#[from] LoggerError),
    #[error("EER evaluation failed: {0}")]
    Eer(#[from] EerError),
}
