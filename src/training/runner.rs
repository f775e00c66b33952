use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::metrics::{EerError, EerResult, compute_eer};
use crate::training::checkpoint::{CheckpointState, Checkpointer, checkpoint_path};
use crate::training::logger::{Metrics, MetricsLogger, metrics};
use crate::training::{Batch, Criterion, Model, Optimizer, POSITIVE_CLASS, TrainError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub num_epochs: usize,
    pub save_path: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_epochs: 100,
            save_path: PathBuf::from("/saved"),
        }
    }
}

impl TrainConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, crate::input::InputError> {
        let reader = crate::input::open_maybe_gz(path)?;
        serde_json::from_reader(reader)
            .map_err(|e| crate::input::InputError::Parse(format!("{}: {e}", path.display())))
    }
}

/// Batches for each split. `dev` and `eval` are optional.
#[derive(Debug)]
pub struct Loaders<'a, I> {
    pub train: &'a [Batch<I>],
    pub dev: Option<&'a [Batch<I>]>,
    pub eval: Option<&'a [Batch<I>]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitEval {
    pub loss: f64,
    /// `None` when the split holds a single class.
    pub eer: Option<EerResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub train_loss: f64,
    pub checkpoint: PathBuf,
    pub dev: Option<SplitEval>,
    pub eval: Option<SplitEval>,
}

fn check_shape(scores: usize, labels: usize) -> Result<(), TrainError> {
    if scores != labels {
        return Err(TrainError::ShapeMismatch { scores, labels });
    }
    Ok(())
}

/// One pass over `loader` with gradient updates; returns the per-sample mean loss.
pub fn train_epoch<M, O, C, L>(
    loader: &[Batch<M::Input>],
    model: &mut M,
    optimizer: &mut O,
    criterion: &C,
    logger: &mut L,
) -> Result<f64, TrainError>
where
    M: Model,
    O: Optimizer<M>,
    C: Criterion,
    L: MetricsLogger,
{
    let mut running_loss = 0.0f64;
    let mut num_total = 0usize;
    model.train_mode();

    for (idx, batch) in loader.iter().enumerate() {
        if batch.is_empty() {
            tracing::debug!(batch = idx, "skipping empty train batch");
            continue;
        }
        let pred = model.forward(&batch.inputs)?;
        check_shape(pred.len(), batch.len())?;

        let loss = criterion.loss(&pred, &batch.labels)?;
        running_loss += loss.value * batch.len() as f64;
        logger.log(&metrics([("train_loss", loss.value)]))?;

        model.backward(&loss.grad)?;
        optimizer.step(model)?;
        optimizer.zero_grad(model);

        num_total += batch.len();
        tracing::trace!(batch = idx, loss = loss.value, "train step");
    }

    if num_total == 0 {
        return Err(TrainError::EmptyLoader {
            part: "train".to_string(),
        });
    }
    Ok(running_loss / num_total as f64)
}

/// Scores `loader` without updates, then logs `<part>_eer` and `<part>_loss`.
pub fn val_epoch<M, C, L>(
    loader: &[Batch<M::Input>],
    model: &mut M,
    criterion: &C,
    logger: &mut L,
    part: &str,
) -> Result<SplitEval, TrainError>
where
    M: Model,
    C: Criterion,
    L: MetricsLogger,
{
    let mut running_loss = 0.0f64;
    let mut num_total = 0usize;
    let mut scores: Vec<f64> = Vec::new();
    let mut labels: Vec<i64> = Vec::new();
    model.eval_mode();

    for (idx, batch) in loader.iter().enumerate() {
        if batch.is_empty() {
            tracing::debug!(batch = idx, part, "skipping empty batch");
            continue;
        }
        let pred = model.forward(&batch.inputs)?;
        check_shape(pred.len(), batch.len())?;

        scores.extend(pred.iter().map(|row| row[POSITIVE_CLASS] as f64));
        labels.extend_from_slice(&batch.labels);

        let loss = criterion.loss(&pred, &batch.labels)?;
        running_loss += loss.value * batch.len() as f64;
        num_total += batch.len();
    }

    if num_total == 0 {
        return Err(TrainError::EmptyLoader {
            part: part.to_string(),
        });
    }
    running_loss /= num_total as f64;

    let eer = match compute_eer(&scores, &labels) {
        Ok(r) => Some(r),
        Err(err @ EerError::DegenerateInput { .. }) => {
            tracing::warn!("{part}: skipping EER, {err}");
            None
        }
        Err(err) => return Err(err.into()),
    };

    let mut record = Metrics::new();
    if let Some(r) = &eer {
        record.insert(format!("{part}_eer"), r.eer);
    }
    record.insert(format!("{part}_loss"), running_loss);
    logger.log(&record)?;

    Ok(SplitEval {
        loss: running_loss,
        eer,
    })
}

/// Runs `config.num_epochs` epochs, checkpointing after each training pass.
pub fn train<M, O, C, K, L>(
    model: &mut M,
    optimizer: &mut O,
    criterion: &C,
    loaders: &Loaders<'_, M::Input>,
    checkpointer: &mut K,
    logger: &mut L,
    config: &TrainConfig,
) -> Result<Vec<EpochSummary>, TrainError>
where
    M: Model,
    O: Optimizer<M>,
    C: Criterion,
    K: Checkpointer,
    L: MetricsLogger,
{
    let mut history = Vec::with_capacity(config.num_epochs);

    for epoch in 0..config.num_epochs {
        let train_loss = train_epoch(loaders.train, model, optimizer, criterion, logger)?;
        tracing::info!(epoch, train_loss, "train epoch finished");

        let path = checkpoint_path(&config.save_path, epoch);
        let state = CheckpointState {
            epoch,
            model: model.state_dict(),
            optimizer: optimizer.state_dict(),
        };
        checkpointer.save(&state, &path)?;

        let dev = match loaders.dev {
            Some(loader) => Some(val_epoch(loader, model, criterion, logger, "dev")?),
            None => None,
        };
        if let Some(e) = &dev {
            log_split("dev", e);
        }

        let eval = match loaders.eval {
            Some(loader) => Some(val_epoch(loader, model, criterion, logger, "eval")?),
            None => None,
        };
        if let Some(e) = &eval {
            log_split("eval", e);
        }

        history.push(EpochSummary {
            epoch,
            train_loss,
            checkpoint: path,
            dev,
            eval,
        });
    }

    Ok(history)
}

fn log_split(part: &str, eval: &SplitEval) {
    match &eval.eer {
        Some(r) => tracing::info!(
            part,
            loss = eval.loss,
            eer = r.eer,
            threshold = r.threshold,
            "validation finished"
        ),
        None => tracing::info!(part, loss = eval.loss, "validation finished (no EER)"),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/training/runner.rs"]
mod tests;
