use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One logging record, keyed by scalar name.
pub type Metrics = BTreeMap<String, f64>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("metrics log IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode metrics: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait MetricsLogger {
    fn log(&mut self, metrics: &Metrics) -> Result<(), LoggerError>;
}

pub fn metrics<const N: usize>(pairs: [(&str, f64); N]) -> Metrics {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Appends `{"step": n, ...}` lines to a file.
///
/// Reopening an existing log continues after its last recorded step.
pub struct JsonlMetricsLogger {
    out: BufWriter<File>,
    step: u64,
}

impl JsonlMetricsLogger {
    pub fn open(path: &Path) -> Result<Self, LoggerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let step = if path.exists() { next_step(path)? } else { 0 };
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
            step,
        })
    }

    pub fn step(&self) -> u64 {
        self.step
    }
}

/// One past the highest `step` in an existing log; falls back to the record
/// count for lines without a readable step.
fn next_step(path: &Path) -> Result<u64, LoggerError> {
    let reader = BufReader::new(File::open(path)?);
    let mut next = 0u64;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let step = serde_json::from_str::<serde_json::Value>(line)
            .ok()
            .and_then(|v| v.get("step").and_then(serde_json::Value::as_u64));
        next = match step {
            Some(s) => next.max(s + 1),
            None => next + 1,
        };
    }
    Ok(next)
}

impl MetricsLogger for JsonlMetricsLogger {
    fn log(&mut self, metrics: &Metrics) -> Result<(), LoggerError> {
        let mut record = serde_json::Map::new();
        record.insert("step".to_string(), self.step.into());
        for (key, value) in metrics {
            // NaN/inf become null in JSON
            let v = serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null);
            record.insert(key.clone(), v);
        }
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.step += 1;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetricsLogger;

impl MetricsLogger for TracingMetricsLogger {
    fn log(&mut self, metrics: &Metrics) -> Result<(), LoggerError> {
        for (key, value) in metrics {
            tracing::info!(target: "spoof_eer::metrics", metric = %key, value = *value);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryMetricsLogger {
    pub records: Vec<Metrics>,
}

impl MemoryMetricsLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values logged under `key`, in order.
    pub fn series(&self, key: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.get(key).copied())
            .collect()
    }
}

impl MetricsLogger for MemoryMetricsLogger {
    fn log(&mut self, metrics: &Metrics) -> Result<(), LoggerError> {
        self.records.push(metrics.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/training/logger.rs"]
mod tests;
