use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::training::StateDict;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointState {
    pub epoch: usize,
    pub model: StateDict,
    pub optimizer: StateDict,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to write checkpoint {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode checkpoint: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Checkpointer {
    fn save(&mut self, state: &CheckpointState, path: &Path) -> Result<(), CheckpointError>;
}

/// `<save_path>/epoch=<epoch>.json`
pub fn checkpoint_path(save_path: &Path, epoch: usize) -> PathBuf {
    save_path.join(format!("epoch={epoch}.json"))
}

/// Writes checkpoints as JSON documents.
#[derive(Debug, Default, Clone)]
pub struct JsonCheckpointer {
    saved: Vec<PathBuf>,
}

impl JsonCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    pub fn load(path: &Path) -> Result<CheckpointState, CheckpointError> {
        let io_err = |source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

impl Checkpointer for JsonCheckpointer {
    fn save(&mut self, state: &CheckpointState, path: &Path) -> Result<(), CheckpointError> {
        let io_err = |source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
        serde_json::to_writer(&mut out, state)?;
        out.flush().map_err(io_err)?;
        tracing::debug!(path = %path.display(), epoch = state.epoch, "checkpoint saved");
        self.saved.push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/training/checkpoint.rs"]
mod tests;
