use std::io::BufRead;
use std::path::Path;

use crate::input::{InputError, open_maybe_gz};

/// Scores and labels read from a trial list, positionally paired.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    pub ids: Vec<Option<String>>,
    pub scores: Vec<f64>,
    pub labels: Vec<i64>,
}

impl ScoreTable {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn count_label(&self, label: i64) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }
}

/// Lines are `[id] <score> <label>`; `#` starts a comment line.
pub fn load_scores(path: &Path) -> Result<ScoreTable, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut table = ScoreTable::default();
    let mut buf = String::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (id, score, label) = parse_line(line)
            .map_err(|msg| InputError::Parse(format!("{} (line {})", msg, line_no)))?;
        table.ids.push(id);
        table.scores.push(score);
        table.labels.push(label);
    }

    if table.is_empty() {
        tracing::warn!("score file {} has no trials", path.display());
    } else {
        tracing::debug!(
            trials = table.len(),
            path = %path.display(),
            "loaded score file"
        );
    }
    Ok(table)
}

fn parse_line(line: &str) -> Result<(Option<String>, f64, i64), String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let (id, score_raw, label_raw) = match fields.as_slice() {
        [score, label] => (None, *score, *label),
        [id, score, label] => (Some(id.to_string()), *score, *label),
        _ => {
            return Err(format!(
                "expected 2 or 3 fields, found {}",
                fields.len()
            ));
        }
    };
    let score: f64 = score_raw
        .parse()
        .map_err(|_| format!("invalid score '{}'", score_raw))?;
    let label = parse_label(label_raw).ok_or_else(|| format!("invalid label '{}'", label_raw))?;
    Ok((id, score, label))
}

pub fn parse_label(raw: &str) -> Option<i64> {
    match raw.to_ascii_lowercase().as_str() {
        "bonafide" | "bona-fide" | "genuine" => Some(1),
        "spoof" => Some(0),
        other => other.parse().ok(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/scores.rs"]
mod tests;
