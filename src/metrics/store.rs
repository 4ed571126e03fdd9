use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::RunMetrics;
use crate::error::MetricsError;

/// Append-only JSONL log of [`RunMetrics`].
#[derive(Debug, Clone)]
pub struct MetricsLog {
    path: PathBuf,
}

impl MetricsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, run: &RunMetrics) -> Result<(), MetricsError> {
        let io_err = |source| MetricsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut line = serde_json::to_string(run)?;
        line.push('\n');

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), date = %run.date, "metrics appended");
        Ok(())
    }

    /// Runs dated on or after `since`. Blank and malformed lines are skipped.
    pub fn load_since(&self, since: NaiveDate) -> Result<Vec<RunMetrics>, MetricsError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(MetricsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut runs = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| MetricsError::Io {
                path: self.path.clone(),
                source,
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<RunMetrics>(line) {
                Ok(run) if run.date >= since => runs.push(run),
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(line = index + 1, "skipping malformed metrics line: {err}");
                }
            }
        }
        Ok(runs)
    }
}
