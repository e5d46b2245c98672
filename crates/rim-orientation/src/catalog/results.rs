use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::orientation::{CompletedResult, ResultSink, ResultSinkError};

/// Appends one row per completed session to a CSV file.
pub struct CsvResultSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    session_id: &'a str,
    profile: String,
    recorded_at: String,
}

impl CsvResultSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvResultSink {
    fn persist_result(&self, result: &CompletedResult) -> Result<(), ResultSinkError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ResultSinkError::Unavailable("results file lock poisoned".to_string()))?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(ResultRow {
            session_id: &result.session_id.0,
            profile: result.profile.to_string(),
            recorded_at: result.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        })?;
        writer.flush()?;
        Ok(())
    }
}
