//! Per-run outcome bookkeeping.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A target that failed after retries or during parsing/writing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailedTarget {
    pub target: String,
    pub reason: String,
}

/// What a run did, target by target.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub succeeded: Vec<String>,
    pub not_found: Vec<String>,
    pub failed: Vec<FailedTarget>,
    pub files_written: Vec<PathBuf>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            succeeded: Vec::new(),
            not_found: Vec::new(),
            failed: Vec::new(),
            files_written: Vec::new(),
        }
    }

    pub fn succeed(&mut self, target: impl Into<String>) {
        self.succeeded.push(target.into());
    }

    pub fn skip_not_found(&mut self, target: impl Into<String>) {
        self.not_found.push(target.into());
    }

    pub fn fail(&mut self, target: impl Into<String>, reason: impl ToString) {
        self.failed.push(FailedTarget {
            target: target.into(),
            reason: reason.to_string(),
        });
    }

    pub fn wrote(&mut self, path: PathBuf) {
        self.files_written.push(path);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when targets were attempted and none of them produced anything.
    pub fn all_failed(&self) -> bool {
        !self.failed.is_empty() && self.succeeded.is_empty() && self.not_found.is_empty()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
