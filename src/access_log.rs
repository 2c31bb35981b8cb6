//! Append-only JSON-lines record of files opened from the command line.

use chrono::{SecondsFormat, Utc};
use directories::BaseDirs;
use serde::Serialize;
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Open,
    Reject,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotFound,
    Unsupported,
}

#[derive(Serialize, Debug)]
pub struct AccessEntry {
    pub ts: String,
    pub action: Action,
    /// Extension with its leading dot, or empty.
    pub ext: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl AccessEntry {
    pub fn new(action: Action, file: &Path, reason: Option<RejectReason>) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            action,
            ext: file
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                .unwrap_or_default(),
            path: file.display().to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessLog {
    path: PathBuf,
}

impl AccessLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.sdv/access.jsonl`, when a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".sdv").join("access.jsonl"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self, file: &Path) {
        self.record(&AccessEntry::new(Action::Open, file, None));
    }

    pub fn reject(&self, file: &Path, reason: RejectReason) {
        self.record(&AccessEntry::new(Action::Reject, file, Some(reason)));
    }

    /// Writes one entry as a line, creating the directory if needed.
    pub fn append(&self, entry: &AccessEntry) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?
            .write_all(line.as_bytes())
    }

    // Logging is best effort; a failed write never stops the viewer
    fn record(&self, entry: &AccessEntry) {
        if let Err(e) = self.append(entry) {
            debug!("Failed to append to {}: {}", self.path.display(), e);
        }
    }
}
