//! Failure log
//!
//! One append-only text file per session. It is truncated when a session
//! starts and receives a framed block for every failed compile.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::BatchBuildError;

const RULE: &str = "**************************************";

/// Handle to the session's failure log
#[derive(Debug, Clone)]
pub struct BuildLog {
    path: PathBuf,
}

impl BuildLog {
    /// Start a fresh log at `path`, discarding any previous session's log
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, BatchBuildError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        if path.exists() {
            fs::remove_file(&path).map_err(|e| io_error(&path, &e))?;
        }
        Ok(Self { path })
    }

    /// Log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything was logged this session
    pub fn has_entries(&self) -> bool {
        self.path.exists()
    }

    /// Append one framed diagnostic block
    pub fn append(&self, contents: &str) -> Result<(), BatchBuildError> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let block = format_entry(&timestamp, contents);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_error(&self.path, &e))?;
        file.write_all(block.as_bytes())
            .map_err(|e| io_error(&self.path, &e))
    }
}

/// Frame a diagnostic with a header and timestamp
fn format_entry(timestamp: &str, contents: &str) -> String {
    format!("{RULE}\nbatchbuild failure log\n{timestamp}\n{RULE}\n{contents}\n{RULE}\n")
}

fn io_error(path: &Path, error: &std::io::Error) -> BatchBuildError {
    BatchBuildError::Io {
        path: path.to_path_buf(),
        error: error.to_string(),
    }
}
