//! Local classification log: SQLite store plus the best-effort sink the stream loop writes to.

mod sqlite;

pub use sqlite::{LogEntry, LogStore, StoreError, TIMESTAMP_FORMAT};

use std::path::PathBuf;
use tracing::warn;

/// Owns the store connection. Opens it on first append, retries the open after
/// a failure, and never lets a storage error reach the caller.
pub struct LogSink {
    path: PathBuf,
    store: Option<LogStore>,
    failures: u64,
}

impl LogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: None,
            failures: 0,
        }
    }

    /// Open the store now instead of on first append
    pub fn open(&mut self) -> Result<(), StoreError> {
        if self.store.is_none() {
            self.store = Some(LogStore::open(&self.path)?);
        }
        Ok(())
    }

    /// Append one entry. Returns whether it was written.
    pub fn append(&mut self, entry: &LogEntry) -> bool {
        let result = self.open().and_then(|_| match &self.store {
            Some(store) => store.append(entry).map(|_| ()),
            None => Ok(()),
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                self.failures += 1;
                warn!(
                    path = %self.path.display(),
                    failures = self.failures,
                    error = %e,
                    "log store write failed"
                );
                false
            }
        }
    }

    /// Writes (including opens) that failed so far
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
