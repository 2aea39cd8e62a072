//! SQLite classification log. One row per classified flow, append-only, WAL journal.

use chrono::Local;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Row of the `logs` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub src_ip: String,
    pub dst_ip: String,
    pub attack_type: String,
    pub confidence: f64,
}

impl LogEntry {
    /// Entry stamped with the current local time
    pub fn now(src_ip: &str, dst_ip: &str, attack_type: &str, confidence: f32) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            src_ip: src_ip.to_string(),
            dst_ip: dst_ip.to_string(),
            attack_type: attack_type.to_string(),
            confidence: f64::from(confidence),
        }
    }
}

pub struct LogStore {
    conn: Connection,
}

impl LogStore {
    /// Open or create the store at `path`. Creating an existing schema is a no-op.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "log store opened");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT,
                src_ip TEXT,
                dst_ip TEXT,
                attack_type TEXT,
                confidence REAL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Append one entry as a single insert
    pub fn append(&self, entry: &LogEntry) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO logs (timestamp, src_ip, dst_ip, attack_type, confidence) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.timestamp,
                entry.src_ip,
                entry.dst_ip,
                entry.attack_type,
                entry.confidence
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
