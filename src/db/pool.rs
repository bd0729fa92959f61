//! SQLite connection wrapper (one connection per store call).

use crate::db::initialize::init_db;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create the file (and its directory) with the baseline schema if absent.
    CreateIfMissing,
    /// The caller expects existing data; a missing file is `NotFound`.
    ExistingOnly,
}

#[derive(Debug)]
pub struct DbPool {
    pub conn: Connection,
    pub path: PathBuf,
}

impl DbPool {
    pub fn open(path: &Path, mode: OpenMode) -> AppResult<Self> {
        if !path.exists() {
            if mode == OpenMode::ExistingOnly {
                return Err(AppError::NotFound(format!("data file {}", path.display())));
            }
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        // A locked file is reported immediately, never retried.
        conn.busy_timeout(Duration::ZERO)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        init_db(&conn)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Start a write transaction holding the file's write lock from the first
    /// statement, so a competing writer fails before anything is read.
    pub fn write_tx(&mut self) -> AppResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}
