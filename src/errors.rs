//! Unified application error type.
//! All modules (db, store, export, cli, server) return AppError to keep the
//! error handling consistent and easy to manage.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

/// Message shown when another program keeps the data file open.
pub const FILE_LOCKED_MESSAGE: &str =
    "The data file is open in another program. Close it and try again.";

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Input
    // ---------------------------
    #[error("Invalid input: {0}")]
    Validation(String),

    // ---------------------------
    // Lookup / uniqueness
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("No entries found for project '{0}'")]
    EmptyProject(String),

    // ---------------------------
    // Data file access
    // ---------------------------
    #[error("{}", FILE_LOCKED_MESSAGE)]
    FileLocked,

    #[error("Cannot access the data file: {0}")]
    FileAccess(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => AppError::FileLocked,
            Some(ErrorCode::PermissionDenied)
            | Some(ErrorCode::ReadOnly)
            | Some(ErrorCode::CannotOpen) => AppError::FileAccess(err.to_string()),
            _ => AppError::Db(err),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Export(err.to_string())
    }
}

impl AppError {
    /// True for failures caused by the caller's input rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::NotFound(_)
                | AppError::Conflict(_)
                | AppError::EmptyProject(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn busy_and_locked_become_file_locked() {
        let busy = AppError::from(sqlite_failure(rusqlite::ffi::SQLITE_BUSY));
        let locked = AppError::from(sqlite_failure(rusqlite::ffi::SQLITE_LOCKED));

        assert!(matches!(busy, AppError::FileLocked));
        assert!(matches!(locked, AppError::FileLocked));
        assert_eq!(busy.to_string(), FILE_LOCKED_MESSAGE);
    }

    #[test]
    fn permission_problems_become_file_access() {
        let ro = AppError::from(sqlite_failure(rusqlite::ffi::SQLITE_READONLY));
        let cant_open = AppError::from(sqlite_failure(rusqlite::ffi::SQLITE_CANTOPEN));

        assert!(matches!(ro, AppError::FileAccess(_)));
        assert!(matches!(cant_open, AppError::FileAccess(_)));
    }

    #[test]
    fn other_sqlite_errors_stay_db() {
        let err = AppError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, AppError::Db(_)));
        assert!(!err.is_client_error());
    }
}
