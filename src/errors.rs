//! Unified application error type.
//! All modules (db, core, cli, api) return AppError to keep the error
//! handling consistent; `status_code()` maps every kind onto the HTTP-style
//! code the API layer answers with.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date format: {0}. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Export format not supported: {0}. Use one of: excel, csv")]
    InvalidExportFormat(String),

    // ---------------------------
    // Lifecycle errors
    // ---------------------------
    #[error("Session not found: {0}")]
    SessionNotFound(i64),

    #[error("Session {0} is already closed")]
    AlreadyClosed(i64),

    #[error("No completed sessions found for the selected date range")]
    NoDataForRange,

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

impl AppError {
    /// HTTP-style status code for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidExportFormat(_) => 400,
            AppError::SessionNotFound(_) | AppError::NoDataForRange => 404,
            AppError::AlreadyClosed(_) => 409,
            _ => 500,
        }
    }

    /// True for failures of the store, the encoders or the host; these are
    /// logged and reported to API callers with a generic message.
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

pub type AppResult<T> = Result<T, AppError>;
