//! Unified application error type.
//! The ledger, report engine, session controller and CLI all return
//! `AppError`; device-level errors live in `crate::device` and convert into it.

use crate::device::ReaderError;
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
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    // ---------------------------
    // Ledger errors
    // ---------------------------
    #[error("Invalid weight: {0} lb (must be greater than zero)")]
    InvalidWeight(f64),

    #[error("Unknown {kind}: {value}")]
    UnknownReference { kind: &'static str, value: String },

    #[error("Invalid {kind} name: '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// Informational: the requested undo/redo had nothing to act on.
    #[error("Nothing to {0}")]
    NoOp(&'static str),

    // ---------------------------
    // Session / device errors
    // ---------------------------
    #[error("Weight {weight:.2} lb is below the minimum of {minimum:.2} lb")]
    BelowMinimumWeight { weight: f64, minimum: f64 },

    #[error("No reading received from the scale")]
    NoReading,

    #[error("Scale error: {0}")]
    Reader(#[from] ReaderError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
