//! Error types for deal risk scoring.

use thiserror::Error;

/// Data preparation errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    FileNotFound(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Parse error on row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No deal records found")]
    NoRecords,
}

/// Scoring engine errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("No data: cannot score an empty dataset")]
    EmptyDataset,

    #[error("Invalid top_n: {0} (must be at least 1)")]
    InvalidTopN(usize),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Stage has no historical records: {0}")]
    UnknownStage(String),
}
