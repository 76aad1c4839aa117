//! Error types for loading the production dataset.
//!
//! The aggregation pipeline itself has no failure modes; everything here is
//! raised while the dataset is being built and aborts the load.

use std::path::PathBuf;
use thiserror::Error;

/// A record that would break one of the dataset invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// A second production figure for the same state and year.
    #[error("duplicate observation for {state} in {year}")]
    DuplicateObservation { state: String, year: i32 },

    /// The state was already seen under a different region.
    #[error("state {state} belongs to region {expected} but a record places it in {found}")]
    ConflictingRegion {
        state: String,
        expected: String,
        found: String,
    },

    /// The state was already seen with a different two-letter code.
    #[error("state {state} has code {expected} but a record uses {found}")]
    ConflictingCode {
        state: String,
        expected: String,
        found: String,
    },

    /// Adding the record would push the dataset total past `u64::MAX`.
    #[error("production total overflows after {state} in {year}")]
    TotalOverflow { state: String, year: i32 },
}

/// Errors that can occur while reading the dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The CSV reader could not decode a row.
    #[error("malformed CSV on line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    /// A required column was absent or blank.
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    /// A value could not be interpreted.
    #[error("line {line}: invalid {field} value '{value}'")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Production figures are counts and can never be negative.
    #[error("line {line}: negative production '{value}' for {state} in {year}")]
    NegativeProduction {
        line: usize,
        state: String,
        year: i32,
        value: String,
    },

    /// The row is well formed but contradicts earlier rows.
    #[error("line {line}: {source}")]
    Invariant {
        line: usize,
        #[source]
        source: DatasetError,
    },
}

impl LoadError {
    /// CSV line the error refers to, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Open { .. } => None,
            LoadError::Csv { line, .. }
            | LoadError::MissingField { line, .. }
            | LoadError::InvalidValue { line, .. }
            | LoadError::NegativeProduction { line, .. }
            | LoadError::Invariant { line, .. } => Some(*line),
        }
    }
}
