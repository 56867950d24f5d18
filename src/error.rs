//! Error types for goal validation, projection and loading

use thiserror::Error;

/// Errors raised synchronously at the engine boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// A monetary value that must be non-negative (or positive) is not
    #[error("invalid {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    /// Expected annual return outside the allowed range
    #[error("expected annual return {value}% is outside [{min}%, {max}%]")]
    InvalidRate { value: f64, min: f64, max: f64 },

    /// Target date could not be resolved to a month count
    #[error("invalid horizon: {0}")]
    InvalidHorizon(String),

    /// Progress requested against a zero target amount
    #[error("progress is undefined for a zero target amount")]
    DivisionUndefined,
}

impl ProjectionError {
    pub(crate) fn amount(field: &'static str, value: f64) -> Self {
        ProjectionError::InvalidAmount { field, value }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Errors raised while loading goal records from CSV
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read goals: {0}")]
    Csv(#[from] csv::Error),

    #[error("goal row {row}: {source}")]
    Goal {
        /// 1-based data row (header excluded)
        row: usize,
        #[source]
        source: ProjectionError,
    },
}
