//! Error type shared by both engines and the input loaders

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceError {
    /// Two series that must run period-for-period differ in length
    #[error("length mismatch for {what}: expected {expected} values, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A line item field could not be read as a number
    #[error("line item {item}: {field} is not numeric: {value:?}")]
    InvalidNumericInput {
        item: usize,
        field: &'static str,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FinanceError>;
