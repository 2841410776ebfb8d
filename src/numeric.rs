//! Numeric validation helpers used at the engine boundaries

use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, Result};

/// Fail unless two parallel series have the same length.
///
/// Checked before any arithmetic so a mismatch never yields a partial result.
pub fn ensure_same_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(FinanceError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Running sum of a series, accumulated strictly left to right from 0.0
pub fn running_total(values: &[f64]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(values.len());
    let mut total = 0.0;
    for value in values {
        total += value;
        cumulative.push(total);
    }
    cumulative
}

/// A loosely typed numeric attribute: a JSON number, its text form, or any
/// other JSON value (which always fails coercion)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// Coerce an optional attribute of line item `item` to `f64`.
///
/// Missing values default to 0.0. Text is trimmed and parsed with the
/// standard float grammar (so `"1e3"`, `"inf"` and `"NaN"` are accepted).
pub fn coerce(item: usize, field: &'static str, input: Option<&NumericInput>) -> Result<f64> {
    match input {
        None => Ok(0.0),
        Some(NumericInput::Number(value)) => Ok(*value),
        Some(NumericInput::Text(text)) => {
            text.trim()
                .parse::<f64>()
                .map_err(|_| FinanceError::InvalidNumericInput {
                    item,
                    field,
                    value: text.clone(),
                })
        }
        Some(NumericInput::Other(value)) => Err(FinanceError::InvalidNumericInput {
            item,
            field,
            value: value.to_string(),
        }),
    }
}
