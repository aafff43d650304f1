//! Garde validation utilities.

use crate::domain::error::RelayError;
use garde::{Report, Validate};

/// Convert a garde validation report to RelayError
pub fn validate_struct<T>(value: &T) -> Result<(), RelayError>
where
    T: Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| RelayError::MalformedInput(format_validation_errors(&report)))
}

/// Format validation errors from a garde Report into a human-readable string
fn format_validation_errors(report: &Report) -> String {
    report
        .iter()
        .map(|(path, error)| {
            if path.to_string().is_empty() {
                error.message().to_string()
            } else {
                format!("{}: {}", path, error.message())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
