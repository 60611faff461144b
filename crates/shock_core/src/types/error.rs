//! Error types for structured error handling.
//!
//! Only genuinely invalid input is an error. Degenerate but well-typed
//! arguments (an inverted date range, a series with no trading days, a zero
//! recovery window) produce empty or unmodified results instead.

use thiserror::Error;

/// Errors raised by the foundation and engine layers.
///
/// # Examples
/// ```
/// use shock_core::types::ShockError;
///
/// let err = ShockError::InvalidInput("event text is empty".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: event text is empty");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShockError {
    /// Missing or empty request input (event text, symbol, message).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Severity outside the open interval (0, 1).
    #[error("Invalid severity: {0}. Must be in the open interval (0, 1)")]
    InvalidSeverity(f64),

    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse an ISO-8601 date string.
    #[error("Date parse error: {0}")]
    DateParse(String),

    /// Price points out of date order or falling on a weekend.
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}
