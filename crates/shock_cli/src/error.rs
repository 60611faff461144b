//! CLI error types.

use shock_core::types::ShockError;
use thiserror::Error;

/// Errors surfaced by `shockctl` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad flag value or combination.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Rejected by the simulation engine.
    #[error(transparent)]
    Simulation(#[from] ShockError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_error_is_transparent() {
        let err: CliError = ShockError::InvalidInput("event text is empty".to_string()).into();
        assert_eq!(err.to_string(), "Invalid input: event text is empty");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::InvalidArgument("Unknown format: xml".to_string());
        assert!(err.to_string().starts_with("Invalid argument"));
    }
}
