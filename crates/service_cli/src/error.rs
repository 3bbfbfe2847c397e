//! Error types for the pricer CLI.

use pricer_core::types::ValidationError;
use pricer_models::PayoffError;
use pricer_pricing::lattice::LatticeError;
use pricer_pricing::mc::ConfigError;
use thiserror::Error;

use crate::config::CliConfigError;

/// CLI error type
///
/// Every library failure converts into a variant here, so each surfaces as a
/// message on stderr and a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] CliConfigError),

    /// Rejected pricing inputs
    #[error("Invalid parameters: {0}")]
    Validation(#[from] ValidationError),

    /// Lattice construction failed
    #[error("Lattice pricing failed: {0}")]
    Lattice(#[from] LatticeError),

    /// Payoff expression rejected
    #[error("{0}")]
    Payoff(#[from] PayoffError),

    /// Monte Carlo engine misconfigured
    #[error("Engine configuration error: {0}")]
    Engine(#[from] ConfigError),

    /// Request exceeds a configured limit
    #[error("{name} = {value} exceeds the configured limit of {max}")]
    LimitExceeded {
        /// Offending argument
        name: &'static str,
        /// Requested value
        value: usize,
        /// Configured maximum
        max: usize,
    },

    /// Output serialisation error
    #[error("Failed to serialise output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Check a requested count against its configured maximum
    pub fn check_limit(name: &'static str, value: usize, max: usize) -> Result<()> {
        if value > max {
            return Err(CliError::LimitExceeded { name, value, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: CliError = ValidationError::ZeroCount { name: "paths" }.into();
        assert_eq!(
            err.to_string(),
            "Invalid parameters: paths must be a positive integer, got 0"
        );

        let err: CliError = LatticeError::Arbitrage { probability: 1.5 }.into();
        assert!(err.to_string().starts_with("Lattice pricing failed: arbitrage detected"));
    }

    #[test]
    fn test_check_limit() {
        assert!(CliError::check_limit("steps", 10, 10).is_ok());
        let err = CliError::check_limit("paths", 11, 10).unwrap_err();
        assert_eq!(err.to_string(), "paths = 11 exceeds the configured limit of 10");
    }
}
