//! Error types for the Monte Carlo engine configuration.
//!
//! Market and discretisation inputs are checked by
//! [`PricingParameters`](pricer_core::types::PricingParameters) and fail with
//! [`ValidationError`](pricer_core::types::ValidationError); this module only
//! covers how the engine itself is set up.

use thiserror::Error;

/// Configuration error for the Monte Carlo pricer.
///
/// Raised when a [`MonteCarloConfig`](super::MonteCarloConfig) is built.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Chunk size outside `[1, MAX_PATHS]`.
    #[error("invalid chunk size {0}: must be in range [1, 10_000_000]")]
    InvalidChunkSize(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidChunkSize(0);
        assert_eq!(
            err.to_string(),
            "invalid chunk size 0: must be in range [1, 10_000_000]"
        );
    }
}
