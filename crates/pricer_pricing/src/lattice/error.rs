//! Error types for the binomial lattice.

use pricer_core::types::ValidationError;
use thiserror::Error;

/// Lattice pricing failure.
///
/// Both variants are raised before any lattice node is allocated.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LatticeError {
    /// Input parameters were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Risk-neutral probability fell outside `[0, 1]` or was not finite.
    ///
    /// The probability is reported as computed; it is never clamped.
    #[error(
        "arbitrage detected: risk-neutral probability {probability} is outside [0, 1] \
         (adjust steps, volatility or rate)"
    )]
    Arbitrage {
        /// Computed probability of an up move
        probability: f64,
    },
}

impl LatticeError {
    /// Returns `true` for the arbitrage variant.
    pub fn is_arbitrage(&self) -> bool {
        matches!(self, LatticeError::Arbitrage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_transparent() {
        let err: LatticeError = ValidationError::ZeroCount { name: "steps" }.into();
        assert_eq!(err.to_string(), "steps must be a positive integer, got 0");
        assert!(!err.is_arbitrage());
    }

    #[test]
    fn test_arbitrage_display() {
        let err = LatticeError::Arbitrage { probability: 1.25 };
        assert!(err.is_arbitrage());
        assert!(err.to_string().contains("1.25"));
        assert!(err.to_string().starts_with("arbitrage detected"));
    }
}
