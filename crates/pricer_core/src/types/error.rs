//! Error types for parameter validation.
//!
//! This module provides:
//! - `ValidationError`: rejected numeric inputs, raised before any lattice or
//!   simulation work begins

use thiserror::Error;

/// Rejected pricing input.
///
/// Every variant names the offending parameter so that a presentation layer
/// can build a precise message without further context.
///
/// # Variants
/// - `NonPositive`: a quantity that must be strictly positive was not
/// - `Negative`: a quantity that must be non-negative was negative
/// - `NonFinite`: a quantity was `NaN` or infinite
/// - `ZeroCount`: an integer count (steps, paths) was zero
/// - `Missing`: an engine-specific parameter was not supplied
/// - `UnknownOptionType`: option type text other than `call`/`put`
///
/// # Examples
/// ```
/// use pricer_core::types::ValidationError;
///
/// let err = ValidationError::NonPositive { name: "spot", value: -1.0 };
/// assert_eq!(format!("{}", err), "spot must be positive, got -1");
/// assert_eq!(err.parameter(), "spot");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ValidationError {
    /// Value must be strictly positive.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Value must be non-negative.
    #[error("{name} must be non-negative, got {value}")]
    Negative {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Value must be finite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Integer count must be at least one.
    #[error("{name} must be a positive integer, got 0")]
    ZeroCount {
        /// Parameter name
        name: &'static str,
    },

    /// Required parameter was not supplied.
    #[error("{name} is required for {engine} pricing")]
    Missing {
        /// Parameter name
        name: &'static str,
        /// Engine that requires it
        engine: &'static str,
    },

    /// Unrecognised option type text.
    #[error("option_type must be 'call' or 'put', got '{0}'")]
    UnknownOptionType(String),
}

impl ValidationError {
    /// Returns the name of the offending parameter.
    pub fn parameter(&self) -> &'static str {
        match self {
            ValidationError::NonPositive { name, .. }
            | ValidationError::Negative { name, .. }
            | ValidationError::NonFinite { name, .. }
            | ValidationError::ZeroCount { name }
            | ValidationError::Missing { name, .. } => *name,
            ValidationError::UnknownOptionType(_) => "option_type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Negative {
            name: "volatility",
            value: -0.1,
        };
        assert_eq!(
            format!("{}", err),
            "volatility must be non-negative, got -0.1"
        );

        let err = ValidationError::ZeroCount { name: "steps" };
        assert_eq!(format!("{}", err), "steps must be a positive integer, got 0");

        let err = ValidationError::Missing {
            name: "strike",
            engine: "lattice",
        };
        assert_eq!(format!("{}", err), "strike is required for lattice pricing");
    }

    #[test]
    fn test_validation_error_parameter_name() {
        assert_eq!(
            ValidationError::NonFinite {
                name: "rate",
                value: f64::NAN
            }
            .parameter(),
            "rate"
        );
        assert_eq!(
            ValidationError::UnknownOptionType("straddle".to_string()).parameter(),
            "option_type"
        );
    }

    #[test]
    fn test_unknown_option_type_display() {
        let err = ValidationError::UnknownOptionType("straddle".to_string());
        assert!(format!("{}", err).contains("'straddle'"));
    }
}
