//! Integration tests for module exports.
//!
//! Verify that the public modules and types are reachable via absolute paths,
//! as the pricing and service crates import them.

use pricer_core::traits::PathPayoff;
use pricer_core::types::{OptionType, PricingParameters, ValidationError};

#[test]
fn test_types_module_exports() {
    use pricer_core::types::error::ValidationError as ErrorPath;
    use pricer_core::types::option::OptionType as OptionPath;
    use pricer_core::types::params::PricingParameters as ParamsPath;

    let params: ParamsPath = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 10);
    let side: OptionPath = OptionType::Call;
    let err: ErrorPath = ValidationError::ZeroCount { name: "paths" };

    assert_eq!(params.steps(), 10);
    assert_eq!(side.as_str(), "call");
    assert_eq!(err.parameter(), "paths");
}

#[test]
fn test_validator_helpers_exported() {
    use pricer_core::types::{ensure_count, ensure_finite, ensure_non_negative, ensure_positive};

    assert!(ensure_positive("spot", 1.0).is_ok());
    assert!(ensure_non_negative("volatility", 0.0).is_ok());
    assert!(ensure_finite("dividend", f64::NAN).is_err());
    assert!(ensure_count("paths", 0).is_err());
}

#[test]
fn test_payoff_trait_exported() {
    struct Digital {
        barrier: f64,
    }

    impl PathPayoff for Digital {
        fn evaluate(&self, terminal: f64, _path: &[f64]) -> f64 {
            if terminal > self.barrier {
                1.0
            } else {
                0.0
            }
        }
    }

    let digital = Digital { barrier: 105.0 };
    assert_eq!(digital.evaluate(110.0, &[100.0, 110.0]), 1.0);
    assert_eq!(digital.evaluate(100.0, &[100.0, 100.0]), 0.0);
}

#[test]
fn test_validation_order_reports_first_failure() {
    // spot is checked before steps
    let params = PricingParameters::new(-1.0, 1.0, 0.05, 0.2, 0);
    assert_eq!(params.validate().unwrap_err().parameter(), "spot");
}
