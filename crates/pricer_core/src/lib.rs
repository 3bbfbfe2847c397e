//! # pricer_core: Shared Foundation for the Pricing Engines
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer shared by both pricing engines:
//! - [`PricingParameters`](types::PricingParameters) and the validator that runs
//!   before any lattice or simulation work (`types::params`)
//! - [`OptionType`](types::OptionType) with intrinsic value (`types::option`)
//! - [`ValidationError`](types::ValidationError) (`types::error`)
//! - [`PathPayoff`](traits::PathPayoff), the contract between the Monte Carlo
//!   engine and payoff implementations (`traits`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates:
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{OptionType, PricingParameters, ValidationError};
//!
//! let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 50).with_strike(95.0);
//! assert_eq!(params.validate_lattice(), Ok(95.0));
//!
//! let bad = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 0);
//! assert_eq!(bad.validate(), Err(ValidationError::ZeroCount { name: "steps" }));
//!
//! assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for parameters, option types and errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod traits;
pub mod types;
