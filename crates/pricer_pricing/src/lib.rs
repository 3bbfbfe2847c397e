//! # Pricer Pricing (Layer 3: Engines)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing holds the two numerical engines of the workspace:
//! - [`lattice`]: Cox-Ross-Rubinstein binomial tree with early exercise
//! - [`mc`]: Geometric Brownian Motion Monte Carlo over any
//!   [`PathPayoff`](pricer_core::traits::PathPayoff)
//! - [`rng`]: seeded normal draws and the injectable [`rng::NormalSource`]
//!
//! Both engines validate their [`PricingParameters`](pricer_core::types::PricingParameters)
//! before allocating a node or drawing a number, and share nothing else.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::{OptionType, PricingParameters};
//! use pricer_pricing::lattice::price_binomial;
//! use pricer_pricing::mc::price_monte_carlo;
//!
//! let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 50)
//!     .with_strike(100.0)
//!     .with_paths(5_000);
//!
//! let tree = price_binomial(&params, OptionType::Put, true, 0.0).unwrap();
//! assert!(tree.price > 5.5);
//!
//! let call = |terminal: f64, _: &[f64]| (terminal - 100.0).max(0.0);
//! let simulation = price_monte_carlo(&params, &call).unwrap();
//! assert_eq!(simulation.payoffs.len(), 5_000);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
// Allow unknown lints for clippy compatibility across versions
#![allow(unknown_lints)]

pub mod lattice;
pub mod mc;
pub mod rng;

pub use lattice::{price_binomial, LatticeError, LatticeResult};
pub use mc::{price_monte_carlo, price_monte_carlo_with, MonteCarloPricer, SimulationResult};
