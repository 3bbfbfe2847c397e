//! Core traits shared across the pricing layers.
//!
//! - [`PathPayoff`]: contract between the Monte Carlo engine and whatever
//!   computes a payoff from a simulated path

pub mod payoff;

pub use payoff::PathPayoff;
