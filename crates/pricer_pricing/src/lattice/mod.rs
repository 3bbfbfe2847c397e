//! Binomial lattice pricing.
//!
//! This module provides:
//! - [`price_binomial`]: CRR valuation of European and American vanillas
//! - [`LatticeResult`]: the full asset and option-value lattices
//! - [`LatticeConstants`]: `dt`, up/down factors, probability and discount
//! - [`LatticeError`]: validation and no-arbitrage failures
//!
//! Memory is `O(steps²)`: every level is kept so callers can inspect the
//! whole tree.

mod binomial;
mod error;

pub use binomial::{price_binomial, LatticeConstants, LatticeResult};
pub use error::LatticeError;
