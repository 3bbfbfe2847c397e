//! Core parameter and option types.
//!
//! This module provides:
//! - `params`: [`PricingParameters`] and the shared validator
//! - `option`: [`OptionType`] (call/put) and its intrinsic value
//! - `error`: [`ValidationError`], raised before any pricing work starts

pub mod error;
pub mod option;
pub mod params;

// Re-export commonly used types at module level
pub use error::ValidationError;
pub use option::OptionType;
pub use params::{
    ensure_count, ensure_finite, ensure_non_negative, ensure_positive, PricingParameters,
};
