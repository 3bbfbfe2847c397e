//! Closed-form reference prices.
//!
//! - [`BlackScholes`]: European call/put with continuous dividend yield
//! - [`norm_cdf`] / [`norm_pdf`]: standard normal functions

pub mod black_scholes;
pub mod distributions;

pub use black_scholes::BlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
