//! # Random Number Generation
//!
//! Normal variates for Monte Carlo path simulation.
//!
//! ## Design
//!
//! - **Injection**: the engine draws through the [`NormalSource`] trait, so
//!   tests can count or script draws
//! - **Reproducibility**: [`PricerRng`] keeps its seed, and parallel chunks
//!   derive theirs from `(seed, chunk index)`
//! - **Efficiency**: batch draws fill caller-owned `&mut [f64]` slices
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::{NormalSource, PricerRng};
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let z = rng.next_normal();
//!
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! # let _ = z;
//! ```

mod prng;

pub use prng::{NormalSource, PricerRng};
