//! Monte Carlo pricing under Geometric Brownian Motion.
//!
//! # Architecture
//!
//! ```text
//! price_monte_carlo / price_monte_carlo_with     (single random stream)
//! MonteCarloPricer                               (seeded chunks, rayon)
//! ├── MonteCarloConfig   (seed, chunk size, parallel)
//! ├── GbmPathGenerator   (log-space GBM steps)
//! ├── NormalSource       (injected draws, PricerRng by default)
//! └── PathPayoff         (terminal price and full path → payoff)
//! ```
//!
//! Results are [`SimulationResult`] (every path and payoff kept) or
//! [`SimulationSummary`] (running moments only).
//!
//! The price is `exp(-r T) × mean(payoffs)`. No variance reduction is
//! applied and the drift carries no dividend yield.
//!
//! # Example
//!
//! ```rust
//! use pricer_core::types::PricingParameters;
//! use pricer_pricing::mc::price_monte_carlo_with;
//! use pricer_pricing::rng::PricerRng;
//!
//! let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 50).with_paths(2_000);
//! let asian = |_terminal: f64, path: &[f64]| {
//!     (path.iter().sum::<f64>() / path.len() as f64 - 100.0).max(0.0)
//! };
//!
//! let mut rng = PricerRng::from_seed(42);
//! let result = price_monte_carlo_with(&params, &asian, &mut rng).unwrap();
//! assert_eq!(result.path_count(), 2_000);
//! assert_eq!(result.steps(), 50);
//! ```

pub mod config;
pub mod error;
pub mod paths;
pub mod pricer;
pub mod result;

pub use config::{
    MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_CHUNK_SIZE, MAX_PATHS, MAX_STEPS,
};
pub use error::ConfigError;
pub use paths::{GbmParams, GbmPathGenerator};
pub use pricer::{price_monte_carlo, price_monte_carlo_with, MonteCarloPricer};
pub use result::{SimulationResult, SimulationSummary};
