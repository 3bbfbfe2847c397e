//! Monte Carlo pricing engine.
//!
//! # Overview
//!
//! Each run:
//! 1. Validates the [`PricingParameters`] (no draw happens before this)
//! 2. Simulates GBM paths via [`GbmPathGenerator`]
//! 3. Applies the [`PathPayoff`] to `(terminal, path)` of each path
//! 4. Discounts the mean payoff by `exp(-r T)`
//!
//! [`price_monte_carlo`] and [`price_monte_carlo_with`] run a single random
//! stream. [`MonteCarloPricer`] splits the paths into seeded chunks and can
//! run them on the rayon pool.

use pricer_core::traits::PathPayoff;
use pricer_core::types::{PricingParameters, ValidationError};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::config::MonteCarloConfig;
use super::error::ConfigError;
use super::paths::{GbmParams, GbmPathGenerator};
use super::result::{PayoffMoments, SimulationResult, SimulationSummary};
use crate::rng::{NormalSource, PricerRng};

/// Prices a path payoff with an entropy-seeded generator.
///
/// The seed that was drawn is reported in [`SimulationResult::seed`].
///
/// # Errors
///
/// Returns [`ValidationError`] for non-positive spot or maturity, zero steps
/// or paths, a missing path count, negative volatility or a non-finite rate.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PricingParameters;
/// use pricer_pricing::mc::price_monte_carlo;
///
/// let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 50).with_paths(1_000);
/// let call = |terminal: f64, _: &[f64]| (terminal - 100.0).max(0.0);
///
/// let result = price_monte_carlo(&params, &call).unwrap();
/// assert_eq!(result.payoffs.len(), 1_000);
/// assert!(result.paths.iter().all(|path| path.len() == 51));
/// ```
pub fn price_monte_carlo<P>(
    params: &PricingParameters,
    payoff: &P,
) -> Result<SimulationResult, ValidationError>
where
    P: PathPayoff + ?Sized,
{
    let n_paths = params.validate_simulation()?;
    let mut rng = PricerRng::from_entropy();
    let seed = rng.seed();
    debug!(n_paths, steps = params.steps(), seed, "simulating paths");

    Ok(simulate(params, n_paths, payoff, &mut rng, Some(seed)))
}

/// Prices a path payoff drawing normals from a caller-supplied source.
///
/// Exactly `paths × steps` draws are taken, path-major, and none if
/// validation fails.
///
/// # Errors
///
/// Same as [`price_monte_carlo`].
pub fn price_monte_carlo_with<P, S>(
    params: &PricingParameters,
    payoff: &P,
    source: &mut S,
) -> Result<SimulationResult, ValidationError>
where
    P: PathPayoff + ?Sized,
    S: NormalSource + ?Sized,
{
    let n_paths = params.validate_simulation()?;
    debug!(n_paths, steps = params.steps(), "simulating paths with injected source");

    Ok(simulate(params, n_paths, payoff, source, None))
}

fn simulate<P, S>(
    params: &PricingParameters,
    n_paths: usize,
    payoff: &P,
    source: &mut S,
    seed: Option<u64>,
) -> SimulationResult
where
    P: PathPayoff + ?Sized,
    S: NormalSource + ?Sized,
{
    let gbm = GbmParams::from_parameters(params);
    let generator = GbmPathGenerator::new(gbm, params.steps());
    let chunk = simulate_chunk(&generator, payoff, n_paths, source);

    finish(chunk, gbm.discount_factor(), seed)
}

/// Paths and payoffs of one random stream.
struct ChunkOutput {
    payoffs: Vec<f64>,
    paths: Vec<Vec<f64>>,
}

fn simulate_chunk<P, S>(
    generator: &GbmPathGenerator,
    payoff: &P,
    n_paths: usize,
    source: &mut S,
) -> ChunkOutput
where
    P: PathPayoff + ?Sized,
    S: NormalSource + ?Sized,
{
    let mut payoffs = Vec::with_capacity(n_paths);
    let mut paths = Vec::with_capacity(n_paths);

    for _ in 0..n_paths {
        let path = generator.generate_path(source);
        let terminal = path[generator.steps()];
        payoffs.push(payoff.evaluate(terminal, &path));
        paths.push(path);
    }

    ChunkOutput { payoffs, paths }
}

/// Running moments of one random stream, reusing a single path buffer.
fn summarise_chunk<P, S>(
    generator: &GbmPathGenerator,
    payoff: &P,
    n_paths: usize,
    source: &mut S,
) -> PayoffMoments
where
    P: PathPayoff + ?Sized,
    S: NormalSource + ?Sized,
{
    let mut path = vec![0.0; generator.path_len()];
    let mut moments = PayoffMoments::default();

    for _ in 0..n_paths {
        generator.fill_path(source, &mut path);
        moments.push(payoff.evaluate(path[generator.steps()], &path));
    }

    moments
}

fn finish(chunk: ChunkOutput, discount_factor: f64, seed: Option<u64>) -> SimulationResult {
    let mean = chunk.payoffs.iter().sum::<f64>() / chunk.payoffs.len() as f64;

    SimulationResult {
        price: discount_factor * mean,
        payoffs: chunk.payoffs,
        paths: chunk.paths,
        discount_factor,
        seed,
    }
}

/// Chunked, optionally parallel Monte Carlo engine.
///
/// Holds only its [`MonteCarloConfig`]; every call is independent. With a
/// fixed seed the output is identical for sequential and parallel runs.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PricingParameters;
/// use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
///
/// let config = MonteCarloConfig::builder()
///     .seed(42)
///     .chunk_size(2_500)
///     .parallel(true)
///     .build()
///     .unwrap();
/// let pricer = MonteCarloPricer::new(config).unwrap();
///
/// let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 12).with_paths(10_000);
/// let put = |terminal: f64, _: &[f64]| (100.0 - terminal).max(0.0);
///
/// let summary = pricer.price_summary(&params, &put).unwrap();
/// assert_eq!(summary.path_count, 10_000);
/// assert!((summary.price - 5.57).abs() < 4.0 * summary.std_error + 0.05);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloPricer {
    config: MonteCarloConfig,
}

impl MonteCarloPricer {
    /// Creates a new pricer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration is invalid.
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns a reference to the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Prices a path payoff, keeping every path and payoff.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] before any path is simulated.
    pub fn price<P>(
        &self,
        params: &PricingParameters,
        payoff: &P,
    ) -> Result<SimulationResult, ValidationError>
    where
        P: PathPayoff + ?Sized,
    {
        let n_paths = params.validate_simulation()?;
        let gbm = GbmParams::from_parameters(params);
        let generator = GbmPathGenerator::new(gbm, params.steps());
        let seed = self.resolve_seed();

        let chunks = self.run_chunks(n_paths, params.steps(), seed, |index, len| {
            let mut rng = PricerRng::for_chunk(seed, index);
            simulate_chunk(&generator, payoff, len, &mut rng)
        });

        let mut merged = ChunkOutput {
            payoffs: Vec::with_capacity(n_paths),
            paths: Vec::with_capacity(n_paths),
        };
        for chunk in chunks {
            merged.payoffs.extend(chunk.payoffs);
            merged.paths.extend(chunk.paths);
        }

        Ok(finish(merged, gbm.discount_factor(), Some(seed)))
    }

    /// Prices a path payoff keeping only running moments.
    ///
    /// Memory is one path buffer per chunk in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] before any path is simulated.
    pub fn price_summary<P>(
        &self,
        params: &PricingParameters,
        payoff: &P,
    ) -> Result<SimulationSummary, ValidationError>
    where
        P: PathPayoff + ?Sized,
    {
        let n_paths = params.validate_simulation()?;
        let gbm = GbmParams::from_parameters(params);
        let generator = GbmPathGenerator::new(gbm, params.steps());
        let seed = self.resolve_seed();

        let chunks = self.run_chunks(n_paths, params.steps(), seed, |index, len| {
            let mut rng = PricerRng::for_chunk(seed, index);
            summarise_chunk(&generator, payoff, len, &mut rng)
        });

        let mut moments = PayoffMoments::default();
        for chunk in &chunks {
            moments.merge(chunk);
        }

        let discount_factor = gbm.discount_factor();
        Ok(SimulationSummary {
            price: discount_factor * moments.mean(),
            std_error: discount_factor * moments.std_error(),
            path_count: moments.count(),
            steps: params.steps(),
            seed: Some(seed),
        })
    }

    fn resolve_seed(&self) -> u64 {
        self.config
            .seed()
            .unwrap_or_else(|| rand::thread_rng().gen())
    }

    /// Runs `work(index, len)` for every chunk and returns outputs in chunk
    /// order.
    fn run_chunks<T, F>(&self, n_paths: usize, steps: usize, seed: u64, work: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, usize) -> T + Send + Sync,
    {
        let chunk_size = self.config.chunk_size();
        let n_chunks = self.config.chunk_count(n_paths);
        let parallel = self.config.parallel() && n_chunks > 1;

        debug!(n_paths, steps, n_chunks, chunk_size, parallel, seed, "simulating paths");

        let run = |index: usize| {
            let start = index * chunk_size;
            let len = chunk_size.min(n_paths - start);
            trace!(chunk = index, paths = len, "simulating chunk");
            work(index, len)
        };

        if parallel {
            (0..n_chunks).into_par_iter().map(run).collect()
        } else {
            (0..n_chunks).map(run).collect()
        }
    }
}
