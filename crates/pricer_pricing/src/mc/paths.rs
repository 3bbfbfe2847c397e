//! Path generation for Monte Carlo simulation.
//!
//! Geometric Brownian Motion paths use the exact log-space step:
//!
//! ```text
//! S(t+dt) = S(t) × exp((r - ½σ²)dt + σ√dt × Z),   Z ~ N(0, 1)
//! ```
//!
//! Every path holds `steps + 1` points, the first equal to the initial spot.
//! Draws are taken path-major: one path's `steps` normals, then the next.

use pricer_core::types::PricingParameters;

use crate::rng::NormalSource;

/// Parameters for Geometric Brownian Motion path generation.
///
/// # Model
///
/// ```text
/// dS = r S dt + σ S dW
/// ```
///
/// under the risk-neutral measure. The drift carries no dividend yield.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::GbmParams;
///
/// let params = GbmParams::new(100.0, 0.05, 0.2, 1.0);
/// assert!((params.discount_factor() - (-0.05_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Risk-free rate (r), annualised.
    pub rate: f64,
    /// Volatility (σ), annualised.
    pub volatility: f64,
    /// Time to maturity (T) in years.
    pub maturity: f64,
}

impl GbmParams {
    /// Creates new GBM parameters.
    #[inline]
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> Self {
        Self {
            spot,
            rate,
            volatility,
            maturity,
        }
    }

    /// Extracts the model inputs from validated pricing parameters.
    #[inline]
    pub fn from_parameters(params: &PricingParameters) -> Self {
        Self::new(
            params.spot(),
            params.rate(),
            params.volatility(),
            params.maturity(),
        )
    }

    /// Discount factor over the whole horizon, `exp(-r T)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }
}

/// Precomputed GBM stepper for a fixed number of steps.
///
/// # Algorithm
///
/// 1. Precompute `drift_dt = (r - ½σ²)dt` and `vol_sqrt_dt = σ√dt`
/// 2. Set `S[0] = spot`
/// 3. For each step, `S[t+1] = S[t] × exp(drift_dt + vol_sqrt_dt × Z)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmPathGenerator {
    spot: f64,
    drift_dt: f64,
    vol_sqrt_dt: f64,
    steps: usize,
}

impl GbmPathGenerator {
    /// Creates a generator for `steps` equal steps over `params.maturity`.
    pub fn new(params: GbmParams, steps: usize) -> Self {
        let dt = params.maturity / steps as f64;
        Self {
            spot: params.spot,
            drift_dt: (params.rate - 0.5 * params.volatility * params.volatility) * dt,
            vol_sqrt_dt: params.volatility * dt.sqrt(),
            steps,
        }
    }

    /// Number of time steps per path.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of points per path, `steps + 1`.
    #[inline]
    pub fn path_len(&self) -> usize {
        self.steps + 1
    }

    /// Log-space drift per step.
    #[inline]
    pub fn drift_dt(&self) -> f64 {
        self.drift_dt
    }

    /// Log-space diffusion per step.
    #[inline]
    pub fn vol_sqrt_dt(&self) -> f64 {
        self.vol_sqrt_dt
    }

    /// Simulates one path into `path`, drawing `steps` normals from `source`.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `path.len() == steps + 1`.
    #[inline]
    pub fn fill_path<S>(&self, source: &mut S, path: &mut [f64])
    where
        S: NormalSource + ?Sized,
    {
        debug_assert_eq!(path.len(), self.path_len());

        path[0] = self.spot;
        for step in 0..self.steps {
            let z = source.next_normal();
            let increment = self.drift_dt + self.vol_sqrt_dt * z;
            path[step + 1] = path[step] * increment.exp();
        }
    }

    /// Simulates one path into a new vector.
    pub fn generate_path<S>(&self, source: &mut S) -> Vec<f64>
    where
        S: NormalSource + ?Sized,
    {
        let mut path = vec![0.0; self.path_len()];
        self.fill_path(source, &mut path);
        path
    }
}
