//! Shared pricing parameters and the validator both engines run first.
//!
//! [`PricingParameters`] is constructed without checks and validated by the
//! engine that consumes it, before any lattice node or random draw exists.
//! The lattice needs a strike, the simulation needs a path count; everything
//! else is common.

use super::error::ValidationError;

/// Market and discretisation inputs shared by the lattice and Monte Carlo
/// engines.
///
/// Immutable once constructed: engines only borrow it, and the `with_*`
/// methods consume `self` and return a new value.
///
/// # Examples
/// ```
/// use pricer_core::types::PricingParameters;
///
/// let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 50)
///     .with_strike(100.0)
///     .with_paths(10_000);
///
/// assert!(params.validate_lattice().is_ok());
/// assert!(params.validate_simulation().is_ok());
/// assert_eq!(params.dt(), 1.0 / 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingParameters {
    spot: f64,
    strike: Option<f64>,
    maturity: f64,
    rate: f64,
    volatility: f64,
    steps: usize,
    paths: Option<usize>,
}

impl PricingParameters {
    /// Creates parameters common to both engines.
    ///
    /// # Arguments
    /// * `spot` - Current underlying price (S₀)
    /// * `maturity` - Time to maturity in years (T)
    /// * `rate` - Continuously compounded risk-free rate (r)
    /// * `volatility` - Annualised volatility (σ)
    /// * `steps` - Number of time steps (N)
    ///
    /// No checks are performed here; see [`validate`](Self::validate).
    pub fn new(spot: f64, maturity: f64, rate: f64, volatility: f64, steps: usize) -> Self {
        Self {
            spot,
            strike: None,
            maturity,
            rate,
            volatility,
            steps,
            paths: None,
        }
    }

    /// Sets the strike used by the lattice pricer.
    pub fn with_strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the number of Monte Carlo paths.
    pub fn with_paths(mut self, paths: usize) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Current underlying price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike, if one was supplied.
    #[inline]
    pub fn strike(&self) -> Option<f64> {
        self.strike
    }

    /// Time to maturity in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Number of time steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of Monte Carlo paths, if supplied.
    #[inline]
    pub fn paths(&self) -> Option<usize> {
        self.paths
    }

    /// Length of one time step, `maturity / steps`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.maturity / self.steps as f64
    }

    /// Validates the fields common to both engines.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in order: spot, strike (only if
    /// supplied), maturity, rate, volatility, steps, paths (only if supplied).
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("spot", self.spot)?;
        if let Some(strike) = self.strike {
            ensure_positive("strike", strike)?;
        }
        ensure_positive("maturity", self.maturity)?;
        ensure_finite("rate", self.rate)?;
        ensure_non_negative("volatility", self.volatility)?;
        ensure_count("steps", self.steps)?;
        if let Some(paths) = self.paths {
            ensure_count("paths", paths)?;
        }
        Ok(())
    }

    /// Validates for the binomial lattice and returns the strike.
    ///
    /// # Errors
    ///
    /// Everything [`validate`](Self::validate) rejects, plus a missing strike.
    pub fn validate_lattice(&self) -> Result<f64, ValidationError> {
        self.validate()?;
        self.strike.ok_or(ValidationError::Missing {
            name: "strike",
            engine: "lattice",
        })
    }

    /// Validates for Monte Carlo simulation and returns the path count.
    ///
    /// # Errors
    ///
    /// Everything [`validate`](Self::validate) rejects, plus a missing path
    /// count.
    pub fn validate_simulation(&self) -> Result<usize, ValidationError> {
        self.validate()?;
        self.paths.ok_or(ValidationError::Missing {
            name: "paths",
            engine: "Monte Carlo",
        })
    }
}

/// Rejects `NaN`/infinite values.
pub fn ensure_finite(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { name, value })
    }
}

/// Rejects values that are not finite and strictly positive.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<(), ValidationError> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { name, value })
    }
}

/// Rejects values that are not finite and non-negative.
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), ValidationError> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative { name, value })
    }
}

/// Rejects a zero count.
pub fn ensure_count(name: &'static str, value: usize) -> Result<(), ValidationError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ValidationError::ZeroCount { name })
    }
}
