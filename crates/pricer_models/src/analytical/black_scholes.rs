//! Black-Scholes closed form for European options with a continuous
//! dividend yield.
//!
//! Serves as the reference the binomial lattice converges to: the CRR tree
//! with `p = (e^((r−q)Δt) − d)/(u − d)` and per-step discount `e^(−rΔt)` has
//! this formula as its limit.

use pricer_core::types::{
    ensure_finite, ensure_non_negative, ensure_positive, OptionType, ValidationError,
};

use super::distributions::{norm_cdf, norm_pdf};

/// Black-Scholes model parameters.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call = bs.price(OptionType::Call, 100.0, 1.0);
/// assert!((call - 10.4506).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    volatility: f64,
    dividend: f64,
}

impl BlackScholes {
    /// Creates a model without dividend yield.
    ///
    /// # Errors
    ///
    /// Non-positive or non-finite `spot`, non-finite `rate`, negative or
    /// non-finite `volatility`.
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, ValidationError> {
        ensure_positive("spot", spot)?;
        ensure_finite("rate", rate)?;
        ensure_non_negative("volatility", volatility)?;
        Ok(Self {
            spot,
            rate,
            volatility,
            dividend: 0.0,
        })
    }

    /// Sets the continuous dividend yield.
    ///
    /// # Errors
    ///
    /// Non-finite `dividend`.
    pub fn with_dividend(mut self, dividend: f64) -> Result<Self, ValidationError> {
        ensure_finite("dividend", dividend)?;
        self.dividend = dividend;
        Ok(self)
    }

    /// Spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Continuously compounded risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Continuous dividend yield.
    #[inline]
    pub fn dividend(&self) -> f64 {
        self.dividend
    }

    /// d₁ = (ln(S/K) + (r − q + σ²/2)T) / (σ√T)
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate - self.dividend + 0.5 * self.volatility * self.volatility) * expiry;
        ((self.spot / strike).ln() + drift) / vol_sqrt_t
    }

    /// d₂ = d₁ − σ√T
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// European option value.
    ///
    /// At `expiry <= 0` this is the intrinsic value; at zero volatility the
    /// discounted intrinsic value of the deterministic forward.
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        if expiry <= 0.0 {
            return option_type.intrinsic(self.spot, strike);
        }

        let spot_disc = self.spot * (-self.dividend * expiry).exp();
        let strike_disc = strike * (-self.rate * expiry).exp();

        if self.volatility == 0.0 {
            return option_type.intrinsic(spot_disc, strike_disc);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        match option_type {
            // C = S·e^(−qT)·N(d₁) − K·e^(−rT)·N(d₂)
            OptionType::Call => spot_disc * norm_cdf(d1) - strike_disc * norm_cdf(d2),
            // P = K·e^(−rT)·N(−d₂) − S·e^(−qT)·N(−d₁)
            OptionType::Put => strike_disc * norm_cdf(-d2) - spot_disc * norm_cdf(-d1),
        }
    }

    /// European call value.
    #[inline]
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        self.price(OptionType::Call, strike, expiry)
    }

    /// European put value.
    #[inline]
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        self.price(OptionType::Put, strike, expiry)
    }

    /// Vega (∂V/∂σ), identical for calls and puts.
    ///
    /// Zero for an expired option or at zero volatility.
    pub fn vega(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= 0.0 || self.volatility == 0.0 {
            return 0.0;
        }
        // Vega = S·e^(−qT)·√T·φ(d₁)
        let spot_disc = self.spot * (-self.dividend * expiry).exp();
        spot_disc * expiry.sqrt() * norm_pdf(self.d1(strike, expiry))
    }
}
