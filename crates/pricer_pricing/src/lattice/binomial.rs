//! Cox-Ross-Rubinstein binomial lattice.
//!
//! ## Construction
//!
//! ```text
//! dt          = T / N
//! up          = exp(σ √dt)
//! down        = 1 / up
//! growth      = exp((r - q) dt)
//! probability = (growth - down) / (up - down)
//! discount    = exp(-r dt)
//! ```
//!
//! Node `j` at step `s` holds `S₀ · up^j · down^(s-j)`. Levels are built by
//! multiplying the previous level by `down` and extending the top node by
//! `up`, so no power is evaluated inside the lattice loops.
//!
//! ## Backward induction
//!
//! ```text
//! V[N][j] = payoff(S[N][j])
//! V[s][j] = discount · (p · V[s+1][j+1] + (1 - p) · V[s+1][j])
//! ```
//!
//! American nodes take `max(continuation, intrinsic)`.

use pricer_core::types::{ensure_finite, OptionType, PricingParameters};
use tracing::{debug, trace};

use super::error::LatticeError;

/// Per-step constants of a CRR lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LatticeConstants {
    /// Step length in years.
    pub dt: f64,
    /// Up-move factor.
    pub up: f64,
    /// Down-move factor, `1 / up`.
    pub down: f64,
    /// Forward growth over one step, `exp((r - q) dt)`.
    pub growth: f64,
    /// Risk-neutral probability of an up move.
    pub probability: f64,
    /// One-step discount factor.
    pub discount: f64,
}

impl LatticeConstants {
    /// Derives the lattice constants and checks the no-arbitrage condition.
    ///
    /// # Arguments
    ///
    /// * `maturity` - Time to maturity in years
    /// * `rate` - Risk-free rate
    /// * `volatility` - Annualised volatility
    /// * `dividend` - Continuous dividend yield
    /// * `steps` - Number of time steps
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::Arbitrage`] when the probability is outside
    /// `[0, 1]` or not finite. Zero volatility gives `up == down` and always
    /// fails here.
    pub fn new(
        maturity: f64,
        rate: f64,
        volatility: f64,
        dividend: f64,
        steps: usize,
    ) -> Result<Self, LatticeError> {
        let dt = maturity / steps as f64;
        let up = (volatility * dt.sqrt()).exp();
        let down = 1.0 / up;
        let growth = ((rate - dividend) * dt).exp();
        let probability = (growth - down) / (up - down);

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(LatticeError::Arbitrage { probability });
        }

        Ok(Self {
            dt,
            up,
            down,
            growth,
            probability,
            discount: (-rate * dt).exp(),
        })
    }
}

/// Outcome of a lattice valuation.
///
/// `asset_prices[s]` and `option_values[s]` both hold `s + 1` nodes, lowest
/// price first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LatticeResult {
    /// Option value at the root node.
    pub price: f64,
    /// Underlying price at every node.
    pub asset_prices: Vec<Vec<f64>>,
    /// Option value at every node.
    pub option_values: Vec<Vec<f64>>,
    /// Constants the lattice was built with.
    pub constants: LatticeConstants,
}

impl LatticeResult {
    /// Number of time steps in the lattice.
    #[inline]
    pub fn steps(&self) -> usize {
        self.asset_prices.len().saturating_sub(1)
    }

    /// Underlying prices at maturity.
    pub fn terminal_prices(&self) -> &[f64] {
        self.asset_prices.last().map_or(&[], Vec::as_slice)
    }
}

/// Prices a vanilla option on a CRR binomial lattice.
///
/// # Arguments
///
/// * `params` - Spot, strike, maturity, rate, volatility and steps
/// * `option_type` - Call or put
/// * `american` - Allow early exercise at every node
/// * `dividend` - Continuous dividend yield `q`
///
/// # Errors
///
/// - [`LatticeError::Validation`] for rejected inputs, including a missing
///   strike and a non-finite dividend
/// - [`LatticeError::Arbitrage`] when the risk-neutral probability is not
///   in `[0, 1]`
///
/// Both are raised before any node is built.
///
/// # Examples
///
/// ```
/// use pricer_core::types::{OptionType, PricingParameters};
/// use pricer_pricing::lattice::price_binomial;
///
/// let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 50).with_strike(100.0);
/// let result = price_binomial(&params, OptionType::Call, false, 0.0).unwrap();
///
/// assert!((result.price - 10.45).abs() < 0.05);
/// assert_eq!(result.asset_prices[0], vec![100.0]);
/// assert_eq!(result.asset_prices[50].len(), 51);
/// ```
pub fn price_binomial(
    params: &PricingParameters,
    option_type: OptionType,
    american: bool,
    dividend: f64,
) -> Result<LatticeResult, LatticeError> {
    let strike = params.validate_lattice()?;
    ensure_finite("dividend", dividend)?;

    let steps = params.steps();
    let constants = LatticeConstants::new(
        params.maturity(),
        params.rate(),
        params.volatility(),
        dividend,
        steps,
    )?;

    debug!(
        steps,
        %option_type,
        american,
        up = constants.up,
        down = constants.down,
        probability = constants.probability,
        discount = constants.discount,
        "building binomial lattice"
    );

    let asset_prices = build_asset_lattice(params.spot(), steps, &constants);
    let option_values =
        backward_induction(&asset_prices, strike, option_type, american, &constants);
    let price = option_values[0][0];

    trace!(price, "lattice valued");

    Ok(LatticeResult {
        price,
        asset_prices,
        option_values,
        constants,
    })
}

/// Builds the underlying price at every node, level by level.
fn build_asset_lattice(spot: f64, steps: usize, constants: &LatticeConstants) -> Vec<Vec<f64>> {
    let mut levels: Vec<Vec<f64>> = Vec::with_capacity(steps + 1);
    levels.push(vec![spot]);

    for step in 1..=steps {
        let previous = &levels[step - 1];
        let mut level = Vec::with_capacity(step + 1);
        level.extend(previous.iter().map(|&s| s * constants.down));
        level.push(previous[step - 1] * constants.up);
        levels.push(level);
    }

    levels
}

/// Rolls option values back from maturity to the root.
fn backward_induction(
    asset_prices: &[Vec<f64>],
    strike: f64,
    option_type: OptionType,
    american: bool,
    constants: &LatticeConstants,
) -> Vec<Vec<f64>> {
    let steps = asset_prices.len() - 1;
    let disc_p = constants.discount * constants.probability;
    let disc_1mp = constants.discount * (1.0 - constants.probability);

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); steps + 1];
    values[steps] = asset_prices[steps]
        .iter()
        .map(|&s| option_type.intrinsic(s, strike))
        .collect();

    for step in (0..steps).rev() {
        let next = &values[step + 1];
        let level: Vec<f64> = asset_prices[step]
            .iter()
            .enumerate()
            .map(|(node, &s)| {
                let continuation = disc_p.mul_add(next[node + 1], disc_1mp * next[node]);
                if american {
                    continuation.max(option_type.intrinsic(s, strike))
                } else {
                    continuation
                }
            })
            .collect();
        values[step] = level;
    }

    values
}
