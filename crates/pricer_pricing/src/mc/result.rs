//! Monte Carlo pricing results.
//!
//! [`SimulationResult`] keeps every path and payoff (`O(paths × steps)`
//! memory). [`SimulationSummary`] keeps only running moments and is what
//! [`MonteCarloPricer::price_summary`](super::MonteCarloPricer::price_summary)
//! returns for large runs.

/// Full output of a Monte Carlo run.
///
/// # Invariants
///
/// - `payoffs.len() == paths.len()`
/// - every path has `steps + 1` points, the first equal to the spot
/// - `price == discount_factor × mean(payoffs)`
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PricingParameters;
/// use pricer_pricing::mc::price_monte_carlo;
///
/// let params = PricingParameters::new(100.0, 1.0, 0.0, 0.0, 1).with_paths(1);
/// let result = price_monte_carlo(&params, &|terminal: f64, _: &[f64]| terminal).unwrap();
///
/// assert_eq!(result.paths, vec![vec![100.0, 100.0]]);
/// assert_eq!(result.payoffs, vec![100.0]);
/// assert_eq!(result.price, 100.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationResult {
    /// Discounted mean payoff.
    pub price: f64,
    /// Undiscounted payoff of each path.
    pub payoffs: Vec<f64>,
    /// Simulated price paths.
    pub paths: Vec<Vec<f64>>,
    /// `exp(-r T)` applied to the mean payoff.
    pub discount_factor: f64,
    /// Seed of the generator, when the engine created it.
    pub seed: Option<u64>,
}

impl SimulationResult {
    /// Number of simulated paths.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Time steps per path.
    #[inline]
    pub fn steps(&self) -> usize {
        self.paths.first().map_or(0, |path| path.len().saturating_sub(1))
    }

    /// Sample standard error of the discounted price estimate.
    ///
    /// Computed from the stored payoffs on each call. Zero for fewer than two
    /// paths.
    pub fn std_error(&self) -> f64 {
        let moments: PayoffMoments = self.payoffs.iter().copied().collect();
        moments.std_error() * self.discount_factor
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error()
    }

    /// First `n` paths (fewer if the run was smaller).
    pub fn sample_paths(&self, n: usize) -> &[Vec<f64>] {
        &self.paths[..n.min(self.paths.len())]
    }

    /// First `n` payoffs (fewer if the run was smaller).
    pub fn sample_payoffs(&self, n: usize) -> &[f64] {
        &self.payoffs[..n.min(self.payoffs.len())]
    }

    /// Drops the paths and payoffs, keeping the aggregate figures.
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            price: self.price,
            std_error: self.std_error(),
            path_count: self.path_count(),
            steps: self.steps(),
            seed: self.seed,
        }
    }
}

/// Aggregate output of a Monte Carlo run without per-path data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationSummary {
    /// Discounted mean payoff.
    pub price: f64,
    /// Sample standard error of the discounted price.
    pub std_error: f64,
    /// Number of simulated paths.
    pub path_count: usize,
    /// Time steps per path.
    pub steps: usize,
    /// Seed of the generator.
    pub seed: Option<u64>,
}

impl SimulationSummary {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }
}

/// Running payoff count, mean and sum of squared deviations.
///
/// Updated with Welford's recurrence and merged with Chan's pairwise
/// formula, so chunk moments can be combined in any fixed order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PayoffMoments {
    count: usize,
    mean: f64,
    m2: f64,
}

impl PayoffMoments {
    /// Adds one payoff.
    #[inline]
    pub(crate) fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Folds `other` into `self`.
    pub(crate) fn merge(&mut self, other: &PayoffMoments) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let weight = other.count as f64 / count as f64;
        self.mean += delta * weight;
        self.m2 += other.m2 + delta * delta * self.count as f64 * weight;
        self.count = count;
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard error of the mean; zero below two samples.
    pub(crate) fn std_error(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        (self.m2 / (n - 1.0) / n).sqrt()
    }
}

impl FromIterator<f64> for PayoffMoments {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut moments = PayoffMoments::default();
        for value in iter {
            moments.push(value);
        }
        moments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn result(payoffs: Vec<f64>) -> SimulationResult {
        let paths = payoffs.iter().map(|&p| vec![100.0, p]).collect();
        let mean = payoffs.iter().sum::<f64>() / payoffs.len() as f64;
        SimulationResult {
            price: 0.5 * mean,
            payoffs,
            paths,
            discount_factor: 0.5,
            seed: Some(7),
        }
    }

    #[test]
    fn test_std_error_on_demand() {
        let r = result(vec![1.0, 2.0, 3.0, 4.0]);
        // sample variance 5/3, n = 4
        let expected = 0.5 * (5.0_f64 / 3.0 / 4.0).sqrt();
        assert_relative_eq!(r.std_error(), expected, epsilon = 1e-15);
        assert_relative_eq!(r.confidence_95(), 1.96 * expected, epsilon = 1e-15);
    }

    #[test]
    fn test_single_path_std_error_is_zero() {
        assert_eq!(result(vec![3.0]).std_error(), 0.0);
    }

    #[test]
    fn test_samples_are_bounded() {
        let r = result(vec![1.0, 2.0]);
        assert_eq!(r.sample_paths(3).len(), 2);
        assert_eq!(r.sample_payoffs(1), &[1.0]);
        assert_eq!(r.sample_payoffs(0).len(), 0);
    }

    #[test]
    fn test_summary() {
        let r = result(vec![1.0, 2.0, 3.0]);
        let summary = r.summary();
        assert_eq!(summary.path_count, 3);
        assert_eq!(summary.steps, 1);
        assert_eq!(summary.seed, Some(7));
        assert_eq!(summary.price, r.price);
    }

    #[test]
    fn test_moments_merge_matches_single_pass() {
        let values: Vec<f64> = (0..1_000).map(|i| ((i * 37) % 101) as f64 * 0.25).collect();
        let whole: PayoffMoments = values.iter().copied().collect();

        let mut merged = PayoffMoments::default();
        for chunk in values.chunks(128) {
            let part: PayoffMoments = chunk.iter().copied().collect();
            merged.merge(&part);
        }

        assert_eq!(merged.count(), whole.count());
        assert_relative_eq!(merged.mean(), whole.mean(), epsilon = 1e-12);
        assert_relative_eq!(merged.std_error(), whole.std_error(), epsilon = 1e-12);
    }

    #[test]
    fn test_merge_with_empty() {
        let mut moments: PayoffMoments = [1.0, 3.0].into_iter().collect();
        let before = moments;
        moments.merge(&PayoffMoments::default());
        assert_eq!(moments, before);

        let mut empty = PayoffMoments::default();
        empty.merge(&before);
        assert_eq!(empty, before);
    }
}
