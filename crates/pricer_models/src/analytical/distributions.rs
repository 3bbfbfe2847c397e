//! Standard normal distribution functions.
//!
//! - `norm_cdf`: cumulative distribution function
//! - `norm_pdf`: probability density function

use statrs::function::erf::erfc;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal cumulative distribution function.
///
/// Φ(x) = (1/2) · erfc(−x / √2), evaluated through `erfc` so the tails keep
/// full relative precision.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!(norm_cdf(-3.0) < 0.01);
/// assert!(norm_cdf(3.0) > 0.99);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal probability density function, φ(x) = e^(−x²/2) / √(2π).
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_cdf_known_values() {
        assert_relative_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(1.0), 0.841_344_746_068_542_9, epsilon = 1e-12);
        assert_relative_eq!(norm_cdf(-1.96), 0.024_997_895_148_220_4, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [0.1, 0.5, 1.0, 2.5, 5.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_norm_cdf_limits() {
        assert_eq!(norm_cdf(f64::INFINITY), 1.0);
        assert_eq!(norm_cdf(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_norm_pdf_peak() {
        assert_relative_eq!(norm_pdf(0.0), FRAC_1_SQRT_2PI);
        assert_relative_eq!(norm_pdf(1.0), norm_pdf(-1.0));
    }
}
