//! Path payoff contract.
//!
//! The Monte Carlo engine in `pricer_pricing` knows nothing about how a payoff
//! is defined; it only needs something that maps a simulated path to a number.
//! The sandboxed expression evaluator in `pricer_models` implements this trait,
//! and so does any pure closure with the right signature.

/// Pure function of a simulated path.
///
/// # Contract
/// - `terminal` is the last element of `path`
/// - `path` has `steps + 1` points, the first equal to the initial spot
/// - Implementations must be side-effect free; the engine may call them from
///   several worker threads at once (hence the `Sync` bound)
/// - Undefined results are reported as `NaN`/`Inf`, never by panicking
///
/// # Examples
/// ```
/// use pricer_core::traits::PathPayoff;
///
/// let call = |terminal: f64, _path: &[f64]| (terminal - 100.0).max(0.0);
/// assert_eq!(call.evaluate(110.0, &[100.0, 110.0]), 10.0);
/// ```
pub trait PathPayoff: Sync {
    /// Payoff for one path.
    fn evaluate(&self, terminal: f64, path: &[f64]) -> f64;
}

impl<F> PathPayoff for F
where
    F: Fn(f64, &[f64]) -> f64 + Sync,
{
    #[inline]
    fn evaluate(&self, terminal: f64, path: &[f64]) -> f64 {
        self(terminal, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn average(_terminal: f64, path: &[f64]) -> f64 {
        path.iter().sum::<f64>() / path.len() as f64
    }

    #[test]
    fn test_fn_item_is_payoff() {
        assert_eq!(average.evaluate(3.0, &[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_closure_reference_is_payoff() {
        fn run<P: PathPayoff>(payoff: P) -> f64 {
            payoff.evaluate(120.0, &[100.0, 120.0])
        }

        let put = |terminal: f64, _: &[f64]| (100.0 - terminal).max(0.0);
        assert_eq!(run(&put), 0.0);
        assert_eq!(run(put), 0.0);
    }
}
