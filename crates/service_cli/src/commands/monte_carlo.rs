//! Monte Carlo command implementation
//!
//! Compiles the payoff expression, simulates GBM paths and prints the price
//! with a bounded sample of paths and payoffs.

use clap::Args;
use pricer_core::types::PricingParameters;
use pricer_models::compile_payoff;
use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
use serde::Serialize;
use tracing::{debug, info};

use super::{format_values, Report};
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Arguments of `pricer monte-carlo`
#[derive(Debug, Clone, Args)]
pub struct MonteCarloArgs {
    /// Initial asset price
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub spot: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub maturity: f64,

    /// Risk-free interest rate
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    pub rate: f64,

    /// Asset volatility
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    pub volatility: f64,

    /// Number of time steps per path
    #[arg(long, default_value_t = 50)]
    pub steps: usize,

    /// Number of Monte Carlo paths
    #[arg(long, default_value_t = 10_000)]
    pub paths: usize,

    /// Payoff expression using `price` (terminal) and `path` (full history),
    /// e.g. "max(price - 100, 0)"
    #[arg(long)]
    pub payoff: String,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulate path chunks in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Output of `pricer monte-carlo`
#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub payoff: String,
    pub price: f64,
    pub std_error: f64,
    pub seed: Option<u64>,
    pub path_count: usize,
    pub steps: usize,
    pub sample_payoffs: Vec<f64>,
    pub sample_paths: Vec<Vec<f64>>,
}

impl Report for MonteCarloReport {
    fn render_table(&self) -> String {
        let mut out = format!("Estimated option price: {:.6}\n", self.price);
        out.push_str(&format!("Standard error: {:.6}\n", self.std_error));
        out.push_str(&format!(
            "Paths simulated: {} | Steps per path: {}\n",
            self.path_count, self.steps
        ));
        if let Some(seed) = self.seed {
            out.push_str(&format!("Seed: {}\n", seed));
        }
        out.push_str(&format!(
            "Sample payoffs: {}",
            format_values(&self.sample_payoffs)
        ));
        for (i, path) in self.sample_paths.iter().enumerate() {
            out.push_str(&format!("\nPath {}: {}", i + 1, format_values(path)));
        }
        out
    }
}

/// Run the simulation described by `args`
///
/// `config` carries the merged seed and parallel settings.
pub fn build_report(args: &MonteCarloArgs, config: &CliConfig) -> Result<MonteCarloReport> {
    let payoff = compile_payoff(&args.payoff)?;
    debug!(uses_path = payoff.tree().uses_path(), "Payoff compiled");

    CliError::check_limit("steps", args.steps, config.max_steps)?;
    CliError::check_limit("paths", args.paths, config.max_paths)?;

    let params = PricingParameters::new(
        args.spot,
        args.maturity,
        args.rate,
        args.volatility,
        args.steps,
    )
    .with_paths(args.paths);

    let engine_config = MonteCarloConfig::builder()
        .maybe_seed(config.seed)
        .chunk_size(config.chunk_size)
        .parallel(config.parallel)
        .build()?;
    let pricer = MonteCarloPricer::new(engine_config)?;

    let result = pricer.price(&params, &payoff)?;

    Ok(MonteCarloReport {
        payoff: payoff.source().to_string(),
        price: result.price,
        std_error: result.std_error(),
        seed: result.seed,
        path_count: result.path_count(),
        steps: result.steps(),
        sample_payoffs: result.sample_payoffs(config.sample_payoffs).to_vec(),
        sample_paths: result.sample_paths(config.sample_paths).to_vec(),
    })
}

/// Run the monte-carlo command
pub fn run(args: &MonteCarloArgs, config: &CliConfig) -> Result<()> {
    info!(
        paths = args.paths,
        steps = args.steps,
        parallel = config.parallel,
        payoff = %args.payoff,
        "Starting Monte Carlo simulation"
    );

    let report = build_report(args, config)?;
    info!(price = report.price, seed = ?report.seed, "Simulation complete");
    super::emit(&report, config.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::types::ValidationError;
    use pricer_models::PayoffError;

    fn args(payoff: &str) -> MonteCarloArgs {
        MonteCarloArgs {
            spot: 100.0,
            maturity: 1.0,
            rate: 0.05,
            volatility: 0.2,
            steps: 10,
            paths: 500,
            payoff: payoff.to_string(),
            seed: None,
            parallel: false,
        }
    }

    fn seeded() -> CliConfig {
        CliConfig {
            seed: Some(11),
            chunk_size: 128,
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_report_samples_are_bounded() {
        let report = build_report(&args("max(price - 100, 0)"), &seeded()).unwrap();

        assert_eq!(report.path_count, 500);
        assert_eq!(report.steps, 10);
        assert_eq!(report.sample_paths.len(), 3);
        assert_eq!(report.sample_payoffs.len(), 5);
        assert!(report.sample_paths.iter().all(|p| p.len() == 11 && p[0] == 100.0));
        assert_eq!(report.seed, Some(11));
    }

    #[test]
    fn test_seeded_report_is_reproducible_in_parallel() {
        let sequential = build_report(&args("max(path) - min(path)"), &seeded()).unwrap();
        let parallel_config = CliConfig {
            parallel: true,
            ..seeded()
        };
        let parallel = build_report(&args("max(path) - min(path)"), &parallel_config).unwrap();

        assert_eq!(sequential.price, parallel.price);
        assert_eq!(sequential.sample_paths, parallel.sample_paths);
    }

    #[test]
    fn test_small_run_reports_all_paths() {
        let small = MonteCarloArgs {
            paths: 2,
            ..args("price")
        };
        let report = build_report(&small, &seeded()).unwrap();
        assert_eq!(report.sample_paths.len(), 2);
        assert_eq!(report.sample_payoffs.len(), 2);
    }

    #[test]
    fn test_unsafe_payoff_rejected() {
        let err = build_report(&args("__import__('os')"), &seeded()).unwrap_err();
        assert!(matches!(err, CliError::Payoff(ref e) if e.is_unsafe()));
        assert!(matches!(
            build_report(&args("price +"), &seeded()),
            Err(CliError::Payoff(PayoffError::InvalidExpression { .. }))
        ));
    }

    #[test]
    fn test_invalid_parameters_and_limits() {
        let bad = MonteCarloArgs {
            spot: -1.0,
            ..args("price")
        };
        assert!(matches!(
            build_report(&bad, &seeded()),
            Err(CliError::Validation(ValidationError::NonPositive { name: "spot", .. }))
        ));

        let config = CliConfig {
            max_paths: 100,
            ..seeded()
        };
        assert!(matches!(
            build_report(&args("price"), &config),
            Err(CliError::LimitExceeded { name: "paths", value: 500, max: 100 })
        ));
    }

    #[test]
    fn test_table_rendering() {
        let report = MonteCarloReport {
            payoff: "price".to_string(),
            price: 1.5,
            std_error: 0.25,
            seed: Some(3),
            path_count: 1,
            steps: 1,
            sample_payoffs: vec![1.5],
            sample_paths: vec![vec![1.0, 1.5]],
        };
        let table = report.render_table();
        assert!(table.starts_with("Estimated option price: 1.500000"));
        assert!(table.contains("Paths simulated: 1 | Steps per path: 1"));
        assert!(table.contains("Seed: 3"));
        assert!(table.ends_with("Path 1: [1.0000, 1.5000]"));
    }
}
