//! Pricer CLI - command-line front end for the option pricing engines
//!
//! # Commands
//!
//! - `pricer binomial` - Price a vanilla option on a CRR lattice
//! - `pricer monte-carlo --payoff <expr>` - Simulate GBM paths and price a
//!   payoff expression
//! - `pricer check-payoff <expr>` - Compile a payoff expression only
//!
//! # Configuration
//!
//! `--config <file>` loads TOML settings; `PRICER_*` environment variables
//! override the file and command-line flags override both.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

use commands::binomial::BinomialArgs;
use commands::monte_carlo::MonteCarloArgs;
use config::{CliConfig, CliOverrides, OutputFormat};
pub use error::{CliError, Result};

/// Option pricing with a binomial lattice and Monte Carlo simulation
#[derive(Parser)]
#[command(name = "pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European or American option on a CRR binomial lattice
    Binomial(BinomialArgs),

    /// Price a payoff expression by Monte Carlo simulation
    MonteCarlo(MonteCarloArgs),

    /// Validate a payoff expression without pricing
    CheckPayoff {
        /// Payoff expression, e.g. "max(price - 100, 0)"
        expression: String,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let (seed, parallel) = match &self.command {
            Commands::MonteCarlo(args) => (args.seed, args.parallel),
            _ => (None, false),
        };
        CliOverrides {
            format: self.format,
            seed,
            parallel,
        }
    }
}

/// Initialise tracing on stderr
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` wins over the configured
/// level.
fn init_tracing(verbose: bool, config: &CliConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str()))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::build_config(cli.config.as_deref(), &cli.overrides())
        .context("failed to load configuration")?;

    init_tracing(cli.verbose, &config);
    debug!(?config, "Configuration loaded");

    match &cli.command {
        Commands::Binomial(args) => {
            commands::binomial::run(args, &config).context("binomial pricing failed")
        }
        Commands::MonteCarlo(args) => {
            commands::monte_carlo::run(args, &config).context("Monte Carlo pricing failed")
        }
        Commands::CheckPayoff { expression } => {
            commands::check_payoff::run(expression, &config).context("payoff check failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_binomial() {
        let cli = Cli::try_parse_from([
            "pricer",
            "binomial",
            "--strike",
            "110",
            "--option-type",
            "put",
            "--american",
            "--dividend",
            "0.02",
        ])
        .unwrap();

        match cli.command {
            Commands::Binomial(args) => {
                assert_eq!(args.strike, 110.0);
                assert_eq!(args.spot, 100.0);
                assert_eq!(args.steps, 50);
                assert_eq!(args.option_type, "put");
                assert!(args.american);
                assert_eq!(args.dividend, 0.02);
            }
            _ => panic!("expected binomial"),
        }
    }

    #[test]
    fn test_parse_monte_carlo_with_globals() {
        let cli = Cli::try_parse_from([
            "pricer",
            "monte-carlo",
            "--payoff",
            "max(price - 100, 0)",
            "--seed",
            "9",
            "--parallel",
            "--format",
            "json",
            "--spot",
            "-1",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.seed, Some(9));
        assert!(overrides.parallel);
        assert_eq!(overrides.format, Some(OutputFormat::Json));

        match cli.command {
            Commands::MonteCarlo(args) => {
                assert_eq!(args.paths, 10_000);
                assert_eq!(args.spot, -1.0);
            }
            _ => panic!("expected monte-carlo"),
        }
    }

    #[test]
    fn test_payoff_is_required() {
        assert!(Cli::try_parse_from(["pricer", "monte-carlo"]).is_err());
    }

    #[test]
    fn test_parse_check_payoff() {
        let cli = Cli::try_parse_from(["pricer", "check-payoff", "path[-1]"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::CheckPayoff { ref expression } if expression == "path[-1]"
        ));
        assert!(cli.overrides().seed.is_none());
    }
}
