//! Binomial command implementation
//!
//! Prices a vanilla option on a CRR lattice. European runs also report the
//! Black-Scholes value as a convergence reference.

use clap::Args;
use pricer_core::types::{OptionType, PricingParameters};
use pricer_models::analytical::BlackScholes;
use pricer_pricing::lattice::{price_binomial, LatticeConstants};
use serde::Serialize;
use tracing::info;

use super::Report;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Arguments of `pricer binomial`
#[derive(Debug, Clone, Args)]
pub struct BinomialArgs {
    /// Current underlying price
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub spot: f64,

    /// Strike price
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub strike: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub maturity: f64,

    /// Risk-free rate as a decimal
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    pub rate: f64,

    /// Volatility as a decimal
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    pub volatility: f64,

    /// Number of lattice steps
    #[arg(long, default_value_t = 50)]
    pub steps: usize,

    /// Option type (call or put)
    #[arg(long, default_value = "call")]
    pub option_type: String,

    /// Allow early exercise
    #[arg(long)]
    pub american: bool,

    /// Continuous dividend yield as a decimal
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub dividend: f64,
}

/// Output of `pricer binomial`
#[derive(Debug, Clone, Serialize)]
pub struct BinomialReport {
    pub option_type: OptionType,
    pub american: bool,
    pub steps: usize,
    pub price: f64,
    /// Closed-form value, European runs only
    pub black_scholes: Option<f64>,
    pub lattice: LatticeConstants,
}

impl Report for BinomialReport {
    fn render_table(&self) -> String {
        let style = if self.american { "American" } else { "European" };
        let mut out = format!(
            "{} {} price: {:.6}\n",
            style, self.option_type, self.price
        );
        if let Some(reference) = self.black_scholes {
            out.push_str(&format!("Black-Scholes reference: {:.6}\n", reference));
        }
        out.push_str(&format!(
            "Steps: {} | up: {:.6} | down: {:.6} | probability: {:.6} | discount: {:.6}",
            self.steps,
            self.lattice.up,
            self.lattice.down,
            self.lattice.probability,
            self.lattice.discount
        ));
        out
    }
}

/// Price the option described by `args`
pub fn build_report(args: &BinomialArgs, config: &CliConfig) -> Result<BinomialReport> {
    let option_type: OptionType = args.option_type.parse()?;
    CliError::check_limit("steps", args.steps, config.max_steps)?;

    let params = PricingParameters::new(
        args.spot,
        args.maturity,
        args.rate,
        args.volatility,
        args.steps,
    )
    .with_strike(args.strike);

    let result = price_binomial(&params, option_type, args.american, args.dividend)?;

    let black_scholes = if args.american {
        None
    } else {
        let model = BlackScholes::new(args.spot, args.rate, args.volatility)?
            .with_dividend(args.dividend)?;
        Some(model.price(option_type, args.strike, args.maturity))
    };

    Ok(BinomialReport {
        option_type,
        american: args.american,
        steps: result.steps(),
        price: result.price,
        black_scholes,
        lattice: result.constants,
    })
}

/// Run the binomial command
pub fn run(args: &BinomialArgs, config: &CliConfig) -> Result<()> {
    info!(
        spot = args.spot,
        strike = args.strike,
        steps = args.steps,
        option_type = %args.option_type,
        american = args.american,
        "Pricing on binomial lattice"
    );

    let report = build_report(args, config)?;
    super::emit(&report, config.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::ValidationError;
    use pricer_pricing::lattice::LatticeError;

    fn args() -> BinomialArgs {
        BinomialArgs {
            spot: 100.0,
            strike: 100.0,
            maturity: 1.0,
            rate: 0.05,
            volatility: 0.2,
            steps: 50,
            option_type: "call".to_string(),
            american: false,
            dividend: 0.0,
        }
    }

    #[test]
    fn test_european_report_has_reference() {
        let report = build_report(&args(), &CliConfig::default()).unwrap();
        assert_relative_eq!(report.price, 10.410691540732644, epsilon = 1e-9);
        assert_relative_eq!(report.black_scholes.unwrap(), 10.450583572185565, epsilon = 1e-9);
        assert_eq!(report.steps, 50);

        let table = report.render_table();
        assert!(table.starts_with("European call price: 10.410692"));
        assert!(table.contains("Black-Scholes reference: 10.450584"));
    }

    #[test]
    fn test_american_report_has_no_reference() {
        let american = BinomialArgs {
            american: true,
            option_type: "PUT".to_string(),
            ..args()
        };
        let report = build_report(&american, &CliConfig::default()).unwrap();
        assert_eq!(report.black_scholes, None);
        assert_eq!(report.option_type, OptionType::Put);
        assert!(report.render_table().starts_with("American put"));
    }

    #[test]
    fn test_unknown_option_type() {
        let bad = BinomialArgs {
            option_type: "straddle".to_string(),
            ..args()
        };
        assert!(matches!(
            build_report(&bad, &CliConfig::default()),
            Err(CliError::Validation(ValidationError::UnknownOptionType(_)))
        ));
    }

    #[test]
    fn test_errors_surface() {
        let zero_vol = BinomialArgs {
            volatility: 0.0,
            ..args()
        };
        assert!(matches!(
            build_report(&zero_vol, &CliConfig::default()),
            Err(CliError::Lattice(LatticeError::Arbitrage { .. }))
        ));

        let config = CliConfig {
            max_steps: 10,
            ..CliConfig::default()
        };
        assert!(matches!(
            build_report(&args(), &config),
            Err(CliError::LimitExceeded { name: "steps", .. })
        ));
    }

    #[test]
    fn test_json_shape() {
        let report = build_report(&args(), &CliConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["option_type"], "call");
        assert_eq!(json["american"], false);
        assert!(json["lattice"]["probability"].is_f64());
    }
}
