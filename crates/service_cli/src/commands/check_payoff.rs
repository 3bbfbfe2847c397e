//! Check-payoff command implementation
//!
//! Compiles a payoff expression without simulating anything. A rejected
//! expression is reported as an error with the offending fragment.

use pricer_models::compile_payoff;
use serde::Serialize;
use tracing::info;

use super::Report;
use crate::config::CliConfig;
use crate::Result;

/// Output of `pricer check-payoff`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckPayoffReport {
    pub expression: String,
    pub valid: bool,
    /// Whether the expression reads `path` rather than only `price`
    pub path_dependent: bool,
}

impl Report for CheckPayoffReport {
    fn render_table(&self) -> String {
        let kind = if self.path_dependent {
            "path-dependent"
        } else {
            "terminal-price only"
        };
        format!("Valid payoff expression ({}): {}", kind, self.expression)
    }
}

/// Compile `expression` and describe it
pub fn build_report(expression: &str) -> Result<CheckPayoffReport> {
    let payoff = compile_payoff(expression)?;
    Ok(CheckPayoffReport {
        expression: payoff.source().to_string(),
        valid: true,
        path_dependent: payoff.tree().uses_path(),
    })
}

/// Run the check-payoff command
pub fn run(expression: &str, config: &CliConfig) -> Result<()> {
    info!(expression, "Checking payoff expression");
    let report = build_report(expression)?;
    super::emit(&report, config.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;

    #[test]
    fn test_terminal_payoff() {
        let report = build_report("max(price - 100, 0)").unwrap();
        assert!(report.valid);
        assert!(!report.path_dependent);
        assert_eq!(
            report.render_table(),
            "Valid payoff expression (terminal-price only): max(price - 100, 0)"
        );
    }

    #[test]
    fn test_path_dependent_payoff() {
        let report = build_report("max(sum(path) / len(path) - 100, 0)").unwrap();
        assert!(report.path_dependent);
    }

    #[test]
    fn test_rejections_are_errors() {
        for source in ["import os", "price.__class__", "open('x')"] {
            let err = build_report(source).unwrap_err();
            assert!(matches!(err, CliError::Payoff(_)), "{}", source);
        }
    }
}
