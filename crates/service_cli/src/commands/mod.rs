//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands build a
//! serialisable report and hand it to [`emit`] for printing.

pub mod binomial;
pub mod check_payoff;
pub mod monte_carlo;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// Command output that can be printed as a table or JSON
pub trait Report: Serialize {
    /// Render as aligned, human-readable text
    fn render_table(&self) -> String;
}

/// Print a report on stdout in the requested format
pub fn emit<R: Report>(report: &R, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", report.render_table()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

/// Format a float list with fixed precision, e.g. `[100.0000, 101.2345]`
pub(crate) fn format_values(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{:.4}", v)).collect();
    format!("[{}]", items.join(", "))
}
