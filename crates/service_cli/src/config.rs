//! CLI configuration management
//!
//! Handles loading configuration from a TOML file, `PRICER_*` environment
//! variables and command-line flags.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file
//! 4. Default values

use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use pricer_pricing::mc::{DEFAULT_CHUNK_SIZE, MAX_PATHS, MAX_STEPS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error, PartialEq)]
pub enum CliConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable {name}: cannot parse '{value}'")]
    EnvError { name: &'static str, value: String },

    #[error("Invalid limit {name} = {value}: must be in range [1, {max}]")]
    InvalidLimit {
        name: &'static str,
        value: usize,
        max: usize,
    },
}

/// Log levels accepted in the config file and `PRICER_LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable aligned text
    #[default]
    Table,
    /// Pretty-printed JSON on stdout
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CliConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Log level when `RUST_LOG` is unset
    pub log_level: LogLevel,
    /// Output format
    pub format: OutputFormat,
    /// Monte Carlo seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Run Monte Carlo chunks on the rayon pool
    pub parallel: bool,
    /// Paths per Monte Carlo chunk
    pub chunk_size: usize,
    /// Largest accepted step count
    pub max_steps: usize,
    /// Largest accepted path count
    pub max_paths: usize,
    /// Number of simulated paths echoed in the output
    pub sample_paths: usize,
    /// Number of payoffs echoed in the output
    pub sample_payoffs: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            format: OutputFormat::Table,
            seed: None,
            parallel: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_steps: MAX_STEPS,
            max_paths: MAX_PATHS,
            sample_paths: 3,
            sample_payoffs: 5,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CliConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, CliConfigError> {
        let config: CliConfig = toml::from_str(content)
            .map_err(|e| CliConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PRICER_*` overrides read through `lookup`
    ///
    /// Recognised: `PRICER_LOG_LEVEL`, `PRICER_SEED`, `PRICER_MAX_PATHS`,
    /// `PRICER_MAX_STEPS`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), CliConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("PRICER_LOG_LEVEL") {
            self.log_level = level.parse()?;
        }
        if let Some(seed) = lookup("PRICER_SEED") {
            self.seed = Some(parse_env("PRICER_SEED", &seed)?);
        }
        if let Some(max_paths) = lookup("PRICER_MAX_PATHS") {
            self.max_paths = parse_env("PRICER_MAX_PATHS", &max_paths)?;
        }
        if let Some(max_steps) = lookup("PRICER_MAX_STEPS") {
            self.max_steps = parse_env("PRICER_MAX_STEPS", &max_steps)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if cli.parallel {
            self.parallel = true;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CliConfigError> {
        check_limit("chunk_size", self.chunk_size, MAX_PATHS)?;
        check_limit("max_steps", self.max_steps, MAX_STEPS)?;
        check_limit("max_paths", self.max_paths, MAX_PATHS)?;
        Ok(())
    }
}

/// Command-line values that override the configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    /// `--format`
    pub format: Option<OutputFormat>,
    /// `--seed`
    pub seed: Option<u64>,
    /// `--parallel`
    pub parallel: bool,
}

fn parse_env<T: FromStr>(name: &'static str, value: &str) -> Result<T, CliConfigError> {
    value.trim().parse().map_err(|_| CliConfigError::EnvError {
        name,
        value: value.to_string(),
    })
}

fn check_limit(name: &'static str, value: usize, max: usize) -> Result<(), CliConfigError> {
    if value == 0 || value > max {
        return Err(CliConfigError::InvalidLimit { name, value, max });
    }
    Ok(())
}

/// Build configuration from all sources
pub fn build_config(
    config_file: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<CliConfig, CliConfigError> {
    let mut config = match config_file {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    config.apply_env(|name| std::env::var(name).ok())?;
    config.merge_with_cli(overrides);
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.seed, None);
        assert!(!config.parallel);
        assert_eq!(config.max_steps, 10_000);
        assert_eq!(config.max_paths, 10_000_000);
        assert_eq!(config.sample_paths, 3);
        assert_eq!(config.sample_payoffs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CliConfig::from_toml(
            r#"
            log_level = "debug"
            format = "json"
            seed = 42
            sample_paths = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.sample_paths, 1);
        assert_eq!(config.sample_payoffs, 5);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_toml_errors() {
        assert!(matches!(
            CliConfig::from_toml("log_level = \"loud\""),
            Err(CliConfigError::FileError(_))
        ));
        assert!(matches!(
            CliConfig::from_toml("unknown_key = 1"),
            Err(CliConfigError::FileError(_))
        ));
        assert_eq!(
            CliConfig::from_toml("max_steps = 20000"),
            Err(CliConfigError::InvalidLimit {
                name: "max_steps",
                value: 20_000,
                max: MAX_STEPS
            })
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env(env(&[
                ("PRICER_LOG_LEVEL", "warn"),
                ("PRICER_SEED", "7"),
                ("PRICER_MAX_PATHS", "1000"),
                ("PRICER_MAX_STEPS", " 250 "),
            ]))
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_paths, 1_000);
        assert_eq!(config.max_steps, 250);
    }

    #[test]
    fn test_env_parse_error_names_variable() {
        let mut config = CliConfig::default();
        let err = config
            .apply_env(env(&[("PRICER_SEED", "abc")]))
            .unwrap_err();
        assert_eq!(
            err,
            CliConfigError::EnvError {
                name: "PRICER_SEED",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_cli_takes_precedence() {
        let mut config = CliConfig::from_toml("seed = 1\nformat = \"json\"").unwrap();
        config.apply_env(env(&[("PRICER_SEED", "2")])).unwrap();
        config.merge_with_cli(&CliOverrides {
            format: Some(OutputFormat::Table),
            seed: Some(3),
            parallel: true,
        });

        assert_eq!(config.seed, Some(3));
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.parallel);
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::from_file(Path::new("/nonexistent/pricer.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
