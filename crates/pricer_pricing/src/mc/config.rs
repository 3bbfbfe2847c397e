//! Monte Carlo engine configuration.
//!
//! Market inputs, step and path counts travel in
//! [`PricingParameters`](pricer_core::types::PricingParameters); this module
//! holds the knobs that change how the paths are drawn, not what they model.

use super::error::ConfigError;

/// Ceiling for path counts accepted by front ends.
pub const MAX_PATHS: usize = 10_000_000;

/// Ceiling for time steps per path accepted by front ends.
pub const MAX_STEPS: usize = 10_000;

/// Default number of paths simulated per random stream.
pub const DEFAULT_CHUNK_SIZE: usize = 8_192;

/// Monte Carlo engine configuration.
///
/// Immutable once built. Use [`MonteCarloConfigBuilder`] to construct
/// instances.
///
/// # Chunking
///
/// Paths are split into consecutive chunks of `chunk_size`. Chunk `i` draws
/// from its own [`PricerRng`](crate::rng::PricerRng) seeded from
/// `(seed, i)`, and chunk outputs are merged in index order. The output for
/// a given seed is therefore identical whether or not `parallel` is set.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .seed(42)
///     .chunk_size(1_000)
///     .parallel(true)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.seed(), Some(42));
/// assert_eq!(config.chunk_size(), 1_000);
/// assert!(config.parallel());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloConfig {
    /// Optional seed for reproducibility; `None` draws one from entropy.
    seed: Option<u64>,
    /// Paths per random stream.
    chunk_size: usize,
    /// Run chunks on the rayon thread pool.
    parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallel: false,
        }
    }
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the optional seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the number of paths per random stream.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns whether chunks run in parallel.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChunkSize`] if `chunk_size` is 0 or
    /// greater than [`MAX_PATHS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_PATHS {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }

    /// Number of chunks needed for `n_paths` paths.
    #[inline]
    pub fn chunk_count(&self, n_paths: usize) -> usize {
        n_paths.div_ceil(self.chunk_size)
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// Unset fields take their defaults: no seed, [`DEFAULT_CHUNK_SIZE`],
/// sequential execution.
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    seed: Option<u64>,
    chunk_size: Option<usize>,
    parallel: bool,
}

impl MonteCarloConfigBuilder {
    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of paths per random stream.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Paths per chunk in [1, 10_000_000]
    #[inline]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Enables or disables parallel execution.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the chunk size is invalid.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let config = MonteCarloConfig {
            seed: self.seed,
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            parallel: self.parallel,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = MonteCarloConfig::builder().build().unwrap();

        assert_eq!(config, MonteCarloConfig::default());
        assert_eq!(config.seed(), None);
        assert_eq!(config.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert!(!config.parallel());
    }

    #[test]
    fn test_config_builder_with_seed() {
        let config = MonteCarloConfig::builder().seed(42).build().unwrap();
        assert_eq!(config.seed(), Some(42));

        let cleared = MonteCarloConfig::builder()
            .seed(42)
            .maybe_seed(None)
            .build()
            .unwrap();
        assert_eq!(cleared.seed(), None);
    }

    #[test]
    fn test_config_invalid_zero_chunk() {
        let result = MonteCarloConfig::builder().chunk_size(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidChunkSize(0))));
    }

    #[test]
    fn test_config_invalid_oversized_chunk() {
        let result = MonteCarloConfig::builder().chunk_size(MAX_PATHS + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidChunkSize(_))));
    }

    #[test]
    fn test_chunk_count() {
        let config = MonteCarloConfig::builder().chunk_size(100).build().unwrap();
        assert_eq!(config.chunk_count(1), 1);
        assert_eq!(config.chunk_count(100), 1);
        assert_eq!(config.chunk_count(101), 2);
        assert_eq!(config.chunk_count(1_000), 10);
    }
}
