//! Pseudo-random normal draws for Monte Carlo simulation.
//!
//! This module provides [`NormalSource`], the one capability the simulation
//! engine needs from a random generator, and [`PricerRng`], its seeded
//! default implementation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Multiplier spreading chunk indices across the seed space.
const CHUNK_SEED_STRIDE: u64 = 6_364_136_223_846_793_005;

/// Supplier of independent standard normal variates.
///
/// The engine draws exactly `paths × steps` values, in path-major order, and
/// nothing before parameter validation succeeds. Tests rely on this to
/// instrument the source.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::NormalSource;
///
/// struct Constant(f64);
///
/// impl NormalSource for Constant {
///     fn next_normal(&mut self) -> f64 {
///         self.0
///     }
/// }
///
/// let mut source = Constant(0.5);
/// let mut buffer = [0.0; 3];
/// source.fill_normal(&mut buffer);
/// assert_eq!(buffer, [0.5; 3]);
/// ```
pub trait NormalSource {
    /// Next standard normal draw (mean 0, variance 1).
    fn next_normal(&mut self) -> f64;

    /// Fills `buffer` with consecutive draws.
    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_normal();
        }
    }
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }

    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        (**self).fill_normal(buffer)
    }
}

/// Monte Carlo simulation random number generator.
///
/// Wraps `StdRng` and samples normals with the Ziggurat algorithm via
/// `rand_distr::StandardNormal`. The seed is retained so every run can be
/// logged and replayed, including entropy-seeded ones.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{NormalSource, PricerRng};
///
/// let mut rng1 = PricerRng::from_seed(12345);
/// let mut rng2 = PricerRng::from_seed(12345);
///
/// // Same seed produces identical sequences
/// assert_eq!(rng1.next_normal(), rng2.next_normal());
/// ```
#[derive(Debug, Clone)]
pub struct PricerRng {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// The seed used for initialisation.
    seed: u64,
}

impl PricerRng {
    /// Creates a generator initialised with the given seed.
    ///
    /// The same seed always produces the same sequence.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a generator seeded from operating-system entropy.
    ///
    /// The drawn seed is kept and reported by [`seed`](Self::seed).
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    /// Creates the generator for chunk `index` of a run seeded with `seed`.
    ///
    /// Chunk 0 uses `seed` itself, so a one-chunk run matches
    /// [`from_seed`](Self::from_seed).
    ///
    /// ```rust
    /// use pricer_pricing::rng::PricerRng;
    ///
    /// assert_eq!(PricerRng::for_chunk(7, 0).seed(), 7);
    /// assert_ne!(PricerRng::for_chunk(7, 1).seed(), 7);
    /// ```
    #[inline]
    pub fn for_chunk(seed: u64, index: usize) -> Self {
        Self::from_seed(seed.wrapping_add((index as u64).wrapping_mul(CHUNK_SEED_STRIDE)))
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a single standard normal variate (mean=0, std=1).
    ///
    /// # Algorithm Reference
    ///
    /// Marsaglia, G. & Tsang, W. W. (2000). "The Ziggurat Method for
    /// Generating Random Variables". Journal of Statistical Software.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }
}

impl NormalSource for PricerRng {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        self.gen_normal()
    }

    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}
