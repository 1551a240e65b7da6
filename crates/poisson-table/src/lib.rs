#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Poisson distributions for parallel random number pipelines.
//!
//! The probability mass function of `Poisson(lambda)` is truncated to the window of outcomes with
//! non-negligible mass, and turned into a [`DiscreteDistribution`] that maps one uniform `u32` to
//! one sample in O(1). [`PoissonManager`] caches the distribution across calls with the same
//! lambda, and [`PoissonSampler`] adapts the raw output of different engine families.
//!
//! ```
//! use poisson_table::prelude::*;
//!
//! let mut manager = PoissonManager::new();
//! manager.set_lambda(10.0).unwrap();
//!
//! let sampler = manager.sampler::<FullRange>();
//! let input = [0, u32::MAX / 2, u32::MAX];
//! let mut output = [0; 3];
//! sampler.generate(&input, &mut output);
//! assert!(output.iter().all(|&k| k < 40));
//! ```

pub mod engine;
mod manager;
mod table;

pub use discrete::{DiscreteDistribution, DiscreteMethod, Error, Result};
pub use manager::PoissonManager;
pub use table::{NEGLIGIBLE_PROBABILITY, PoissonTable, SPAN_STD_DEVS, capacity};

pub mod prelude {
    pub use super::{
        DiscreteDistribution, DiscreteMethod, PoissonManager, PoissonTable,
        engine::{Engine, FullRange, Mrg31k3p, Mrg32k3a, MrgPoissonSampler, PoissonSampler},
    };
}
