#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Discrete distributions over a window of `u32` outcomes, sampled in O(1) from a single uniform
//! `u32`.
//!
//! The probabilities are given for consecutive outcomes `offset, offset + 1, ...` and are
//! normalized on construction. The resulting table is immutable and can be shared across threads.

mod alias;

mod error;
pub use error::{Error, Result};

/// `2^-32`, maps a `u32` onto `[0, 1)`.
const INV_2POW32: f64 = 1.0 / 4294967296.0;

/// The algorithm used to turn a uniform number into an outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DiscreteMethod {
    /// Walker's alias method, O(1) per sample.
    #[default]
    Alias,
    /// Binary search over the cumulative distribution, O(log n) per sample.
    Cdf,
}

#[derive(Debug, Default)]
enum Table {
    #[default]
    Empty,
    Alias {
        threshold: Box<[f64]>,
        alias: Box<[u32]>,
    },
    Cdf {
        cdf: Box<[f64]>,
    },
}

/// A discrete distribution over `[offset, offset + size)`.
///
/// This type owns its tables and is intentionally not `Clone`.
#[derive(Debug, Default)]
pub struct DiscreteDistribution {
    method: DiscreteMethod,
    offset: u32,
    probabilities: Box<[f64]>,
    table: Table,
}

impl DiscreteDistribution {
    /// Build a distribution from (not necessarily normalized) probabilities of the outcomes
    /// starting at `offset`.
    ///
    /// A negative `offset` is clamped to zero by dropping the leading entries that would map to
    /// negative outcomes.
    pub fn new(method: DiscreteMethod, probabilities: &[f64], offset: i64) -> Result<Self> {
        if let Some((index, &value)) = probabilities
            .iter()
            .enumerate()
            .find(|&(_, p)| !(p.is_finite() && *p >= 0.0))
        {
            return Err(Error::InvalidProbability { index, value });
        }

        let skip = usize::try_from(offset.min(0).unsigned_abs()).unwrap_or(usize::MAX);
        let kept = probabilities.get(skip..).unwrap_or_default();
        if kept.is_empty() {
            return Err(Error::Empty);
        }

        let first = offset.max(0);
        let last = first.saturating_add(kept.len() as i64 - 1);
        if last > u32::MAX as i64 {
            return Err(Error::OutOfRange {
                offset: first,
                size: kept.len(),
            });
        }

        let total: f64 = kept.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(Error::ZeroMass(total));
        }
        let probabilities: Box<[f64]> = kept.iter().map(|&p| p / total).collect();

        let table = match method {
            DiscreteMethod::Alias => {
                let (threshold, alias) = alias::build(&probabilities);
                Table::Alias { threshold, alias }
            }
            DiscreteMethod::Cdf => {
                let mut acc = 0.0;
                let mut cdf: Box<[f64]> = probabilities
                    .iter()
                    .map(|&p| {
                        acc += p;
                        acc
                    })
                    .collect();
                // Guard the last bucket against rounding so that every x in [0, 1) is covered.
                if let Some(last) = cdf.last_mut() {
                    *last = 1.0;
                }
                Table::Cdf { cdf }
            }
        };

        Ok(Self {
            method,
            offset: first as u32,
            probabilities,
            table,
        })
    }

    /// Map a uniform `u32` to an outcome.
    ///
    /// The input is expected to cover the whole `[0, u32::MAX]` range uniformly.
    #[inline]
    pub fn sample(&self, u: u32) -> u32 {
        let x = u as f64 * INV_2POW32;
        let index = match &self.table {
            Table::Empty => return self.offset,
            Table::Alias { threshold, alias } => {
                let n = threshold.len();
                let nx = n as f64 * x;
                let i = (nx as usize).min(n - 1);
                let y = nx - i as f64;
                if y < threshold[i] { i as u32 } else { alias[i] }
            }
            Table::Cdf { cdf } => {
                let i = cdf.partition_point(|&c| c <= x);
                i.min(cdf.len() - 1) as u32
            }
        };
        self.offset + index
    }

    pub fn method(&self) -> DiscreteMethod {
        self.method
    }

    /// The first outcome of the window.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of outcomes in the window.
    pub fn size(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Normalized probabilities of the outcomes in the window.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Normalized probability of `outcome`, zero outside the window.
    pub fn probability(&self, outcome: u32) -> f64 {
        outcome
            .checked_sub(self.offset)
            .and_then(|i| self.probabilities.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }
}

impl rand::distr::Distribution<u32> for DiscreteDistribution {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        DiscreteDistribution::sample(self, rng.next_u32())
    }
}
