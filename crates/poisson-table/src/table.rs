//! Truncated Poisson probability tables.

use discrete::{DiscreteDistribution, DiscreteMethod, Error, Result};
use statrs::function::gamma::ln_gamma;

/// Probabilities below this value are treated as zero and trimmed from the table.
pub const NEGLIGIBLE_PROBABILITY: f64 = 1e-12;

/// Half width of the table in units of standard deviation (`sqrt(lambda)`), before doubling.
pub const SPAN_STD_DEVS: f64 = 16.0;

/// Number of entries allocated before trimming for the given `lambda`.
///
/// Returns zero for non-positive or non-finite `lambda`, and saturates at `usize::MAX`.
pub fn capacity(lambda: f64) -> usize {
    if !(lambda > 0.0 && lambda.is_finite()) {
        return 0;
    }
    ((SPAN_STD_DEVS * (2.0 + lambda.sqrt())) as usize).saturating_mul(2)
}

/// Probabilities of a Poisson distribution over the window `[offset, offset + len)`, where all
/// outcomes outside of the window have negligible probability.
///
/// The probabilities are not normalized.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "bitcode", derive(bitcode::Encode, bitcode::Decode))]
pub struct PoissonTable {
    probabilities: Vec<f64>,
    offset: i64,
}

impl PoissonTable {
    /// Compute the table for `lambda`.
    ///
    /// `lambda` must be positive and finite, otherwise the table is empty. Fails if the mode does
    /// not fit in `u32` outcomes, or if the buffer can not be allocated.
    pub fn new(lambda: f64) -> Result<Self> {
        Self::with_threshold(lambda, NEGLIGIBLE_PROBABILITY)
    }

    /// Compute the table, dropping tails whose probabilities are below `epsilon`.
    pub(crate) fn with_threshold(lambda: f64, epsilon: f64) -> Result<Self> {
        let capacity = capacity(lambda);
        if capacity == 0 {
            return Ok(Self::default());
        }

        let half = capacity / 2;
        if lambda.floor() > u32::MAX as f64 {
            return Err(Error::OutOfRange {
                offset: (lambda.floor() as i64).saturating_sub(half as i64),
                size: capacity,
            });
        }
        let left = lambda.floor() as i64 - half as i64;
        let log_lambda = lambda.ln();
        let pmf = |i: usize| {
            let x = (left + i as i64) as f64;
            // Gamma has poles at non-positive integers, so the mass there is exactly zero.
            if x < 0.0 {
                0.0
            } else {
                (x * log_lambda - ln_gamma(x + 1.0) - lambda).exp()
            }
        };

        // Only a thin band around the mode has non-negligible mass, so scan outwards from the
        // mode in both directions and stop at the first negligible value.
        let mut p = Vec::new();
        p.try_reserve_exact(capacity)
            .map_err(|_| Error::Allocation(capacity))?;
        p.resize(capacity, 0.0);

        let mut lo = 0;
        for i in (0..=half).rev() {
            let pp = pmf(i);
            if pp < epsilon {
                lo = i + 1;
                break;
            }
            p[i] = pp;
        }

        let mut hi = capacity - 1;
        for i in half + 1..capacity {
            let pp = pmf(i);
            if pp < epsilon {
                hi = i - 1;
                break;
            }
            p[i] = pp;
        }

        p.truncate(hi + 1);
        p.drain(..lo);

        Ok(Self {
            probabilities: p,
            offset: left + lo as i64,
        })
    }

    /// The outcome of the first probability.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// `probabilities()[i]` is the probability of outcome `offset() + i`.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Sum of all kept probabilities.
    pub fn total_mass(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Build a sampling structure from this table.
    pub fn to_distribution(&self, method: DiscreteMethod) -> Result<DiscreteDistribution> {
        DiscreteDistribution::new(method, &self.probabilities, self.offset)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn exact_pmf(lambda: f64, k: i64) -> f64 {
        (k as f64 * lambda.ln() - ln_gamma(k as f64 + 1.0) - lambda).exp()
    }

    #[test]
    fn test_capacity() {
        assert_eq!(capacity(10.0), 164);
        assert_eq!(capacity(0.5), 86);
        assert_eq!(capacity(100.0), 384);
        assert_eq!(capacity(1e-9), 64);
        assert_eq!(capacity(0.0), 0);
        assert_eq!(capacity(-1.0), 0);
        assert_eq!(capacity(f64::NAN), 0);
        assert_eq!(capacity(f64::INFINITY), 0);
    }

    #[test]
    fn test_lambda_10() {
        let table = PoissonTable::new(10.0).unwrap();
        assert_eq!(table.offset(), 0);
        assert_eq!(table.len(), 40);
        assert!(table.probabilities().iter().all(|&p| p >= NEGLIGIBLE_PROBABILITY));
        // The first outcome after the window is negligible
        assert!(exact_pmf(10.0, 40) < NEGLIGIBLE_PROBABILITY);
        for (i, &p) in table.probabilities().iter().enumerate() {
            assert!((p - exact_pmf(10.0, i as i64)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_lambda_half() {
        let table = PoissonTable::new(0.5).unwrap();
        assert_eq!(table.offset(), 0);
        assert_eq!(table.len(), 12);
        assert!((table.probabilities()[0] - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_lambda_100() {
        let table = PoissonTable::new(100.0).unwrap();
        assert_eq!(table.offset(), 39);
        assert_eq!(table.len(), 139);
        assert!(exact_pmf(100.0, 38) < NEGLIGIBLE_PROBABILITY);
        assert!(exact_pmf(100.0, 39 + 139) < NEGLIGIBLE_PROBABILITY);
    }

    #[test]
    fn test_large_lambda_trimmed_on_both_sides() {
        let lambda = 1e4;
        let table = PoissonTable::new(lambda).unwrap();
        assert!(table.offset() > 0);
        assert!(table.len() < capacity(lambda));
        let mode = lambda as i64 - table.offset();
        assert!(0 < mode && (mode as usize) < table.len());
    }

    #[test]
    fn test_tiny_lambda() {
        let table = PoissonTable::new(1e-9).unwrap();
        assert_eq!(table.offset(), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_window_invariants() {
        for lambda in [1e-6, 0.01, 0.5, 1.0, 2.5, 10.0, 33.3, 100.0, 1234.5, 1e5] {
            let table = PoissonTable::new(lambda).unwrap();
            assert!(!table.is_empty());
            assert!(table.len() <= capacity(lambda));
            assert!(table.offset() >= 0);
            let tails = NEGLIGIBLE_PROBABILITY * capacity(lambda) as f64;
            let mass = table.total_mass();
            assert!(mass <= 1.0 + 1e-6 && mass >= 1.0 - tails - 1e-6, "{lambda}: {mass}");
        }
    }

    #[test]
    fn test_unimodal() {
        let table = PoissonTable::new(42.5).unwrap();
        let p = table.probabilities();
        let mode = p
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(p[..=mode].windows(2).all(|w| w[0] <= w[1]));
        assert!(p[mode..].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_threshold_never_crossed() {
        let lambda = 3.0;
        let table = PoissonTable::with_threshold(lambda, 0.0).unwrap();
        assert_eq!(table.len(), capacity(lambda));
        assert_eq!(table.offset(), 3 - capacity(lambda) as i64 / 2);
        // Entries left of zero are kept as zeros and clamped by the distribution builder
        let left = (-table.offset()) as usize;
        assert!(table.probabilities()[..left].iter().all(|&p| p == 0.0));
        let dist = table.to_distribution(DiscreteMethod::Alias).unwrap();
        assert_eq!(dist.offset(), 0);
        assert_eq!(dist.size(), capacity(lambda) - left);
    }

    #[test]
    fn test_invalid_lambda() {
        for lambda in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let table = PoissonTable::new(lambda).unwrap();
            assert!(table.is_empty());
            assert_eq!(
                table.to_distribution(DiscreteMethod::Alias).unwrap_err(),
                discrete::Error::Empty
            );
        }
    }

    #[test]
    fn test_to_distribution() {
        let table = PoissonTable::new(10.0).unwrap();
        let dist = table.to_distribution(DiscreteMethod::Cdf).unwrap();
        assert_eq!(dist.offset(), 0);
        assert_eq!(dist.size(), table.len());
        let sum: f64 = dist.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_huge_lambda() {
        for lambda in [1e10, 1e30, 1e40, f64::MAX] {
            assert!(capacity(lambda) > 0);
            assert!(matches!(
                PoissonTable::new(lambda),
                Err(Error::OutOfRange { .. })
            ));
        }
        assert_eq!(capacity(1e40), usize::MAX);
    }

    #[test]
    fn test_largest_lambda_in_range() {
        let lambda = 4e9;
        let table = PoissonTable::new(lambda).unwrap();
        assert!(table.offset() > 0);
        assert!(table.len() < capacity(lambda));
        table.to_distribution(DiscreteMethod::Alias).unwrap();
    }
}
