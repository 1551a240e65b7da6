use discrete::{DiscreteDistribution, DiscreteMethod, Result};

use crate::{
    PoissonTable,
    engine::{Engine, PoissonSampler},
};

/// Caches the sampling structure of a Poisson distribution and rebuilds it only when lambda
/// changes, as computing the table and allocating its buffers takes time.
///
/// The manager exclusively owns its distribution, so it can be moved but not cloned.
#[derive(Debug, Default)]
pub struct PoissonManager {
    method: DiscreteMethod,
    lambda: f64,
    distribution: DiscreteDistribution,
}

impl PoissonManager {
    /// Create an empty manager using the alias method.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manager using the given sampling method.
    pub fn with_method(method: DiscreteMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Update lambda, rebuilding the distribution if it differs from the current one.
    ///
    /// The comparison is exact. On error the manager keeps its previous lambda and distribution.
    pub fn set_lambda(&mut self, lambda: f64) -> Result<()> {
        if self.lambda == lambda {
            tracing::trace!(lambda, "poisson table unchanged");
            return Ok(());
        }

        let distribution = PoissonTable::new(lambda)
            .and_then(|table| table.to_distribution(self.method))
            .inspect_err(|err| {
                tracing::debug!(lambda, error = %err, "failed to build poisson table");
            })?;
        tracing::debug!(
            lambda,
            previous = self.lambda,
            offset = distribution.offset(),
            size = distribution.size(),
            method = ?self.method,
            "poisson table rebuilt"
        );

        // The previous distribution is dropped here
        self.distribution = distribution;
        self.lambda = lambda;
        Ok(())
    }

    /// Release the distribution and reset lambda to zero.
    pub fn clear(&mut self) {
        self.distribution = DiscreteDistribution::default();
        self.lambda = 0.0;
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn method(&self) -> DiscreteMethod {
        self.method
    }

    pub fn distribution(&self) -> &DiscreteDistribution {
        &self.distribution
    }

    /// A sampler for the engine family `E`, borrowing the current distribution.
    pub fn sampler<E: Engine>(&self) -> PoissonSampler<'_, E> {
        PoissonSampler::new(&self.distribution)
    }
}
