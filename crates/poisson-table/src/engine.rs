//! Glue between the raw output of uniform bit generators and a Poisson sampling structure.

use std::marker::PhantomData;

use discrete::DiscreteDistribution;
use rayon::prelude::*;

/// A family of uniform bit generators, described by the range of its raw `u32` output.
///
/// Alias sampling assumes the input covers `[0, u32::MAX]` uniformly. Engines with a narrower
/// output range would bias the result, making some outcomes unreachable, so their output is
/// remapped first.
pub trait Engine {
    const NAME: &'static str;

    /// Map one raw output onto `[0, u32::MAX]`.
    fn remap(raw: u32) -> u32;
}

/// Engines whose raw output already covers the whole `u32` range (Philox, XORWOW, MTGP, and any
/// [`rand::RngCore`]).
#[derive(Clone, Copy, Debug, Default)]
pub struct FullRange;

impl Engine for FullRange {
    const NAME: &'static str = "full-range";

    #[inline]
    fn remap(raw: u32) -> u32 {
        raw
    }
}

/// Remap the output of an MRG engine with modulus `m1` from `[1, m1]` to `[0, u32::MAX]`.
///
/// Zero is outside the raw range and maps to zero like `1`.
#[inline]
fn mrg_remap(raw: u32, m1: u32) -> u32 {
    let norm = u32::MAX as f64 / (m1 - 1) as f64;
    (raw.saturating_sub(1) as f64 * norm) as u32
}

/// L'Ecuyer's MRG32k3a, raw output in `[1, 4294967087]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mrg32k3a;

impl Mrg32k3a {
    pub const M1: u32 = 4294967087;
}

impl Engine for Mrg32k3a {
    const NAME: &'static str = "mrg32k3a";

    #[inline]
    fn remap(raw: u32) -> u32 {
        mrg_remap(raw, Self::M1)
    }
}

/// L'Ecuyer and Touzin's MRG31k3p, raw output in `[1, 2147483647]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mrg31k3p;

impl Mrg31k3p {
    pub const M1: u32 = 2147483647;
}

impl Engine for Mrg31k3p {
    const NAME: &'static str = "mrg31k3p";

    #[inline]
    fn remap(raw: u32) -> u32 {
        mrg_remap(raw, Self::M1)
    }
}

/// Poisson sampler for the engine family `E`.
///
/// Each call consumes one raw output and produces one sample. The sampler only borrows the
/// distribution, so it can be copied freely into parallel workers.
#[derive(Debug)]
pub struct PoissonSampler<'a, E> {
    distribution: &'a DiscreteDistribution,
    _engine: PhantomData<fn() -> E>,
}

/// Sampler for MRG32k3a, the engine of the legacy MRG-only API.
pub type MrgPoissonSampler<'a> = PoissonSampler<'a, Mrg32k3a>;

impl<E> Clone for PoissonSampler<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for PoissonSampler<'_, E> {}

impl<'a, E: Engine> PoissonSampler<'a, E> {
    /// Number of raw outputs consumed per call.
    pub const INPUT_WIDTH: usize = 1;
    /// Number of samples produced per call.
    pub const OUTPUT_WIDTH: usize = 1;

    pub fn new(distribution: &'a DiscreteDistribution) -> Self {
        Self {
            distribution,
            _engine: PhantomData,
        }
    }

    pub fn distribution(&self) -> &'a DiscreteDistribution {
        self.distribution
    }

    #[inline]
    pub fn sample(&self, raw: u32) -> u32 {
        self.distribution.sample(E::remap(raw))
    }

    #[inline]
    pub fn apply(&self, input: &[u32; 1], output: &mut [u32; 1]) {
        output[0] = self.sample(input[0]);
    }

    /// Map every raw output in `input` to a sample in `output`, in parallel.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` have different lengths.
    pub fn generate(&self, input: &[u32], output: &mut [u32]) {
        assert_eq!(
            input.len(),
            output.len(),
            "input and output of {} sampler differ in length",
            E::NAME
        );
        output
            .par_iter_mut()
            .zip(input.par_iter())
            .for_each(|(out, &raw)| *out = self.sample(raw));
    }
}
