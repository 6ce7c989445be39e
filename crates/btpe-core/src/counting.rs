// Copyright (c) 2026 Joseph Verdicchio and btpe-count Contributors
// SPDX-License-Identifier: Apache-2.0

//! Uniform entropy capability and the counting decorator around it.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Entropy a binomial sampler may request.
///
/// Only the fractional draws (`next_unit`, `next_bounded`) are part of the
/// per-sample cost being measured; `next_integer` is a side channel some
/// samplers use for bookkeeping.
pub trait UniformSource {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[0, bound)`. `bound` must be positive and finite.
    fn next_bounded(&mut self, bound: f64) -> f64;

    fn next_integer(&mut self) -> u64;
}

/// Wraps a generator and counts the fractional draws served since the last
/// [`reset`](CountingSource::reset).
///
/// The wrapped generator is never reseeded, so consecutive repetitions read
/// from one continuous stream.
#[derive(Debug, Clone)]
pub struct CountingSource<R> {
    inner: R,
    count: u32,
}

impl CountingSource<ChaCha20Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> CountingSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl<R: RngCore> UniformSource for CountingSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.count += 1;
        self.inner.gen::<f64>()
    }

    fn next_bounded(&mut self, bound: f64) -> f64 {
        debug_assert!(bound > 0.0 && bound.is_finite(), "bound must be positive");
        self.count += 1;
        let r = self.inner.gen::<f64>() * bound;
        if r < bound {
            r
        } else {
            // rounding landed on the bound itself; step down one ulp
            f64::from_bits(bound.to_bits() - 1)
        }
    }

    fn next_integer(&mut self) -> u64 {
        self.inner.next_u64()
    }
}
