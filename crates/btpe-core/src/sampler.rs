// Copyright (c) 2026 Joseph Verdicchio and btpe-count Contributors
// SPDX-License-Identifier: Apache-2.0

//! Seam between the harness and the binomial sampler under study.

use rand::RngCore;
use rand_distr::{Binomial, Distribution};

use crate::counting::UniformSource;

/// A binomial variate generator that takes its entropy from a
/// [`UniformSource`].
///
/// Implementations must request every fractional value through
/// `next_unit`/`next_bounded`, otherwise the draw counts are meaningless.
pub trait BinomialSampler {
    fn sample(&mut self, n: u64, p: f64, source: &mut dyn UniformSource) -> anyhow::Result<u64>;
}

/// The BTPE implementation from `rand_distr`.
///
/// `rand_distr` switches to inversion when `n * min(p, 1 - p) < 10`; the
/// sweep starts at `p = 10/n` so every tested case takes the BTPE branch.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandDistrBtpe;

impl BinomialSampler for RandDistrBtpe {
    fn sample(&mut self, n: u64, p: f64, source: &mut dyn UniformSource) -> anyhow::Result<u64> {
        let dist = Binomial::new(n, p)
            .map_err(|e| anyhow::anyhow!("invalid binomial parameters n={n} p={p}: {e}"))?;
        Ok(dist.sample(&mut UnitDraws::new(source)))
    }
}

/// Presents a [`UniformSource`] as a `rand` generator.
///
/// `rand` builds each `f64` from the top 53 bits of one `next_u64` word, so
/// `next_u64` is backed by exactly one `next_unit` draw, shifted back into
/// those bits. The conversion is lossless for values on the 2^-53 grid.
/// Everything else is served from `next_integer` and stays uncounted.
pub struct UnitDraws<'a> {
    source: &'a mut dyn UniformSource,
}

impl<'a> UnitDraws<'a> {
    pub fn new(source: &'a mut dyn UniformSource) -> Self {
        Self { source }
    }
}

const UNIT_BITS: u32 = 53;

fn unit_to_word(u: f64) -> u64 {
    let mantissa = (u * (1u64 << UNIT_BITS) as f64) as u64;
    mantissa << (64 - UNIT_BITS)
}

impl RngCore for UnitDraws<'_> {
    fn next_u32(&mut self) -> u32 {
        (self.source.next_integer() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        unit_to_word(self.source.next_unit())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.source.next_integer().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::CountingSource;
    use rand::Rng;

    #[test]
    fn unit_values_survive_the_word_round_trip() {
        let mut source = CountingSource::seeded(3);
        for _ in 0..256 {
            let u = source.next_unit();
            let word = unit_to_word(u);
            let mut replay = rand::rngs::mock::StepRng::new(word, 0);
            let back: f64 = replay.gen();
            assert_eq!(back, u);
        }
    }

    #[test]
    fn rand_f64_draws_are_counted_once_each() {
        let mut source = CountingSource::seeded(11);
        {
            let mut rng = UnitDraws::new(&mut source);
            for _ in 0..10 {
                let _: f64 = rng.gen();
            }
            let _ = rng.gen_range(0.0..4.0);
        }
        assert_eq!(source.count(), 11);
    }

    #[test]
    fn integer_side_channel_is_uncounted() {
        let mut source = CountingSource::seeded(11);
        {
            let mut rng = UnitDraws::new(&mut source);
            let _ = rng.next_u32();
            let mut buf = [0u8; 13];
            rng.fill_bytes(&mut buf);
        }
        assert_eq!(source.count(), 0);
    }

    #[test]
    fn btpe_sample_is_in_range_and_draws_entropy() {
        let mut source = CountingSource::seeded(42);
        let mut sampler = RandDistrBtpe;
        for _ in 0..100 {
            source.reset();
            let x = sampler
                .sample(1_024, 0.25, &mut source)
                .expect("valid parameters");
            assert!(x <= 1_024);
            assert!(source.count() >= 2, "BTPE draws at least a (u, v) pair");
        }
    }

    #[test]
    fn invalid_probability_is_an_error() {
        let mut source = CountingSource::seeded(42);
        let mut sampler = RandDistrBtpe;
        assert!(sampler.sample(64, 1.5, &mut source).is_err());
        assert!(sampler.sample(64, -0.1, &mut source).is_err());
        assert!(sampler.sample(64, f64::NAN, &mut source).is_err());
    }
}
