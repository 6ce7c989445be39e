// Copyright (c) 2026 Joseph Verdicchio and btpe-count Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::counting::CountingSource;
use crate::sampler::BinomialSampler;
use crate::sweep::{probabilities_for, trial_sizes};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub trials: usize,
    pub min_n: u64,
    pub max_n: u64,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            min_n: 32,
            max_n: 1_048_576,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("trials must be greater than zero")]
    ZeroTrials,
    #[error("min_n must be greater than zero")]
    ZeroMinN,
    #[error("min_n ({min_n}) must not exceed max_n ({max_n})")]
    InvertedRange { min_n: u64, max_n: u64 },
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        if self.min_n == 0 {
            return Err(ConfigError::ZeroMinN);
        }
        if self.min_n > self.max_n {
            return Err(ConfigError::InvertedRange {
                min_n: self.min_n,
                max_n: self.max_n,
            });
        }
        Ok(())
    }
}

/// One `(n, p)` pair and the draw count of each repetition, in generation
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub n: u64,
    pub p: f64,
    pub counts: Vec<u32>,
}

impl CaseResult {
    pub fn mean_count(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let total: u64 = self.counts.iter().map(|&c| u64::from(c)).sum();
        total as f64 / self.counts.len() as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub cases: usize,
    pub samples: usize,
}

/// Samples `B(n, p)` `trials` times, resetting the counter before each
/// repetition and recording how many draws it took.
pub fn run_case<R: rand::RngCore>(
    source: &mut CountingSource<R>,
    sampler: &mut dyn BinomialSampler,
    n: u64,
    p: f64,
    trials: usize,
) -> anyhow::Result<Vec<u32>> {
    let mut counts = Vec::with_capacity(trials);
    for _ in 0..trials {
        source.reset();
        sampler.sample(n, p, source)?;
        counts.push(source.count());
    }
    Ok(counts)
}

/// Runs the whole grid with one seeded source and hands every finished case
/// to `emit` in sweep order.
///
/// Any sampler or sink failure aborts the run.
pub fn run_sweep<F>(
    cfg: &SweepConfig,
    sampler: &mut dyn BinomialSampler,
    mut emit: F,
) -> anyhow::Result<SweepSummary>
where
    F: FnMut(&CaseResult) -> anyhow::Result<()>,
{
    cfg.validate()?;

    let mut source = CountingSource::seeded(cfg.seed);
    let mut summary = SweepSummary::default();

    for n in trial_sizes(cfg.min_n, cfg.max_n) {
        let probabilities = probabilities_for(n);
        tracing::info!(n, cases = probabilities.len(), "sweeping trial size");

        for p in probabilities {
            let counts = run_case(&mut source, sampler, n, p, cfg.trials)
                .with_context(|| format!("sampling case n={n} p={p}"))?;
            let case = CaseResult { n, p, counts };
            tracing::debug!(n, p, mean = case.mean_count(), "case finished");

            emit(&case).with_context(|| format!("emitting case n={n} p={p}"))?;
            summary.cases += 1;
            summary.samples += case.counts.len();
        }
    }

    Ok(summary)
}
