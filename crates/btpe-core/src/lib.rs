// Copyright (c) 2026 Joseph Verdicchio and btpe-count Contributors
// SPDX-License-Identifier: Apache-2.0

//! btpe-core
//!
//! Harness for measuring how many uniform draws a BTPE binomial sampler
//! consumes per variate, over a doubling grid of trial sizes and a
//! symmetric grid of success probabilities.

pub mod counting;
pub mod experiment;
pub mod report;
pub mod sampler;
pub mod sweep;

pub use counting::{CountingSource, UniformSource};
pub use experiment::{run_case, run_sweep, CaseResult, ConfigError, SweepConfig, SweepSummary};
pub use report::{parse_text, OutputFormat, PlainOrScientific, ReportError, ReportWriter};
pub use sampler::{BinomialSampler, RandDistrBtpe, UnitDraws};
pub use sweep::{probabilities_for, trial_sizes};
