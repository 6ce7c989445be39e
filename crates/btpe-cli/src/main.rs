// Copyright (c) 2026 Joseph Verdicchio and btpe-count Contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

use std::{
    fs,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context;
use btpe_core::{run_sweep, OutputFormat, RandDistrBtpe, ReportWriter, SweepConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Every flag is an opt-in override. Run bare, the binary sweeps the
/// published grid (10000 trials, n = 32..=1048576, seed 42) and prints the
/// text stream.
#[derive(Debug, Parser)]
#[command(name = "btpe-count")]
#[command(about = "Count the uniform draws BTPE consumes per binomial variate")]
struct Args {
    /// JSON sweep configuration; flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    trials: Option<usize>,
    #[arg(long)]
    min_n: Option<u64>,
    #[arg(long)]
    max_n: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    #[arg(long, default_value = "warn")]
    log: String,
}

fn load_config(path: &Path) -> anyhow::Result<SweepConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse config {}", path.display()))
}

fn resolve_config(args: &Args) -> anyhow::Result<SweepConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => SweepConfig::default(),
    };
    if let Some(trials) = args.trials {
        cfg.trials = trials;
    }
    if let Some(min_n) = args.min_n {
        cfg.min_n = min_n;
    }
    if let Some(max_n) = args.max_n {
        cfg.max_n = max_n;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(io::stderr)
        .init();

    let cfg = resolve_config(&args)?;
    tracing::info!(?cfg, format = ?args.format, "starting sweep");

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(BufWriter::new(stdout.lock()), args.format);
    let summary = run_sweep(&cfg, &mut RandDistrBtpe, |case| writer.write_case(case))?;
    writer.finish()?;

    tracing::info!(cases = summary.cases, samples = summary.samples, "sweep complete");
    Ok(())
}
