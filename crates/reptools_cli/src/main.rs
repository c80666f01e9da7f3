//! `repindex` entry point.
//!
//! # Responsibility
//! - Walk proposal sources, apply the abort/skip policy and write REP 0.
//! - Keep all metadata rules in `reptools_core`.

mod cli;
mod scan;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
