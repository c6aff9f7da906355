//! Retest System · exam paper generation and scoring
//!
//! - Question bank + student roster (TOML config or built-in seeds)
//! - One quota-constrained random paper per student at startup
//! - Console menu for roster display, score entry and lookups
//!
//! Important env variables:
//!   RETEST_CONFIG_PATH : path to TOML config (bank, roster, quotas, sampling, format)
//!   RETEST_SEED        : u64 seed for reproducible papers
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod catalog;
mod config;
mod console;
mod database;
mod domain;
mod error;
mod format;
mod generator;
mod logic;
mod pinyin;
mod protocol;
mod seeds;
mod state;
mod telemetry;
mod util;

use std::io;

use tracing::{info, instrument};

use crate::console::Console;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let mut state = AppState::from_env();

    let generated = state.generate_all();
    info!(target: "retest", generated, policy = ?state.generator.policy(), "Retest system ready");

    let stdin = io::stdin();
    Console::new(stdin.lock(), io::stdout(), io::stderr()).run(&mut state)?;
    Ok(())
}
