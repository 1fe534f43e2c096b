//! # Binopt CLI support
//!
//! Scenario replay, calculator commands and logging setup shared by the `binopt` binary and its
//! integration tests.

pub mod commands;
pub mod scenario;

pub use scenario::{Scenario, ScenarioReport, ScenarioRunner, StepOutcome};

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `binopt` crates log at `debug` when
/// `verbose` is set and at `warn` by default.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "binopt_core={default_level},binopt_cli={default_level},binopt={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
