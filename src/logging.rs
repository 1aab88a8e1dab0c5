//! Log output for the command-line tools.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::config::LogLevel;
use crate::error::CoinbaseError;

/// Install a stdout subscriber filtered at `level`.
///
/// `RUST_LOG` directives, when present, are layered on top of the default
/// level.
pub fn init(level: LogLevel) -> Result<(), CoinbaseError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| CoinbaseError::Config(format!("cannot install log subscriber: {e}")))
}
