//! Public surface for chatrelay.
//!
//! Re-exports the building blocks and provides the logging and console
//! transport helpers used by the `chatrelay` binary.

pub mod console;

/// Re-export for convenience.
pub use chatrelay_config as config;
/// Re-export for convenience.
pub use chatrelay_context as context;
pub use chatrelay_core as core;

use log::LevelFilter;

/// Parse a `--log-level` value such as `debug` or `WARN`.
pub fn parse_log_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Initialize `env_logger` with millisecond timestamps at `level`.
///
/// An unparseable level falls back to `info`. `RUST_LOG` is applied on top,
/// so per-module filters still work.
pub fn init_logging(level: &str) {
    let filter = parse_log_level(level).unwrap_or_else(|| {
        eprintln!("unknown log level `{level}`, falling back to info");
        LevelFilter::Info
    });
    let _ = env_logger::builder()
        .filter_level(filter)
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
