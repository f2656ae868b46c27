//! Logger installation for native and browser hosts.

use crate::config::LogLevel;

/// Install the global logger at `level`.
///
/// Uses `env_logger` on native targets (so `RUST_LOG` still overrides per
/// module) and the browser console on wasm32. Fails if a logger is already set.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LogLevel) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init()
}

#[cfg(target_arch = "wasm32")]
pub fn init(level: LogLevel) -> Result<(), log::SetLoggerError> {
    console_log::init_with_level(level.to_level())
}
