//! `env_logger` setup for the binary and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default level: `Debug` for verbose runs, `Info` otherwise.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
///
/// `RUST_LOG` takes precedence over `verbose`. Calling this again after a
/// logger is installed does nothing, so tests may call it freely.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();
    if builder.try_init().is_err() {
        log::trace!("logger already installed");
    }
}
