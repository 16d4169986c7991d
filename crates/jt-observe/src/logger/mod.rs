mod config;
mod error;
mod format;
mod level;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;
pub use level::LoggerLevel;

/// Installs the global `tracing` subscriber described by `cfg`.
///
/// Diagnostics always go to stderr. Call once, before starting a
/// multi-threaded runtime, so timestamps carry the local offset.
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}
