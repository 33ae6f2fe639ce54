mod config;
mod error;
mod init;
mod object;

pub use config::{LOG_LEVEL_ENV, LogConfig};
pub use error::LogError;
pub use object::LogFormat;
pub use object::LogLevel;
pub use object::{LogTimeZone, capture_local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// After this call every `tracing` macro in the process is routed through the
/// configured format. Calling it twice returns [`LogError::AlreadyInitialized`].
///
/// With [`LogTimeZone::Local`] the UTC offset must be captured by
/// [`capture_local_offset`] in `main()` before the tokio runtime starts,
/// otherwise timestamps fall back to UTC.
///
/// # Examples
/// ```rust
/// use tee_observe::{LogConfig, init_logging};
///
/// let config = LogConfig::default();
/// init_logging(&config).expect("logger installed once");
/// tracing::info!("ready");
/// ```
pub fn init_logging(cfg: &LogConfig) -> Result<(), LogError> {
    match cfg.format {
        LogFormat::Text => init::install_text(cfg),
        LogFormat::Json => init::install_json(cfg),
        LogFormat::Journald => init::install_journald(cfg),
    }
}
