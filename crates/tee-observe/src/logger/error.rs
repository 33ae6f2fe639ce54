use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),

    #[error("journald is not available on this platform")]
    JournaldUnavailable,

    #[error("failed to connect to journald: {0}")]
    Journald(String),

    #[error("a global logger is already installed")]
    AlreadyInitialized,

    #[error("invalid timezone: {0} (expected: utc|local)")]
    InvalidTimeZone(String),

    #[error("invalid log filter: {0}")]
    InvalidLevel(String),
}

pub type LogResult<T> = Result<T, LogError>;
