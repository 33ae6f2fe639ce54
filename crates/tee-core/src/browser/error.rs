use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("element not found: {0}")]
    NotFound(String),

    #[error("browser operation timed out: {0}")]
    Timeout(String),

    #[error("failed to start browser session: {0}")]
    SessionStart(String),

    #[error("session is closed")]
    SessionClosed,

    #[error("driver transport error: {0}")]
    Transport(String),

    #[error("driver error '{code}': {message}")]
    Protocol { code: String, message: String },
}

impl BrowserError {
    /// `true` when the page simply lacks what was asked for.
    ///
    /// Lookups that fail this way are guard failures for the caller, not crashes.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, BrowserError::NotFound(_) | BrowserError::Timeout(_))
    }
}

pub type BrowserResult<T> = Result<T, BrowserError>;
