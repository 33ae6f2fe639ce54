use tee_core::browser::BrowserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebDriverError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error object returned by the driver.
    #[error("{error}: {message}")]
    Protocol { error: String, message: String },

    #[error("malformed driver response: {0}")]
    Malformed(String),

    #[error("invalid webdriver configuration: {0}")]
    InvalidConfig(String),
}

impl From<WebDriverError> for BrowserError {
    fn from(e: WebDriverError) -> Self {
        match e {
            WebDriverError::Protocol { error, message } => match error.as_str() {
                "no such element" => BrowserError::NotFound(message),
                "timeout" | "script timeout" => BrowserError::Timeout(message),
                "invalid session id" => BrowserError::SessionClosed,
                _ => BrowserError::Protocol {
                    code: error,
                    message,
                },
            },
            WebDriverError::Http(e) if e.is_timeout() => BrowserError::Timeout(e.to_string()),
            WebDriverError::Http(e) => BrowserError::Transport(e.to_string()),
            WebDriverError::Malformed(m) => BrowserError::Protocol {
                code: "malformed response".into(),
                message: m,
            },
            WebDriverError::InvalidConfig(m) => BrowserError::SessionStart(m),
        }
    }
}
