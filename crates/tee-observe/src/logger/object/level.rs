use std::{convert::TryFrom, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LogError;

/// Validated `EnvFilter` expression.
///
/// The raw string is kept for (de)serialization; the filter itself is built on
/// demand because `EnvFilter` cannot be cloned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(String);

impl LogLevel {
    /// Parse and validate a filter expression.
    ///
    /// ```
    /// use tee_observe::LogLevel;
    ///
    /// let lvl = LogLevel::new("tee_core=debug,info").unwrap();
    /// assert_eq!(lvl.as_str(), "tee_core=debug,info");
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LogError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the `EnvFilter` for this expression.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LogError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        EnvFilter::try_new(&s)
            .map(|_| LogLevel(s.clone()))
            .map_err(|e| LogError::InvalidLevel(format!("{s}: {e}")))
    }
}

impl From<LogLevel> for String {
    fn from(l: LogLevel) -> Self {
        l.0
    }
}
