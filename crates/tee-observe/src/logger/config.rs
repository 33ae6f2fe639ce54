use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::{
    error::LogResult,
    object::{LogFormat, LogLevel, LogTimeZone},
};

/// Environment variable that overrides the configured filter expression.
pub const LOG_LEVEL_ENV: &str = "TEEBOT_LOG";

/// Logger section of the bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter expression (`"info"`, `"tee_core=debug,info"`).
    pub level: LogLevel,
    /// Timezone used for timestamps.
    pub tz: LogTimeZone,
    /// Print module targets next to each line.
    pub with_targets: bool,
    /// Allow ANSI colors (only honoured on a terminal).
    pub use_color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::default(),
            tz: LogTimeZone::Local,
            with_targets: false,
            use_color: true,
        }
    }
}

impl LogConfig {
    /// Colors are used only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }

    /// Replace the filter with the value of [`LOG_LEVEL_ENV`], when set.
    ///
    /// An invalid expression in the environment is an error rather than being ignored.
    pub fn with_env_override(self) -> LogResult<Self> {
        self.with_level_override(std::env::var(LOG_LEVEL_ENV).ok())
    }

    fn with_level_override(mut self, raw: Option<String>) -> LogResult<Self> {
        if let Some(raw) = raw.filter(|s| !s.trim().is_empty()) {
            self.level = LogLevel::new(raw)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogError;

    #[test]
    fn defaults_favor_local_text_output() {
        let config = LogConfig::default();

        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.tz, LogTimeZone::Local);
        assert_eq!(config.level.as_str(), "info");
        assert!(!config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: LogConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.format, LogFormat::default());
        assert_eq!(config.level.as_str(), "info");
        assert!(config.use_color);
    }

    #[test]
    fn camel_case_fields_are_read() {
        let json = r#"{"format": "json", "level": "tee_core=debug,info", "withTargets": true}"#;
        let config: LogConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level.as_str(), "tee_core=debug,info");
        assert!(config.with_targets);
    }

    #[test]
    fn level_override_replaces_filter() {
        let config = LogConfig::default()
            .with_level_override(Some("debug".into()))
            .unwrap();
        assert_eq!(config.level.as_str(), "debug");

        let untouched = LogConfig::default()
            .with_level_override(Some("   ".into()))
            .unwrap();
        assert_eq!(untouched.level.as_str(), "info");
    }

    #[test]
    fn invalid_override_is_an_error() {
        let err = LogConfig::default()
            .with_level_override(Some("tee_core=chatty".into()))
            .unwrap_err();
        assert!(matches!(err, LogError::InvalidLevel(_)));
    }
}
