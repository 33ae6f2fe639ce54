use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tee_core::{page::PageMap, store::StoreConfig, supervisor::PoolConfig};
use tee_model::{BookingTarget, SlotOrder};
use tee_observe::LogConfig;
use tee_webdriver::WebDriverConfig;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "TEEBOT_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "teebot.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Whole bot configuration. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BotConfig {
    pub target: BookingTarget,
    pub pool: PoolConfig,
    pub slot_order: SlotOrder,
    pub page: PageMap,
    pub webdriver: WebDriverConfig,
    pub store: StoreConfig,
    pub logger: LogConfig,
}

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(p) => write!(f, "{}", p.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl BotConfig {
    /// Load from `$TEEBOT_CONFIG` (must exist) or `./teebot.json` (optional).
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(Path::new(&path), true),
            None => Self::load_from(Path::new(DEFAULT_CONFIG_FILE), false),
        }
    }

    /// Load and validate `path`. A missing optional file yields the defaults.
    pub fn load_from(path: &Path, required: bool) -> Result<(Self, ConfigSource), ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                let cfg = Self::default();
                cfg.validate()?;
                return Ok((cfg, ConfigSource::Defaults));
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let cfg: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok((cfg, ConfigSource::File(path.to_path_buf())))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: &dyn std::fmt::Display| ConfigError::Invalid(e.to_string());
        self.target.validate().map_err(|e| invalid(&e))?;
        self.pool.validate().map_err(|e| invalid(&e))?;
        self.webdriver.validate().map_err(|e| invalid(&e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tee_model::TargetTime;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, source) = BotConfig::load_from(&dir.path().join("teebot.json"), false).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(cfg.pool.max_workers, 5);
        assert_eq!(cfg.slot_order, SlotOrder::Legacy);
        assert_eq!(cfg.target.opens_at, TargetTime::new(19, 0, 0));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BotConfig::load_from(&dir.path().join("nope.json"), true).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn partial_file_overrides_only_what_it_names() {
        let file = write(
            r#"{
                "target": { "day": "friday", "opensAt": { "hour": 7 } },
                "pool": { "maxWorkers": 3 },
                "slotOrder": "chronological",
                "webdriver": { "headless": true },
                "logger": { "format": "json" }
            }"#,
        );
        let (cfg, source) = BotConfig::load_from(file.path(), true).unwrap();
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
        assert_eq!(cfg.target.day.to_string(), "friday");
        assert_eq!(cfg.target.opens_at, TargetTime::new(7, 0, 0));
        assert_eq!(cfg.target.course, tee_model::DEFAULT_COURSE);
        assert_eq!(cfg.pool.max_workers, 3);
        assert_eq!(cfg.pool.stagger_ms, 2500);
        assert_eq!(cfg.slot_order, SlotOrder::Chronological);
        assert!(cfg.webdriver.headless);
        assert_eq!(cfg.page, PageMap::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write(r#"{ "pool": { "maxWorkers": 0 } }"#);
        assert!(matches!(
            BotConfig::load_from(file.path(), true),
            Err(ConfigError::Invalid(_))
        ));

        let file = write(r#"{ "target": { "opensAt": { "hour": 24 } } }"#);
        assert!(matches!(
            BotConfig::load_from(file.path(), true),
            Err(ConfigError::Invalid(_))
        ));

        let file = write(r#"{ "target": { "course": "  " } }"#);
        assert!(BotConfig::load_from(file.path(), true).is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write("{ not json");
        assert!(matches!(
            BotConfig::load_from(file.path(), true),
            Err(ConfigError::Parse { .. })
        ));
    }
}
