use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::logger::LogError;

/// Output format of the log stream.
/// - `Text`: human-readable lines, colored on a terminal.
/// - `Json`: one JSON object per event.
/// - `Journald`: native systemd-journald records (Linux only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
    Journald,
}

impl FromStr for LogFormat {
    type Err = LogError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "journald" | "journal" if cfg!(target_os = "linux") => Ok(Self::Journald),
            "journald" | "journal" => Err(LogError::JournaldUnavailable),
            _ => Err(LogError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Journald => "journald",
        })
    }
}

impl Serialize for LogFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LogFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!(" json ".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_formats() {
        for bad in ["", "xml", "logfmt"] {
            assert!(
                matches!(bad.parse::<LogFormat>(), Err(LogError::InvalidFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn journald_depends_on_platform() {
        let parsed = "journald".parse::<LogFormat>();
        if cfg!(target_os = "linux") {
            assert_eq!(parsed.unwrap(), LogFormat::Journald);
        } else {
            assert!(matches!(parsed, Err(LogError::JournaldUnavailable)));
        }
    }

    #[test]
    fn serializes_canonical_name() {
        assert_eq!(serde_json::to_string(&LogFormat::Json).unwrap(), r#""json""#);
        let back: LogFormat = serde_json::from_str(r#""Text""#).unwrap();
        assert_eq!(back, LogFormat::Text);
    }
}
