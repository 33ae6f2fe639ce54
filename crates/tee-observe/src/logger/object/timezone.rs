use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::logger::error::LogError;

/// Offset captured by [`capture_local_offset`].
static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Timezone used for log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTimeZone {
    #[default]
    Utc,
    Local,
}

impl FromStr for LogTimeZone {
    type Err = LogError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LogError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LogTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogTimeZone::Utc => "utc",
            LogTimeZone::Local => "local",
        })
    }
}

impl LogTimeZone {
    /// Offset to apply to timestamps for this zone.
    pub fn offset(&self) -> UtcOffset {
        match self {
            LogTimeZone::Utc => UtcOffset::UTC,
            LogTimeZone::Local => LOCAL_OFFSET.get().copied().unwrap_or(UtcOffset::UTC),
        }
    }
}

/// Detects and remembers the local UTC offset.
///
/// **Call in `main()` before the tokio runtime is built.** Offset detection
/// refuses to run once other threads exist on most Unix platforms; in that case
/// the offset falls back to UTC.
///
/// The first captured value wins and is returned on every later call, so the
/// same offset can be reused for wall-clock scheduling.
pub fn capture_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_zones() {
        assert_eq!("UTC".parse::<LogTimeZone>().unwrap(), LogTimeZone::Utc);
        assert_eq!("Local".parse::<LogTimeZone>().unwrap(), LogTimeZone::Local);
        assert!("cet".parse::<LogTimeZone>().is_err());
    }

    #[test]
    fn utc_offset_is_zero() {
        assert_eq!(LogTimeZone::Utc.offset(), UtcOffset::UTC);
    }

    #[test]
    fn capture_is_stable() {
        let first = capture_local_offset();
        assert_eq!(capture_local_offset(), first);
        assert_eq!(LogTimeZone::Local.offset(), first);
        assert!(first.whole_hours().abs() <= 14);
    }
}
