use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};
use time::Weekday;

use crate::error::ModelError;

/// Weekday the bot books for.
///
/// Serialized as the lowercase English day name (`"wednesday"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDay(Weekday);

impl TargetDay {
    pub const fn new(day: Weekday) -> Self {
        Self(day)
    }

    pub const fn weekday(&self) -> Weekday {
        self.0
    }
}

impl Default for TargetDay {
    fn default() -> Self {
        Self(Weekday::Wednesday)
    }
}

impl From<Weekday> for TargetDay {
    fn from(day: Weekday) -> Self {
        Self(day)
    }
}

impl FromStr for TargetDay {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Weekday::Monday,
            "tue" | "tues" | "tuesday" => Weekday::Tuesday,
            "wed" | "wednesday" => Weekday::Wednesday,
            "thu" | "thur" | "thurs" | "thursday" => Weekday::Thursday,
            "fri" | "friday" => Weekday::Friday,
            "sat" | "saturday" => Weekday::Saturday,
            "sun" | "sunday" => Weekday::Sunday,
            _ => return Err(ModelError::UnknownWeekday(s.to_string())),
        };
        Ok(Self(day))
    }
}

impl fmt::Display for TargetDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self.0 {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        };
        f.write_str(s)
    }
}

impl Serialize for TargetDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TargetDay {
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
    fn default_is_wednesday() {
        assert_eq!(TargetDay::default().weekday(), Weekday::Wednesday);
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("Fri".parse::<TargetDay>().unwrap().weekday(), Weekday::Friday);
        assert_eq!(
            " SUNDAY ".parse::<TargetDay>().unwrap().weekday(),
            Weekday::Sunday
        );
        assert!("funday".parse::<TargetDay>().is_err());
    }

    #[test]
    fn serde_as_lowercase_name() {
        let day = TargetDay::new(Weekday::Thursday);
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, r#""thursday""#);

        let back: TargetDay = serde_json::from_str(r#""Tue""#).unwrap();
        assert_eq!(back.weekday(), Weekday::Tuesday);
        assert!(serde_json::from_str::<TargetDay>(r#""noday""#).is_err());
    }
}
