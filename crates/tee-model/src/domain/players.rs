use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Number of players to book for.
///
/// Valid values are `1..=4`. The sentinel [`PlayerCount::UNSET`] (`-1`) marks a
/// missing or corrupt persisted value. The type keeps the raw integer so that
/// out-of-range values read from disk survive until a guard rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerCount(i32);

impl PlayerCount {
    /// Sentinel for "invalid or unset".
    pub const UNSET: PlayerCount = PlayerCount(-1);

    /// Smallest bookable group.
    pub const MIN: i32 = 1;

    /// Largest bookable group.
    pub const MAX: i32 = 4;

    /// Wrap a raw value without validation.
    pub const fn raw(value: i32) -> Self {
        Self(value)
    }

    /// Create a validated player count.
    pub fn new(value: i32) -> ModelResult<Self> {
        let count = Self(value);
        if count.is_valid() {
            Ok(count)
        } else {
            Err(ModelError::PlayerCountOutOfRange(value))
        }
    }

    pub const fn get(&self) -> i32 {
        self.0
    }

    /// `true` when the value lies in `1..=4`.
    pub const fn is_valid(&self) -> bool {
        self.0 >= Self::MIN && self.0 <= Self::MAX
    }

    /// `true` when the value is zero or negative (including the sentinel).
    pub const fn is_unset(&self) -> bool {
        self.0 <= 0
    }

    /// Literal label of the page button that selects this many players.
    ///
    /// Out-of-range values (the sentinel included) map to `"1"`; the site has
    /// always been driven this way and callers are expected to warn about it.
    pub const fn button_label(&self) -> &'static str {
        match self.0 {
            1 => "1",
            2 => "2",
            3 => "3",
            4 => "4",
            _ => "1",
        }
    }

    /// `true` when a slot with `capacity` open spots can take this group.
    pub fn fits(&self, capacity: i32) -> bool {
        capacity >= self.0
    }
}

impl Default for PlayerCount {
    fn default() -> Self {
        Self::UNSET
    }
}

impl FromStr for PlayerCount {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(PlayerCount)
            .map_err(|e| ModelError::Invalid(format!("player count {s:?}: {e}")))
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_range_is_one_to_four() {
        for v in 1..=4 {
            assert!(PlayerCount::new(v).is_ok());
        }
        for v in [-1, 0, 5, 42] {
            assert!(matches!(
                PlayerCount::new(v),
                Err(ModelError::PlayerCountOutOfRange(x)) if x == v
            ));
        }
    }

    #[test]
    fn button_label_falls_back_to_one() {
        assert_eq!(PlayerCount::raw(3).button_label(), "3");
        assert_eq!(PlayerCount::UNSET.button_label(), "1");
        assert_eq!(PlayerCount::raw(0).button_label(), "1");
        assert_eq!(PlayerCount::raw(7).button_label(), "1");
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let p: PlayerCount = " 2\n".parse().unwrap();
        assert_eq!(p.get(), 2);
        assert!("two".parse::<PlayerCount>().is_err());
    }

    #[test]
    fn fits_compares_against_capacity() {
        let two = PlayerCount::raw(2);
        assert!(two.fits(4));
        assert!(two.fits(2));
        assert!(!two.fits(1));
    }

    #[test]
    fn default_is_unset_sentinel() {
        assert_eq!(PlayerCount::default(), PlayerCount::UNSET);
        assert!(PlayerCount::default().is_unset());
    }
}
