use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Ordering scheme used to rank displayed tee-time labels.
///
/// Variants:
/// - `Legacy`: the historical ordinal. The `12:xx` hour is folded to `0..99`
///   before the pm offset is applied, so `12:15pm` ranks ahead of `11:45am`.
///   Kept as the default so slot choice matches what the bot has always done.
/// - `Chronological`: true clock order; `12:xx am` is midnight and `12:xx pm` is noon.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotOrder {
    #[default]
    Legacy,
    Chronological,
}

impl FromStr for SlotOrder {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "compat" | "" => Ok(SlotOrder::Legacy),
            "chronological" | "chrono" | "clock" => Ok(SlotOrder::Chronological),
            other => Err(ModelError::UnknownSlotOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SlotOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotOrder::Legacy => f.write_str("legacy"),
            SlotOrder::Chronological => f.write_str("chronological"),
        }
    }
}
