//! Tee-time label normalization and ranking.
//!
//! The booking page shows start times as free-form labels (`"7:30am"`,
//! `"12:15pm"`). Each label is reduced to an integer ordinal; candidates are
//! then ordered by ascending ordinal and the first one is the preferred slot.
use tee_model::SlotOrder;
use tracing::{trace, warn};

/// Pm offset of the legacy scheme: lifts every pm ordinal above every am one.
const LEGACY_PM_OFFSET: u32 = 1000;

/// A bookable tile discovered on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate<H> {
    /// Start time exactly as displayed.
    pub label: String,
    /// Clickable element for this slot.
    pub handle: H,
}

impl<H> SlotCandidate<H> {
    pub fn new(label: impl Into<String>, handle: H) -> Self {
        Self {
            label: label.into(),
            handle,
        }
    }
}

/// Candidate annotated with its ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSlot<H> {
    pub label: String,
    pub handle: H,
    pub ordinal: u32,
}

impl<H> From<RankedSlot<H>> for SlotCandidate<H> {
    fn from(slot: RankedSlot<H>) -> Self {
        Self {
            label: slot.label,
            handle: slot.handle,
        }
    }
}

/// Concatenate the label's digits in order and parse them (`"7:30am"` -> `730`).
fn digits_of(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Ordinal of a displayed time label under `order`.
///
/// Returns `None` when the label carries no parseable digits or its ordinal
/// does not fit in a `u32`.
///
/// Legacy values: `7:30am` -> 730, `12:15am` -> 15, `1:05pm` -> 1105,
/// `12:15pm` -> 1015. The last one sorts ahead of `11:45am` (1145); that is the
/// historical behavior and [`SlotOrder::Chronological`] exists to avoid it.
pub fn ordinal(label: &str, order: SlotOrder) -> Option<u32> {
    let is_am = label.contains("am");
    let raw = digits_of(label)?;

    let value = match order {
        SlotOrder::Legacy => {
            let folded = if raw > 1199 && raw < 1300 { raw - 1200 } else { raw };
            if is_am { folded } else { folded.checked_add(LEGACY_PM_OFFSET)? }
        }
        SlotOrder::Chronological => {
            let (hour, minute) = (raw / 100, raw % 100);
            let hour = match (hour, is_am) {
                (12, true) => 0,
                (h, false) if h < 12 => h + 12,
                (h, _) => h,
            };
            hour.checked_mul(100)?.checked_add(minute)?
        }
    };
    Some(value)
}

/// Order candidates by ascending ordinal; the first element is the preferred slot.
///
/// The sort is stable: equal ordinals keep their discovery order, so ranking an
/// already ranked list returns it unchanged. Labels without digits are dropped.
pub fn rank<H>(candidates: Vec<SlotCandidate<H>>, order: SlotOrder) -> Vec<RankedSlot<H>> {
    let mut ranked: Vec<RankedSlot<H>> = candidates
        .into_iter()
        .filter_map(|c| match ordinal(&c.label, order) {
            Some(ordinal) => {
                trace!(label = %c.label, ordinal, %order, "normalized slot label");
                Some(RankedSlot {
                    label: c.label,
                    handle: c.handle,
                    ordinal,
                })
            }
            None => {
                warn!(label = %c.label, "dropping slot with unreadable time label");
                None
            }
        })
        .collect();

    ranked.sort_by_key(|slot| slot.ordinal);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(label: &str) -> u32 {
        ordinal(label, SlotOrder::Legacy).unwrap()
    }

    fn chrono(label: &str) -> u32 {
        ordinal(label, SlotOrder::Chronological).unwrap()
    }

    fn labels<H>(ranked: &[RankedSlot<H>]) -> Vec<&str> {
        ranked.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn legacy_ordinals() {
        assert_eq!(legacy("7:30am"), 730);
        assert_eq!(legacy("11:45am"), 1145);
        assert_eq!(legacy("12:15am"), 15);
        assert_eq!(legacy("1:05pm"), 1105);
        assert_eq!(legacy("12:15pm"), 1015);
    }

    #[test]
    fn legacy_noon_hour_sorts_before_late_morning() {
        assert!(legacy("12:15pm") < legacy("11:45am"));
    }

    #[test]
    fn chronological_ordinals_follow_the_clock() {
        assert_eq!(chrono("12:15am"), 15);
        assert_eq!(chrono("7:30am"), 730);
        assert_eq!(chrono("12:15pm"), 1215);
        assert_eq!(chrono("1:05pm"), 1305);
        assert!(chrono("12:15pm") > chrono("11:45am"));
        assert!(chrono("1:05pm") > chrono("12:15pm"));
    }

    #[test]
    fn label_without_digits_has_no_ordinal() {
        assert_eq!(ordinal("noon", SlotOrder::Legacy), None);
        assert_eq!(ordinal("", SlotOrder::Chronological), None);
    }

    #[test]
    fn rank_puts_earliest_first() {
        let ranked = rank(
            vec![
                SlotCandidate::new("8:00am", 'a'),
                SlotCandidate::new("1:10pm", 'b'),
                SlotCandidate::new("6:50am", 'c'),
            ],
            SlotOrder::Legacy,
        );

        assert_eq!(labels(&ranked), ["6:50am", "8:00am", "1:10pm"]);
        assert_eq!(ranked[0].handle, 'c');
        assert_eq!(ranked[0].ordinal, 650);
    }

    #[test]
    fn rank_variants_disagree_on_noon() {
        let input = || {
            vec![
                SlotCandidate::new("12:15pm", 1),
                SlotCandidate::new("11:45am", 2),
            ]
        };

        let legacy = rank(input(), SlotOrder::Legacy);
        let chrono = rank(input(), SlotOrder::Chronological);

        assert_eq!(labels(&legacy), ["12:15pm", "11:45am"]);
        assert_eq!(labels(&chrono), ["11:45am", "12:15pm"]);
    }

    #[test]
    fn rank_is_idempotent() {
        let first = rank(
            vec![
                SlotCandidate::new("9:10am", 1),
                SlotCandidate::new("7:00am", 2),
                SlotCandidate::new("7:00am", 3),
                SlotCandidate::new("12:40pm", 4),
            ],
            SlotOrder::Legacy,
        );
        let again = rank(
            first.iter().cloned().map(SlotCandidate::from).collect(),
            SlotOrder::Legacy,
        );

        assert_eq!(first, again);
        // ties keep discovery order
        assert_eq!(first[0].handle, 2);
        assert_eq!(first[1].handle, 3);
    }

    #[test]
    fn rank_drops_unreadable_labels() {
        let ranked = rank(
            vec![SlotCandidate::new("TBD", 1), SlotCandidate::new("10:00am", 2)],
            SlotOrder::Legacy,
        );
        assert_eq!(labels(&ranked), ["10:00am"]);
    }

    #[test]
    fn oversized_label_is_unreadable_not_wrapped() {
        assert_eq!(ordinal("4294967295pm", SlotOrder::Legacy), None);
        assert_eq!(legacy("4294967295am"), u32::MAX);

        let ranked = rank(
            vec![
                SlotCandidate::new("4294967295pm", 1),
                SlotCandidate::new("1:05pm", 2),
                SlotCandidate::new("7:30am", 3),
            ],
            SlotOrder::Legacy,
        );
        assert_eq!(labels(&ranked), ["7:30am", "1:05pm"]);
    }
}
