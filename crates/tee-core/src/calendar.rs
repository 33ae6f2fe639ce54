//! Next-occurrence date calculation for the booking search form.
use time::{Date, Duration, Weekday};

/// Days from `today` until each weekday, counting from tomorrow.
///
/// Indexed by [`Weekday::number_days_from_monday`]. Every entry lies in `1..=7`,
/// so today's own weekday maps to 7.
fn days_until_table(today: Weekday) -> [u8; 7] {
    let mut table = [0u8; 7];
    let mut day = today;
    for offset in 1..=7u8 {
        day = day.next();
        table[day.number_days_from_monday() as usize] = offset;
    }
    table
}

/// Date of the next `target` strictly after `today`.
///
/// When `today` already is `target` the result is one week later.
pub fn next_occurrence(today: Date, target: Weekday) -> Date {
    let days = days_until_table(today.weekday())[target.number_days_from_monday() as usize];
    today.saturating_add(Duration::days(i64::from(days)))
}

/// Short `M/D/YYYY` form accepted by the booking site's date input.
pub fn short_date(date: Date) -> String {
    format!("{}/{}/{}", u8::from(date.month()), date.day(), date.year())
}

/// [`next_occurrence`] rendered with [`short_date`].
pub fn target_date_string(today: Date, target: Weekday) -> String {
    short_date(next_occurrence(today, target))
}
