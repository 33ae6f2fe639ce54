//! Locators and literal texts of the booking site.
use serde::{Deserialize, Serialize};

use crate::browser::Locator;

/// Where each control lives on the booking page.
///
/// Defaults describe the current foreUP booking layout. The whole map can be
/// replaced from configuration when the site markup changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageMap {
    /// Generic action buttons (resident, players, time window, holes).
    pub primary_buttons: String,
    /// Text of the button that enters the resident area.
    pub resident_text: String,
    /// Button that opens the login panel.
    pub login_trigger: String,
    pub email_field: String,
    pub password_field: String,
    /// Candidates for the login form's submit control.
    pub login_submit: String,
    pub login_submit_text: String,
    /// Course `<select>`.
    pub course_select: String,
    /// Date `<input>`.
    pub date_input: String,
    pub all_times_text: String,
    pub holes_text: String,
    /// One tile per available start time.
    pub time_tile: String,
    /// Open-spot count inside a tile.
    pub tile_capacity: String,
    /// Start-time label inside a tile.
    pub tile_start_time: String,
    /// Player-count buttons shown after a tile is picked.
    pub players_row: String,
    /// Final "book" button.
    pub final_submit: String,
}

impl Default for PageMap {
    fn default() -> Self {
        Self {
            primary_buttons: ".btn-primary".into(),
            resident_text: "Resident".into(),
            login_trigger: ".btn-lg".into(),
            email_field: "[name=\"email\"]".into(),
            password_field: "[name=\"password\"]".into(),
            login_submit: ".col-xs-12".into(),
            login_submit_text: "Log In".into(),
            course_select: "[name=\"schedules\"]".into(),
            date_input: "[name=\"date\"]".into(),
            all_times_text: "All".into(),
            holes_text: "18".into(),
            time_tile: ".time-tile".into(),
            tile_capacity: ".js-booking-slot-players span".into(),
            tile_start_time: ".booking-start-time-label".into(),
            players_row: ".js-booking-players-row".into(),
            final_submit: ".btn-success".into(),
        }
    }
}

impl PageMap {
    /// Locator for one of the selector fields.
    pub fn locate(selector: &str) -> Locator {
        Locator::css(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{"timeTile": ".slot", "holesText": "9"}"#;
        let page: PageMap = serde_json::from_str(json).unwrap();

        assert_eq!(page.time_tile, ".slot");
        assert_eq!(page.holes_text, "9");
        assert_eq!(page.final_submit, PageMap::default().final_submit);
    }

    #[test]
    fn locate_wraps_css() {
        assert_eq!(
            PageMap::locate(&PageMap::default().tile_capacity).to_css(),
            ".js-booking-slot-players span"
        );
    }
}
