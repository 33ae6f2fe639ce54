//! The five booking stages run by [`BookingWorker`].
use tracing::{debug, info, warn};

use super::{BookingError, BookingWorker};
use crate::{
    browser::{ElementHandle, Locator, Session, keys},
    calendar,
    page::PageMap,
    slots::{self, SlotCandidate},
};

impl BookingWorker {
    fn page(&self) -> &PageMap {
        &self.plan.page
    }

    /// Player button label, falling back to "1" for out-of-range counts.
    fn player_label(&self) -> &'static str {
        let players = self.plan.profile.players;
        if !players.is_valid() {
            warn!(worker = %self.id, %players, "player count out of range; selecting 1 player");
        }
        players.button_label()
    }

    /// Find a control that must exist; a failed lookup becomes [`BookingError::MissingControl`].
    async fn require(
        &self,
        s: &mut dyn Session,
        selector: &str,
        what: &'static str,
    ) -> Result<ElementHandle, BookingError> {
        match self.guarded(s.find(&PageMap::locate(selector))).await {
            Err(BookingError::Browser(e)) if e.is_lookup_failure() => Err(BookingError::MissingControl(what)),
            other => other,
        }
    }

    async fn all(&self, s: &mut dyn Session, selector: &str) -> Result<Vec<ElementHandle>, BookingError> {
        self.guarded(s.find_all(&PageMap::locate(selector))).await
    }

    /// First handle whose trimmed text equals `text`.
    async fn with_text(
        &self,
        s: &mut dyn Session,
        handles: &[ElementHandle],
        text: &str,
    ) -> Result<Option<ElementHandle>, BookingError> {
        for el in handles {
            if self.guarded(s.text(el)).await?.trim() == text {
                return Ok(Some(el.clone()));
            }
        }
        Ok(None)
    }

    async fn click_labelled(
        &self,
        s: &mut dyn Session,
        handles: &[ElementHandle],
        text: &str,
        what: &'static str,
    ) -> Result<(), BookingError> {
        let el = self
            .with_text(s, handles, text)
            .await?
            .ok_or(BookingError::MissingControl(what))?;
        self.guarded(s.click(&el)).await
    }

    pub(super) async fn connect(&self, s: &mut dyn Session) -> Result<(), BookingError> {
        let url = &self.plan.target.url;
        match self.guarded(s.navigate(url)).await {
            Ok(()) => {
                info!(worker = %self.id, %url, "connected to booking site");
                Ok(())
            }
            Err(BookingError::Canceled) => Err(BookingError::Canceled),
            Err(e) => Err(BookingError::Unreachable(e.to_string())),
        }
    }

    pub(super) async fn authenticate(&self, s: &mut dyn Session) -> Result<(), BookingError> {
        let buttons = self.all(s, &self.page().primary_buttons).await?;
        if buttons.is_empty() {
            return Err(BookingError::MissingControl("primary buttons"));
        }
        self.click_labelled(s, &buttons, &self.page().resident_text, "resident button")
            .await?;
        debug!(worker = %self.id, "resident area selected");

        match self.login(s).await {
            Ok(()) => info!(worker = %self.id, "logged in"),
            Err(BookingError::Canceled) => return Err(BookingError::Canceled),
            Err(e) => warn!(
                worker = %self.id,
                reason = "login-skipped",
                error = %e,
                "login form unavailable; assuming an existing login"
            ),
        }
        Ok(())
    }

    async fn login(&self, s: &mut dyn Session) -> Result<(), BookingError> {
        let page = self.page();
        let trigger = self.require(s, &page.login_trigger, "login trigger").await?;
        let caption = self.guarded(s.text(&trigger)).await?;
        if !caption.to_ascii_lowercase().contains("log") {
            return Err(BookingError::MissingControl("login trigger"));
        }
        self.guarded(s.click(&trigger)).await?;

        let creds = &self.plan.profile.credentials;
        let email = self.require(s, &page.email_field, "email field").await?;
        self.guarded(s.send_keys(&email, creds.email())).await?;
        let password = self.require(s, &page.password_field, "password field").await?;
        self.guarded(s.send_keys(&password, creds.password())).await?;

        let submits = self.all(s, &page.login_submit).await?;
        self.click_labelled(s, &submits, &page.login_submit_text, "login submit")
            .await
    }

    pub(super) async fn configure_search(&self, s: &mut dyn Session) -> Result<(), BookingError> {
        let page = self.page();
        let course = &self.plan.target.course;

        let select = self.require(s, &page.course_select, "course dropdown").await?;
        match self.guarded(s.select_by_visible_text(&select, course)).await {
            Err(BookingError::Browser(e)) if e.is_lookup_failure() => {
                return Err(BookingError::MissingControl("course option"));
            }
            other => other?,
        }

        let date = self.require(s, &page.date_input, "date input").await?;
        let current = self.guarded(s.attribute(&date, "value")).await?.unwrap_or_default();
        let target = calendar::target_date_string(self.clock.now().date(), self.plan.target.day.weekday());
        let typed = format!("{}{}", keys::backspaces(current.chars().count()), target);
        self.guarded(s.send_keys(&date, &typed)).await?;

        let buttons = self.all(s, &page.primary_buttons).await?;
        self.click_labelled(s, &buttons, self.player_label(), "player count button")
            .await?;
        self.click_labelled(s, &buttons, &page.all_times_text, "time window button")
            .await?;
        self.click_labelled(s, &buttons, &page.holes_text, "holes button")
            .await?;

        info!(worker = %self.id, %course, date = %target, "search configured");
        Ok(())
    }

    pub(super) async fn discover(&self, s: &mut dyn Session) -> Result<String, BookingError> {
        let players = self.plan.profile.players;
        if players.is_unset() {
            return Err(BookingError::InvalidPreference(players));
        }
        let page = self.page();
        let capacity = PageMap::locate(&page.tile_capacity);
        let start = PageMap::locate(&page.tile_start_time);

        let tiles = self.all(s, &page.time_tile).await?;
        let mut candidates = Vec::with_capacity(tiles.len());
        for tile in tiles {
            let spots = match self.optional_text_in(s, &tile, &capacity).await? {
                Some(text) => text,
                None => continue,
            };
            match spots.trim().parse::<i32>() {
                Ok(open) if players.fits(open) => {}
                Ok(open) => {
                    debug!(worker = %self.id, open, "tile too small");
                    continue;
                }
                Err(_) => {
                    debug!(worker = %self.id, capacity = %spots, "tile capacity unreadable");
                    continue;
                }
            }
            let label = match self.guarded(s.find_in(&tile, &start)).await {
                Ok(el) => self.guarded(s.text(&el)).await?,
                Err(BookingError::Browser(e)) if e.is_lookup_failure() => {
                    return Err(BookingError::MissingControl("tile start time"));
                }
                Err(e) => return Err(e),
            };
            candidates.push(SlotCandidate::new(label.trim(), tile));
        }

        let mut ranked = slots::rank(candidates, self.plan.order).into_iter();
        let best = ranked.next().ok_or(BookingError::NoSuitableSlot { players })?;
        debug!(
            worker = %self.id,
            time = %best.label,
            ordinal = best.ordinal,
            alternatives = ranked.len(),
            "tee time chosen"
        );
        self.guarded(s.click(&best.handle)).await?;
        Ok(best.label)
    }

    async fn optional_text_in(
        &self,
        s: &mut dyn Session,
        parent: &ElementHandle,
        by: &Locator,
    ) -> Result<Option<String>, BookingError> {
        match self.guarded(s.find_in(parent, by)).await {
            Ok(el) => Ok(Some(self.guarded(s.text(&el)).await?)),
            Err(BookingError::Browser(e)) if e.is_lookup_failure() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(super) async fn book(&self, s: &mut dyn Session) -> Result<(), BookingError> {
        let page = self.page();
        let row = self.require(s, &page.players_row, "player selection row").await?;
        let buttons = self
            .guarded(s.find_all_in(&row, &PageMap::locate(&page.primary_buttons)))
            .await?;
        self.click_labelled(s, &buttons, self.player_label(), "player selection button")
            .await?;

        let submit = self.require(s, &page.final_submit, "final submit").await?;
        self.guarded(s.click(&submit)).await
    }
}
