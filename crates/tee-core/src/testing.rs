//! In-memory doubles for the browser, store and clock seams.
//!
//! Compiled for unit tests and behind the `testing` feature.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use tee_model::{Credentials, PlayerCount, WorkerId};
use time::OffsetDateTime;

use crate::{
    browser::{Browser, BrowserError, BrowserResult, ElementHandle, Locator, Session},
    clock::Clock,
    page::PageMap,
    store::{ProfileStore, StoreError},
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

#[derive(Debug, Clone, Default)]
struct FakeElement {
    parent: Option<usize>,
    selectors: Vec<String>,
    text: String,
    attrs: HashMap<String, String>,
}

/// Static element tree standing in for a rendered page.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: Vec<FakeElement>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element matching `selector` (a CSS string) under `parent`.
    pub fn add(&mut self, parent: Option<usize>, selector: &str, text: &str) -> usize {
        self.elements.push(FakeElement {
            parent,
            selectors: vec![selector.to_string()],
            text: text.to_string(),
            attrs: HashMap::new(),
        });
        self.elements.len() - 1
    }

    /// Make `id` also match `selector`.
    pub fn also_matches(&mut self, id: usize, selector: &str) -> &mut Self {
        self.elements[id].selectors.push(selector.to_string());
        self
    }

    pub fn set_attr(&mut self, id: usize, name: &str, value: &str) -> &mut Self {
        self.elements[id].attrs.insert(name.into(), value.into());
        self
    }

    /// Remove every element matching `selector` (and their descendants).
    pub fn remove(&mut self, selector: &str) -> &mut Self {
        let doomed: Vec<usize> = (0..self.elements.len())
            .filter(|&i| self.elements[i].selectors.iter().any(|s| s == selector))
            .collect();
        for i in doomed {
            self.elements[i].selectors.clear();
            for j in 0..self.elements.len() {
                if self.is_descendant(j, i) {
                    self.elements[j].selectors.clear();
                }
            }
        }
        self
    }

    fn is_descendant(&self, mut child: usize, ancestor: usize) -> bool {
        while let Some(p) = self.elements[child].parent {
            if p == ancestor {
                return true;
            }
            child = p;
        }
        false
    }

    fn matching(&self, by: &Locator, within: Option<usize>) -> Vec<usize> {
        let css = by.to_css();
        (0..self.elements.len())
            .filter(|&i| self.elements[i].selectors.iter().any(|s| *s == css))
            .filter(|&i| within.is_none_or(|root| self.is_descendant(i, root)))
            .collect()
    }

    /// Booking page laid out like [`PageMap::default`], with one tile per
    /// `(start time, open spots)` pair.
    pub fn booking_site(tiles: &[(&str, &str)]) -> Self {
        let map = PageMap::default();
        let mut page = Self::new();

        for text in ["Resident", "1", "2", "3", "4", "All", "18"] {
            page.add(None, &map.primary_buttons, text);
        }
        page.add(None, &map.login_trigger, "Log In");
        page.add(None, &map.email_field, "");
        page.add(None, &map.password_field, "");
        page.add(None, &map.login_submit, "Log In");

        let select = page.add(None, &map.course_select, "");
        page.add(Some(select), "option", "Bethpage Black Course");
        page.add(Some(select), "option", "Bethpage Yellow Course");

        let date = page.add(None, &map.date_input, "");
        page.set_attr(date, "value", "10/19/2026");

        for (label, spots) in tiles {
            let tile = page.add(None, &map.time_tile, label);
            page.add(Some(tile), &map.tile_capacity, spots);
            page.add(Some(tile), &map.tile_start_time, label);
        }

        let row = page.add(None, &map.players_row, "");
        for text in ["1", "2", "3", "4"] {
            page.add(Some(row), &map.primary_buttons, text);
        }
        page.add(None, &map.final_submit, "Book Time");
        page
    }
}

/// Something a fake session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeEvent {
    Opened,
    Navigate(String),
    /// Click on an element, identified by its text.
    Click(String),
    /// Keys typed into the element matching the given selector.
    Keys(String, String),
    Closed,
}

/// Journal shared by a [`FakeBrowser`] and all sessions it opened.
#[derive(Debug, Clone, Default)]
pub struct FakeLog {
    events: Arc<Mutex<Vec<FakeEvent>>>,
}

impl FakeLog {
    fn push(&self, e: FakeEvent) {
        lock(&self.events).push(e);
    }

    pub fn events(&self) -> Vec<FakeEvent> {
        lock(&self.events).clone()
    }

    pub fn count(&self, pred: impl Fn(&FakeEvent) -> bool) -> usize {
        lock(&self.events).iter().filter(|e| pred(e)).count()
    }

    pub fn clicked(&self, text: &str) -> bool {
        self.count(|e| matches!(e, FakeEvent::Click(t) if t == text)) > 0
    }
}

/// Browser double serving the same [`FakePage`] to every session.
#[derive(Debug, Clone)]
pub struct FakeBrowser {
    page: FakePage,
    log: FakeLog,
    /// Delay applied to every session call.
    pub latency: Duration,
    pub fail_navigation: bool,
    /// Error returned by every click, when set.
    pub break_clicks: bool,
    /// Time `open` takes after the session exists on the driver side.
    pub open_delay: Duration,
}

impl FakeBrowser {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            log: FakeLog::default(),
            latency: Duration::ZERO,
            fail_navigation: false,
            break_clicks: false,
            open_delay: Duration::ZERO,
        }
    }

    pub fn log(&self) -> FakeLog {
        self.log.clone()
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn open(&self) -> BrowserResult<Box<dyn Session>> {
        self.log.push(FakeEvent::Opened);
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
        Ok(Box::new(FakeSession {
            page: self.page.clone(),
            log: self.log.clone(),
            latency: self.latency,
            fail_navigation: self.fail_navigation,
            break_clicks: self.break_clicks,
            closed: false,
        }))
    }
}

pub struct FakeSession {
    page: FakePage,
    log: FakeLog,
    latency: Duration,
    fail_navigation: bool,
    break_clicks: bool,
    closed: bool,
}

impl FakeSession {
    async fn tick(&self) -> BrowserResult<()> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }

    fn handle(idx: usize) -> ElementHandle {
        ElementHandle::new(format!("el-{idx}"))
    }

    fn index(&self, el: &ElementHandle) -> BrowserResult<usize> {
        el.id()
            .strip_prefix("el-")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&i| i < self.page.elements.len())
            .ok_or_else(|| BrowserError::Protocol {
                code: "stale element reference".into(),
                message: el.id().to_string(),
            })
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.tick().await?;
        if self.fail_navigation {
            return Err(BrowserError::Transport(format!("cannot reach {url}")));
        }
        self.log.push(FakeEvent::Navigate(url.to_string()));
        Ok(())
    }

    async fn find(&mut self, by: &Locator) -> BrowserResult<ElementHandle> {
        self.tick().await?;
        self.page
            .matching(by, None)
            .first()
            .map(|&i| Self::handle(i))
            .ok_or_else(|| BrowserError::NotFound(by.to_css()))
    }

    async fn find_all(&mut self, by: &Locator) -> BrowserResult<Vec<ElementHandle>> {
        self.tick().await?;
        Ok(self.page.matching(by, None).into_iter().map(Self::handle).collect())
    }

    async fn find_in(&mut self, parent: &ElementHandle, by: &Locator) -> BrowserResult<ElementHandle> {
        self.tick().await?;
        let root = self.index(parent)?;
        self.page
            .matching(by, Some(root))
            .first()
            .map(|&i| Self::handle(i))
            .ok_or_else(|| BrowserError::NotFound(by.to_css()))
    }

    async fn find_all_in(
        &mut self,
        parent: &ElementHandle,
        by: &Locator,
    ) -> BrowserResult<Vec<ElementHandle>> {
        self.tick().await?;
        let root = self.index(parent)?;
        Ok(self
            .page
            .matching(by, Some(root))
            .into_iter()
            .map(Self::handle)
            .collect())
    }

    async fn text(&mut self, el: &ElementHandle) -> BrowserResult<String> {
        self.tick().await?;
        let i = self.index(el)?;
        Ok(self.page.elements[i].text.clone())
    }

    async fn attribute(&mut self, el: &ElementHandle, name: &str) -> BrowserResult<Option<String>> {
        self.tick().await?;
        let i = self.index(el)?;
        Ok(self.page.elements[i].attrs.get(name).cloned())
    }

    async fn click(&mut self, el: &ElementHandle) -> BrowserResult<()> {
        self.tick().await?;
        if self.break_clicks {
            return Err(BrowserError::Transport("driver went away".into()));
        }
        let i = self.index(el)?;
        self.log.push(FakeEvent::Click(self.page.elements[i].text.clone()));
        Ok(())
    }

    async fn send_keys(&mut self, el: &ElementHandle, keys: &str) -> BrowserResult<()> {
        self.tick().await?;
        let i = self.index(el)?;
        let selector = self.page.elements[i].selectors.first().cloned().unwrap_or_default();
        self.log.push(FakeEvent::Keys(selector, keys.to_string()));
        Ok(())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }
        self.closed = true;
        self.log.push(FakeEvent::Closed);
        Ok(())
    }
}

/// [`ProfileStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: Mutex<Option<String>>,
    login: Mutex<Option<(String, String)>>,
    crashes: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a valid profile.
    pub fn ready(players: i32) -> Self {
        let store = Self::new();
        store.set_players_raw(&players.to_string());
        store.set_login("golfer@example.com", "hunter2");
        store
    }

    pub fn set_players_raw(&self, raw: &str) {
        *lock(&self.players) = Some(raw.to_string());
    }

    pub fn set_login(&self, email: &str, password: &str) {
        *lock(&self.login) = Some((email.into(), password.into()));
    }

    pub fn players_raw(&self) -> Option<String> {
        lock(&self.players).clone()
    }

    pub fn crashes(&self) -> Vec<String> {
        lock(&self.crashes).clone()
    }
}

impl ProfileStore for MemoryStore {
    fn read_player_count(&self) -> Result<PlayerCount, StoreError> {
        let raw = lock(&self.players).clone().ok_or(StoreError::Missing {
            what: "player count",
            path: "memory".into(),
        })?;
        match raw.parse::<PlayerCount>() {
            Ok(count) => Ok(count),
            Err(_) => {
                self.write_player_count(PlayerCount::UNSET)?;
                Ok(PlayerCount::UNSET)
            }
        }
    }

    fn write_player_count(&self, count: PlayerCount) -> Result<(), StoreError> {
        self.set_players_raw(&count.to_string());
        Ok(())
    }

    fn read_credentials(&self) -> Result<Credentials, StoreError> {
        let (email, password) = lock(&self.login).clone().ok_or(StoreError::Missing {
            what: "login",
            path: "memory".into(),
        })?;
        Credentials::new(email, password).map_err(|e| StoreError::Malformed {
            what: "login",
            reason: e.to_string(),
        })
    }

    fn record_crash(
        &self,
        _at: OffsetDateTime,
        worker: WorkerId,
        report: &str,
    ) -> Result<String, StoreError> {
        lock(&self.crashes).push(format!("{worker}: {report}"));
        Ok("memory".into())
    }
}

/// Clock that starts at `base` and advances with tokio's (possibly paused) timer.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    base: OffsetDateTime,
    start: tokio::time::Instant,
}

impl TokioClock {
    pub fn starting_at(base: OffsetDateTime) -> Self {
        Self {
            base,
            start: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> OffsetDateTime {
        self.base + self.start.elapsed()
    }
}
