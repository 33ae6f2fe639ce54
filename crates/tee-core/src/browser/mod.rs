//! Browser-automation seam.
//!
//! The core never talks to a concrete driver. A [`Browser`] opens independent
//! [`Session`]s; each session is owned by exactly one worker.
mod error;
pub use error::{BrowserError, BrowserResult};

mod locator;
pub use locator::{ElementHandle, Locator};

pub mod keys;

use async_trait::async_trait;

/// Factory for browser sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Driver name used in logs.
    fn name(&self) -> &'static str;

    /// Start a fresh, isolated session.
    async fn open(&self) -> BrowserResult<Box<dyn Session>>;
}

/// One live browser session.
///
/// Every call may fail with [`BrowserError::NotFound`] or [`BrowserError::Timeout`];
/// callers treat those as a missing page control.
#[async_trait]
pub trait Session: Send {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// First element on the page matching `by`.
    async fn find(&mut self, by: &Locator) -> BrowserResult<ElementHandle>;

    /// All elements on the page matching `by` (possibly none).
    async fn find_all(&mut self, by: &Locator) -> BrowserResult<Vec<ElementHandle>>;

    /// First descendant of `parent` matching `by`.
    async fn find_in(&mut self, parent: &ElementHandle, by: &Locator) -> BrowserResult<ElementHandle>;

    /// All descendants of `parent` matching `by`.
    async fn find_all_in(
        &mut self,
        parent: &ElementHandle,
        by: &Locator,
    ) -> BrowserResult<Vec<ElementHandle>>;

    /// Rendered text of the element.
    async fn text(&mut self, el: &ElementHandle) -> BrowserResult<String>;

    /// Attribute or property value; `None` when the element has none.
    async fn attribute(&mut self, el: &ElementHandle, name: &str) -> BrowserResult<Option<String>>;

    async fn click(&mut self, el: &ElementHandle) -> BrowserResult<()>;

    /// Type `keys` into the element. Special keys come from [`keys`].
    async fn send_keys(&mut self, el: &ElementHandle, keys: &str) -> BrowserResult<()>;

    /// Pick the `<option>` of a `<select>` whose visible text equals `text`.
    async fn select_by_visible_text(&mut self, select: &ElementHandle, text: &str) -> BrowserResult<()> {
        let options = self.find_all_in(select, &Locator::tag("option")).await?;
        for option in options {
            if self.text(&option).await?.trim() == text {
                return self.click(&option).await;
            }
        }
        Err(BrowserError::NotFound(format!("option with text {text:?}")))
    }

    /// End the session and release the browser.
    async fn close(&mut self) -> BrowserResult<()>;
}
