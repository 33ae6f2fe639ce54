use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use tee_core::browser::{BrowserError, BrowserResult, ElementHandle, Locator, Session};
use tracing::{debug, trace, warn};

use crate::{WebDriverError, protocol};

/// One WebDriver session.
///
/// Element lookups rely on the implicit wait set when the session was created.
#[derive(Debug)]
pub struct WebDriverSession {
    http: reqwest::Client,
    /// `{endpoint}/session/{id}`
    base: String,
    closed: bool,
}

impl WebDriverSession {
    pub(crate) fn new(http: reqwest::Client, endpoint: &str, id: &str) -> Self {
        Self {
            http,
            base: format!("{endpoint}/session/{id}"),
            closed: false,
        }
    }

    pub(crate) async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}{path}", self.base);
        trace!(%method, %url, "webdriver command");
        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| WebDriverError::Malformed(format!("{status}: {e}")))?;
        protocol::into_value(body)
    }

    /// Set the implicit element wait; a session that cannot be configured is deleted.
    pub(crate) async fn set_implicit_wait(&mut self, ms: u64) -> Result<(), WebDriverError> {
        let res = self
            .command(Method::POST, "/timeouts", Some(json!({ "implicit": ms })))
            .await;
        if let Err(e) = res {
            if let Err(close) = Session::close(self).await {
                warn!(session = %self.base, error = %close, "failed to delete unconfigured session");
            }
            return Err(e);
        }
        Ok(())
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> BrowserResult<Value> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }
        self.command(method, path, body).await.map_err(BrowserError::from)
    }

    async fn post(&self, path: &str, body: Value) -> BrowserResult<Value> {
        self.call(Method::POST, path, Some(body)).await
    }

    async fn get(&self, path: &str) -> BrowserResult<Value> {
        self.call(Method::GET, path, None).await
    }
}

fn decoded<T>(res: Result<T, WebDriverError>) -> BrowserResult<T> {
    res.map_err(BrowserError::from)
}

#[async_trait]
impl Session for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.post("/url", json!({ "url": url })).await?;
        Ok(())
    }

    async fn find(&mut self, by: &Locator) -> BrowserResult<ElementHandle> {
        let value = self.post("/element", protocol::locate(by)).await?;
        decoded(protocol::element(&value))
    }

    async fn find_all(&mut self, by: &Locator) -> BrowserResult<Vec<ElementHandle>> {
        let value = self.post("/elements", protocol::locate(by)).await?;
        decoded(protocol::elements(&value))
    }

    async fn find_in(&mut self, parent: &ElementHandle, by: &Locator) -> BrowserResult<ElementHandle> {
        let path = format!("/element/{}/element", parent.id());
        let value = self.post(&path, protocol::locate(by)).await?;
        decoded(protocol::element(&value))
    }

    async fn find_all_in(
        &mut self,
        parent: &ElementHandle,
        by: &Locator,
    ) -> BrowserResult<Vec<ElementHandle>> {
        let path = format!("/element/{}/elements", parent.id());
        let value = self.post(&path, protocol::locate(by)).await?;
        decoded(protocol::elements(&value))
    }

    async fn text(&mut self, el: &ElementHandle) -> BrowserResult<String> {
        let value = self.get(&format!("/element/{}/text", el.id())).await?;
        decoded(protocol::string(&value))
    }

    async fn attribute(&mut self, el: &ElementHandle, name: &str) -> BrowserResult<Option<String>> {
        // Properties carry the live value of form fields; attributes only the initial one.
        let value = self.get(&format!("/element/{}/property/{name}", el.id())).await?;
        if let Some(v) = protocol::optional_string(&value) {
            return Ok(Some(v));
        }
        let value = self.get(&format!("/element/{}/attribute/{name}", el.id())).await?;
        Ok(protocol::optional_string(&value))
    }

    async fn click(&mut self, el: &ElementHandle) -> BrowserResult<()> {
        self.post(&format!("/element/{}/click", el.id()), json!({})).await?;
        Ok(())
    }

    async fn send_keys(&mut self, el: &ElementHandle, keys: &str) -> BrowserResult<()> {
        self.post(&format!("/element/{}/value", el.id()), json!({ "text": keys }))
            .await?;
        Ok(())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }
        self.closed = true;
        self.command(Method::DELETE, "", None).await?;
        debug!(session = %self.base, "webdriver session deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_session_refuses_commands() {
        let mut session = WebDriverSession::new(reqwest::Client::new(), "http://127.0.0.1:9", "s-1");
        session.closed = true;
        assert!(matches!(
            session.navigate("https://example.com").await,
            Err(BrowserError::SessionClosed)
        ));
        assert!(matches!(session.close().await, Err(BrowserError::SessionClosed)));
    }

    #[test]
    fn command_urls_are_scoped_to_the_session() {
        let session = WebDriverSession::new(reqwest::Client::new(), "http://localhost:9515", "abc");
        assert_eq!(session.base, "http://localhost:9515/session/abc");
    }

    #[tokio::test]
    async fn failed_timeout_setup_deletes_the_session() {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let mut session = WebDriverSession::new(http, "http://127.0.0.1:9", "s-2");

        assert!(session.set_implicit_wait(2_000).await.is_err());
        assert!(session.closed);
    }
}
