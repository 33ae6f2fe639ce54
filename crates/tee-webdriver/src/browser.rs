use async_trait::async_trait;
use tee_core::browser::{Browser, BrowserError, BrowserResult, Session};
use tracing::{debug, info};

use crate::{WebDriverConfig, WebDriverError, protocol, session::WebDriverSession};

/// Opens sessions on a W3C WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverBrowser {
    http: reqwest::Client,
    config: WebDriverConfig,
}

impl WebDriverBrowser {
    pub fn new(config: WebDriverConfig) -> Result<Self, WebDriverError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WebDriverConfig {
        &self.config
    }

    async fn start(&self) -> Result<WebDriverSession, WebDriverError> {
        let url = format!("{}/session", self.config.base_url());
        let body: serde_json::Value = self
            .http
            .post(&url)
            .json(&self.config.capabilities())
            .send()
            .await?
            .json()
            .await?;
        let id = protocol::session_id(&protocol::into_value(body)?)?;
        debug!(session = %id, "webdriver session created");

        let mut session = WebDriverSession::new(self.http.clone(), self.config.base_url(), &id);
        session.set_implicit_wait(self.config.implicit_wait_ms).await?;
        Ok(session)
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    fn name(&self) -> &'static str {
        "webdriver"
    }

    async fn open(&self) -> BrowserResult<Box<dyn Session>> {
        match self.start().await {
            Ok(session) => {
                info!(endpoint = %self.config.endpoint, browser = %self.config.browser, "browser session started");
                Ok(Box::new(session))
            }
            Err(e) => Err(BrowserError::SessionStart(e.to_string())),
        }
    }
}
