use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::WebDriverError;

/// Where the driver runs and how sessions are started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebDriverConfig {
    /// Base URL of the driver, e.g. a local chromedriver.
    pub endpoint: String,
    /// `browserName` capability: `chrome` or `firefox`.
    pub browser: String,
    pub headless: bool,
    /// Implicit wait applied to every element lookup.
    pub implicit_wait_ms: u64,
    /// Upper bound for a single driver request.
    pub request_timeout_ms: u64,
    /// Extra command-line arguments for the browser.
    pub args: Vec<String>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9515".into(),
            browser: "chrome".into(),
            headless: false,
            implicit_wait_ms: 3000,
            request_timeout_ms: 30_000,
            args: Vec::new(),
        }
    }
}

impl WebDriverConfig {
    pub fn validate(&self) -> Result<(), WebDriverError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(WebDriverError::InvalidConfig(format!(
                "endpoint must be an http(s) url, got {:?}",
                self.endpoint
            )));
        }
        if self.browser.trim().is_empty() {
            return Err(WebDriverError::InvalidConfig("browser name is empty".into()));
        }
        if self.request_timeout_ms <= self.implicit_wait_ms {
            return Err(WebDriverError::InvalidConfig(
                "requestTimeoutMs must exceed implicitWaitMs".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Endpoint without a trailing slash.
    pub(crate) fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Body of the new-session request.
    pub fn capabilities(&self) -> Value {
        let browser = self.browser.to_ascii_lowercase();
        let mut args = self.args.clone();
        let options_key = match browser.as_str() {
            "firefox" => {
                if self.headless {
                    args.push("-headless".into());
                }
                "moz:firefoxOptions"
            }
            _ => {
                if self.headless {
                    args.push("--headless=new".into());
                }
                "goog:chromeOptions"
            }
        };
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": browser,
                    options_key: { "args": args },
                }
            }
        })
    }
}
