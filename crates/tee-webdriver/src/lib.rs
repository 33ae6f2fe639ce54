//! W3C WebDriver backend for the `tee-core` browser seam.
//!
//! Talks plain JSON over HTTP to a running driver (chromedriver, geckodriver).
mod error;
pub use error::WebDriverError;

mod config;
pub use config::WebDriverConfig;

mod protocol;

mod browser;
pub use browser::WebDriverBrowser;

mod session;
pub use session::WebDriverSession;
