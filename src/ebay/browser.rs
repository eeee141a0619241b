//! Browser capability interface and its WebDriver implementation.
//!
//! The collector only talks to [`Browser`], so its control flow can be driven
//! by an in-memory fake in tests. Waiting is done by the caller through
//! polling; implementations answer each call immediately.

use crate::config::Config;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{debug, info};

/// Errors raised at the browser boundary.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A bounded wait expired.
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    /// A scoped lookup matched nothing.
    #[error("no element matches '{0}'")]
    NotFound(String),

    /// Any other driver or session failure.
    #[error("webdriver error: {0}")]
    Driver(String),
}

impl From<WebDriverError> for BrowserError {
    fn from(err: WebDriverError) -> Self {
        BrowserError::Driver(err.to_string())
    }
}

/// Minimal set of browser operations the collector needs.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Handle to an element on the current page.
    type Element: Send + Sync;

    /// Navigates to the given URL.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Returns all elements on the page matching the CSS selector.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>, BrowserError>;

    /// Finds the first descendant of `parent` matching the CSS selector.
    async fn find_in(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Self::Element, BrowserError>;

    /// Returns the visible text of an element.
    async fn text(&self, element: &Self::Element) -> Result<String, BrowserError>;

    /// Returns an attribute value, `None` if the attribute is not set.
    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Types text into an element.
    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<(), BrowserError>;

    /// Presses Enter in an element.
    async fn press_enter(&self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Whether the element is displayed and enabled.
    async fn is_clickable(&self, element: &Self::Element) -> Result<bool, BrowserError>;

    /// Clicks an element.
    async fn click(&self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Evaluates a script in the page and returns its value.
    async fn execute_script(&self, script: &str) -> Result<Value, BrowserError>;

    /// Returns the URL of the current page.
    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Returns the markup of the current page.
    async fn page_source(&self) -> Result<String, BrowserError>;

    /// Ends the session and releases the browser.
    async fn quit(self) -> Result<(), BrowserError>;
}

/// Chrome session driven through a WebDriver server (e.g. chromedriver).
pub struct WebDriverBrowser {
    driver: WebDriver,
}

impl WebDriverBrowser {
    /// Opens a new browser session against the configured WebDriver server.
    pub async fn connect(config: &Config) -> Result<Self, BrowserError> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--start-maximized")?;
        if config.headless {
            caps.set_headless()?;
        }

        debug!("Connecting to WebDriver at {}", config.webdriver_url);
        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;
        info!("Browser session started");

        Ok(Self { driver })
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        debug!("GET {}", url);
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<WebElement>, BrowserError> {
        Ok(self.driver.find_all(By::Css(selector)).await?)
    }

    async fn find_in(&self, parent: &WebElement, selector: &str) -> Result<WebElement, BrowserError> {
        parent
            .find_all(By::Css(selector))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::NotFound(selector.to_string()))
    }

    async fn text(&self, element: &WebElement) -> Result<String, BrowserError> {
        Ok(element.text().await?)
    }

    async fn attribute(
        &self,
        element: &WebElement,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(element.attr(name).await?)
    }

    async fn send_keys(&self, element: &WebElement, text: &str) -> Result<(), BrowserError> {
        element.send_keys(text).await?;
        Ok(())
    }

    async fn press_enter(&self, element: &WebElement) -> Result<(), BrowserError> {
        element.send_keys(Key::Enter).await?;
        Ok(())
    }

    async fn is_clickable(&self, element: &WebElement) -> Result<bool, BrowserError> {
        Ok(element.is_clickable().await?)
    }

    async fn click(&self, element: &WebElement) -> Result<(), BrowserError> {
        element.click().await?;
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<Value, BrowserError> {
        let ret = self.driver.execute(script, Vec::new()).await?;
        Ok(ret.json().clone())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        Ok(self.driver.source().await?)
    }

    async fn quit(self) -> Result<(), BrowserError> {
        self.driver.quit().await?;
        info!("Browser session closed");
        Ok(())
    }
}
