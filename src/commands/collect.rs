//! Collect command implementation.

use crate::config::Config;
use crate::ebay::{Browser, Collector, WebDriverBrowser};
use crate::table;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Scrapes search results and persists the record table.
pub struct CollectCommand {
    config: Config,
}

impl CollectCommand {
    /// Creates a new collect command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Opens a browser session, collects, and writes the record table.
    pub async fn execute(&self) -> Result<String> {
        let browser = WebDriverBrowser::connect(&self.config)
            .await
            .with_context(|| {
                format!("Failed to start browser session at {}", self.config.webdriver_url)
            })?;

        self.execute_with_browser(browser).await
    }

    /// Collects with a provided browser (for testing).
    ///
    /// The session is closed before returning, whatever the outcome. The
    /// record table is written only when collection got past the search box.
    pub async fn execute_with_browser<B: Browser>(&self, browser: B) -> Result<String> {
        info!("Searching {} for: {}", self.config.base_url, self.config.query);

        let outcome = Collector::new(&browser, &self.config).collect().await;

        if let Err(e) = browser.quit().await {
            warn!("Failed to close browser session: {}", e);
        }

        let collection = outcome.context("Collection aborted")?;

        table::write_records(&self.config.records_path, &collection.records)?;

        Ok(format!(
            "Scraping finished ({}): {} records from {} pages saved to {}",
            collection.stop,
            collection.count(),
            collection.pages,
            self.config.records_path.display()
        ))
    }
}
