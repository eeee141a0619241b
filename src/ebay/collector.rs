//! Browser-driven collection of eBay search results.

use crate::config::Config;
use crate::ebay::browser::{Browser, BrowserError};
use crate::ebay::models::{Collection, RawRecord, StopReason};
use crate::ebay::selectors::{self, home, results};
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, trace, warn};

/// Script used to check whether navigation has finished.
const READY_STATE_SCRIPT: &str = "return document.readyState";

/// Markup characters kept in diagnostics.
const SNIPPET_CHARS: usize = 500;

/// Errors that abort a collection run.
#[derive(Debug, Error)]
pub enum CollectError {
    /// None of the search box selectors matched.
    #[error(
        "search input not found with any known selector (url: {url}, title: {title:?}); \
         page starts with: {snippet}"
    )]
    SearchInputNotFound { url: String, title: Option<String>, snippet: String },

    /// Navigation or typing failed before any results page was reached.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// Drives one search session: query, then scrape and paginate.
pub struct Collector<'a, B: Browser> {
    browser: &'a B,
    base_url: String,
    query: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a, B: Browser> Collector<'a, B> {
    /// Creates a collector bound to a browser session.
    pub fn new(browser: &'a B, config: &Config) -> Self {
        Self {
            browser,
            base_url: config.base_url.clone(),
            query: config.query.clone(),
            timeout: config.timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Runs the full flow: landing page, search, then every results page.
    ///
    /// Only a missing search box (or a failure before the first results page)
    /// is an error. Pagination problems end the loop and keep what was
    /// scraped so far.
    pub async fn collect(&self) -> Result<Collection, CollectError> {
        self.browser.goto(&self.base_url).await?;

        let input = self.locate_search_input().await?;
        self.submit_query(&input, &self.query).await?;

        let mut records = Vec::new();
        let mut page = 1;

        let stop = loop {
            info!("Scraping page {}...", page);

            match self.scrape_current_page().await {
                Ok(found) => {
                    debug!("Page {} returned {} items", page, found.len());
                    records.extend(found);
                }
                Err(e) => {
                    warn!("No result items on page {}: {}", page, e);
                    break StopReason::NoResults;
                }
            }

            match self.advance_page().await {
                Ok(()) => page += 1,
                Err(stop) => break stop,
            }
        };

        match &stop {
            StopReason::NoMorePages => info!("Reached the last page"),
            StopReason::PageAdvanceFailed(reason) => {
                warn!("Stopped after page {}: {}", page, reason)
            }
            StopReason::NoResults => {}
        }

        info!("Collected {} records from {} pages", records.len(), page);

        Ok(Collection { records, pages: page, stop })
    }

    /// Tries each search box selector in order and returns the first match.
    pub async fn locate_search_input(&self) -> Result<B::Element, CollectError> {
        for selector in home::SEARCH_INPUT {
            match self.wait_for_first(selector).await {
                Ok(element) => {
                    info!("Search box found with selector: {}", selector);
                    return Ok(element);
                }
                Err(e) => debug!("Search box selector '{}' failed: {}", selector, e),
            }
        }

        Err(self.search_input_not_found().await)
    }

    /// Types the query into the search box and submits it.
    pub async fn submit_query(&self, element: &B::Element, text: &str) -> Result<(), CollectError> {
        debug!("Submitting query: {}", text);
        self.browser.send_keys(element, text).await?;
        self.browser.press_enter(element).await?;
        Ok(())
    }

    /// Extracts every result item on the current page, in DOM order.
    ///
    /// Fields are read independently: a field that cannot be read is `None`
    /// and the rest of the item is kept.
    pub async fn scrape_current_page(&self) -> Result<Vec<RawRecord>, BrowserError> {
        self.wait_for_first(results::ITEM).await?;

        let items = self.browser.find_all(results::ITEM).await?;
        let mut records = Vec::with_capacity(items.len());

        for item in &items {
            let title = self.read_field(item, results::TITLE).await;
            let price = self.read_field(item, results::PRICE).await;
            let sales = self.read_field(item, results::SALES).await;

            records.push(RawRecord::new(title.ok(), price.ok(), sales.ok()));
        }

        Ok(records)
    }

    /// Moves to the next results page.
    ///
    /// Returns the terminal signal when there is nothing left to visit or the
    /// navigation did not complete.
    pub async fn advance_page(&self) -> Result<(), StopReason> {
        let failed = |e: BrowserError| StopReason::PageAdvanceFailed(e.to_string());

        let next = match self.wait_for_first(results::NEXT_PAGE).await {
            Ok(element) => element,
            Err(e @ BrowserError::Timeout { .. }) => {
                debug!("Next page control not available: {}", e);
                return Err(StopReason::NoMorePages);
            }
            Err(e) => return Err(failed(e)),
        };

        if self.is_disabled(&next).await.map_err(failed)? {
            return Err(StopReason::NoMorePages);
        }

        self.wait_until_clickable(&next).await.map_err(failed)?;
        self.browser.click(&next).await.map_err(failed)?;

        // readyState can report "complete" before client-side rendering ends
        self.wait_until_ready().await.map_err(failed)?;

        Ok(())
    }

    async fn read_field(&self, item: &B::Element, selector: &str) -> Result<String, BrowserError> {
        let text = match self.browser.find_in(item, selector).await {
            Ok(element) => self.browser.text(&element).await,
            Err(e) => Err(e),
        };
        text.inspect_err(|e| trace!("Field '{}' unreadable: {}", selector, e))
    }

    async fn is_disabled(&self, next: &B::Element) -> Result<bool, BrowserError> {
        let class = self.browser.attribute(next, "class").await?.unwrap_or_default();
        if class.contains(results::DISABLED_CLASS) {
            return Ok(true);
        }

        let aria = self.browser.attribute(next, "aria-disabled").await?;
        Ok(aria.as_deref() == Some("true"))
    }

    /// Polls until `selector` matches at least one element.
    ///
    /// When the deadline passes, the error of the last lookup is returned if
    /// that lookup failed; `Timeout` means the page simply had no match.
    async fn wait_for_first(&self, selector: &str) -> Result<B::Element, BrowserError> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let last_error = match self.browser.find_all(selector).await {
                Ok(found) => match found.into_iter().next() {
                    Some(element) => return Ok(element),
                    None => None,
                },
                Err(e) => {
                    trace!("Lookup '{}' failed: {}", selector, e);
                    Some(e)
                }
            };

            let now = Instant::now();
            if now >= deadline {
                return Err(last_error.unwrap_or_else(|| BrowserError::Timeout {
                    what: selector.to_string(),
                    timeout: self.timeout,
                }));
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// Polls until the element is displayed and enabled.
    async fn wait_until_clickable(&self, element: &B::Element) -> Result<(), BrowserError> {
        let deadline = Instant::now() + self.timeout;

        loop {
            if self.browser.is_clickable(element).await? {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(BrowserError::Timeout {
                    what: "clickable next page control".to_string(),
                    timeout: self.timeout,
                });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// Polls `document.readyState` until it reports "complete".
    async fn wait_until_ready(&self) -> Result<(), BrowserError> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let state = self.browser.execute_script(READY_STATE_SCRIPT).await?;
            if state == Value::from("complete") {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(BrowserError::Timeout {
                    what: "document.readyState == \"complete\"".to_string(),
                    timeout: self.timeout,
                });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    async fn search_input_not_found(&self) -> CollectError {
        let url = self.browser.current_url().await.unwrap_or_else(|e| format!("<unknown: {}>", e));
        let source = self.browser.page_source().await.unwrap_or_default();

        CollectError::SearchInputNotFound {
            url,
            title: page_title(&source),
            snippet: source.chars().take(SNIPPET_CHARS).collect(),
        }
    }
}

/// Extracts the document `<title>` text, if any.
fn page_title(source: &str) -> Option<String> {
    let selector = Selector::parse(selectors::PAGE_TITLE).ok()?;
    let document = Html::parse_document(source);
    let title = document.select(&selector).next()?.text().collect::<String>();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}
