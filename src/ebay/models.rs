//! Data models for scraped eBay search results.

use serde::{Deserialize, Serialize};

/// One scraped search-result item.
///
/// Every field is best-effort: a field the page did not expose (or that could
/// not be read) is `None`. Serialized with the `Title,Price,Sales` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Listing title
    #[serde(rename = "Title")]
    pub title: Option<String>,
    /// Price text as shown on the page (e.g. "1.234,56 EUR")
    #[serde(rename = "Price")]
    pub price: Option<String>,
    /// Sales/hotness indicator (e.g. "+100 vendidos")
    #[serde(rename = "Sales")]
    pub sales: Option<String>,
}

impl RawRecord {
    /// Creates a record, normalizing blank text to `None`.
    pub fn new(title: Option<String>, price: Option<String>, sales: Option<String>) -> Self {
        Self { title: non_blank(title), price: non_blank(price), sales: non_blank(sales) }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Why the collection loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The next-page control is absent or disabled.
    NoMorePages,
    /// Clicking next or waiting for the new page failed.
    PageAdvanceFailed(String),
    /// No result items appeared on the current page.
    NoResults,
}

impl StopReason {
    /// Returns true for a normal end of results.
    pub fn is_normal(&self) -> bool {
        matches!(self, StopReason::NoMorePages)
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::NoMorePages => write!(f, "no more pages"),
            StopReason::PageAdvanceFailed(reason) => write!(f, "page advance failed: {}", reason),
            StopReason::NoResults => write!(f, "no result items on page"),
        }
    }
}

/// Output of one collection run.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Records in page order, then DOM order
    pub records: Vec<RawRecord>,
    /// Number of result pages visited
    pub pages: u32,
    /// Terminal signal that ended the loop
    pub stop: StopReason,
}

impl Collection {
    /// Returns number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
