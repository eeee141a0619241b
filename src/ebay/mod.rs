//! eBay-specific modules: browser boundary, collector, and data models.

pub mod browser;
pub mod collector;
pub mod models;
pub mod selectors;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{Browser, BrowserError, WebDriverBrowser};
pub use collector::{CollectError, Collector};
pub use models::{Collection, RawRecord, StopReason};
