//! ebay-crawler - Browser-driven eBay search scraper
//!
//! Collects search results through a WebDriver session into a CSV table,
//! then summarizes the prices (statistics, top items, histogram).

pub mod commands;
pub mod config;
pub mod ebay;
pub mod format;
pub mod summary;
pub mod table;

pub use config::Config;
pub use ebay::{Collection, RawRecord, StopReason};
pub use summary::{CleanedRecord, PriceSummary};
