//! Price cleaning, statistics, ranking, and histogram rendering.

pub mod chart;
pub mod clean;
pub mod stats;

use thiserror::Error;

pub use chart::{render_histogram, Bin, Histogram};
pub use clean::{clean_prices, parse_price, CleanedRecord};
pub use stats::{describe, top_n, PriceSummary};

/// Errors raised while summarizing.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// No record has a usable price.
    #[error("no records with a usable price")]
    EmptyTable,
}
