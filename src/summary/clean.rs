//! Price cleaning for scraped records.

use crate::ebay::RawRecord;
use serde::Serialize;
use tracing::{debug, trace};

/// Currency token appended to prices on eBay Spain.
pub const CURRENCY_SUFFIX: &str = " EUR";

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// A record whose price parsed to a finite number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    /// Listing title
    pub title: Option<String>,
    /// Parsed price
    pub price: f64,
    /// Sales/hotness indicator
    pub sales: Option<String>,
}

impl CleanedRecord {
    /// Converts back to a raw record, formatting the price the way the site
    /// shows it (decimal comma and currency suffix).
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            title: self.title.clone(),
            price: Some(format_price(self.price)),
            sales: self.sales.clone(),
        }
    }
}

/// Parses a locale-formatted price such as `"1.234,56 EUR"`.
///
/// Returns `None` for anything that is not a single finite number once the
/// currency token and separators are normalized (ranges, "Gratis", ...).
pub fn parse_price(text: &str) -> Option<f64> {
    let normalized = text
        .replace(CURRENCY_SUFFIX, "")
        .replace(THOUSANDS_SEPARATOR, "")
        .replace(DECIMAL_SEPARATOR, ".");

    normalized.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Formats a price the way [`parse_price`] reads it back.
pub fn format_price(price: f64) -> String {
    format!("{}{}", price.to_string().replace('.', ","), CURRENCY_SUFFIX)
}

/// Keeps records with a parsable price, in table order.
pub fn clean_prices(records: &[RawRecord]) -> Vec<CleanedRecord> {
    let cleaned: Vec<CleanedRecord> = records
        .iter()
        .filter_map(|record| {
            let text = record.price.as_deref()?;
            let Some(price) = parse_price(text) else {
                trace!("Dropping unparsable price: {:?}", text);
                return None;
            };
            Some(CleanedRecord { title: record.title.clone(), price, sales: record.sales.clone() })
        })
        .collect();

    let dropped = records.len() - cleaned.len();
    if dropped > 0 {
        debug!("Dropped {} of {} records without a usable price", dropped, records.len());
    }

    cleaned
}
