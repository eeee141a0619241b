//! Descriptive statistics and ranking over cleaned prices.

use super::clean::CleanedRecord;
use super::SummaryError;
use serde::Serialize;

/// Descriptive statistics of the price column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two prices
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Computes count, mean, std, min, quartiles and max of the prices.
///
/// Quartiles use linear interpolation between closest ranks. An empty table
/// is reported as [`SummaryError::EmptyTable`].
pub fn describe(cleaned: &[CleanedRecord]) -> Result<PriceSummary, SummaryError> {
    if cleaned.is_empty() {
        return Err(SummaryError::EmptyTable);
    }

    let mut prices: Vec<f64> = cleaned.iter().map(|r| r.price).collect();
    prices.sort_by(f64::total_cmp);

    let count = prices.len();
    let mean = prices.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = prices.iter().map(|p| (p - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    Ok(PriceSummary {
        count,
        mean,
        std,
        min: prices[0],
        q1: quantile(&prices, 0.25),
        median: quantile(&prices, 0.5),
        q3: quantile(&prices, 0.75),
        max: prices[count - 1],
    })
}

/// Linear-interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Returns the `n` highest-priced records, ties kept in table order.
pub fn top_n(cleaned: &[CleanedRecord], n: usize) -> Vec<CleanedRecord> {
    let mut ranked = cleaned.to_vec();
    // sort_by is stable, so equal prices keep their relative order
    ranked.sort_by(|a, b| b.price.total_cmp(&a.price));
    ranked.truncate(n);
    ranked
}
