//! Summarize command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::summary::{clean_prices, describe, render_histogram, top_n, SummaryError};
use crate::table;
use anyhow::Result;
use tracing::{info, warn};

/// Reads the record table and reports on its prices.
pub struct SummarizeCommand {
    config: Config,
}

impl SummarizeCommand {
    /// Creates a new summarize command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Cleans prices, renders the histogram and returns formatted statistics
    /// plus the top-priced records.
    pub fn execute(&self) -> Result<String> {
        let records = table::read_records(&self.config.records_path)?;
        let cleaned = clean_prices(&records);
        info!("{} of {} records have a usable price", cleaned.len(), records.len());

        let formatter = Formatter::new(self.config.format);

        let summary = match describe(&cleaned) {
            Ok(summary) => summary,
            Err(SummaryError::EmptyTable) => {
                warn!("Nothing to summarize in {}", self.config.records_path.display());
                return Ok(formatter.format_empty());
            }
        };

        let top = top_n(&cleaned, self.config.top_n);
        render_histogram(&cleaned, self.config.bins, &self.config.chart_path)?;

        Ok(formatter.format_report(&summary, &top))
    }
}
