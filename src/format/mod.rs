//! Output formatting for price summaries (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::summary::{CleanedRecord, PriceSummary};
use anyhow::Result;
use csv::{Terminator, WriterBuilder};
use serde::Serialize;

const TITLE_WIDTH: usize = 60;

/// Formats summaries for output.
pub struct Formatter {
    format: OutputFormat,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a PriceSummary,
    top: &'a [CleanedRecord],
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the statistics followed by the top-priced records.
    pub fn format_report(&self, summary: &PriceSummary, top: &[CleanedRecord]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&Report { summary, top })
                .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Table => {
                format!("{}\n\n{}", self.table_summary(summary), self.table_records(top))
            }
            OutputFormat::Markdown => {
                format!("{}\n\n{}", self.markdown_summary(summary), self.markdown_records(top))
            }
            OutputFormat::Csv => {
                let summary = self.csv_summary(summary).unwrap_or_default();
                let records = self.csv_records(top).unwrap_or_default();
                format!("{}\n\n{}", summary, records)
            }
        }
    }

    /// Message shown when nothing could be summarized.
    pub fn format_empty(&self) -> String {
        match self.format {
            OutputFormat::Json => "{}".to_string(),
            OutputFormat::Csv => String::new(),
            _ => "No records with a usable price.".to_string(),
        }
    }

    fn summary_rows(summary: &PriceSummary) -> Vec<(&'static str, String)> {
        vec![
            ("count", summary.count.to_string()),
            ("mean", format!("{:.2}", summary.mean)),
            ("std", summary.std.map_or_else(|| "NaN".to_string(), |s| format!("{:.2}", s))),
            ("min", format!("{:.2}", summary.min)),
            ("25%", format!("{:.2}", summary.q1)),
            ("50%", format!("{:.2}", summary.median)),
            ("75%", format!("{:.2}", summary.q3)),
            ("max", format!("{:.2}", summary.max)),
        ]
    }

    // Table formatting

    fn table_summary(&self, summary: &PriceSummary) -> String {
        let mut lines = vec!["Price summary".to_string(), format!("{:-<22}", "")];
        for (name, value) in Self::summary_rows(summary) {
            lines.push(format!("{:<8}{:>14}", name, value));
        }
        lines.join("\n")
    }

    fn table_records(&self, records: &[CleanedRecord]) -> String {
        let price_width = 12;
        let sales_width = 18;
        let title_width = TITLE_WIDTH;

        let mut lines = Vec::new();
        lines.push(format!(
            "{:>price_width$}  {:<sales_width$}  {}",
            "Price", "Sales", "Title"
        ));
        lines.push(format!(
            "{:-<price_width$}  {:-<sales_width$}  {:-<title_width$}",
            "", "", ""
        ));

        for record in records {
            lines.push(format!(
                "{:>price_width$.2}  {:<sales_width$}  {}",
                record.price,
                record.sales.as_deref().unwrap_or("N/A"),
                truncate(record.title.as_deref().unwrap_or("N/A"), title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Top {} by price", records.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_summary(&self, summary: &PriceSummary) -> String {
        let mut lines = vec![
            "## Price summary".to_string(),
            String::new(),
            "| Statistic | Value |".to_string(),
            "|-----------|-------|".to_string(),
        ];
        for (name, value) in Self::summary_rows(summary) {
            lines.push(format!("| {} | {} |", name, value));
        }
        lines.join("\n")
    }

    fn markdown_records(&self, records: &[CleanedRecord]) -> String {
        let mut lines = vec![
            format!("## Top {} by price", records.len()),
            String::new(),
            "| Price | Sales | Title |".to_string(),
            "|-------|-------|-------|".to_string(),
        ];

        for record in records {
            lines.push(format!(
                "| {:.2} | {} | {} |",
                record.price,
                record.sales.as_deref().unwrap_or(""),
                truncate(record.title.as_deref().unwrap_or(""), 40).replace('|', "\\|")
            ));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_summary(&self, summary: &PriceSummary) -> Result<String> {
        let rows = Self::summary_rows(summary);
        let header: Vec<&str> = rows.iter().map(|(name, _)| *name).collect();
        let values: Vec<&str> = rows.iter().map(|(_, value)| value.as_str()).collect();
        write_csv([header, values])
    }

    fn csv_records(&self, records: &[CleanedRecord]) -> Result<String> {
        let rows = records.iter().map(|record| {
            vec![
                record.title.clone().unwrap_or_default(),
                record.price.to_string(),
                record.sales.clone().unwrap_or_default(),
            ]
        });
        write_csv(std::iter::once(vec!["title".into(), "price".into(), "sales".into()]).chain(rows))
    }
}

/// Writes rows as CSV text, quoting fields only where needed.
fn write_csv<I, R, F>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let text = String::from_utf8(bytes)?;
    Ok(text.strip_suffix('\n').unwrap_or(&text).to_string())
}

/// Shortens `text` to at most `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
