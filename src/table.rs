//! Persisted record table (CSV with a `Title,Price,Sales` header).

use crate::ebay::RawRecord;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::debug;

/// Header row of the record table.
pub const HEADER: [&str; 3] = ["Title", "Price", "Sales"];

/// Writes the records to `path`, replacing any existing file.
///
/// The header is always written, so an empty run still yields a readable
/// table. Missing fields become empty cells.
pub fn write_records(path: impl AsRef<Path>, records: &[RawRecord]) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} records to {}", records.len(), path.display());

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create record table: {}", path.display()))?;

    writer.write_record(HEADER)?;
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record table: {}", path.display()))?;
    }
    writer.flush().with_context(|| format!("Failed to flush record table: {}", path.display()))?;

    Ok(())
}

/// Reads a record table written by [`write_records`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    debug!("Reading records from {}", path.display());

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open record table: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of record table: {}", path.display()))?;
    if headers.iter().ne(HEADER) {
        bail!(
            "Malformed record table: {} (expected header {}, found {})",
            path.display(),
            HEADER.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        );
    }

    let records = reader
        .deserialize::<RawRecord>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Malformed record table: {}", path.display()))?;

    debug!("Read {} records", records.len());
    Ok(records)
}
