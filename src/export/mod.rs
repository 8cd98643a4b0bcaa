//! History export: flat CSV rows and timestamped file saves.

use crate::domain::HistoryEntry;
use crate::error::ExportError;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column names, in order, as written to the header row.
pub const HEADER: [&str; 7] = [
    "waktu",
    "aksi",
    "gram",
    "harga_per_gram",
    "total",
    "saldo",
    "emas",
];

/// One exported history entry. Numbers are plain fixed-scale decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    #[serde(rename = "waktu")]
    pub time: String,
    #[serde(rename = "aksi")]
    pub action: String,
    #[serde(rename = "gram")]
    pub quantity: String,
    #[serde(rename = "harga_per_gram")]
    pub price_per_unit: String,
    pub total: String,
    #[serde(rename = "saldo")]
    pub cash_after: String,
    #[serde(rename = "emas")]
    pub holdings_after: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            time: entry.timestamp().to_string(),
            action: entry.action().as_str().to_string(),
            quantity: entry.quantity().to_plain_string(),
            price_per_unit: entry.price_per_unit().to_plain_string(),
            total: entry.total().to_plain_string(),
            cash_after: entry.cash_after().to_plain_string(),
            holdings_after: entry.holdings_after().to_plain_string(),
        }
    }
}

/// Write the header followed by every row.
///
/// The header is written even when `rows` is empty.
pub fn write_csv<W: Write>(rows: &[HistoryRow], writer: W) -> Result<(), ExportError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(HEADER)?;
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Render rows to a CSV string.
pub fn to_csv_string(rows: &[HistoryRow]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    // csv only emits the UTF-8 strings it was given.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// File name for a save made at `at`, e.g. `riwayat_emas_20240309_070500.csv`.
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("riwayat_emas_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Save rows under `dir` with a timestamped name and return the written path.
pub fn save_history(rows: &[HistoryRow], dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(Local::now().naive_local()));
    let file = std::fs::File::create(&path)?;
    write_csv(rows, std::io::BufWriter::new(file))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "history saved");
    Ok(path)
}
