//! CSV loading for the traffic log.
//!
//! Reads the exported traffic table and converts each row into a
//! [`TrafficRecord`]. Loading is all-or-nothing: a missing column or a
//! single unparseable `date` aborts the load with an error naming the line.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use csv::StringRecord;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{non_empty, TrafficRecord};
use dashboard_core::time_utils::parse_timestamp;
use serde::Deserialize;
use tracing::{debug, info};

/// Columns the dashboard reads; any others are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["date", "session_key", "uri_lvl_0", "uri_title"];

/// One CSV row as written in the export.
#[derive(Debug, Deserialize)]
struct RawTrafficRow {
    date: String,
    #[serde(default)]
    session_key: Option<String>,
    #[serde(default)]
    uri_lvl_0: Option<String>,
    #[serde(default)]
    uri_title: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every record from the CSV file at `path`, in file order.
pub fn load_traffic_records(path: &Path) -> Result<Vec<TrafficRecord>> {
    let start_time = Instant::now();
    info!("Loading traffic data from {}", path.display());

    let file = File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_traffic_csv(file)?;

    info!(
        "Loaded {} records from {} in {}ms",
        records.len(),
        path.display(),
        start_time.elapsed().as_millis()
    );
    Ok(records)
}

/// Parse traffic CSV from any reader. The first row must be the header.
pub fn parse_traffic_csv<R: Read>(source: R) -> Result<Vec<TrafficRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    check_required_columns(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(map_row(&row, &headers)?);
    }

    debug!("Parsed {} CSV rows", records.len());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn check_required_columns(headers: &StringRecord) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Convert one CSV row into a record, failing on an unparseable timestamp.
fn map_row(row: &StringRecord, headers: &StringRecord) -> Result<TrafficRecord> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    let raw: RawTrafficRow = row.deserialize(Some(headers))?;

    let timestamp = parse_timestamp(&raw.date).ok_or_else(|| DashboardError::TimestampParse {
        line,
        value: raw.date.clone(),
    })?;

    Ok(TrafficRecord {
        timestamp,
        session_key: raw.session_key.and_then(non_empty),
        uri_level0: raw.uri_lvl_0.and_then(non_empty),
        uri_title: raw.uri_title.and_then(non_empty),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
