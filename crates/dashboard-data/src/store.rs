//! In-memory dataset holding every traffic record for the process lifetime.

use std::path::Path;

use chrono::NaiveDate;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::TrafficRecord;
use dashboard_core::period::DateRange;
use tracing::debug;

use crate::reader;

/// Read-only collection of traffic records, kept in chronological order.
///
/// Records with equal timestamps keep their load order, which makes
/// "first appearance" tie-breaks in the aggregator deterministic.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    records: Vec<TrafficRecord>,
}

impl DatasetStore {
    pub fn new(mut records: Vec<TrafficRecord>) -> Self {
        // Stable: equal timestamps stay in load order.
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    /// Load the CSV at `path` into a store.
    pub fn load(path: &Path) -> Result<Self> {
        reader::load_traffic_records(path).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrafficRecord] {
        &self.records
    }

    /// Earliest and latest record dates.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date(), last.date()))
    }

    /// The full dataset span, or [`DashboardError::EmptyDataset`].
    pub fn span(&self) -> Result<DateRange> {
        let (min, max) = self.date_bounds().ok_or(DashboardError::EmptyDataset)?;
        DateRange::new(min, max)
    }

    /// Records whose date falls inside `range` (both ends inclusive).
    ///
    /// Records are sorted, so the result is one contiguous slice.
    pub fn filter(&self, range: &DateRange) -> &[TrafficRecord] {
        let lo = self
            .records
            .partition_point(|r| r.date() < range.start());
        let hi = self
            .records
            .partition_point(|r| r.date() <= range.end());
        let slice = &self.records[lo..hi.max(lo)];
        debug!("Range {} matched {} records", range, slice.len());
        slice
    }
}
