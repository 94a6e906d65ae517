//! Per-selection analysis pipeline.
//!
//! Turns a date selection into a [`DashboardSnapshot`]: resolve the range,
//! derive the comparison period, aggregate the current subset and compare its
//! headline counts with the previous subset.

use std::time::Instant;

use chrono::NaiveDate;
use dashboard_core::error::Result;
use dashboard_core::period::{self, DateRange};
use dashboard_core::settings::DateSelection;
use serde::Serialize;
use tracing::info;

use crate::aggregator::{AggregateView, Aggregator};
use crate::comparison::{compare, ComparisonResult};
use crate::store::DatasetStore;

/// Everything the presentation layer needs for one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub range: DateRange,
    pub previous_range: DateRange,
    pub current: AggregateView,
    pub comparison: ComparisonResult,
}

/// Resolve a user selection against the dataset.
///
/// [`DateSelection::Default`] is `today`'s month clamped to the data; explicit
/// dates go through [`period::validate_selection`]. Fails with
/// `EmptyDataset` when the store has no records.
pub fn resolve_selection(
    store: &DatasetStore,
    selection: &DateSelection,
    today: NaiveDate,
) -> Result<DateRange> {
    let span = store.span()?;
    match selection {
        DateSelection::Default => period::resolve_default_range(span.start(), span.end(), today),
        DateSelection::Dates(dates) => period::validate_selection(dates, span),
    }
}

/// Compute the snapshot for `range`. Never fails; empty periods give zeros.
pub fn analyze_range(store: &DatasetStore, range: DateRange) -> DashboardSnapshot {
    let start_time = Instant::now();

    let previous_range = period::resolve_previous_period(&range);

    let current = Aggregator::aggregate(store.filter(&range));
    let (previous_traffic, previous_visitors) = Aggregator::totals(store.filter(&previous_range));

    let comparison = compare(
        current.total_traffic,
        current.distinct_visitors,
        previous_traffic,
        previous_visitors,
    );

    info!(
        "Analyzed {} ({} records) against {} ({} records) in {}µs",
        range,
        current.total_traffic,
        previous_range,
        previous_traffic,
        start_time.elapsed().as_micros()
    );

    DashboardSnapshot {
        range,
        previous_range,
        current,
        comparison,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use dashboard_core::error::DashboardError;
    use dashboard_core::models::TrafficRecord;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// One record per day 2024-01-01..=2024-01-05, one session each.
    fn five_day_store() -> DatasetStore {
        let records = (1..=5)
            .map(|day| {
                let ts = NaiveDateTime::parse_from_str(
                    &format!("2024-01-0{day} 12:00:00"),
                    "%Y-%m-%d %H:%M:%S",
                )
                .unwrap();
                TrafficRecord::new(ts, format!("s{day}"), "blog", format!("Post {day}"))
            })
            .collect();
        DatasetStore::new(records)
    }

    #[test]
    fn test_selection_compared_with_previous_period() {
        let store = five_day_store();
        let range = DateRange::new(d(2024, 1, 3), d(2024, 1, 5)).unwrap();

        let snapshot = analyze_range(&store, range);

        assert_eq!(snapshot.current.total_traffic, 3);
        assert_eq!(snapshot.current.distinct_visitors, 3);
        assert_eq!(
            snapshot.previous_range,
            DateRange::new(d(2023, 12, 31), d(2024, 1, 2)).unwrap()
        );
        assert_eq!(snapshot.comparison.previous_traffic, 2);
        assert_eq!(snapshot.comparison.previous_visitors, 2);
        assert_eq!(snapshot.comparison.delta_traffic, 1);
        assert_eq!(snapshot.comparison.delta_visitors, 1);
    }

    #[test]
    fn test_previous_period_before_dataset_is_zero() {
        let store = five_day_store();
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 2)).unwrap();

        let snapshot = analyze_range(&store, range);

        assert_eq!(snapshot.comparison.previous_traffic, 0);
        assert_eq!(snapshot.comparison.delta_traffic, 2);
    }

    #[test]
    fn test_range_without_data_is_all_zero() {
        let store = five_day_store();
        let range = DateRange::new(d(2024, 3, 1), d(2024, 3, 5)).unwrap();

        let snapshot = analyze_range(&store, range);

        assert!(snapshot.current.is_empty());
        assert!(snapshot.current.traffic_by_date.is_empty());
        assert_eq!(snapshot.comparison.delta_traffic, 0);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let store = five_day_store();
        let range = DateRange::new(d(2024, 1, 2), d(2024, 1, 4)).unwrap();
        assert_eq!(analyze_range(&store, range), analyze_range(&store, range));
    }

    #[test]
    fn test_resolve_selection_default_uses_current_month() {
        let store = five_day_store();
        let range = resolve_selection(&store, &DateSelection::Default, d(2024, 1, 20)).unwrap();
        assert_eq!(range, DateRange::new(d(2024, 1, 1), d(2024, 1, 5)).unwrap());
    }

    #[test]
    fn test_resolve_selection_no_dates_is_full_span() {
        let store = five_day_store();
        let range =
            resolve_selection(&store, &DateSelection::Dates(vec![]), d(2030, 1, 1)).unwrap();
        assert_eq!(range, store.span().unwrap());
    }

    #[test]
    fn test_resolve_selection_single_date_is_invalid() {
        let store = five_day_store();
        let err = resolve_selection(
            &store,
            &DateSelection::Dates(vec![d(2024, 1, 2)]),
            d(2024, 1, 20),
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidSelection(_)));
    }

    #[test]
    fn test_resolve_selection_empty_store() {
        let store = DatasetStore::default();
        let err = resolve_selection(&store, &DateSelection::Default, d(2024, 1, 20)).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset));
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let store = five_day_store();
        let range = DateRange::new(d(2024, 1, 3), d(2024, 1, 5)).unwrap();
        let json = serde_json::to_value(analyze_range(&store, range)).unwrap();

        assert_eq!(json["range"]["start"], "2024-01-03");
        assert_eq!(json["previous_range"]["end"], "2024-01-02");
        assert_eq!(json["current"]["total_traffic"], 3);
        assert_eq!(json["current"]["traffic_by_date"][0]["key"], "2024-01-03");
        assert_eq!(json["comparison"]["delta_traffic"], 1);
    }
}
