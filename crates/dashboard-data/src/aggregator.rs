//! Aggregate views over a subset of traffic records.
//!
//! Every function here is pure: the result depends only on the records
//! passed in, and an empty subset yields zero counts and empty series.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use dashboard_core::models::TrafficRecord;
use serde::Serialize;

/// How many pages the top-pages ranking keeps.
pub const TOP_PAGES_LIMIT: usize = 10;

// ── CountPoint ────────────────────────────────────────────────────────────────

/// One bucket of a series or breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountPoint<K> {
    pub key: K,
    pub count: u64,
}

impl<K> CountPoint<K> {
    pub fn new(key: K, count: u64) -> Self {
        Self { key, count }
    }
}

// ── AggregateView ─────────────────────────────────────────────────────────────

/// Everything the dashboard shows for one record subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateView {
    /// Number of records.
    pub total_traffic: u64,
    /// Number of distinct non-missing session keys.
    pub distinct_visitors: u64,
    /// Records per calendar date, ascending by date.
    pub traffic_by_date: Vec<CountPoint<NaiveDate>>,
    /// Records per hour of day, ascending; hours with no traffic are absent.
    pub traffic_by_hour: Vec<CountPoint<u32>>,
    /// Records per top-level category, descending by count.
    pub traffic_by_category: Vec<CountPoint<String>>,
    /// The [`TOP_PAGES_LIMIT`] most viewed titles, ascending by count
    /// (the most viewed page is last).
    pub top_pages: Vec<CountPoint<String>>,
}

impl AggregateView {
    pub fn is_empty(&self) -> bool {
        self.total_traffic == 0
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper that groups traffic records into dashboard views.
pub struct Aggregator;

impl Aggregator {
    /// Compute the full [`AggregateView`] for `records`.
    pub fn aggregate(records: &[TrafficRecord]) -> AggregateView {
        AggregateView {
            total_traffic: records.len() as u64,
            distinct_visitors: Self::distinct_visitors(records),
            traffic_by_date: Self::traffic_by_date(records),
            traffic_by_hour: Self::traffic_by_hour(records),
            traffic_by_category: Self::traffic_by_category(records),
            top_pages: Self::top_pages(records, TOP_PAGES_LIMIT),
        }
    }

    /// `(total records, distinct visitors)` without building the series.
    pub fn totals(records: &[TrafficRecord]) -> (u64, u64) {
        (records.len() as u64, Self::distinct_visitors(records))
    }

    /// Number of unique session keys; missing keys are not counted.
    pub fn distinct_visitors(records: &[TrafficRecord]) -> u64 {
        records
            .iter()
            .filter_map(|r| r.session_key.as_deref())
            .collect::<HashSet<&str>>()
            .len() as u64
    }

    /// One point per date present, ascending.
    pub fn traffic_by_date(records: &[TrafficRecord]) -> Vec<CountPoint<NaiveDate>> {
        Self::bucket_sorted(records, TrafficRecord::date)
    }

    /// One point per hour present, ascending.
    pub fn traffic_by_hour(records: &[TrafficRecord]) -> Vec<CountPoint<u32>> {
        Self::bucket_sorted(records, TrafficRecord::hour_of_day)
    }

    /// Category counts, descending. Ties keep first-appearance order.
    pub fn traffic_by_category(records: &[TrafficRecord]) -> Vec<CountPoint<String>> {
        Self::ranked_counts(records.iter().filter_map(|r| r.uri_level0.as_deref()))
    }

    /// The `limit` most viewed titles, returned ascending by count.
    ///
    /// Selection ranks by count descending with first-appearance tie-break;
    /// the output is that ranking reversed, so the top page comes last.
    pub fn top_pages(records: &[TrafficRecord], limit: usize) -> Vec<CountPoint<String>> {
        let mut ranked =
            Self::ranked_counts(records.iter().filter_map(|r| r.uri_title.as_deref()));
        ranked.truncate(limit);
        ranked.reverse();
        ranked
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Count records per key; `BTreeMap` keeps keys ascending.
    fn bucket_sorted<K: Ord>(
        records: &[TrafficRecord],
        key_fn: impl Fn(&TrafficRecord) -> K,
    ) -> Vec<CountPoint<K>> {
        let mut map: BTreeMap<K, u64> = BTreeMap::new();
        for record in records {
            *map.entry(key_fn(record)).or_insert(0) += 1;
        }
        map.into_iter()
            .map(|(key, count)| CountPoint::new(key, count))
            .collect()
    }

    /// Count labels and sort by count descending, then by first appearance.
    fn ranked_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CountPoint<String>> {
        // label -> (first index seen, count)
        let mut seen: HashMap<&str, (usize, u64)> = HashMap::new();
        for (idx, label) in labels.enumerate() {
            seen.entry(label).or_insert((idx, 0)).1 += 1;
        }

        let mut ranked: Vec<(usize, &str, u64)> = seen
            .into_iter()
            .map(|(label, (first, count))| (first, label, count))
            .collect();
        ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .map(|(_, label, count)| CountPoint::new(label.to_string(), count))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
