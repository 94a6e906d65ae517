//! Plain-text rendering of a [`DashboardSnapshot`] for the `summary` view.

use std::fmt::Write;

use dashboard_core::formatting::{format_count, format_delta, percentage};
use dashboard_data::analysis::DashboardSnapshot;

/// Build the summary report printed by `--view summary`.
pub fn format_summary(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let view = &snapshot.current;
    let cmp = &snapshot.comparison;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "--- Website Traffic Summary ---");
    let _ = writeln!(
        out,
        "Date range: {} ({} days)",
        snapshot.range,
        snapshot.range.len_days()
    );
    let _ = writeln!(out, "Compared with: {}", snapshot.previous_range);
    let _ = writeln!(
        out,
        "Total traffics: {} ({} vs previous {})",
        format_count(cmp.current_traffic),
        format_delta(cmp.delta_traffic),
        format_count(cmp.previous_traffic)
    );
    let _ = writeln!(
        out,
        "Total visitors: {} ({} vs previous {})",
        format_count(cmp.current_visitors),
        format_delta(cmp.delta_visitors),
        format_count(cmp.previous_visitors)
    );

    if view.is_empty() {
        let _ = writeln!(out, "\nNo traffic in the selected range.");
        return out;
    }

    if let Some(peak) = view.traffic_by_date.iter().max_by_key(|p| p.count) {
        let _ = writeln!(
            out,
            "Busiest day: {} ({} visits)",
            peak.key,
            format_count(peak.count)
        );
    }
    if let Some(peak) = view.traffic_by_hour.iter().max_by_key(|p| p.count) {
        let _ = writeln!(
            out,
            "Busiest hour: {:02}:00 ({} visits)",
            peak.key,
            format_count(peak.count)
        );
    }

    let categorized: u64 = view.traffic_by_category.iter().map(|c| c.count).sum();
    let _ = writeln!(out, "\nTraffic by category:");
    for category in &view.traffic_by_category {
        let _ = writeln!(
            out,
            "- {}: {} visits ({:.1}%)",
            category.key,
            format_count(category.count),
            percentage(category.count, categorized, 1)
        );
    }

    let _ = writeln!(out, "\nTop {} pages:", view.top_pages.len());
    for (rank, page) in view.top_pages.iter().rev().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}: {} visits",
            rank + 1,
            page.key,
            format_count(page.count)
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dashboard_core::models::TrafficRecord;
    use dashboard_core::period::DateRange;
    use dashboard_data::analysis::analyze_range;
    use dashboard_data::store::DatasetStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn store() -> DatasetStore {
        let rows = [
            ("2024-01-01 09:00:00", "a", "blog", "Home"),
            ("2024-01-02 10:00:00", "b", "shop", "Cart"),
            ("2024-01-03 11:00:00", "a", "blog", "Home"),
            ("2024-01-03 11:30:00", "c", "blog", "About"),
            ("2024-01-05 13:00:00", "d", "shop", "Home"),
        ];
        DatasetStore::new(
            rows.iter()
                .map(|(ts, s, c, t)| {
                    let ts = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
                    TrafficRecord::new(ts, *s, *c, *t)
                })
                .collect(),
        )
    }

    #[test]
    fn test_summary_contains_headline_and_rankings() {
        let store = store();
        let snapshot = analyze_range(&store, DateRange::new(d(2024, 1, 3), d(2024, 1, 5)).unwrap());
        let text = format_summary(&snapshot);

        assert!(text.contains("Date range: 2024-01-03 to 2024-01-05 (3 days)"), "{text}");
        assert!(text.contains("Compared with: 2023-12-31 to 2024-01-02"), "{text}");
        assert!(text.contains("Total traffics: 3 (+1 vs previous 2)"), "{text}");
        assert!(text.contains("Busiest day: 2024-01-03 (2 visits)"), "{text}");
        assert!(text.contains("Busiest hour: 11:00 (2 visits)"), "{text}");
        assert!(text.contains("- blog: 2 visits (66.7%)"), "{text}");
        assert!(text.contains(" 1. Home: 2 visits"), "{text}");
        assert!(text.contains(" 2. About: 1 visits"), "{text}");
    }

    #[test]
    fn test_summary_for_empty_range() {
        let store = store();
        let snapshot = analyze_range(&store, DateRange::new(d(2024, 2, 1), d(2024, 2, 2)).unwrap());
        let text = format_summary(&snapshot);

        assert!(text.contains("Total traffics: 0 (0 vs previous 0)"), "{text}");
        assert!(text.contains("No traffic in the selected range."), "{text}");
        assert!(!text.contains("Top"), "{text}");
    }
}
