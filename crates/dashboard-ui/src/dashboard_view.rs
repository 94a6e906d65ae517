//! Full-screen dashboard layout.
//!
//! Two columns below the header, mirroring the metric-then-charts layout:
//! the left column carries "Total Traffics" with the date and hour charts,
//! the right column "Total Visitors" with the category breakdown and the top
//! pages.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use dashboard_data::analysis::DashboardSnapshot;

use crate::charts;
use crate::components::header::Header;
use crate::components::metric::MetricCard;
use crate::themes::Theme;

/// Height of the [`Header`] block.
const HEADER_HEIGHT: u16 = 4;
/// Height of a bordered metric card.
const METRIC_HEIGHT: u16 = 4;

/// Render `snapshot` into `area`.
///
/// `notice`, when present, is shown as an error banner under the header; it
/// carries a rejected selection while the last valid range stays on screen.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    timezone: &str,
    notice: Option<&str>,
    theme: &Theme,
) {
    let banner_height = if notice.is_some() { 1 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(banner_height),
            Constraint::Min(0),
        ])
        .split(area);

    let header = Header::new(
        snapshot.range.to_string(),
        Some(snapshot.previous_range.to_string()),
        timezone,
        theme,
    );
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), rows[0]);

    if let Some(message) = notice {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message.to_string(), theme.error))),
            rows[1],
        );
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    let column_rows = |area: Rect| {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(METRIC_HEIGHT),
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .split(area)
    };
    let left = column_rows(columns[0]);
    let right = column_rows(columns[1]);

    let comparison = &snapshot.comparison;
    render_metric(
        frame,
        left[0],
        MetricCard::new(
            "Total Traffics",
            comparison.current_traffic,
            comparison.delta_traffic,
            theme,
        ),
        theme,
    );
    render_metric(
        frame,
        right[0],
        MetricCard::new(
            "Total Visitors",
            comparison.current_visitors,
            comparison.delta_visitors,
            theme,
        ),
        theme,
    );

    let view = &snapshot.current;
    charts::render_date_chart(frame, left[1], &view.traffic_by_date, &snapshot.range, theme);
    charts::render_hour_chart(frame, left[2], &view.traffic_by_hour, theme);
    charts::render_category_breakdown(frame, right[1], &view.traffic_by_category, theme);
    charts::render_top_pages(frame, right[2], &view.top_pages, theme);
}

fn render_metric(frame: &mut Frame, area: Rect, card: MetricCard, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_block);
    frame.render_widget(Paragraph::new(Text::from(card.to_lines())).block(block), area);
}

/// Render a rejected selection when no earlier valid range exists.
///
/// Aggregation is withheld; only the message and the key hints are shown.
pub fn render_selection_error(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    timezone: &str,
    theme: &Theme,
) {
    let header = Header::new("no valid range", None, timezone, theme);
    let mut lines = header.to_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(message.to_string(), theme.error)));
    lines.push(Line::from(Span::styled(
        "Select two dates, or press 'a' for the whole dataset.",
        theme.dim,
    )));
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

/// Render the placeholder shown when the dataset has no records.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No traffic data found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "The data file contains a header but no records.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Traffic Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dashboard_core::models::TrafficRecord;
    use dashboard_core::period::DateRange;
    use dashboard_data::analysis::analyze_range;
    use dashboard_data::store::DatasetStore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_snapshot() -> DashboardSnapshot {
        let rows = [
            ("2024-01-01 09:00:00", "a", "blog", "Home"),
            ("2024-01-02 10:00:00", "b", "shop", "Cart"),
            ("2024-01-03 11:00:00", "a", "blog", "Home"),
            ("2024-01-04 12:00:00", "c", "blog", "About"),
            ("2024-01-05 13:00:00", "d", "shop", "Home"),
        ];
        let records = rows
            .iter()
            .map(|(ts, s, c, t)| {
                let ts = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
                TrafficRecord::new(ts, *s, *c, *t)
            })
            .collect();
        let store = DatasetStore::new(records);
        analyze_range(&store, DateRange::new(d(2024, 1, 3), d(2024, 1, 5)).unwrap())
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_dashboard_shows_metrics_and_periods() {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let snapshot = make_snapshot();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, &snapshot, "UTC", None, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("WEBSITE TRAFFIC DASHBOARD"));
        assert!(text.contains("2024-01-03 to 2024-01-05"));
        assert!(text.contains("2023-12-31 to 2024-01-02"));
        assert!(text.contains("Total Traffics"));
        assert!(text.contains("Total Visitors"));
        assert!(text.contains("Traffic by Date"));
        assert!(text.contains("Top 10 Pages"));
        // 3 current vs 2 previous
        assert!(text.contains("▲ +1"));
    }

    #[test]
    fn test_render_dashboard_with_notice() {
        let backend = TestBackend::new(120, 36);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let snapshot = make_snapshot();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(
                    frame,
                    area,
                    &snapshot,
                    "UTC",
                    Some("Invalid date range: two dates required"),
                    &theme,
                );
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Invalid date range"));
        assert!(text.contains("2024-01-03 to 2024-01-05"));
    }

    #[test]
    fn test_render_dashboard_tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();
        let snapshot = make_snapshot();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dashboard(frame, area, &snapshot, "UTC", None, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_selection_error() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_selection_error(frame, area, "Invalid date range: two dates required", "UTC", &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("no valid range"));
        assert!(text.contains("two dates required"));
        assert!(!text.contains("Total Traffics"));
    }

    #[test]
    fn test_render_no_data() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No traffic data found"));
    }
}
