//! Chart widgets for the dashboard: two line charts, the category share
//! breakdown and the top-pages bar chart.

use chrono::NaiveDate;
use dashboard_core::formatting::{format_count, percentage};
use dashboard_core::period::DateRange;
use dashboard_data::aggregator::CountPoint;
use ratatui::{
    layout::{Direction, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

/// Glyph used for the filled part of a share bar.
const SHARE_FILLED: char = '█';
/// Glyph used for the empty part of a share bar.
const SHARE_EMPTY: char = '░';

// ── Data shaping ─────────────────────────────────────────────────────────────

/// Chart points for the by-date series; x is the day offset from `range.start()`.
pub fn date_points(series: &[CountPoint<NaiveDate>], range: &DateRange) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|p| {
            let offset = (p.key - range.start()).num_days();
            (offset as f64, p.count as f64)
        })
        .collect()
}

/// Chart points for the by-hour series; x is the hour of day.
pub fn hour_points(series: &[CountPoint<u32>]) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|p| (f64::from(p.key), p.count as f64))
        .collect()
}

/// Upper y bound leaving a little headroom above the tallest point.
fn y_upper_bound(points: &[(f64, f64)]) -> f64 {
    let max = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        (max * 1.1).ceil()
    }
}

/// Shorten `text` so its display width is at most `max_width` columns.
///
/// Wide characters count double; a cut is marked with `…`.
pub fn fit_label(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

// ── Line charts ──────────────────────────────────────────────────────────────

fn chart_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_block)
        .title(Span::styled(format!(" {} ", title), theme.header))
}

#[allow(clippy::too_many_arguments)]
fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    points: &[(f64, f64)],
    x_bounds: [f64; 2],
    x_labels: Vec<String>,
    line_style: Style,
    theme: &Theme,
) {
    if points.is_empty() {
        render_empty_panel(frame, area, title, theme);
        return;
    }

    let y_max = y_upper_bound(points);
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(line_style)
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(title, theme))
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    format_count((y_max / 2.0).round() as u64),
                    format_count(y_max as u64),
                ]),
        );

    frame.render_widget(chart, area);
}

/// "Traffic by Date" line chart spanning the whole selected range.
pub fn render_date_chart(
    frame: &mut Frame,
    area: Rect,
    series: &[CountPoint<NaiveDate>],
    range: &DateRange,
    theme: &Theme,
) {
    let points = date_points(series, range);
    let last = (range.len_days() - 1).max(1) as f64;
    let labels = vec![
        range.start().format("%m-%d").to_string(),
        range.end().format("%m-%d").to_string(),
    ];
    render_line_chart(
        frame,
        area,
        "Traffic by Date",
        &points,
        [0.0, last],
        labels,
        theme.chart_date_line,
        theme,
    );
}

/// "Traffic by Hour" line chart over hours 0–23.
pub fn render_hour_chart(frame: &mut Frame, area: Rect, series: &[CountPoint<u32>], theme: &Theme) {
    let points = hour_points(series);
    let labels = ["0", "6", "12", "18", "23"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    render_line_chart(
        frame,
        area,
        "Traffic by Hour",
        &points,
        [0.0, 23.0],
        labels,
        theme.chart_hour_line,
        theme,
    );
}

// ── Category breakdown ───────────────────────────────────────────────────────

/// One share-bar line per category: label, bar, percentage and count.
///
/// Shares are relative to the sum of category counts, so records without a
/// category do not dilute the slices.
pub fn category_lines<'a>(
    categories: &[CountPoint<String>],
    width: u16,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let whole: u64 = categories.iter().map(|c| c.count).sum();
    let label_width = categories
        .iter()
        .map(|c| c.key.width())
        .max()
        .unwrap_or(0)
        .min(usize::from(width) / 3)
        .max(1);
    // label + space + bar + " 100.0% (count)"
    let bar_width = usize::from(width)
        .saturating_sub(label_width + 1 + 18)
        .max(4);

    categories
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let pct = percentage(c.count, whole, 1);
            let filled = ((pct / 100.0) * bar_width as f64).round() as usize;
            let filled = filled.min(bar_width);
            let label = fit_label(&c.key, label_width);
            let pad = label_width.saturating_sub(label.width());
            let color = Style::default().fg(theme.category_color(i));

            Line::from(vec![
                Span::styled(format!("{}{} ", label, " ".repeat(pad)), theme.label),
                Span::styled(SHARE_FILLED.to_string().repeat(filled), color),
                Span::styled(
                    SHARE_EMPTY.to_string().repeat(bar_width - filled),
                    theme.dim,
                ),
                Span::styled(format!(" {:>5.1}%", pct), theme.value),
                Span::styled(format!(" ({})", format_count(c.count)), theme.dim),
            ])
        })
        .collect()
}

/// "Traffic by Category" proportion breakdown.
pub fn render_category_breakdown(
    frame: &mut Frame,
    area: Rect,
    categories: &[CountPoint<String>],
    theme: &Theme,
) {
    let title = "Traffic by Category";
    if categories.is_empty() {
        render_empty_panel(frame, area, title, theme);
        return;
    }
    let inner_width = area.width.saturating_sub(2);
    let lines = category_lines(categories, inner_width, theme);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(chart_block(title, theme)),
        area,
    );
}

// ── Top pages ────────────────────────────────────────────────────────────────

/// "Top 10 Pages" horizontal bar chart.
///
/// `pages` is ascending by count (the most viewed page last); bars are drawn
/// top-down, so the list is walked in reverse to put the leader on top.
pub fn render_top_pages(frame: &mut Frame, area: Rect, pages: &[CountPoint<String>], theme: &Theme) {
    let title = "Top 10 Pages";
    if pages.is_empty() {
        render_empty_panel(frame, area, title, theme);
        return;
    }

    let label_width = usize::from(area.width / 3).max(4);
    let bars: Vec<Bar> = pages
        .iter()
        .rev()
        .map(|p| {
            Bar::default()
                .value(p.count)
                .label(Line::from(fit_label(&p.key, label_width)))
                .text_value(format_count(p.count))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(title, theme))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(theme.bar)
        .value_style(theme.bar_value)
        .label_style(theme.label)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

// ── Placeholder ──────────────────────────────────────────────────────────────

fn render_empty_panel(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from(Span::styled("No data", theme.dim)))
        .block(chart_block(title, theme));
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
