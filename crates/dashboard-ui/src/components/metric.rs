use crate::themes::Theme;
use dashboard_core::formatting::{format_count, format_delta};
use ratatui::text::{Line, Span};

// ── MetricCard ───────────────────────────────────────────────────────────────

/// A headline count with its change against the previous period.
///
/// Renders as two lines:
///
/// ```text
/// Total Traffics
/// 1,234  ▲ +56
/// ```
pub struct MetricCard<'a> {
    pub label: &'a str,
    pub value: u64,
    pub delta: i64,
    pub theme: &'a Theme,
}

impl<'a> MetricCard<'a> {
    pub fn new(label: &'a str, value: u64, delta: i64, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            delta,
            theme,
        }
    }

    /// Arrow matching the sign of the delta.
    pub fn arrow(&self) -> &'static str {
        match self.delta.signum() {
            1 => "▲",
            -1 => "▼",
            _ => "●",
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let delta_style = self.theme.delta_style(self.delta);
        vec![
            Line::from(Span::styled(self.label, self.theme.label)),
            Line::from(vec![
                Span::styled(format_count(self.value), self.theme.value),
                Span::raw("  "),
                Span::styled(
                    format!("{} {}", self.arrow(), format_delta(self.delta)),
                    delta_style,
                ),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
