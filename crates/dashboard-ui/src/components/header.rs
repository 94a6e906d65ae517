use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Application title shown on the first header line.
pub const TITLE: &str = "WEBSITE TRAFFIC DASHBOARD";

/// Width of the `=` rule under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title.
/// 2. A 60-column `=` separator.
/// 3. Period and timezone information in `[ range | vs previous | tz ]` format.
/// 4. Key hints.
pub struct Header<'a> {
    /// Selected period, already formatted (e.g. "2024-01-03 to 2024-01-05").
    pub range: String,
    /// Comparison period, or `None` while no aggregation is shown.
    pub previous: Option<String>,
    /// IANA timezone used to decide "today".
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        range: impl Into<String>,
        previous: Option<String>,
        timezone: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            range: range.into(),
            previous,
            timezone,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut info = vec![
            Span::styled("[ ", self.theme.label),
            Span::styled(self.range.clone(), self.theme.value),
        ];
        if let Some(previous) = &self.previous {
            info.push(Span::styled(" | vs ", self.theme.label));
            info.push(Span::styled(previous.clone(), self.theme.header_accent));
        }
        info.push(Span::styled(" | ", self.theme.label));
        info.push(Span::styled(self.timezone.to_string(), self.theme.value));
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(Span::styled(TITLE, self.theme.header)),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(info),
            Line::from(Span::styled(
                "←/→ period  a all data  d default  q quit",
                self.theme.dim,
            )),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
