use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all styles used by the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Deltas ───────────────────────────────────────────────────────────────
    /// Current period above the previous one.
    pub delta_up: Style,
    /// Current period below the previous one.
    pub delta_down: Style,
    /// No change.
    pub delta_flat: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub chart_block: Style,
    pub chart_axis: Style,
    pub chart_date_line: Style,
    pub chart_hour_line: Style,
    pub bar: Style,
    pub bar_value: Style,
    /// Cycled through for category slices.
    pub category_palette: Vec<Color>,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            delta_up: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            delta_down: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            delta_flat: Style::default().fg(Color::Gray),

            chart_block: Style::default().fg(Color::DarkGray),
            chart_axis: Style::default().fg(Color::Gray),
            chart_date_line: Style::default().fg(Color::Cyan),
            chart_hour_line: Style::default().fg(Color::Magenta),
            bar: Style::default().fg(Color::Cyan),
            bar_value: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
            category_palette: vec![
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::Green,
                Color::Blue,
                Color::Red,
                Color::LightCyan,
                Color::LightMagenta,
            ],
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and saturated accents so content stays
    /// legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            delta_up: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            delta_down: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            delta_flat: Style::default().fg(Color::DarkGray),

            chart_block: Style::default().fg(Color::Gray),
            chart_axis: Style::default().fg(Color::DarkGray),
            chart_date_line: Style::default().fg(Color::Blue),
            chart_hour_line: Style::default().fg(Color::Magenta),
            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),
            category_palette: vec![
                Color::Blue,
                Color::Magenta,
                Color::Green,
                Color::Red,
                Color::Cyan,
                Color::DarkGray,
            ],
        }
    }

    /// Classic theme using only the basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            delta_up: Style::default().fg(Color::Green),
            delta_down: Style::default().fg(Color::Red),
            delta_flat: Style::default().fg(Color::White),

            chart_block: Style::default().fg(Color::DarkGray),
            chart_axis: Style::default().fg(Color::White),
            chart_date_line: Style::default().fg(Color::Cyan),
            chart_hour_line: Style::default().fg(Color::Yellow),
            bar: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::Black).bg(Color::Green),
            category_palette: vec![
                Color::Cyan,
                Color::Yellow,
                Color::Green,
                Color::Magenta,
                Color::Blue,
                Color::Red,
            ],
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Style for a signed period-over-period change.
    pub fn delta_style(&self, delta: i64) -> Style {
        match delta.signum() {
            1 => self.delta_up,
            -1 => self.delta_down,
            _ => self.delta_flat,
        }
    }

    /// Colour for the `index`-th category slice.
    pub fn category_color(&self, index: usize) -> Color {
        if self.category_palette.is_empty() {
            return Color::Reset;
        }
        self.category_palette[index % self.category_palette.len()]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
