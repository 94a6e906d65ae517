//! Application state and TUI event loop for the traffic dashboard.
//!
//! [`App`] owns the theme, the dataset reference and the screen currently on
//! display. Every range change re-runs the analysis pipeline against the
//! loaded store; nothing is cached between selections.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::{debug, warn};

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::period::DateRange;
use dashboard_data::analysis::{analyze_range, DashboardSnapshot};
use dashboard_data::store::DatasetStore;

use crate::dashboard_view;
use crate::themes::Theme;

// ── Screen ────────────────────────────────────────────────────────────────────

/// What the TUI is currently rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Aggregated view of a valid range, optionally with an error banner.
    Dashboard {
        snapshot: Box<DashboardSnapshot>,
        notice: Option<String>,
    },
    /// A rejected selection with no earlier valid range to fall back on.
    SelectionError(String),
    /// The dataset has no records.
    NoData,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App<'a> {
    pub theme: Theme,
    /// IANA timezone shown in the header.
    pub timezone: String,
    pub screen: Screen,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    store: &'a DatasetStore,
    default_range: Option<DateRange>,
    last_valid_range: Option<DateRange>,
}

impl<'a> App<'a> {
    /// Construct the application.
    ///
    /// `default_range` is what `d` jumps back to; `None` when the dataset is
    /// empty.
    pub fn new(
        theme_name: &str,
        timezone: String,
        store: &'a DatasetStore,
        default_range: Option<DateRange>,
    ) -> Self {
        let screen = if store.is_empty() {
            Screen::NoData
        } else {
            Screen::SelectionError(String::from("No range selected"))
        };
        Self {
            theme: Theme::from_name(theme_name),
            timezone,
            screen,
            should_quit: false,
            store,
            default_range,
            last_valid_range: None,
        }
    }

    /// Apply the outcome of the initial selection.
    ///
    /// A rejected selection keeps `fallback` (the last valid range from a
    /// previous run) on screen together with the error; without a fallback
    /// only the error is shown.
    pub fn open(&mut self, selection: Result<DateRange>, fallback: Option<DateRange>) {
        match selection {
            Ok(range) => self.show(range),
            Err(DashboardError::EmptyDataset) => self.screen = Screen::NoData,
            Err(err) => {
                let message = err.to_string();
                warn!("Selection rejected: {}", message);
                match fallback {
                    Some(range) if !self.store.is_empty() => {
                        self.show(range);
                        if let Screen::Dashboard { notice, .. } = &mut self.screen {
                            *notice = Some(message);
                        }
                    }
                    _ => self.screen = Screen::SelectionError(message),
                }
            }
        }
    }

    /// Recompute the dashboard for `range` and display it.
    pub fn show(&mut self, range: DateRange) {
        if self.store.is_empty() {
            self.screen = Screen::NoData;
            return;
        }
        debug!("Showing {}", range);
        let snapshot = analyze_range(self.store, range);
        self.last_valid_range = Some(range);
        self.screen = Screen::Dashboard {
            snapshot: Box::new(snapshot),
            notice: None,
        };
    }

    /// Range currently on display, if any.
    pub fn current_range(&self) -> Option<DateRange> {
        match &self.screen {
            Screen::Dashboard { snapshot, .. } => Some(snapshot.range),
            _ => None,
        }
    }

    /// Most recent range that was successfully displayed.
    pub fn last_valid_range(&self) -> Option<DateRange> {
        self.last_valid_range
    }

    /// React to a single key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Left => {
                if let Some(range) = self.current_range() {
                    self.show(range.previous());
                }
            }
            KeyCode::Right => {
                if let Some(range) = self.current_range() {
                    self.show(range.next());
                }
            }
            KeyCode::Char('a') => {
                if let Ok(span) = self.store.span() {
                    self.show(span);
                }
            }
            KeyCode::Char('d') => {
                if let Some(range) = self.default_range {
                    self.show(range);
                }
            }
            _ => {}
        }
    }

    // ── Event loop ───────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q` or `Ctrl+C`.
    ///
    /// Returns the last valid range so the caller can persist it.
    pub fn run(mut self) -> io::Result<Option<DateRange>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(err) = terminal.draw(|frame| self.render(frame)) {
                break Err(err);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(err) => break Err(err),
                },
                Ok(false) => {}
                Err(err) => break Err(err),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result.map(|()| self.last_valid_range)
    }

    /// Render the current screen into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match &self.screen {
            Screen::Dashboard { snapshot, notice } => dashboard_view::render_dashboard(
                frame,
                area,
                snapshot,
                &self.timezone,
                notice.as_deref(),
                &self.theme,
            ),
            Screen::SelectionError(message) => dashboard_view::render_selection_error(
                frame,
                area,
                message,
                &self.timezone,
                &self.theme,
            ),
            Screen::NoData => dashboard_view::render_no_data(frame, area, &self.theme),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dashboard_core::models::TrafficRecord;
    use ratatui::backend::TestBackend;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn range(a: NaiveDate, b: NaiveDate) -> DateRange {
        DateRange::new(a, b).unwrap()
    }

    fn store() -> DatasetStore {
        let records = (1..=10)
            .map(|day| {
                let ts = NaiveDateTime::parse_from_str(
                    &format!("2024-01-{day:02} 08:30:00"),
                    "%Y-%m-%d %H:%M:%S",
                )
                .unwrap();
                TrafficRecord::new(ts, format!("s{day}"), "blog", "Home")
            })
            .collect();
        DatasetStore::new(records)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_app(store: &DatasetStore) -> App<'_> {
        let default = Some(range(d(2024, 1, 1), d(2024, 1, 10)));
        App::new("dark", "UTC".to_string(), store, default)
    }

    #[test]
    fn test_open_valid_range_shows_dashboard() {
        let store = store();
        let mut app = make_app(&store);
        app.open(Ok(range(d(2024, 1, 3), d(2024, 1, 5))), None);

        match &app.screen {
            Screen::Dashboard { snapshot, notice } => {
                assert_eq!(snapshot.current.total_traffic, 3);
                assert!(notice.is_none());
            }
            other => panic!("unexpected screen {other:?}"),
        }
        assert_eq!(
            app.last_valid_range(),
            Some(range(d(2024, 1, 3), d(2024, 1, 5)))
        );
    }

    #[test]
    fn test_open_invalid_selection_keeps_fallback_with_notice() {
        let store = store();
        let mut app = make_app(&store);
        let fallback = range(d(2024, 1, 2), d(2024, 1, 4));
        app.open(
            Err(DashboardError::InvalidSelection("two dates required".into())),
            Some(fallback),
        );

        match &app.screen {
            Screen::Dashboard { snapshot, notice } => {
                assert_eq!(snapshot.range, fallback);
                assert_eq!(
                    notice.as_deref(),
                    Some("Invalid date range: two dates required")
                );
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn test_open_invalid_selection_without_fallback() {
        let store = store();
        let mut app = make_app(&store);
        app.open(
            Err(DashboardError::InvalidSelection("two dates required".into())),
            None,
        );
        assert!(matches!(app.screen, Screen::SelectionError(_)));
        assert!(app.current_range().is_none());
        assert!(app.last_valid_range().is_none());
    }

    #[test]
    fn test_open_empty_dataset() {
        let store = DatasetStore::default();
        let mut app = App::new("dark", "UTC".to_string(), &store, None);
        assert_eq!(app.screen, Screen::NoData);

        app.open(Err(DashboardError::EmptyDataset), None);
        assert_eq!(app.screen, Screen::NoData);

        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.screen, Screen::NoData);
    }

    #[test]
    fn test_arrow_keys_step_by_period_length() {
        let store = store();
        let mut app = make_app(&store);
        app.open(Ok(range(d(2024, 1, 4), d(2024, 1, 6))), None);

        app.handle_key(press(KeyCode::Left));
        assert_eq!(
            app.current_range(),
            Some(range(d(2024, 1, 1), d(2024, 1, 3)))
        );

        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Right));
        assert_eq!(
            app.current_range(),
            Some(range(d(2024, 1, 7), d(2024, 1, 9)))
        );
    }

    #[test]
    fn test_navigation_clears_notice() {
        let store = store();
        let mut app = make_app(&store);
        app.open(
            Err(DashboardError::InvalidSelection("two dates required".into())),
            Some(range(d(2024, 1, 2), d(2024, 1, 4))),
        );
        app.handle_key(press(KeyCode::Right));
        match &app.screen {
            Screen::Dashboard { notice, .. } => assert!(notice.is_none()),
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn test_all_and_default_keys() {
        let store = store();
        let mut app = make_app(&store);
        app.open(Ok(range(d(2024, 1, 4), d(2024, 1, 6))), None);

        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.current_range(), Some(store.span().unwrap()));

        app.handle_key(press(KeyCode::Left));
        app.handle_key(press(KeyCode::Char('d')));
        assert_eq!(
            app.current_range(),
            Some(range(d(2024, 1, 1), d(2024, 1, 10)))
        );
    }

    #[test]
    fn test_all_key_recovers_from_selection_error() {
        let store = store();
        let mut app = make_app(&store);
        app.open(
            Err(DashboardError::InvalidSelection("two dates required".into())),
            None,
        );
        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.current_range(), Some(store.span().unwrap()));
    }

    #[test]
    fn test_quit_keys() {
        let store = store();

        let mut app = make_app(&store);
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = make_app(&store);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = make_app(&store);
        app.handle_key(press(KeyCode::Char('c')));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_render_each_screen_does_not_panic() {
        let store = store();
        let mut app = make_app(&store);
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();

        app.open(Ok(range(d(2024, 1, 1), d(2024, 1, 10))), None);
        terminal.draw(|frame| app.render(frame)).unwrap();

        let empty = DatasetStore::default();
        let app = App::new("light", "UTC".to_string(), &empty, None);
        terminal.draw(|frame| app.render(frame)).unwrap();
    }
}
