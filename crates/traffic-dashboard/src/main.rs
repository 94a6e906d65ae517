mod bootstrap;
mod report;

use anyhow::{bail, Context, Result};
use dashboard_core::error::DashboardError;
use dashboard_core::period::DateRange;
use dashboard_core::settings::{DateSelection, LastUsedParams, Settings};
use dashboard_core::time_utils;
use dashboard_data::analysis::{analyze_range, resolve_selection};
use dashboard_data::store::DatasetStore;
use dashboard_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    // The dashboard owns the terminal, so its logs go to a file by default.
    let log_file = settings.log_file.clone().or_else(|| {
        (settings.view == "dashboard").then(bootstrap::default_log_file)
    });
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Traffic Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, View: {}, Theme: {}, Timezone: {}",
        settings.data_file.display(),
        settings.view,
        settings.theme,
        settings.timezone
    );

    let store = DatasetStore::load(&settings.data_file).with_context(|| {
        format!(
            "Failed to load traffic data from {}",
            settings.data_file.display()
        )
    })?;

    let today = time_utils::today_in(&settings.timezone);
    let selection = resolve_selection(&store, &settings.date_selection(), today);
    if let Ok(range) = &selection {
        remember_range(&settings, *range);
    }

    match settings.view.as_str() {
        "dashboard" => {
            let default_range = resolve_selection(&store, &DateSelection::Default, today).ok();
            let mut app = App::new(
                &settings.theme,
                settings.timezone.clone(),
                &store,
                default_range,
            );
            app.open(selection, settings.last_valid_range);

            if let Some(range) = app.run()? {
                remember_range(&settings, range);
            }
        }

        "summary" | "json" => {
            let Some(range) = report_range(selection, settings.last_valid_range)? else {
                eprintln!(
                    "No traffic data found in {}",
                    settings.data_file.display()
                );
                return Ok(());
            };
            let snapshot = analyze_range(&store, range);

            if settings.view == "json" {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", report::format_summary(&snapshot));
            }
        }

        unknown => bail!("Unknown view mode: {}", unknown),
    }

    Ok(())
}

/// Pick the range for the non-interactive views.
///
/// `Ok(None)` means the dataset is empty. A rejected selection falls back to
/// the last valid range when one was persisted; the error is still reported
/// on stderr.
fn report_range(
    selection: dashboard_core::Result<DateRange>,
    fallback: Option<DateRange>,
) -> Result<Option<DateRange>> {
    match selection {
        Ok(range) => Ok(Some(range)),
        Err(DashboardError::EmptyDataset) => Ok(None),
        Err(err @ DashboardError::InvalidSelection(_)) => match fallback {
            Some(range) => {
                eprintln!("{}; showing last valid range {}", err, range);
                Ok(Some(range))
            }
            None => Err(err.into()),
        },
        Err(err) => Err(err.into()),
    }
}

/// Persist `range` as the last valid selection unless `--clear` was given.
fn remember_range(settings: &Settings, range: DateRange) {
    if settings.clear {
        return;
    }
    if let Err(err) = LastUsedParams::remember_range_at(&LastUsedParams::config_path(), range) {
        tracing::warn!("Could not persist last valid range: {}", err);
    }
}
