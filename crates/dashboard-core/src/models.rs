use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A single page view read from the traffic log.
///
/// Optional fields are `None` when the source cell was empty or held a null
/// marker such as `NA` or `NULL`; such records still count towards totals but
/// are left out of the breakdowns that key on the missing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRecord {
    /// Wall-clock time of the view as written in the log.
    pub timestamp: NaiveDateTime,
    /// Opaque visitor / session identifier.
    #[serde(default)]
    pub session_key: Option<String>,
    /// Top-level URI segment, used as the traffic category.
    #[serde(default)]
    pub uri_level0: Option<String>,
    /// Page title.
    #[serde(default)]
    pub uri_title: Option<String>,
}

impl TrafficRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        session_key: impl Into<String>,
        uri_level0: impl Into<String>,
        uri_title: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            session_key: non_empty(session_key.into()),
            uri_level0: non_empty(uri_level0.into()),
            uri_title: non_empty(uri_title.into()),
        }
    }

    /// Calendar date of the view.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour of day, 0–23.
    pub fn hour_of_day(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Cell values read as missing, besides blank cells.
///
/// The usual null spellings found in spreadsheet and dataframe exports.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Map blank cells and [`MISSING_MARKERS`] to `None`.
pub fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(value)
    }
}
