//! Date ranges and the period arithmetic behind the current-vs-previous
//! comparison.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashboardError, Result};

// ── DateRange ─────────────────────────────────────────────────────────────────

/// Closed calendar-date interval `[start, end]`, inclusive on both ends.
///
/// Construction enforces `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds", into = "RangeBounds")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RangeBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidSelection(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a range from two dates given in either order.
    pub fn normalized(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive number of days covered (always `>= 1`).
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `true` when the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The equal-length window immediately preceding this one.
    pub fn previous(&self) -> DateRange {
        resolve_previous_period(self)
    }

    /// The equal-length window immediately following this one, saturating at
    /// the latest representable date.
    pub fn next(&self) -> DateRange {
        let length = Days::new(self.len_days().unsigned_abs());
        DateRange {
            start: self.start.checked_add_days(length).unwrap_or(NaiveDate::MAX),
            end: self.end.checked_add_days(length).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = DashboardError;

    fn try_from(bounds: RangeBounds) -> Result<Self> {
        DateRange::new(bounds.start, bounds.end)
    }
}

impl From<DateRange> for RangeBounds {
    fn from(range: DateRange) -> Self {
        RangeBounds {
            start: range.start,
            end: range.end,
        }
    }
}

// ── Month bounds ──────────────────────────────────────────────────────────────

/// First calendar day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last calendar day of the month containing `date`.
///
/// Computed as "first of next month minus one day", so month length and
/// the December → January rollover come from the calendar itself.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Default selection: `today`'s month clamped to the dataset span.
///
/// When `today`'s month lies entirely outside the data the month holding
/// `dataset_max` is used instead, so the default always has data in it.
pub fn resolve_default_range(
    dataset_min: NaiveDate,
    dataset_max: NaiveDate,
    today: NaiveDate,
) -> Result<DateRange> {
    if dataset_min > dataset_max {
        return Err(DashboardError::EmptyDataset);
    }

    let clamp = |anchor: NaiveDate| {
        let start = first_day_of_month(anchor).max(dataset_min);
        let end = last_day_of_month(anchor).min(dataset_max);
        DateRange::new(start, end).ok()
    };

    let range = match clamp(today) {
        Some(range) => range,
        None => {
            debug!(
                "Current month of {} has no data; anchoring default range on {}",
                today, dataset_max
            );
            // dataset_max's own month always contains dataset_max.
            clamp(dataset_max).unwrap_or(DateRange::day(dataset_max))
        }
    };

    Ok(range)
}

/// The comparison window: same length, ending the day before `current`
/// starts. May predate the dataset, which simply yields zero counts.
/// Saturates at the earliest representable date.
pub fn resolve_previous_period(current: &DateRange) -> DateRange {
    let length = Days::new(current.len_days().unsigned_abs());
    DateRange {
        start: current.start.checked_sub_days(length).unwrap_or(NaiveDate::MIN),
        end: current.start.checked_sub_days(Days::new(1)).unwrap_or(NaiveDate::MIN),
    }
}

/// Turn a raw user selection into a range.
///
/// * no dates → the full dataset `span`
/// * two dates, any order → normalized range
/// * anything else → [`DashboardError::InvalidSelection`]
pub fn validate_selection(dates: &[NaiveDate], span: DateRange) -> Result<DateRange> {
    match dates {
        [] => Ok(span),
        [a, b] => Ok(DateRange::normalized(*a, *b)),
        _ => Err(DashboardError::InvalidSelection(
            "two dates required".to_string(),
        )),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
