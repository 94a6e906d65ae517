//! Core types for the traffic dashboard.
//!
//! Holds the traffic record model, date-range and period arithmetic, the
//! shared error type, CLI settings, timezone helpers and number formatting
//! used by the data and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod period;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
pub use models::TrafficRecord;
pub use period::DateRange;
