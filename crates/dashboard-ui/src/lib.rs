//! Terminal UI layer for the traffic dashboard.
//!
//! Provides themes, header and metric components, the chart widgets and the
//! interactive application loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod dashboard_view;
pub mod themes;

pub use dashboard_core as core;
