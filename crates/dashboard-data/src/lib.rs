//! Data layer for the traffic dashboard.
//!
//! Loads the traffic log CSV into an in-memory [`store::DatasetStore`],
//! aggregates record subsets into dashboard views, compares the selected
//! period against the one before it and runs the per-selection pipeline.

pub mod aggregator;
pub mod analysis;
pub mod comparison;
pub mod reader;
pub mod store;

pub use dashboard_core as core;
