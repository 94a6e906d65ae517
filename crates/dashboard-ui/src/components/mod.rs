//! Small line-oriented building blocks shared by the dashboard views.

pub mod header;
pub mod metric;
