use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the traffic dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file could not be opened or read from disk.
    #[error("Failed to read dataset {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not well-formed CSV.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A column the dashboard depends on is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A `date` cell did not match any recognised timestamp format.
    #[error("Invalid timestamp on line {line}: {value:?}")]
    TimestampParse { line: u64, value: String },

    /// The dataset holds no records, so it has no span to select from.
    #[error("Dataset contains no records")]
    EmptyDataset,

    /// The user-supplied date selection cannot form a range.
    #[error("Invalid date range: {0}")]
    InvalidSelection(String),
}

impl DashboardError {
    /// `true` for the failures that abort dataset loading at startup.
    pub fn is_data_load(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::Csv(_) | Self::MissingColumn(_) | Self::TimestampParse { .. }
        )
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
