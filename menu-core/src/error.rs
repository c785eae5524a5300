use std::path::PathBuf;

use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

/// Startup configuration problems. Any of these aborts the run before a
/// single request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is required")]
    Missing { key: String },

    #[error("No locations configured.\nHint: add [[locations]] entries to {}", path.display())]
    NoLocations { path: PathBuf },

    #[error("Location #{index} has an empty `{field}`")]
    EmptyField { index: usize, field: &'static str },

    #[error("Unknown timezone '{value}'")]
    InvalidTimezone { value: String },

    #[error("Failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine platform config directory")]
    NoConfigDir,
}

/// Reasons a location's menu could not be turned into a notification.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to request menu for location \"{location}\"")]
    Request {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Menu request for location \"{location}\" failed with status {status}: {body}")]
    Status {
        location: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse menu JSON for location \"{location}\"")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No data for location \"{location}\" on \"{date}\"")]
    NoDataForDate { location: String, date: NaiveDate },

    #[error("Week number mismatch for location \"{location}\". Is {actual}, but should be {expected}")]
    WeekMismatch {
        location: String,
        expected: u32,
        actual: u32,
    },
}

impl FetchError {
    pub fn location(&self) -> &str {
        match self {
            FetchError::Request { location, .. }
            | FetchError::Status { location, .. }
            | FetchError::Decode { location, .. }
            | FetchError::NoDataForDate { location, .. }
            | FetchError::WeekMismatch { location, .. } => location,
        }
    }

    /// Short machine-friendly name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Request { .. } => "request",
            FetchError::Status { .. } => "status",
            FetchError::Decode { .. } => "decode",
            FetchError::NoDataForDate { .. } => "no_data_for_date",
            FetchError::WeekMismatch { .. } => "week_mismatch",
        }
    }
}
