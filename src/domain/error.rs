// Error types shared by the report pipeline and the device proxy
use thiserror::Error;

use super::sensor::MIN_REPORT_RECORDS;

/// Caller input problems, surfaced as HTTP 400
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Not enough sensor data (minimum {MIN_REPORT_RECORDS} records required, got {0})")]
    NotEnoughRecords(usize),

    #[error("No sensor data provided")]
    NoData,

    #[error("Column '{column}' has {actual} values but there are {expected} timestamps")]
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Failures of a required report stage, surfaced as HTTP 500
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Document assembly failed: {0}")]
    Document(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Why the robot could not be reached
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    #[error("ESP32 timed out")]
    Timeout,

    #[error("ESP32 Disconnected: {0}")]
    Unreachable(String),

    #[error("ESP32 Error: status {0}")]
    BadStatus(u16),

    #[error("ESP32 sent an unreadable payload: {0}")]
    InvalidPayload(String),
}

impl DeviceError {
    /// True when the request never got an answer (timeout, refused connection)
    pub fn is_transport(&self) -> bool {
        matches!(self, DeviceError::Timeout | DeviceError::Unreachable(_))
    }
}
