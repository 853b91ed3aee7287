// src/error.rs
//! Unified error handling for the monitor core
//!
//! Workflow operations never surface these to observers directly: connect and
//! calibrate failures are absorbed into the device and calibration snapshots
//! so a rendering layer polling the state holders cannot be crashed by a
//! failed transition. The error values here travel between the core
//! components and the external collaborators only.

use thiserror::Error;

use crate::utils::validation::ValidationError;

/// Unified error type for monitor operations
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Device connect or status request failed
    #[error("connection failure for device '{device_id}': {reason}")]
    ConnectionFailure { device_id: String, reason: String },

    /// Calibration workflow failed or was rejected by the device
    #[error("calibration failure for device '{device_id}': {reason}")]
    CalibrationFailure { device_id: String, reason: String },

    /// Telemetry subscription ended by explicit stop, not a fault
    #[error("telemetry stream cancelled for device '{device_id}'")]
    StreamCancelled { device_id: String },

    /// Named configuration document does not exist in the store
    #[error("configuration not found: '{name}'")]
    ConfigurationNotFound { name: String },

    /// Configuration content failed validation
    #[error(transparent)]
    InvalidConfiguration(#[from] ValidationError),

    /// Configuration document could not be parsed
    #[error("configuration parse error: {0}")]
    ConfigurationParse(#[from] toml::de::Error),

    /// Configuration store I/O failed
    #[error("configuration I/O error: {0}")]
    ConfigurationIo(#[from] std::io::Error),

    /// Configuration hot-reload watcher could not be installed
    #[error("configuration watcher error: {0}")]
    WatcherFailure(String),
}

impl MonitorError {
    pub fn connection(device_id: impl Into<String>, reason: impl Into<String>) -> Self {
        MonitorError::ConnectionFailure {
            device_id: device_id.into(),
            reason: reason.into(),
        }
    }

    pub fn calibration(device_id: impl Into<String>, reason: impl Into<String>) -> Self {
        MonitorError::CalibrationFailure {
            device_id: device_id.into(),
            reason: reason.into(),
        }
    }

    pub fn cancelled(device_id: impl Into<String>) -> Self {
        MonitorError::StreamCancelled {
            device_id: device_id.into(),
        }
    }

    /// True for the normal-lifecycle cancellation case
    pub fn is_cancellation(&self) -> bool {
        matches!(self, MonitorError::StreamCancelled { .. })
    }
}

/// Result type alias for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;
