//! EMG-Monitor: prosthetic monitoring core for signal telemetry and UI state
//!
//! This library implements the device-facing core of an EMG prosthetic
//! monitoring application. It features:
//!
//! - Simulated EMG signal generation and paced batch telemetry
//! - Reduction of signal batches into observable display state
//! - Pluggable gesture classification with a random stub default
//! - Device, calibration and system-metrics workflow state machines
//! - Comprehensive configuration management
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emg_monitor::config::MonitorConfig;
//! use emg_monitor::controller::MonitorController;
//! use emg_monitor::hal::MockDeviceEndpoint;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = MonitorConfig::default();
//!     let controller = MonitorController::new(config, Arc::new(MockDeviceEndpoint::new()));
//!
//!     controller.start_metrics();
//!     controller.start_device().await;
//!
//!     // Observe display state as batches arrive
//!     let mut signal = controller.watch_signal();
//!     for _ in 0..10 {
//!         if signal.changed().await.is_err() {
//!             break;
//!         }
//!         let snapshot = signal.borrow().clone();
//!         println!(
//!             "latency: {} ms, channels: {}",
//!             snapshot.latency_ms,
//!             snapshot.channels.len()
//!         );
//!     }
//!
//!     controller.stop_device().await;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod controller;
pub mod error;
pub mod hal;
pub mod prediction;
pub mod signal;
pub mod state;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::MonitorConfig;
pub use controller::MonitorController;
pub use error::{MonitorError, MonitorResult};
pub use hal::{Ack, CalibrationReceipt, DeviceEndpoint, MockDeviceEndpoint, StatusInfo};
pub use prediction::{Classifier, FeatureDigest, GesturePrediction, GestureType};
pub use signal::{BatchAssembler, EmgSample, SignalBatch, SignalGenerator};
pub use state::{
    CalibrationPlan, CalibrationSnapshot, DeviceSnapshot, DeviceStatus, StateCell, SystemMetrics,
};
pub use telemetry::{
    BackpressureMode, SequencePolicy, SignalSnapshot, StateAggregator, TelemetryStream,
};

pub use utils::{
    time::{current_timestamp_nanos, TimeProvider},
    validation::{ValidationError, ValidationResult},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "EMG prosthetic monitoring core: signal telemetry and UI state aggregation"
            .to_string(),
        features: vec![
            "Simulated signal telemetry".to_string(),
            "Display-state aggregation".to_string(),
            "Pluggable gesture classification".to_string(),
            "Device and calibration workflows".to_string(),
            "Configuration management".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
