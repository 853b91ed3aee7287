// src/config/mod.rs
//! Configuration management for the monitor core

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigLoader, ConfigStore, MemoryConfigStore};

use serde::{Deserialize, Serialize};

use crate::prediction::ClassifierKind;
use crate::telemetry::aggregator::SequencePolicy;
use crate::telemetry::stream::BackpressureMode;
use crate::utils::validation as checks;

/// Complete monitor configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MonitorConfig {
    #[serde(default)]
    pub signal: SignalConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub aggregator: AggregatorConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub calibration: CalibrationSettings,

    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// Signal synthesis settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SignalConfig {
    #[serde(default = "defaults::sample_rate_hz")]
    pub sample_rate_hz: u32,

    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    #[serde(default = "defaults::channel_ids")]
    pub channel_ids: Vec<u32>,
}

/// Telemetry stream pacing and delivery settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StreamConfig {
    #[serde(default = "defaults::batch_interval_ms")]
    pub batch_interval_ms: u64,

    #[serde(default = "defaults::backpressure")]
    pub backpressure: BackpressureMode,

    #[serde(default = "defaults::queue_capacity")]
    pub queue_capacity: usize,
}

/// State aggregation settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AggregatorConfig {
    #[serde(default = "defaults::max_points_per_channel")]
    pub max_points_per_channel: usize,

    #[serde(default = "defaults::sequence_policy")]
    pub sequence_policy: SequencePolicy,
}

/// Gesture prediction settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PredictionConfig {
    #[serde(default = "defaults::classifier")]
    pub classifier: ClassifierKind,

    /// Fixed RNG seed for reproducible stub output, random when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Device identity and endpoint settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DeviceSettings {
    #[serde(default = "defaults::device_id")]
    pub device_id: String,

    #[serde(default = "defaults::device_name")]
    pub device_name: String,

    #[serde(default = "defaults::connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    #[serde(default = "defaults::auto_reconnect")]
    pub auto_reconnect: bool,
}

/// Calibration workflow settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CalibrationSettings {
    #[serde(default = "defaults::step_duration_secs")]
    pub step_duration_secs: u32,

    #[serde(default = "defaults::rest_between_secs")]
    pub rest_between_secs: u32,

    #[serde(default = "defaults::minimum_confidence")]
    pub minimum_confidence: f32,
}

/// System metrics ticker settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MetricsSettings {
    #[serde(default = "defaults::metrics_interval_ms")]
    pub update_interval_ms: u64,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;
    use crate::prediction::ClassifierKind;
    use crate::telemetry::aggregator::SequencePolicy;
    use crate::telemetry::stream::BackpressureMode;

    pub fn sample_rate_hz() -> u32 { signal::DEFAULT_SAMPLE_RATE_HZ }
    pub fn batch_size() -> usize { signal::DEFAULT_BATCH_SIZE }
    pub fn channel_ids() -> Vec<u32> { signal::DEFAULT_CHANNEL_IDS.to_vec() }

    pub fn batch_interval_ms() -> u64 { stream::DEFAULT_BATCH_INTERVAL_MS }
    pub fn backpressure() -> BackpressureMode { BackpressureMode::Block }
    pub fn queue_capacity() -> usize { stream::DEFAULT_QUEUE_CAPACITY }

    pub fn max_points_per_channel() -> usize { stream::DEFAULT_MAX_POINTS_PER_CHANNEL }
    pub fn sequence_policy() -> SequencePolicy { SequencePolicy::SkipStale }

    pub fn classifier() -> ClassifierKind { ClassifierKind::RandomStub }

    pub fn device_id() -> String { device::DEFAULT_DEVICE_ID.to_string() }
    pub fn device_name() -> String { device::DEFAULT_DEVICE_NAME.to_string() }
    pub fn connection_timeout_ms() -> u64 { device::CONNECTION_TIMEOUT_MS }
    pub fn auto_reconnect() -> bool { true }

    pub fn step_duration_secs() -> u32 { calibration::DEFAULT_STEP_DURATION_SECS }
    pub fn rest_between_secs() -> u32 { calibration::DEFAULT_REST_SECS }
    pub fn minimum_confidence() -> f32 { calibration::DEFAULT_MINIMUM_CONFIDENCE }

    pub fn metrics_interval_ms() -> u64 { metrics::UPDATE_INTERVAL_MS }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: defaults::sample_rate_hz(),
            batch_size: defaults::batch_size(),
            channel_ids: defaults::channel_ids(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            batch_interval_ms: defaults::batch_interval_ms(),
            backpressure: defaults::backpressure(),
            queue_capacity: defaults::queue_capacity(),
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_points_per_channel: defaults::max_points_per_channel(),
            sequence_policy: defaults::sequence_policy(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            classifier: defaults::classifier(),
            seed: None,
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            device_id: defaults::device_id(),
            device_name: defaults::device_name(),
            connection_timeout_ms: defaults::connection_timeout_ms(),
            auto_reconnect: defaults::auto_reconnect(),
        }
    }
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            step_duration_secs: defaults::step_duration_secs(),
            rest_between_secs: defaults::rest_between_secs(),
            minimum_confidence: defaults::minimum_confidence(),
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            update_interval_ms: defaults::metrics_interval_ms(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            signal: SignalConfig::default(),
            stream: StreamConfig::default(),
            aggregator: AggregatorConfig::default(),
            prediction: PredictionConfig::default(),
            device: DeviceSettings::default(),
            calibration: CalibrationSettings::default(),
            metrics: MetricsSettings::default(),
        }
    }
}

impl MonitorConfig {
    /// Validate configuration consistency
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = checks::validate_sample_rate(self.signal.sample_rate_hz) {
            errors.push(e.to_string());
        }
        if let Err(e) = checks::validate_batch_size(self.signal.batch_size) {
            errors.push(e.to_string());
        }
        if let Err(e) = checks::validate_channel_ids(&self.signal.channel_ids) {
            errors.push(e.to_string());
        }
        if let Err(e) = checks::validate_batch_interval(self.stream.batch_interval_ms) {
            errors.push(e.to_string());
        }
        if let Err(e) = checks::validate_device_id(&self.device.device_id) {
            errors.push(e.to_string());
        }
        if let Err(e) = checks::validate_unit_interval(
            self.calibration.minimum_confidence,
            "calibration.minimum_confidence",
        ) {
            errors.push(e.to_string());
        }

        if self.stream.queue_capacity < constants::stream::MIN_QUEUE_CAPACITY {
            errors.push(format!(
                "Queue capacity {} below minimum {}",
                self.stream.queue_capacity,
                constants::stream::MIN_QUEUE_CAPACITY
            ));
        }

        // A display buffer must hold at least one full batch per channel
        if self.aggregator.max_points_per_channel < self.signal.batch_size {
            errors.push(format!(
                "Display buffer too small for batch size: need {} points, have {}",
                self.signal.batch_size, self.aggregator.max_points_per_channel
            ));
        }

        if self.metrics.update_interval_ms == 0 {
            errors.push("Metrics update interval must be nonzero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Samples per emitted batch across all configured channels
    pub fn samples_per_batch(&self) -> usize {
        self.signal.batch_size * self.signal.channel_ids.len()
    }

    /// Get configuration summary
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            device_id: self.device.device_id.clone(),
            sample_rate_hz: self.signal.sample_rate_hz,
            batch_size: self.signal.batch_size,
            channel_count: self.signal.channel_ids.len(),
            batch_interval_ms: self.stream.batch_interval_ms,
            backpressure: self.stream.backpressure,
            classifier: self.prediction.classifier,
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub device_id: String,
    pub sample_rate_hz: u32,
    pub batch_size: usize,
    pub channel_count: usize,
    pub batch_interval_ms: u64,
    pub backpressure: BackpressureMode,
    pub classifier: ClassifierKind,
}
