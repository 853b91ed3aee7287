// src/state/metrics.rs
//! System health metrics snapshot and its periodic sampler

use crate::config::constants::metrics;
use crate::state::device::DeviceStatus;
use crate::utils::time::current_timestamp_millis;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Link quality as seen by the monitoring UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    Connected,
    Disconnected,
    PoorConnection,
    HighLatency,
}

/// Wholesale-replaced snapshot of system health, no history retained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub timestamp_ms: u64,
    pub cpu_usage_pct: f32,
    pub memory_usage_mb: f32,
    pub signal_latency_ms: u64,
    pub prediction_latency_ms: u64,
    pub frame_rate_fps: f32,
    pub network_status: NetworkStatus,
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self {
            timestamp_ms: current_timestamp_millis(),
            cpu_usage_pct: 0.0,
            memory_usage_mb: 0.0,
            signal_latency_ms: 0,
            prediction_latency_ms: 0,
            frame_rate_fps: 60.0,
            network_status: NetworkStatus::Disconnected,
        }
    }
}

/// Draws simulated health readings once per tick.
///
/// Real host probes would replace the random draws; the ranges stay in the
/// envelope the display layer renders comfortably.
pub struct MetricsSampler {
    rng: StdRng,
}

impl MetricsSampler {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn sample(&mut self, device_status: DeviceStatus) -> SystemMetrics {
        SystemMetrics {
            timestamp_ms: current_timestamp_millis(),
            cpu_usage_pct: self
                .rng
                .gen_range(metrics::CPU_USAGE_MIN_PCT..=metrics::CPU_USAGE_MAX_PCT),
            memory_usage_mb: self
                .rng
                .gen_range(metrics::MEMORY_USAGE_MIN_MB..=metrics::MEMORY_USAGE_MAX_MB),
            signal_latency_ms: self
                .rng
                .gen_range(metrics::SIGNAL_LATENCY_MIN_MS..=metrics::SIGNAL_LATENCY_MAX_MS),
            prediction_latency_ms: self
                .rng
                .gen_range(metrics::PREDICTION_LATENCY_MIN_MS..=metrics::PREDICTION_LATENCY_MAX_MS),
            frame_rate_fps: self
                .rng
                .gen_range(metrics::FRAME_RATE_MIN_FPS..=metrics::FRAME_RATE_MAX_FPS),
            network_status: network_status_for(device_status),
        }
    }
}

impl Default for MetricsSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Link status mirrors the device state machine: any established link
/// reports connected
pub fn network_status_for(device_status: DeviceStatus) -> NetworkStatus {
    if device_status.is_operational() {
        NetworkStatus::Connected
    } else {
        NetworkStatus::Disconnected
    }
}
