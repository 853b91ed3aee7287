// src/hal/mock.rs
//! Simulated device endpoint with fixed latencies and canned payloads

use crate::config::constants::device;
use crate::error::{MonitorError, MonitorResult};
use crate::hal::traits::DeviceEndpoint;
use crate::hal::types::{Ack, CalibrationReceipt, StatusInfo};
use crate::state::calibration::CalibrationPlan;
use crate::state::device::{connected_channel_layout, DeviceStatus};
use crate::utils::time::current_timestamp_millis;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct InjectedFailures {
    connection: Option<String>,
    calibration: Option<String>,
}

/// Stand-in for the real device control endpoint.
///
/// Each operation sleeps for the latency the real transport would add and
/// then answers with a fixed success payload. Failures never occur unless
/// injected through [`fail_connections`](Self::fail_connections) or
/// [`fail_calibrations`](Self::fail_calibrations).
pub struct MockDeviceEndpoint {
    failures: Mutex<InjectedFailures>,
}

impl MockDeviceEndpoint {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(InjectedFailures::default()),
        }
    }

    /// Make subsequent start calls fail with the given reason
    pub fn fail_connections(&self, reason: impl Into<String>) {
        self.failures.lock().connection = Some(reason.into());
    }

    /// Make subsequent calibrate calls fail with the given reason
    pub fn fail_calibrations(&self, reason: impl Into<String>) {
        self.failures.lock().calibration = Some(reason.into());
    }

    pub fn clear_failures(&self) {
        *self.failures.lock() = InjectedFailures::default();
    }

    fn canned_status(device_id: &str) -> StatusInfo {
        StatusInfo {
            device_id: device_id.to_string(),
            status: DeviceStatus::Connected,
            battery_level: Some(device::CONNECTED_BATTERY_LEVEL),
            signal_quality: device::CONNECTED_SIGNAL_QUALITY,
            channels: connected_channel_layout(),
            last_seen_ms: current_timestamp_millis(),
        }
    }
}

impl Default for MockDeviceEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceEndpoint for MockDeviceEndpoint {
    async fn start(&self, device_id: &str) -> MonitorResult<StatusInfo> {
        tokio::time::sleep(Duration::from_millis(device::START_DELAY_MS)).await;

        if let Some(reason) = self.failures.lock().connection.clone() {
            return Err(MonitorError::connection(device_id, reason));
        }

        debug!(device_id, "device started");
        Ok(Self::canned_status(device_id))
    }

    async fn stop(&self, device_id: &str) -> MonitorResult<Ack> {
        tokio::time::sleep(Duration::from_millis(device::STOP_DELAY_MS)).await;

        debug!(device_id, "device stopped");
        Ok(Ack {
            device_id: device_id.to_string(),
            message: "Device stopped successfully".to_string(),
        })
    }

    async fn calibrate(
        &self,
        device_id: &str,
        plan: &CalibrationPlan,
    ) -> MonitorResult<CalibrationReceipt> {
        plan.validate()
            .map_err(|e| MonitorError::calibration(device_id, e.to_string()))?;

        tokio::time::sleep(Duration::from_millis(device::CALIBRATE_DELAY_MS)).await;

        if let Some(reason) = self.failures.lock().calibration.clone() {
            return Err(MonitorError::calibration(device_id, reason));
        }

        debug!(device_id, "calibration accepted");
        Ok(CalibrationReceipt {
            device_id: device_id.to_string(),
            calibration_id: format!("cal_{}", current_timestamp_millis()),
            message: "Calibration completed successfully".to_string(),
        })
    }

    async fn get_status(&self, device_id: &str) -> MonitorResult<StatusInfo> {
        tokio::time::sleep(Duration::from_millis(device::STATUS_DELAY_MS)).await;
        Ok(Self::canned_status(device_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_start_returns_connected_payload() {
        let endpoint = MockDeviceEndpoint::new();
        let status = endpoint.start("emg_device_01").await.unwrap();

        assert_eq!(status.device_id, "emg_device_01");
        assert_eq!(status.status, DeviceStatus::Connected);
        assert_eq!(status.battery_level, Some(85));
        assert_eq!(status.signal_quality, 0.92);
        assert_eq!(status.channels.len(), 4);
        assert_eq!(status.channels[0].name, "Flexor");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_acknowledges() {
        let endpoint = MockDeviceEndpoint::new();
        let ack = endpoint.stop("emg_device_01").await.unwrap();

        assert_eq!(ack.device_id, "emg_device_01");
        assert_eq!(ack.message, "Device stopped successfully");
    }

    #[tokio::test(start_paused = true)]
    async fn test_calibrate_issues_receipt() {
        let endpoint = MockDeviceEndpoint::new();
        let plan = CalibrationPlan::default();
        let receipt = endpoint.calibrate("emg_device_01", &plan).await.unwrap();

        assert!(receipt.calibration_id.starts_with("cal_"));
        assert_eq!(receipt.message, "Calibration completed successfully");
    }

    #[tokio::test(start_paused = true)]
    async fn test_calibrate_rejects_invalid_plan() {
        let endpoint = MockDeviceEndpoint::new();
        let plan = CalibrationPlan {
            gesture_sequence: vec![],
            ..CalibrationPlan::default()
        };

        let err = endpoint.calibrate("emg_device_01", &plan).await.unwrap_err();
        assert!(matches!(err, MonitorError::CalibrationFailure { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_connection_failure() {
        let endpoint = MockDeviceEndpoint::new();
        endpoint.fail_connections("device unreachable");

        let err = endpoint.start("emg_device_01").await.unwrap_err();
        assert!(matches!(err, MonitorError::ConnectionFailure { .. }));
        assert!(err.to_string().contains("device unreachable"));

        endpoint.clear_failures();
        assert!(endpoint.start("emg_device_01").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_calibration_failure() {
        let endpoint = MockDeviceEndpoint::new();
        endpoint.fail_calibrations("electrode contact lost");

        let plan = CalibrationPlan::default();
        let err = endpoint.calibrate("emg_device_01", &plan).await.unwrap_err();
        assert!(matches!(err, MonitorError::CalibrationFailure { .. }));
    }
}
