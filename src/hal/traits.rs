// src/hal/traits.rs
//! Control-plane abstraction over the prosthetic device

use crate::error::MonitorResult;
use crate::hal::types::{Ack, CalibrationReceipt, StatusInfo};
use crate::state::calibration::CalibrationPlan;
use async_trait::async_trait;

/// Control operations the monitoring workflows need from a device.
///
/// Implementations wrap whatever transport the device actually speaks;
/// the workflows only ever see these four calls.
#[async_trait]
pub trait DeviceEndpoint: Send + Sync {
    /// Bring the device online and return its reported status
    async fn start(&self, device_id: &str) -> MonitorResult<StatusInfo>;

    /// Take the device offline
    async fn stop(&self, device_id: &str) -> MonitorResult<Ack>;

    /// Run a calibration session on the device
    async fn calibrate(
        &self,
        device_id: &str,
        plan: &CalibrationPlan,
    ) -> MonitorResult<CalibrationReceipt>;

    /// Query current device status without changing it
    async fn get_status(&self, device_id: &str) -> MonitorResult<StatusInfo>;
}
