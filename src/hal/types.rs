// src/hal/types.rs
//! Payload types exchanged with the device control endpoint

use crate::state::device::{ChannelDescriptor, DeviceStatus};
use serde::{Deserialize, Serialize};

/// Device status report returned by start and status queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub device_id: String,
    pub status: DeviceStatus,
    pub battery_level: Option<u8>,
    pub signal_quality: f32,
    pub channels: Vec<ChannelDescriptor>,
    pub last_seen_ms: u64,
}

/// Acknowledgement for operations with no richer payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub device_id: String,
    pub message: String,
}

/// Ticket issued when a calibration request is accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReceipt {
    pub device_id: String,
    pub calibration_id: String,
    pub message: String,
}
