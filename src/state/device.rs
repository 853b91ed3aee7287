// src/state/device.rs
//! Device connection state machine and snapshot types

use crate::config::constants::device;
use crate::utils::time::current_timestamp_millis;
use serde::{Deserialize, Serialize};

/// Device lifecycle states
///
/// Happy path runs `Disconnected -> Connecting -> Connected -> Calibrating
/// -> Active`. `Error` is reachable from every state in which a workflow is
/// in flight, and `Disconnected` from the states an explicit stop can
/// interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Disconnected,
    Connecting,
    Connected,
    Calibrating,
    Active,
    Error,
}

impl DeviceStatus {
    /// Whether the state machine permits moving from `self` to `next`
    pub fn can_transition_to(&self, next: DeviceStatus) -> bool {
        use DeviceStatus::*;
        match self {
            Disconnected => matches!(next, Connecting),
            Connecting => matches!(next, Connected | Error),
            Connected => matches!(next, Calibrating | Disconnected | Error),
            Calibrating => matches!(next, Active | Error),
            Active => matches!(next, Calibrating | Disconnected | Error),
            Error => matches!(next, Connecting | Disconnected),
        }
    }

    /// States in which the device link is established
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            DeviceStatus::Connected | DeviceStatus::Calibrating | DeviceStatus::Active
        )
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviceStatus::Disconnected => "disconnected",
            DeviceStatus::Connecting => "connecting",
            DeviceStatus::Connected => "connected",
            DeviceStatus::Calibrating => "calibrating",
            DeviceStatus::Active => "active",
            DeviceStatus::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// One electrode channel as reported by the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: u32,
    pub name: String,
    pub active: bool,
    pub quality: f32,
    pub gain: f32,
}

impl ChannelDescriptor {
    pub fn new(id: u32, name: impl Into<String>, active: bool, quality: f32) -> Self {
        Self {
            id,
            name: name.into(),
            active,
            quality,
            gain: 1.0,
        }
    }
}

/// Immutable view of the monitored device, replaced wholesale per transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub device_id: String,
    pub device_name: String,
    pub status: DeviceStatus,
    pub battery_level: Option<u8>,
    pub signal_quality: f32,
    pub channels: Vec<ChannelDescriptor>,
    pub last_seen_ms: u64,
    pub last_error: Option<String>,
}

impl DeviceSnapshot {
    /// Disconnected snapshot with the generic channel placeholders shown
    /// before the first connection
    pub fn initial(device_id: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            status: DeviceStatus::Disconnected,
            battery_level: None,
            signal_quality: 0.0,
            channels: initial_channel_layout(),
            last_seen_ms: current_timestamp_millis(),
            last_error: None,
        }
    }

    /// Derive the successor snapshot for a status change, refusing moves the
    /// state machine does not allow
    pub fn transitioned(&self, next: DeviceStatus) -> Option<Self> {
        if !self.status.can_transition_to(next) {
            return None;
        }
        let mut snapshot = self.clone();
        snapshot.status = next;
        snapshot.last_seen_ms = current_timestamp_millis();
        if next != DeviceStatus::Error {
            snapshot.last_error = None;
        }
        Some(snapshot)
    }
}

impl Default for DeviceSnapshot {
    fn default() -> Self {
        Self::initial(device::DEFAULT_DEVICE_ID, device::DEFAULT_DEVICE_NAME)
    }
}

/// Placeholder channels before a device has reported its electrode map
pub fn initial_channel_layout() -> Vec<ChannelDescriptor> {
    vec![
        ChannelDescriptor::new(1, "Channel 1", true, 0.0),
        ChannelDescriptor::new(2, "Channel 2", true, 0.0),
        ChannelDescriptor::new(3, "Channel 3", false, 0.0),
        ChannelDescriptor::new(4, "Channel 4", false, 0.0),
    ]
}

/// Electrode map reported by a connected forearm array
pub fn connected_channel_layout() -> Vec<ChannelDescriptor> {
    vec![
        ChannelDescriptor::new(1, "Flexor", true, 0.95),
        ChannelDescriptor::new(2, "Extensor", true, 0.88),
        ChannelDescriptor::new(3, "Bicep", false, 0.0),
        ChannelDescriptor::new(4, "Tricep", false, 0.0),
    ]
}
