// src/state/calibration.rs
//! Calibration session plan and progress snapshot

use crate::config::constants::calibration;
use crate::config::CalibrationSettings;
use crate::prediction::GestureType;
use crate::utils::validation::{self, ValidationError};
use serde::{Deserialize, Serialize};

/// Parameters for one calibration session
///
/// The session walks `gesture_sequence` in order, holding each gesture for
/// `step_duration_secs` with `rest_between_secs` of rest between steps (none
/// after the last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPlan {
    pub step_duration_secs: u32,
    pub gesture_sequence: Vec<GestureType>,
    pub rest_between_secs: u32,
    pub minimum_confidence: f32,
}

impl CalibrationPlan {
    pub fn from_settings(settings: &CalibrationSettings) -> Self {
        Self {
            step_duration_secs: settings.step_duration_secs,
            gesture_sequence: default_gesture_sequence(),
            rest_between_secs: settings.rest_between_secs,
            minimum_confidence: settings.minimum_confidence,
        }
    }

    /// Wall-clock length of the full session in seconds
    pub fn total_duration_secs(&self) -> u32 {
        let steps = self.gesture_sequence.len() as u32;
        let rests = steps.saturating_sub(1);
        steps * self.step_duration_secs + rests * self.rest_between_secs
    }

    /// Samples the device collects over the gesture steps (rest intervals
    /// are not recorded)
    pub fn expected_sample_count(&self, sample_rate_hz: u32) -> u64 {
        self.gesture_sequence.len() as u64 * self.step_duration_secs as u64 * sample_rate_hz as u64
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_gesture_sequence_len(self.gesture_sequence.len())?;
        validation::validate_range(
            self.step_duration_secs,
            1,
            calibration::MAX_STEP_DURATION_SECS,
            "step_duration_secs",
        )?;
        validation::validate_unit_interval(self.minimum_confidence, "minimum_confidence")?;
        Ok(())
    }
}

impl Default for CalibrationPlan {
    fn default() -> Self {
        Self {
            step_duration_secs: calibration::DEFAULT_STEP_DURATION_SECS,
            gesture_sequence: default_gesture_sequence(),
            rest_between_secs: calibration::DEFAULT_REST_SECS,
            minimum_confidence: calibration::DEFAULT_MINIMUM_CONFIDENCE,
        }
    }
}

/// Gestures recorded by a standard forearm calibration pass
pub fn default_gesture_sequence() -> Vec<GestureType> {
    vec![
        GestureType::Rest,
        GestureType::Fist,
        GestureType::OpenHand,
        GestureType::Point,
    ]
}

/// Progress of the calibration workflow, replaced wholesale per update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSnapshot {
    pub active: bool,
    pub current_gesture: Option<GestureType>,
    pub progress: f32,
    pub remaining_secs: u32,
    pub collected_samples: u64,
    pub complete: bool,
}

impl CalibrationSnapshot {
    /// No session running and none completed
    pub fn idle() -> Self {
        Self::default()
    }

    /// Session just started, before the first gesture step
    pub fn started() -> Self {
        Self {
            active: true,
            ..Self::default()
        }
    }

    /// Terminal snapshot of a successful session
    pub fn completed(collected_samples: u64) -> Self {
        Self {
            active: false,
            current_gesture: None,
            progress: 1.0,
            remaining_secs: 0,
            collected_samples,
            complete: true,
        }
    }

    /// Session ended without completing
    pub fn aborted() -> Self {
        Self::default()
    }
}

impl Default for CalibrationSnapshot {
    fn default() -> Self {
        Self {
            active: false,
            current_gesture: None,
            progress: 0.0,
            remaining_secs: 0,
            collected_samples: 0,
            complete: false,
        }
    }
}
