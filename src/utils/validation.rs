// src/utils/validation.rs
//! Validation helpers for configuration parameters and runtime inputs
//!
//! All range checks pull their bounds from the config constants module
//! so that tunables and their limits stay in one place.

use std::fmt;

use crate::config::constants::{signal, stream, validation};

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of valid range
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    /// Required field missing or empty
    RequiredFieldMissing(String),
    /// Invalid field format
    InvalidFormat {
        field: String,
        value: String,
        expected: String,
    },
    /// Cross-field validation failure
    ConstraintViolation {
        fields: Vec<String>,
        message: String,
    },
    /// Custom validation failure
    Custom(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, value, min, max } => {
                write!(f, "Field '{}' value '{}' is out of range [{}, {}]", field, value, min, max)
            }
            ValidationError::RequiredFieldMissing(field) => {
                write!(f, "Required field '{}' is missing", field)
            }
            ValidationError::InvalidFormat { field, value, expected } => {
                write!(f, "Field '{}' has invalid format '{}', expected {}", field, value, expected)
            }
            ValidationError::ConstraintViolation { fields, message } => {
                write!(f, "Constraint violation for fields [{}]: {}", fields.join(", "), message)
            }
            ValidationError::Custom(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate numeric range
pub fn validate_range<T>(value: T, min: T, max: T, field: &str) -> ValidationResult<()>
where
    T: PartialOrd + fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Validate a quality or confidence value lies in [0, 1]
pub fn validate_unit_interval(value: f32, field: &str) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            value: value.to_string(),
            expected: "finite value in [0, 1]".to_string(),
        });
    }
    validate_range(value, 0.0, 1.0, field)
}

/// Validate virtual sample rate
pub fn validate_sample_rate(rate_hz: u32) -> ValidationResult<()> {
    validate_range(
        rate_hz,
        signal::MIN_SAMPLE_RATE_HZ,
        signal::MAX_SAMPLE_RATE_HZ,
        "sample_rate_hz",
    )
}

/// Validate samples-per-channel batch size
pub fn validate_batch_size(size: usize) -> ValidationResult<()> {
    validate_range(
        size,
        signal::MIN_BATCH_SIZE,
        signal::MAX_BATCH_SIZE,
        "batch_size",
    )
}

/// Validate stream pacing interval
pub fn validate_batch_interval(interval_ms: u64) -> ValidationResult<()> {
    validate_range(
        interval_ms,
        stream::MIN_BATCH_INTERVAL_MS,
        stream::MAX_BATCH_INTERVAL_MS,
        "batch_interval_ms",
    )
}

/// Validate the active channel id set
pub fn validate_channel_ids(channel_ids: &[u32]) -> ValidationResult<()> {
    if channel_ids.is_empty() {
        return Err(ValidationError::RequiredFieldMissing("channel_ids".to_string()));
    }

    if channel_ids.len() > signal::MAX_CHANNEL_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "channel_ids".to_string(),
            value: channel_ids.len().to_string(),
            min: "1".to_string(),
            max: signal::MAX_CHANNEL_COUNT.to_string(),
        });
    }

    for (i, id) in channel_ids.iter().enumerate() {
        if channel_ids[..i].contains(id) {
            return Err(ValidationError::ConstraintViolation {
                fields: vec!["channel_ids".to_string()],
                message: format!("Duplicate channel id {}", id),
            });
        }
    }

    Ok(())
}

/// Validate and return a device identifier
pub fn validate_device_id(device_id: &str) -> ValidationResult<String> {
    if device_id.is_empty() {
        return Err(ValidationError::RequiredFieldMissing("device_id".to_string()));
    }

    if device_id.len() > validation::MAX_DEVICE_ID_LENGTH {
        return Err(ValidationError::OutOfRange {
            field: "device_id".to_string(),
            value: device_id.len().to_string(),
            min: "1".to_string(),
            max: validation::MAX_DEVICE_ID_LENGTH.to_string(),
        });
    }

    // Only allow alphanumeric, underscore, and dash
    if !device_id.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '-')) {
        return Err(ValidationError::InvalidFormat {
            field: "device_id".to_string(),
            value: device_id.to_string(),
            expected: "alphanumeric characters, underscore, or dash only".to_string(),
        });
    }

    Ok(device_id.to_string())
}

/// Validate a configuration document name
pub fn validate_config_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::RequiredFieldMissing("config_name".to_string()));
    }

    if name.len() > validation::MAX_CONFIG_NAME_LENGTH {
        return Err(ValidationError::OutOfRange {
            field: "config_name".to_string(),
            value: name.len().to_string(),
            min: "1".to_string(),
            max: validation::MAX_CONFIG_NAME_LENGTH.to_string(),
        });
    }

    if !name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        return Err(ValidationError::InvalidFormat {
            field: "config_name".to_string(),
            value: name.to_string(),
            expected: "alphanumeric characters, underscore, dash, or dot only".to_string(),
        });
    }

    Ok(())
}

/// Validate a calibration gesture sequence length
pub fn validate_gesture_sequence_len(len: usize) -> ValidationResult<()> {
    if len == 0 {
        return Err(ValidationError::RequiredFieldMissing("gesture_sequence".to_string()));
    }

    validate_range(
        len,
        1,
        validation::MAX_GESTURE_SEQUENCE_LENGTH,
        "gesture_sequence",
    )
}
