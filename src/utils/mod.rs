// src/utils/mod.rs
//! Common utilities shared across the monitor core
//!
//! - Time and timestamp management with a mockable clock
//! - Validation helpers for configuration and runtime inputs

pub mod time;
pub mod validation;

pub use time::{
    current_timestamp_millis,
    current_timestamp_nanos,
    sample_offset_millis,
    MockTimeProvider,
    SystemTimeProvider,
    TimeProvider,
};

pub use validation::{ValidationError, ValidationResult};
