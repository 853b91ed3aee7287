// src/hal/mod.rs
//! Hardware abstraction for the device control endpoint

pub mod mock;
pub mod traits;
pub mod types;

pub use mock::MockDeviceEndpoint;
pub use traits::*;
pub use types::*;
