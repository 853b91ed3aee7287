// src/telemetry/mod.rs
//! Paced batch production and display-state aggregation

pub mod aggregator;
pub mod stream;

pub use aggregator::{ChannelBuffer, SequencePolicy, SignalSnapshot, StateAggregator};
pub use stream::{BackpressureMode, BatchReceiver, StreamHandle, TelemetryStream};
