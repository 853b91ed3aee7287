// src/signal/mod.rs
//! Synthetic signal production: waveform generation and batch assembly

pub mod assembler;
pub mod generator;
pub mod types;

pub use assembler::BatchAssembler;
pub use generator::SignalGenerator;
pub use types::{EmgSample, SignalBatch};
