// src/signal/assembler.rs
//! Batch assembly over the signal generator
//!
//! One call produces one [`SignalBatch`] covering every configured channel
//! for the next `batch_size` sample indices. Sample indices continue across
//! batches (`sequence * batch_size + i`), so the waveform is phase-continuous
//! from one batch to the next.

use std::sync::Arc;

use crate::config::SignalConfig;
use crate::signal::generator::SignalGenerator;
use crate::signal::types::{EmgSample, SignalBatch};
use crate::utils::time::{sample_offset_millis, SystemTimeProvider, TimeProvider};

pub struct BatchAssembler {
    device_id: String,
    batch_size: usize,
    channel_ids: Vec<u32>,
    sample_rate_hz: u32,
    generator: SignalGenerator,
    time: Arc<dyn TimeProvider>,
}

impl BatchAssembler {
    pub fn new(device_id: impl Into<String>, config: &SignalConfig) -> Self {
        Self::build(device_id, config, SignalGenerator::new(config.sample_rate_hz))
    }

    /// Assembler whose generator output is reproducible for a given seed
    pub fn with_seed(device_id: impl Into<String>, config: &SignalConfig, seed: u64) -> Self {
        Self::build(
            device_id,
            config,
            SignalGenerator::with_seed(config.sample_rate_hz, seed),
        )
    }

    fn build(device_id: impl Into<String>, config: &SignalConfig, generator: SignalGenerator) -> Self {
        Self {
            device_id: device_id.into(),
            batch_size: config.batch_size,
            channel_ids: config.channel_ids.clone(),
            sample_rate_hz: config.sample_rate_hz,
            generator,
            time: Arc::new(SystemTimeProvider),
        }
    }

    /// Replace the wall clock, used by tests to pin batch timestamps
    pub fn with_time_provider(mut self, time: Arc<dyn TimeProvider>) -> Self {
        self.time = time;
        self
    }

    /// Assemble the batch for a caller-supplied sequence number
    pub fn assemble(&mut self, sequence: u64) -> SignalBatch {
        let timestamp_ms = self.time.now_millis();
        let mut samples = Vec::with_capacity(self.batch_size * self.channel_ids.len());

        let generator = &mut self.generator;
        for &channel_id in &self.channel_ids {
            for i in 0..self.batch_size {
                let sample_index = sequence * self.batch_size as u64 + i as u64;

                samples.push(EmgSample {
                    timestamp_ms: timestamp_ms + sample_offset_millis(i, self.sample_rate_hz),
                    channel_id,
                    value_uv: generator.generate(channel_id, sample_index),
                    quality: generator.sample_quality(),
                });
            }
        }

        SignalBatch {
            device_id: self.device_id.clone(),
            samples,
            sequence,
            timestamp_ms,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::MockTimeProvider;

    fn test_config() -> SignalConfig {
        SignalConfig {
            sample_rate_hz: 2000,
            batch_size: 100,
            channel_ids: vec![1, 2],
        }
    }

    #[test]
    fn test_batch_covers_all_channels() {
        let mut assembler = BatchAssembler::with_seed("d1", &test_config(), 42);
        let batch = assembler.assemble(0);

        assert_eq!(batch.device_id, "d1");
        assert_eq!(batch.sequence, 0);
        assert_eq!(batch.len(), 200);
        assert_eq!(batch.samples_for_channel(1).count(), 100);
        assert_eq!(batch.samples_for_channel(2).count(), 100);
    }

    #[test]
    fn test_sample_timestamps_follow_rate() {
        let time = Arc::new(MockTimeProvider::at_millis(10_000));
        let mut assembler =
            BatchAssembler::with_seed("d1", &test_config(), 42).with_time_provider(time);

        let batch = assembler.assemble(0);
        assert_eq!(batch.timestamp_ms, 10_000);

        // At 2 kHz two consecutive samples share a millisecond
        let ch1: Vec<u64> = batch.samples_for_channel(1).map(|s| s.timestamp_ms).collect();
        assert_eq!(ch1[0], 10_000);
        assert_eq!(ch1[1], 10_000);
        assert_eq!(ch1[2], 10_001);
        assert_eq!(ch1[99], 10_049);
    }

    #[test]
    fn test_all_samples_clamped_and_quality_bounded() {
        let mut assembler = BatchAssembler::with_seed("d1", &test_config(), 9);

        for sequence in 0..20 {
            let batch = assembler.assemble(sequence);
            for sample in &batch.samples {
                assert!(sample.value_uv.abs() <= 1000.0);
                assert!((0.0..=1.0).contains(&sample.quality));
            }
        }
    }

    #[test]
    fn test_sample_indices_continue_across_batches() {
        // Phase continuity: batch N+1 picks up the waveform exactly where a
        // single double-size batch would have placed it.
        let config = SignalConfig {
            sample_rate_hz: 2000,
            batch_size: 50,
            channel_ids: vec![3],
        };
        let double = SignalConfig {
            sample_rate_hz: 2000,
            batch_size: 100,
            channel_ids: vec![3],
        };

        let mut split = BatchAssembler::with_seed("d1", &config, 5);
        let mut joined = BatchAssembler::with_seed("d1", &double, 5);

        let first = split.assemble(0);
        let second = split.assemble(1);
        let whole = joined.assemble(0);

        let split_values: Vec<f32> = first
            .samples
            .iter()
            .chain(second.samples.iter())
            .map(|s| s.value_uv)
            .collect();
        let whole_values: Vec<f32> = whole.samples.iter().map(|s| s.value_uv).collect();

        assert_eq!(split_values, whole_values);
    }
}
