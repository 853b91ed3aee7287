// src/signal/types.rs
//! Sample and batch types produced by the telemetry pipeline

use serde::{Deserialize, Serialize};

/// Single EMG measurement on one channel
///
/// `value_uv` is a signed amplitude in microvolt-like units, clamped by the
/// generator. `quality` is always within [0, 1]. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmgSample {
    pub timestamp_ms: u64,
    pub channel_id: u32,
    pub value_uv: f32,
    pub quality: f32,
}

/// Timestamped, sequence-numbered group of samples for one device
///
/// `sequence` increases strictly by one within a stream session and restarts
/// at zero on a fresh subscription. A batch is never mutated after emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBatch {
    pub device_id: String,
    pub samples: Vec<EmgSample>,
    pub sequence: u64,
    pub timestamp_ms: u64,
}

impl SignalBatch {
    /// Total sample count across all channels
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples belonging to a single channel, in emission order
    pub fn samples_for_channel(&self, channel_id: u32) -> impl Iterator<Item = &EmgSample> {
        self.samples.iter().filter(move |s| s.channel_id == channel_id)
    }

    /// Distinct channel ids present in this batch, in first-seen order
    pub fn channel_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        for sample in &self.samples {
            if !ids.contains(&sample.channel_id) {
                ids.push(sample.channel_id);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(channel_id: u32, value_uv: f32) -> EmgSample {
        EmgSample {
            timestamp_ms: 0,
            channel_id,
            value_uv,
            quality: 0.9,
        }
    }

    #[test]
    fn test_channel_filtering() {
        let batch = SignalBatch {
            device_id: "d1".to_string(),
            samples: vec![sample(1, 10.0), sample(2, 20.0), sample(1, 30.0)],
            sequence: 0,
            timestamp_ms: 1000,
        };

        let ch1: Vec<f32> = batch.samples_for_channel(1).map(|s| s.value_uv).collect();
        assert_eq!(ch1, vec![10.0, 30.0]);

        assert_eq!(batch.channel_ids(), vec![1, 2]);
        assert_eq!(batch.len(), 3);
        assert!(!batch.is_empty());
    }
}
