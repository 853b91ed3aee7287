// src/telemetry/aggregator.rs
//! Batch-to-display-state reduction

use crate::config::MonitorConfig;
use crate::signal::SignalBatch;
use crate::utils::time::{SystemTimeProvider, TimeProvider};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// How the aggregator treats sequence numbers on incoming batches.
///
/// `Accept` processes every batch in arrival order without validation.
/// `SkipStale` drops batches whose sequence is not strictly greater than
/// the last one applied, so duplicates and reordered stragglers never
/// overwrite newer display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    Accept,
    SkipStale,
}

/// Per-channel slice of the display state, rebuilt from each batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelBuffer {
    pub values: Vec<f32>,
    pub quality: f32,
    pub active: bool,
}

/// Immutable display state derived from the most recent batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub receiving: bool,
    pub channels: HashMap<u32, ChannelBuffer>,
    pub sample_rate_hz: u32,
    pub buffer_size: usize,
    pub latency_ms: u64,
}

impl SignalSnapshot {
    /// State shown when no stream is running
    pub fn idle(sample_rate_hz: u32, buffer_size: usize) -> Self {
        Self {
            receiving: false,
            channels: HashMap::new(),
            sample_rate_hz,
            buffer_size,
            latency_ms: 0,
        }
    }
}

/// Reduces incoming batches into [`SignalSnapshot`] values.
///
/// The reduction is replace-not-merge: each applied batch rebuilds the
/// whole channel map from its own samples, so a channel absent from the
/// latest batch disappears from the snapshot. Latency is measured from the
/// batch assembly timestamp to the wall clock at apply time.
pub struct StateAggregator {
    policy: SequencePolicy,
    max_points: usize,
    sample_rate_hz: u32,
    time: Arc<dyn TimeProvider>,
    last_sequence: Option<u64>,
    stale_batches: u64,
    sequence_gaps: u64,
}

impl StateAggregator {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            policy: config.aggregator.sequence_policy,
            max_points: config.aggregator.max_points_per_channel,
            sample_rate_hz: config.signal.sample_rate_hz,
            time: Arc::new(SystemTimeProvider),
            last_sequence: None,
            stale_batches: 0,
            sequence_gaps: 0,
        }
    }

    pub fn with_time_provider(mut self, time: Arc<dyn TimeProvider>) -> Self {
        self.time = time;
        self
    }

    /// Fold one batch into a fresh snapshot.
    ///
    /// Returns `None` when the sequence policy rejects the batch; the
    /// previous snapshot then remains current.
    pub fn apply(&mut self, batch: &SignalBatch) -> Option<SignalSnapshot> {
        if let SequencePolicy::SkipStale = self.policy {
            if let Some(last) = self.last_sequence {
                if batch.sequence <= last {
                    self.stale_batches += 1;
                    warn!(
                        sequence = batch.sequence,
                        last, "skipping stale telemetry batch"
                    );
                    return None;
                }
                if batch.sequence > last + 1 {
                    self.sequence_gaps += 1;
                }
            }
        }
        self.last_sequence = Some(batch.sequence);

        let mut channels: HashMap<u32, ChannelBuffer> = HashMap::new();
        for sample in &batch.samples {
            let buffer = channels
                .entry(sample.channel_id)
                .or_insert_with(|| ChannelBuffer {
                    values: Vec::new(),
                    quality: 0.0,
                    active: true,
                });
            buffer.values.push(sample.value_uv);
            buffer.quality = sample.quality;
        }

        for buffer in channels.values_mut() {
            if buffer.values.len() > self.max_points {
                let excess = buffer.values.len() - self.max_points;
                buffer.values.drain(..excess);
            }
        }

        let now = self.time.now_millis();
        Some(SignalSnapshot {
            receiving: true,
            channels,
            sample_rate_hz: self.sample_rate_hz,
            buffer_size: self.max_points,
            latency_ms: now.saturating_sub(batch.timestamp_ms),
        })
    }

    /// Forget sequence tracking, for a fresh subscription that restarts
    /// numbering at zero
    pub fn reset(&mut self) {
        self.last_sequence = None;
    }

    pub fn stale_batches(&self) -> u64 {
        self.stale_batches
    }

    pub fn sequence_gaps(&self) -> u64 {
        self.sequence_gaps
    }
}
