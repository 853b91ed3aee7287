// src/prediction/features.rs
//! Per-batch feature digest feeding the classifiers
//!
//! `rms` keeps the mean-squared-amplitude convention of the display layer,
//! so callers wanting true RMS take its square root. The spectral peak is
//! computed on the most energetic channel only; one batch is far too short
//! for cross-channel spectral averaging to add anything.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::signal::SignalBatch;

/// Aggregate signal features for one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDigest {
    /// Mean squared amplitude across all samples, in µV²
    pub rms: f32,
    /// Population variance of amplitudes, in µV²
    pub variance: f32,
    /// Dominant non-DC frequency of the most energetic channel, in Hz
    pub frequency_peak_hz: f32,
}

impl FeatureDigest {
    /// Amplitude-domain RMS in µV
    pub fn rms_amplitude_uv(&self) -> f32 {
        self.rms.max(0.0).sqrt()
    }
}

/// Computes feature digests over incoming batches
pub struct FeatureExtractor {
    sample_rate_hz: u32,
    planner: FftPlanner<f32>,
}

impl FeatureExtractor {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            planner: FftPlanner::new(),
        }
    }

    pub fn digest(&mut self, batch: &SignalBatch) -> FeatureDigest {
        if batch.is_empty() {
            return FeatureDigest {
                rms: 0.0,
                variance: 0.0,
                frequency_peak_hz: 0.0,
            };
        }

        let count = batch.len() as f32;
        let mean: f32 = batch.samples.iter().map(|s| s.value_uv).sum::<f32>() / count;
        let mean_square: f32 =
            batch.samples.iter().map(|s| s.value_uv * s.value_uv).sum::<f32>() / count;
        let variance: f32 = batch
            .samples
            .iter()
            .map(|s| (s.value_uv - mean).powi(2))
            .sum::<f32>()
            / count;

        FeatureDigest {
            rms: mean_square,
            variance,
            frequency_peak_hz: self.dominant_frequency(batch),
        }
    }

    /// Spectral peak of the channel with the highest energy, DC bin excluded
    fn dominant_frequency(&mut self, batch: &SignalBatch) -> f32 {
        let channel = match self.most_energetic_channel(batch) {
            Some(id) => id,
            None => return 0.0,
        };

        let values: Vec<f32> = batch
            .samples_for_channel(channel)
            .map(|s| s.value_uv)
            .collect();
        if values.len() < 2 {
            return 0.0;
        }

        let n = values.len();
        let fft = self.planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex<f32>> =
            values.iter().map(|&v| Complex::new(v, 0.0)).collect();
        fft.process(&mut buffer);

        let mut peak_bin = 0;
        let mut peak_magnitude = 0.0f32;
        for (bin, value) in buffer.iter().enumerate().take(n / 2).skip(1) {
            let magnitude = value.norm_sqr();
            if magnitude > peak_magnitude {
                peak_magnitude = magnitude;
                peak_bin = bin;
            }
        }

        if peak_bin == 0 {
            return 0.0;
        }
        peak_bin as f32 * self.sample_rate_hz as f32 / n as f32
    }

    fn most_energetic_channel(&self, batch: &SignalBatch) -> Option<u32> {
        let mut best: Option<(u32, f32)> = None;
        for channel_id in batch.channel_ids() {
            let energy: f32 = batch
                .samples_for_channel(channel_id)
                .map(|s| s.value_uv * s.value_uv)
                .sum();
            let better = match best {
                Some((_, current)) => energy > current,
                None => true,
            };
            if better {
                best = Some((channel_id, energy));
            }
        }
        best.map(|(id, _)| id)
    }
}
