// src/signal/generator.rs
//! Synthetic EMG waveform generation
//!
//! The waveform is a deterministic function of (channel, sample index): a
//! per-channel fundamental plus two scaled harmonics. Bounded noise and a
//! low-probability activation burst come from the generator's own RNG, so a
//! seeded generator reproduces its output exactly.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::constants::signal::*;

pub struct SignalGenerator {
    sample_rate_hz: u32,
    rng: StdRng,
}

impl SignalGenerator {
    /// Create a generator with an entropy-seeded RNG
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducible output
    pub fn with_seed(sample_rate_hz: u32, seed: u64) -> Self {
        Self {
            sample_rate_hz,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Amplitude in microvolts for one channel at one sample index
    ///
    /// Output is clamped to the symmetric [`CLAMP_LIMIT_UV`] range.
    pub fn generate(&mut self, channel_id: u32, sample_index: u64) -> f32 {
        let time = sample_index as f64 / self.sample_rate_hz as f64;
        let fundamental = Self::fundamental_for(channel_id);

        let base = (2.0 * PI * fundamental * time).sin();
        let second = (2.0 * PI * fundamental * SECOND_HARMONIC_RATIO * time).sin()
            * SECOND_HARMONIC_GAIN;
        let third = (2.0 * PI * fundamental * THIRD_HARMONIC_RATIO * time).sin()
            * THIRD_HARMONIC_GAIN;

        let noise = (self.rng.gen::<f64>() - 0.5) * NOISE_SPAN;

        let burst_gain = if self.rng.gen::<f64>() < BURST_PROBABILITY {
            self.rng.gen_range(BURST_GAIN_MIN..BURST_GAIN_MAX)
        } else {
            1.0
        };

        let amplitude = ((base + second + third) * burst_gain + noise) * AMPLITUDE_SCALE_UV;
        (amplitude as f32).clamp(-CLAMP_LIMIT_UV, CLAMP_LIMIT_UV)
    }

    /// Per-sample quality indicator, uniform in [QUALITY_FLOOR, QUALITY_FLOOR + QUALITY_SPAN)
    pub fn sample_quality(&mut self) -> f32 {
        QUALITY_FLOOR + self.rng.gen::<f32>() * QUALITY_SPAN
    }

    /// Fundamental frequency assigned to a channel
    pub fn fundamental_for(channel_id: u32) -> f64 {
        match channel_id {
            1 => FLEXOR_FUNDAMENTAL_HZ,
            2 => EXTENSOR_FUNDAMENTAL_HZ,
            _ => FALLBACK_FUNDAMENTAL_HZ,
        }
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }
}
