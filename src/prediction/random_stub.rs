// src/prediction/random_stub.rs
//! Random gesture stub, the default and test classifier
//!
//! Picks a label uniformly from a small fixed set and draws a confidence
//! from that label's hard-coded range, ignoring the signal entirely. The
//! attached feature mapping still carries the real digest so observers see
//! the same shape a real classifier would produce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::constants::prediction::*;
use crate::prediction::{Classifier, FeatureDigest, GesturePrediction, GestureType};
use crate::signal::SignalBatch;
use crate::utils::time::current_timestamp_millis;

const STUB_GESTURES: [GestureType; 4] = [
    GestureType::Fist,
    GestureType::OpenHand,
    GestureType::Point,
    GestureType::Rest,
];

pub struct RandomStubClassifier {
    rng: StdRng,
}

impl RandomStubClassifier {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn draw_confidence(&mut self, gesture: GestureType) -> f32 {
        let r: f32 = self.rng.gen();
        match gesture {
            GestureType::Fist => FIST_CONFIDENCE_FLOOR + r * (1.0 - FIST_CONFIDENCE_FLOOR),
            GestureType::OpenHand => {
                OPEN_HAND_CONFIDENCE_FLOOR + r * (1.0 - OPEN_HAND_CONFIDENCE_FLOOR)
            }
            GestureType::Point => POINT_CONFIDENCE_FLOOR + r * (1.0 - POINT_CONFIDENCE_FLOOR),
            _ => r * REST_CONFIDENCE_CEILING,
        }
    }
}

impl Default for RandomStubClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RandomStubClassifier {
    fn classify(&mut self, _batch: &SignalBatch, digest: &FeatureDigest) -> GesturePrediction {
        let gesture = STUB_GESTURES[self.rng.gen_range(0..STUB_GESTURES.len())];
        let confidence = self.draw_confidence(gesture);

        GesturePrediction {
            gesture,
            confidence,
            timestamp_ms: current_timestamp_millis(),
            features: GesturePrediction::feature_map(digest),
        }
    }

    fn name(&self) -> &'static str {
        "random_stub"
    }
}
