// src/prediction/energy.rs
//! Energy-rule classifier driven by the computed feature digest
//!
//! Deterministic: amplitude RMS decides rest versus activation, and the
//! spectral peak decides which muscle group the activation is attributed
//! to. The flexor channel synthesizes around 60 Hz and the extensor around
//! 80 Hz, so the midpoint splits the two labels.

use crate::config::constants::prediction::{ENERGY_ACTIVE_THRESHOLD_UV, ENERGY_STRONG_THRESHOLD_UV};
use crate::config::constants::signal::{EXTENSOR_FUNDAMENTAL_HZ, FLEXOR_FUNDAMENTAL_HZ};
use crate::prediction::{Classifier, FeatureDigest, GesturePrediction, GestureType};
use crate::signal::SignalBatch;
use crate::utils::time::current_timestamp_millis;

pub struct EnergyRuleClassifier {
    active_threshold_uv: f32,
    strong_threshold_uv: f32,
}

impl EnergyRuleClassifier {
    pub fn new() -> Self {
        Self {
            active_threshold_uv: ENERGY_ACTIVE_THRESHOLD_UV,
            strong_threshold_uv: ENERGY_STRONG_THRESHOLD_UV,
        }
    }

    /// Override the activation thresholds, in µV RMS
    pub fn with_thresholds(active_uv: f32, strong_uv: f32) -> Self {
        Self {
            active_threshold_uv: active_uv,
            strong_threshold_uv: strong_uv,
        }
    }

    fn label_for(&self, digest: &FeatureDigest) -> (GestureType, f32) {
        let rms_uv = digest.rms_amplitude_uv();

        if rms_uv < self.active_threshold_uv {
            // Quiet signal: confidence grows as energy approaches zero
            let slack = 1.0 - rms_uv / self.active_threshold_uv;
            return (GestureType::Rest, (0.5 + 0.5 * slack).clamp(0.0, 1.0));
        }

        let midpoint = ((FLEXOR_FUNDAMENTAL_HZ + EXTENSOR_FUNDAMENTAL_HZ) / 2.0) as f32;
        let gesture = if digest.frequency_peak_hz > 0.0 && digest.frequency_peak_hz >= midpoint {
            GestureType::OpenHand
        } else {
            GestureType::Fist
        };

        let span = (self.strong_threshold_uv - self.active_threshold_uv).max(f32::EPSILON);
        let strength = ((rms_uv - self.active_threshold_uv) / span).clamp(0.0, 1.0);
        (gesture, (0.5 + 0.5 * strength).clamp(0.0, 1.0))
    }
}

impl Default for EnergyRuleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for EnergyRuleClassifier {
    fn classify(&mut self, _batch: &SignalBatch, digest: &FeatureDigest) -> GesturePrediction {
        let (gesture, confidence) = self.label_for(digest);

        GesturePrediction {
            gesture,
            confidence,
            timestamp_ms: current_timestamp_millis(),
            features: GesturePrediction::feature_map(digest),
        }
    }

    fn name(&self) -> &'static str {
        "energy_rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_batch() -> SignalBatch {
        SignalBatch {
            device_id: "d1".to_string(),
            samples: vec![],
            sequence: 0,
            timestamp_ms: 0,
        }
    }

    fn digest(rms_amplitude_uv: f32, frequency_peak_hz: f32) -> FeatureDigest {
        FeatureDigest {
            rms: rms_amplitude_uv * rms_amplitude_uv,
            variance: 0.0,
            frequency_peak_hz,
        }
    }

    #[test]
    fn test_quiet_signal_is_rest() {
        let mut classifier = EnergyRuleClassifier::new();
        let prediction = classifier.classify(&empty_batch(), &digest(10.0, 60.0));

        assert_eq!(prediction.gesture, GestureType::Rest);
        assert!(prediction.confidence > 0.9);
    }

    #[test]
    fn test_flexor_band_maps_to_fist() {
        let mut classifier = EnergyRuleClassifier::new();
        let prediction = classifier.classify(&empty_batch(), &digest(400.0, 60.0));

        assert_eq!(prediction.gesture, GestureType::Fist);
        assert!((0.5..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn test_extensor_band_maps_to_open_hand() {
        let mut classifier = EnergyRuleClassifier::new();
        let prediction = classifier.classify(&empty_batch(), &digest(400.0, 80.0));

        assert_eq!(prediction.gesture, GestureType::OpenHand);
    }

    #[test]
    fn test_confidence_saturates_at_strong_threshold() {
        let mut classifier = EnergyRuleClassifier::new();
        let prediction = classifier.classify(&empty_batch(), &digest(900.0, 60.0));

        assert_eq!(prediction.gesture, GestureType::Fist);
        assert_eq!(prediction.confidence, 1.0);
    }

    #[test]
    fn test_deterministic_for_same_digest() {
        let mut classifier = EnergyRuleClassifier::new();
        let d = digest(300.0, 75.0);

        let a = classifier.classify(&empty_batch(), &d);
        let b = classifier.classify(&empty_batch(), &d);
        assert_eq!(a.gesture, b.gesture);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_confidence_always_unit_interval() {
        let mut classifier = EnergyRuleClassifier::with_thresholds(100.0, 200.0);
        for rms in [0.0, 50.0, 100.0, 150.0, 200.0, 1000.0] {
            for peak in [0.0, 20.0, 60.0, 70.0, 80.0, 150.0] {
                let prediction = classifier.classify(&empty_batch(), &digest(rms, peak));
                assert!((0.0..=1.0).contains(&prediction.confidence));
            }
        }
    }
}
