// src/prediction/mod.rs
//! Gesture prediction over incoming signal batches
//!
//! The classification interface is deliberately pluggable: the random stub
//! reproduces the canned demo behavior, the energy rule derives its label
//! from the computed feature digest. Both produce one superseding
//! [`GesturePrediction`] per batch; predictions are never merged.

pub mod energy;
pub mod features;
pub mod random_stub;

pub use energy::EnergyRuleClassifier;
pub use features::{FeatureDigest, FeatureExtractor};
pub use random_stub::RandomStubClassifier;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::constants::prediction::{
    FEATURE_FREQUENCY_PEAK, FEATURE_RMS, FEATURE_VARIANCE,
};
use crate::config::PredictionConfig;
use crate::signal::SignalBatch;

/// Gesture labels understood by the prosthetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureType {
    Fist,
    OpenHand,
    Point,
    Pinch,
    Flexor,
    Extensor,
    Bicep,
    Tricep,
    Rest,
}

impl GestureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureType::Fist => "fist",
            GestureType::OpenHand => "open_hand",
            GestureType::Point => "point",
            GestureType::Pinch => "pinch",
            GestureType::Flexor => "flexor",
            GestureType::Extensor => "extensor",
            GestureType::Bicep => "bicep",
            GestureType::Tricep => "tricep",
            GestureType::Rest => "rest",
        }
    }
}

impl std::fmt::Display for GestureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification outcome, superseded wholesale by the next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GesturePrediction {
    pub gesture: GestureType,
    pub confidence: f32,
    pub timestamp_ms: u64,
    pub features: BTreeMap<String, f32>,
}

impl GesturePrediction {
    /// Feature mapping shared by all classifier implementations
    pub fn feature_map(digest: &FeatureDigest) -> BTreeMap<String, f32> {
        let mut features = BTreeMap::new();
        features.insert(FEATURE_RMS.to_string(), digest.rms);
        features.insert(FEATURE_VARIANCE.to_string(), digest.variance);
        features.insert(FEATURE_FREQUENCY_PEAK.to_string(), digest.frequency_peak_hz);
        features
    }
}

/// Pluggable gesture classification capability
pub trait Classifier: Send {
    /// Classify one batch given its precomputed feature digest
    fn classify(&mut self, batch: &SignalBatch, digest: &FeatureDigest) -> GesturePrediction;

    /// Short implementation name for logging
    fn name(&self) -> &'static str;
}

/// Classifier selection, driven by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    RandomStub,
    EnergyRule,
}

/// Build the configured classifier implementation
pub fn build_classifier(config: &PredictionConfig) -> Box<dyn Classifier> {
    match config.classifier {
        ClassifierKind::RandomStub => match config.seed {
            Some(seed) => Box::new(RandomStubClassifier::with_seed(seed)),
            None => Box::new(RandomStubClassifier::new()),
        },
        ClassifierKind::EnergyRule => Box::new(EnergyRuleClassifier::new()),
    }
}
