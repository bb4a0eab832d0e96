//! Rule-based gesture classifier over finger extension

use super::{Classification, Tier};
use crate::error::ClassifierError;
use signa_core::types::{
    INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP,
    THUMB_IP, THUMB_TIP,
};
use signa_core::{FeatureVector, GestureLabel};

/// (tip, second joint) landmark pairs, thumb first
const FINGER_JOINTS: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_IP),
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

pub const THUMB: u8 = 1 << 0;
pub const INDEX: u8 = 1 << 1;
pub const MIDDLE: u8 = 1 << 2;
pub const RING: u8 = 1 << 3;
pub const PINKY: u8 = 1 << 4;

const ALL_FINGERS: u8 = THUMB | INDEX | MIDDLE | RING | PINKY;

/// Ordered rules, first match wins
const RULES: [(u8, GestureLabel, f32); 5] = [
    (ALL_FINGERS, GestureLabel::Hello, 0.8),
    (INDEX | PINKY, GestureLabel::ILoveYou, 0.8),
    (THUMB, GestureLabel::Yes, 0.7),
    (INDEX | MIDDLE, GestureLabel::No, 0.7),
    (0, GestureLabel::ThankYou, 0.6),
];

const UNKNOWN_CONFIDENCE: f32 = 0.3;

/// Deterministic fallback classifier. Stateless and safe to share.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricClassifier;

impl GeometricClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a raw 63-value vector
    pub fn classify(&self, values: &[f32]) -> Result<Classification, ClassifierError> {
        let vector = FeatureVector::from_slice(values)?;
        Ok(self.classify_vector(&vector))
    }

    /// Classify an already validated feature vector
    pub fn classify_vector(&self, vector: &FeatureVector) -> Classification {
        let pattern = extended_fingers(vector);
        let (label, confidence) = RULES
            .iter()
            .find(|(mask, _, _)| *mask == pattern)
            .map(|(_, label, confidence)| (*label, *confidence))
            .unwrap_or((GestureLabel::Unknown, UNKNOWN_CONFIDENCE));

        Classification::new(label, confidence, Tier::Geometric)
    }
}

/// Five-bit extension pattern. A finger is extended when its tip sits strictly
/// above its second joint in image space (smaller y).
pub fn extended_fingers(vector: &FeatureVector) -> u8 {
    FINGER_JOINTS
        .iter()
        .enumerate()
        .fold(0u8, |pattern, (bit, &(tip, joint))| {
            if vector.landmark(tip).y < vector.landmark(joint).y {
                pattern | (1 << bit)
            } else {
                pattern
            }
        })
}
