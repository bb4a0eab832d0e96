//! Two-tier gesture classification
//!
//! The learned tier wraps a pre-trained score model. The geometric tier is a
//! pure rule set over finger extension and answers whenever the learned tier
//! is missing or fails. Every result records which tier produced it.

pub mod geometric;
pub mod learned;
pub mod engine;

pub use geometric::GeometricClassifier;
pub use learned::{LearnedClassifier, ScoreModel};
pub use engine::ClassificationEngine;

use serde::Serialize;
use signa_core::GestureLabel;

/// Which classifier answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Learned,
    Geometric,
}

/// Label, confidence and the tier that produced them
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub label: GestureLabel,
    pub confidence: f32,
    pub tier: Tier,
}

impl Classification {
    pub fn new(label: GestureLabel, confidence: f32, tier: Tier) -> Self {
        Self { label, confidence, tier }
    }
}
