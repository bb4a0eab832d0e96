//! Single decision point for gesture classification

use super::learned::{LearnedClassifier, ScoreModel};
use super::Classification;
use crate::error::ClassifierError;
use crate::models::ModelManager;
use signa_core::FeatureVector;
use std::sync::Arc;
use tracing::info;

/// Built once at startup and shared read-only by every session
pub struct ClassificationEngine {
    learned: LearnedClassifier,
}

impl ClassificationEngine {
    pub fn new(learned: LearnedClassifier) -> Self {
        Self { learned }
    }

    /// Engine answered purely by the geometric tier
    pub fn rule_based() -> Self {
        Self::new(LearnedClassifier::unloaded())
    }

    pub fn with_model(model: Arc<dyn ScoreModel>) -> Self {
        Self::new(LearnedClassifier::with_model(model))
    }

    /// Resolve the classifier artifact through the model manager and load it
    pub fn from_manager(manager: &ModelManager) -> Self {
        let learned = match manager.classifier_artifact() {
            Some(path) => LearnedClassifier::load(&path, manager.inference_threads()),
            None => LearnedClassifier::unloaded(),
        };
        info!(
            "Classification engine ready (learned model: {})",
            if learned.is_loaded() { "loaded" } else { "unavailable, rule-based only" }
        );
        Self::new(learned)
    }

    pub fn classify(&self, vector: &FeatureVector) -> Classification {
        self.learned.predict_vector(vector)
    }

    /// Classify unvalidated input; only a wrong shape is an error
    pub fn classify_values(&self, values: &[f32]) -> Result<Classification, ClassifierError> {
        self.learned.predict(values)
    }

    pub fn model_loaded(&self) -> bool {
        self.learned.is_loaded()
    }
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self::rule_based()
    }
}
