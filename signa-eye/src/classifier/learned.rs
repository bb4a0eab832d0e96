//! Adapter around the pre-trained gesture model

use super::geometric::GeometricClassifier;
use super::{Classification, Tier};
use crate::error::ClassifierError;
use crate::models::OnnxScoreModel;
use signa_core::{FeatureVector, GestureLabel};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Anything that maps a feature vector to per-class scores
#[cfg_attr(test, mockall::automock)]
pub trait ScoreModel: Send + Sync {
    fn scores(&self, features: &FeatureVector) -> Result<Vec<f32>, ClassifierError>;
}

/// Learned classifier with permanent geometric fallback.
///
/// Whether a model is present is decided once at construction and never
/// changes afterwards.
pub struct LearnedClassifier {
    model: Option<Arc<dyn ScoreModel>>,
    fallback: GeometricClassifier,
}

impl LearnedClassifier {
    /// No model: every call is answered by the geometric tier
    pub fn unloaded() -> Self {
        Self {
            model: None,
            fallback: GeometricClassifier::new(),
        }
    }

    pub fn with_model(model: Arc<dyn ScoreModel>) -> Self {
        Self {
            model: Some(model),
            fallback: GeometricClassifier::new(),
        }
    }

    /// Load an ONNX artifact. A missing or unloadable artifact downgrades to
    /// the geometric tier instead of failing.
    pub fn load(path: &Path, inference_threads: usize) -> Self {
        if !path.exists() {
            warn!("Classifier model not found at {:?}, using rule-based classification", path);
            return Self::unloaded();
        }

        match OnnxScoreModel::load(path, inference_threads) {
            Ok(model) => {
                info!("Classifier model loaded from {:?}", path);
                Self::with_model(Arc::new(model))
            }
            Err(e) => {
                error!("Failed to load classifier model {:?}: {}", path, e);
                Self::unloaded()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Classify a raw vector. Only a malformed shape is reported as an error.
    pub fn predict(&self, values: &[f32]) -> Result<Classification, ClassifierError> {
        let vector = FeatureVector::from_slice(values)?;
        Ok(self.predict_vector(&vector))
    }

    /// Classify a validated vector. Inference failures fall back to the geometric tier.
    pub fn predict_vector(&self, vector: &FeatureVector) -> Classification {
        let Some(model) = &self.model else {
            return self.fallback.classify_vector(vector);
        };

        match model.scores(vector).and_then(|scores| interpret_scores(&scores)) {
            Ok((label, confidence)) => {
                debug!("Learned classifier: {} ({:.2})", label, confidence);
                Classification::new(label, confidence, Tier::Learned)
            }
            Err(e) => {
                error!("Model prediction error: {}", e);
                self.fallback.classify_vector(vector)
            }
        }
    }
}

/// Argmax over the score vector. Indices past the label set map to `Unknown`.
fn interpret_scores(scores: &[f32]) -> Result<(GestureLabel, f32), ClassifierError> {
    if scores.is_empty() {
        return Err(ClassifierError::Inference("Model returned no scores".to_string()));
    }

    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ClassifierError::Inference("Model returned non-finite scores".to_string()));
    }

    let (index, max) = scores
        .iter()
        .copied()
        .enumerate()
        .fold((0usize, f32::NEG_INFINITY), |best, (i, score)| {
            if score > best.1 { (i, score) } else { best }
        });

    Ok((GestureLabel::from_class_index(index), max.clamp(0.0, 1.0)))
}
