//! Model artifact resolution and verification

use crate::error::VisionError;
use crate::landmarks::{LandmarkExtractor, NullExtractor};
use crate::models::OnnxHandLandmarker;
use sha2::{Digest, Sha256};
use signa_core::ModelsConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Locates and verifies the artifacts consumed at startup
pub struct ModelManager {
    config: Arc<ModelsConfig>,
}

impl ModelManager {
    pub fn new(config: Arc<ModelsConfig>) -> Self {
        Self { config }
    }

    pub fn inference_threads(&self) -> usize {
        self.config.inference_threads
    }

    /// Ensure model directory exists
    pub fn ensure_model_dir(&self) -> Result<PathBuf, VisionError> {
        let model_dir = &self.config.model_dir;
        if !model_dir.exists() {
            fs::create_dir_all(model_dir)?;
            info!("Created model directory: {:?}", model_dir);
        }
        Ok(model_dir.clone())
    }

    /// Resolve a configured artifact path. Relative paths that don't exist as
    /// given are looked up inside the model directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.exists() {
            return path.to_path_buf();
        }
        let candidate = self.config.model_dir.join(path);
        if candidate.exists() {
            candidate
        } else {
            path.to_path_buf()
        }
    }

    /// Classifier artifact path, if present and matching the configured checksum.
    /// Absence is a capability downgrade, not an error.
    pub fn classifier_artifact(&self) -> Option<PathBuf> {
        let path = self.resolve(&self.config.classifier_path);
        if !path.exists() {
            warn!("Classifier model not found at {:?}, using rule-based classification", path);
            return None;
        }

        if let Some(expected) = &self.config.classifier_sha256 {
            match verify_checksum(&path, expected) {
                Ok(true) => info!("Verified checksum for classifier model {:?}", path),
                Ok(false) => {
                    error!("Checksum mismatch for classifier model {:?}, ignoring artifact", path);
                    return None;
                }
                Err(e) => {
                    error!("Failed to read classifier model {:?}: {}", path, e);
                    return None;
                }
            }
        }

        Some(path)
    }

    /// Build the landmark extractor. Falls back to a detector that never finds a hand.
    pub fn landmark_extractor(&self) -> Arc<dyn LandmarkExtractor> {
        let Some(configured) = &self.config.landmarker_path else {
            warn!("No landmark model configured, hand detection disabled");
            return Arc::new(NullExtractor);
        };

        let path = self.resolve(configured);
        if !path.exists() {
            warn!("Landmark model not found at {:?}, hand detection disabled", path);
            return Arc::new(NullExtractor);
        }

        match OnnxHandLandmarker::load(
            &path,
            self.config.min_detection_confidence,
            self.config.inference_threads,
        ) {
            Ok(landmarker) => Arc::new(landmarker),
            Err(e) => {
                error!("Failed to load landmark model {:?}: {}", path, e);
                Arc::new(NullExtractor)
            }
        }
    }
}

/// Hex-encoded SHA-256 of a file
pub fn file_sha256(path: &Path) -> Result<String, VisionError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn verify_checksum(path: &Path, expected: &str) -> Result<bool, VisionError> {
    Ok(file_sha256(path)?.eq_ignore_ascii_case(expected))
}
