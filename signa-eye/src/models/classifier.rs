//! ONNX gesture classifier artifact

use crate::classifier::ScoreModel;
use crate::error::{ClassifierError, VisionError};
use ort::session::Session;
use ort::value::Tensor;
use parking_lot::Mutex;
use signa_core::{FeatureVector, FEATURE_LEN};
use std::path::Path;
use tracing::{debug, info};

/// Score model backed by an ONNX session taking `[1, 63]` and producing `[1, N]`
pub struct OnnxScoreModel {
    // Running a session needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxScoreModel {
    pub fn load(model_path: &Path, inference_threads: usize) -> Result<Self, VisionError> {
        let session = Session::builder()
            .map_err(|e| VisionError::Ort(format!("Failed to create session builder: {}", e)))?
            .with_intra_threads(inference_threads)
            .map_err(|e| VisionError::Ort(format!("Failed to set intra-thread count: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| VisionError::Ort(format!("Failed to load classifier model: {}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| VisionError::Model("Classifier model has no inputs".to_string()))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| VisionError::Model("Classifier model has no outputs".to_string()))?;

        info!(
            "Classifier session ready ({} -> {}) from {:?}",
            input_name, output_name, model_path
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl ScoreModel for OnnxScoreModel {
    fn scores(&self, features: &FeatureVector) -> Result<Vec<f32>, ClassifierError> {
        let input = Tensor::from_array(([1usize, FEATURE_LEN], features.as_slice().to_vec()))
            .map_err(|e| ClassifierError::Inference(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| ClassifierError::Inference(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| ClassifierError::Inference(format!("Output '{}' not found", self.output_name)))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Failed to extract output: {}", e)))?;

        debug!("Classifier output shape: {:?}", shape);
        Ok(data.to_vec())
    }
}
