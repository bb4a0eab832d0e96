//! ONNX hand landmark model
//!
//! Runs a single-hand landmark network on the whole frame. The network takes a
//! `[1, S, S, 3]` RGB tensor and returns 21 landmarks in input-pixel units
//! plus a hand-presence logit. Frames are expected to be roughly hand-centred;
//! there is no palm-detection crop stage.

use crate::error::VisionError;
use crate::landmarks::LandmarkExtractor;
use crate::utils::{image_to_nhwc_tensor, sigmoid};
use image::DynamicImage;
use ort::session::Session;
use ort::value::Tensor;
use parking_lot::Mutex;
use signa_core::{HandPose, Landmark, FEATURE_LEN, NUM_LANDMARKS};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_INPUT_SIZE: u32 = 224;

pub struct OnnxHandLandmarker {
    session: Mutex<Session>,
    input_name: String,
    landmarks_output: String,
    presence_output: Option<String>,
    input_size: u32,
    min_detection_confidence: f32,
}

impl OnnxHandLandmarker {
    pub fn load(
        model_path: &Path,
        min_detection_confidence: f32,
        inference_threads: usize,
    ) -> Result<Self, VisionError> {
        let session = Session::builder()?
            .with_intra_threads(inference_threads)?
            .commit_from_file(model_path)
            .map_err(|e| VisionError::Ort(format!("Failed to load landmark model: {}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| VisionError::Model("Landmark model has no inputs".to_string()))?;

        let mut outputs = session.outputs.iter().map(|o| o.name.clone());
        let landmarks_output = outputs
            .next()
            .ok_or_else(|| VisionError::Model("Landmark model has no outputs".to_string()))?;
        let presence_output = outputs.next();

        info!("Hand landmark model loaded from {:?}", model_path);

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            landmarks_output,
            presence_output,
            input_size: DEFAULT_INPUT_SIZE,
            min_detection_confidence,
        })
    }

    /// Convert raw network output into a pose normalized to [0, 1] image space
    fn decode_landmarks(&self, raw: &[f32]) -> Result<HandPose, VisionError> {
        if raw.len() < FEATURE_LEN {
            return Err(VisionError::Model(format!(
                "Landmark output too short: expected {} values, got {}",
                FEATURE_LEN,
                raw.len()
            )));
        }

        let scale = self.input_size as f32;
        let landmarks: Vec<Landmark> = raw[..FEATURE_LEN]
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0] / scale, c[1] / scale, c[2] / scale))
            .collect();
        debug_assert_eq!(landmarks.len(), NUM_LANDMARKS);

        Ok(HandPose::from_landmarks(&landmarks)?)
    }
}

impl LandmarkExtractor for OnnxHandLandmarker {
    fn extract(&self, image: &DynamicImage) -> Result<Option<HandPose>, VisionError> {
        let size = self.input_size as usize;
        let data = image_to_nhwc_tensor(image, self.input_size)?;
        let input = Tensor::from_array(([1usize, size, size, 3], data))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input])?;

        if let Some(name) = &self.presence_output {
            let presence = outputs
                .get(name.as_str())
                .ok_or_else(|| VisionError::Model(format!("Output '{}' not found", name)))?;
            let (_, logits) = presence.try_extract_tensor::<f32>()?;
            let score = logits.first().copied().map(sigmoid).unwrap_or(0.0);
            if score < self.min_detection_confidence {
                debug!("Hand presence {:.2} below threshold", score);
                return Ok(None);
            }
        }

        let landmarks = outputs
            .get(self.landmarks_output.as_str())
            .ok_or_else(|| VisionError::Model(format!("Output '{}' not found", self.landmarks_output)))?;
        let (_, raw) = landmarks.try_extract_tensor::<f32>()?;

        self.decode_landmarks(raw).map(Some)
    }

    fn name(&self) -> &str {
        "onnx-hand-landmarker"
    }
}
