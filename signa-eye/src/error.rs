//! Error types for signa-eye

use thiserror::Error;
use signa_core::Error as CoreError;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("ONNX Runtime error: {0}")]
    Ort(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

/// Errors raised by a classifier tier
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Invalid feature shape: expected {expected} values, got {actual}")]
    InvalidFeatureShape { expected: usize, actual: usize },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl From<CoreError> for ClassifierError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidFeatureShape { expected, actual } => {
                ClassifierError::InvalidFeatureShape { expected, actual }
            }
            other => ClassifierError::Inference(other.to_string()),
        }
    }
}

impl From<ort::Error> for VisionError {
    fn from(err: ort::Error) -> Self {
        VisionError::Ort(err.to_string())
    }
}
