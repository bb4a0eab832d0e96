//! Model artifacts and ONNX inference

pub mod manager;
pub mod classifier;
pub mod landmarker;

pub use manager::ModelManager;
pub use classifier::OnnxScoreModel;
pub use landmarker::OnnxHandLandmarker;
