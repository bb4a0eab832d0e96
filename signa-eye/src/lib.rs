//! signa-eye: vision side of the Signa gesture service
//!
//! Decodes streamed frames, hands them to a landmark-extraction collaborator
//! and classifies the resulting hand pose with a learned model backed by a
//! deterministic geometric fallback.

pub mod classifier;
pub mod error;
pub mod frame;
pub mod landmarks;
pub mod models;
mod utils;

pub use classifier::{Classification, ClassificationEngine, GeometricClassifier, LearnedClassifier, ScoreModel, Tier};
pub use error::{ClassifierError, VisionError};
pub use landmarks::{LandmarkExtractor, NullExtractor};
pub use models::ModelManager;
