//! Seam to the hand-tracking collaborator

use crate::error::VisionError;
use image::DynamicImage;
use signa_core::HandPose;

/// Produces 21 hand landmarks from an image, or nothing when no hand is visible
pub trait LandmarkExtractor: Send + Sync {
    fn extract(&self, image: &DynamicImage) -> Result<Option<HandPose>, VisionError>;

    fn name(&self) -> &str;
}

/// Extractor used when no landmark model is configured. Never detects a hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullExtractor;

impl LandmarkExtractor for NullExtractor {
    fn extract(&self, _image: &DynamicImage) -> Result<Option<HandPose>, VisionError> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "null"
    }
}
