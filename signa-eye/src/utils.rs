//! Utility functions for vision processing

use crate::error::VisionError;
use image::imageops::FilterType;
use image::DynamicImage;

/// Resize to a square input and flatten to an NHWC float tensor in [0, 1]
pub fn image_to_nhwc_tensor(image: &DynamicImage, size: u32) -> Result<Vec<f32>, VisionError> {
    if size == 0 {
        return Err(VisionError::Processing("Target size cannot be zero".to_string()));
    }

    if image.width() == 0 || image.height() == 0 {
        return Err(VisionError::Processing("Invalid image dimensions".to_string()));
    }

    let total = (size as usize)
        .checked_mul(size as usize)
        .and_then(|p| p.checked_mul(3))
        .ok_or_else(|| VisionError::Processing("Target size too large, would overflow".to_string()))?;

    let rgb = image.resize_exact(size, size, FilterType::Triangle).to_rgb8();
    let mut tensor = Vec::with_capacity(total);
    for pixel in rgb.pixels() {
        tensor.extend(pixel.0.iter().map(|&c| c as f32 / 255.0));
    }

    Ok(tensor)
}

/// Logistic function for raw presence logits
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
