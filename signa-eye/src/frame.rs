//! Frame payload decoding
//!
//! Clients send frames as base64 text, optionally wrapped in a data URI
//! (`data:image/jpeg;base64,<payload>`).

use crate::error::VisionError;
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;

/// Strip a data-URI style header. Everything up to and including the first comma is dropped.
pub fn strip_header(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, body)) => body,
        None => payload,
    }
}

/// Base64-decode the frame payload into raw image bytes. Line breaks and
/// other ASCII whitespace inside the payload are ignored.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, VisionError> {
    let body: String = strip_header(payload)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(general_purpose::STANDARD.decode(body)?)
}

/// Decode a frame payload into an image. The format is sniffed from the bytes.
pub fn decode_frame(payload: &str) -> Result<DynamicImage, VisionError> {
    let bytes = decode_base64(payload)?;
    if bytes.is_empty() {
        return Err(VisionError::Decode("empty image payload".to_string()));
    }
    Ok(image::load_from_memory(&bytes)?)
}

/// Encode an image as a PNG data URI. Used by clients and tests to build frames.
pub fn encode_png_frame(image: &DynamicImage) -> Result<String, VisionError> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image.write_to(&mut bytes, image::ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(bytes.into_inner())
    ))
}
