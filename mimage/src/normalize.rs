//! Decode, downscale, and re-encode images into the remote service envelope.

use image::GenericImageView;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::ImageError;

/// Longest edge accepted by the remote service envelope.
pub const MAX_EDGE: u32 = 1024;

/// Lossy quality used when re-encoding the normalized payload.
pub const JPEG_QUALITY: u8 = 80;

/// Image data resized and recompressed to the remote service's accepted
/// envelope. `data` holds the JPEG bytes attached to the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl NormalizedImage {
    pub fn mime(&self) -> &'static str {
        "image/jpeg"
    }
}

/// Normalizes raw image bytes: decodes, downscales anything whose longer
/// edge exceeds [`MAX_EDGE`] (aspect preserved), and re-encodes as JPEG at
/// [`JPEG_QUALITY`]. Images already inside the envelope keep their
/// dimensions but are still re-encoded so every attachment shares one
/// format.
pub fn normalize_bytes(bytes: &[u8]) -> Result<NormalizedImage, ImageError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| ImageError::undecodable(err.to_string()))?;

    let (width, height) = decoded.dimensions();
    let resized = if width.max(height) > MAX_EDGE {
        decoded.resize(MAX_EDGE, MAX_EDGE, FilterType::Lanczos3)
    } else {
        decoded
    };

    // JPEG has no alpha channel.
    let rgb = resized.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|err| ImageError::encode(err.to_string()))?;

    Ok(NormalizedImage {
        data,
        width,
        height,
    })
}
