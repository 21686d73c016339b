//! Frame decoding: raw encoded bytes to an RGB pixel grid

use image::RgbImage;
use parallax_core::{Error, Result};
use tracing::debug;

/// Decode raw encoded image bytes into a 3-channel RGB frame.
///
/// Invalid or corrupt bytes yield [`Error::Decode`]; a frame that decodes
/// to zero width or height yields [`Error::InvalidFrame`] so it never
/// reaches the detector.
pub fn decode_frame(bytes: &[u8]) -> Result<RgbImage> {
    if bytes.is_empty() {
        return Err(Error::Decode("Empty frame data".to_string()));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| Error::Decode(format!("Failed to decode frame data: {}", e)))?;

    let frame = image.to_rgb8();
    if frame.width() == 0 || frame.height() == 0 {
        return Err(Error::InvalidFrame(format!(
            "Decoded frame has zero dimension ({}x{})",
            frame.width(),
            frame.height()
        )));
    }

    debug!("Decoded frame: {}x{}", frame.width(), frame.height());
    Ok(frame)
}
