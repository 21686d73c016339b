//! Detector abstraction
//!
//! The object detector is a black box to the rest of the system: given a
//! decoded frame it returns zero or more detections in whatever order the
//! underlying model produced them. The trait seam keeps the pipeline
//! testable without model weights.

use image::RgbImage;
use parallax_core::{Detection, Result};

#[cfg(test)]
use mockall::automock;

/// One object detection backend.
///
/// `detect` takes `&mut self` because ONNX sessions are not assumed
/// reentrant; callers serialize access (see [`crate::FrameProcessor`]).
#[cfg_attr(test, automock)]
pub trait ObjectDetector: Send {
    /// Run the model over a decoded frame. Bounding boxes are truncated to
    /// integer pixel coordinates and clamped to the frame.
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>>;

    /// The fixed label set this detector resolves class indices against.
    fn labels(&self) -> &'static [&'static str];
}
