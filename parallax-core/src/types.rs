//! Shared types for the detection and estimation pipeline

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in integer pixel coordinates.
///
/// Coordinates come from the detector already truncated (not rounded) to
/// integers, matching how pixel widths are measured as integer differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl BoundingBox {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels. May be zero or negative for degenerate detections;
    /// the estimator treats those as "no distance".
    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }
}

/// One detected object instance in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: usize,
    pub class_name: String,
    pub bbox: BoundingBox,
    /// Detector confidence in [0, 1]. Part of the detector contract but
    /// unused downstream of it.
    pub confidence: f32,
}

/// Distance estimate for one detection.
///
/// `distance` is `None` when the class has no reference width or the
/// bounding box width is degenerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub class_name: String,
    pub pixel_width: i64,
    pub distance: Option<f64>,
}

/// Formatted result for one processed frame.
///
/// Object descriptions are kept in detector order (insertion order, never
/// sorted). Serializes as the HTTP `objects` array; `to_text` produces the
/// WebSocket reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub objects: Vec<String>,
}

impl FrameResult {
    pub fn new(objects: Vec<String>) -> Self {
        Self { objects }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Join descriptions with `", "`. Empty frame yields an empty string.
    pub fn to_text(&self) -> String {
        self.objects.join(", ")
    }
}
