//! Configuration for parallax-vision

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vision pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Path to the YOLOv8 ONNX weights.
    pub model_path: PathBuf,
    /// Model input resolution (width, height).
    pub input_size: (u32, u32),
    /// Minimum class score for a detection to be kept.
    pub confidence_threshold: f32,
    /// IoU threshold for non-maximum suppression.
    pub iou_threshold: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("assets/yolov8n.onnx"),
            input_size: (640, 640),
            confidence_threshold: 0.5,
            iou_threshold: 0.45,
        }
    }
}

impl VisionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.input_size.0 == 0 || self.input_size.1 == 0 {
            return Err("Input size must be non-zero".to_string());
        }

        if self.input_size.0 > 4096 || self.input_size.1 > 4096 {
            return Err("Input size too large (max 4096)".to_string());
        }

        if !self.confidence_threshold.is_finite()
            || self.confidence_threshold <= 0.0
            || self.confidence_threshold >= 1.0
        {
            return Err("Confidence threshold must be in (0, 1)".to_string());
        }

        if !self.iou_threshold.is_finite()
            || self.iou_threshold <= 0.0
            || self.iou_threshold >= 1.0
        {
            return Err("IoU threshold must be in (0, 1)".to_string());
        }

        Ok(())
    }
}
