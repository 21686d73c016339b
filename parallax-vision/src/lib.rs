//! parallax-vision: inference layer for monocular distance estimation
//!
//! Decodes raw frame bytes, runs the YOLOv8 ONNX detector over them, and
//! orchestrates one inference cycle per frame through [`FrameProcessor`] —
//! the single entry point shared by the HTTP and WebSocket delivery modes
//! so identical bytes produce identical estimates on both.

pub mod config;
pub mod decode;
pub mod detector;
pub mod models;
pub mod processor;

pub use config::VisionConfig;
pub use decode::decode_frame;
pub use detector::ObjectDetector;
pub use models::{YoloDetector, COCO_CLASSES};
pub use processor::FrameProcessor;
