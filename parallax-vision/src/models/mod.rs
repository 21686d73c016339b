//! Detection model backends

pub mod yolo;

pub use yolo::{YoloDetector, COCO_CLASSES};
