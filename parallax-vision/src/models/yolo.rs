//! YOLOv8 object detection backend (ONNX Runtime)

use crate::config::VisionConfig;
use crate::detector::ObjectDetector;
use image::imageops::FilterType;
use image::RgbImage;
use ort::execution_providers::CPU as CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use parallax_core::{BoundingBox, Detection, Error, Result};
use tracing::{debug, info};

/// COCO class names (80 classes), in the model's index order.
pub const COCO_CLASSES: &[&str] = &[
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat",
    "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack",
    "umbrella", "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball",
    "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple",
    "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair",
    "couch", "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator",
    "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// Candidate box in original-frame float coordinates, pre-NMS.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    class_id: usize,
    score: f32,
}

/// YOLOv8 model wrapper around an ONNX Runtime session.
pub struct YoloDetector {
    session: Session,
    input_size: (u32, u32),
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl YoloDetector {
    /// Load the model from the configured weights path.
    ///
    /// The session is created once and expected to live for the process;
    /// per-call access is serialized by the caller.
    pub fn new(config: &VisionConfig) -> Result<Self> {
        config.validate().map_err(Error::Configuration)?;

        let session = Session::builder()
            .map_err(|e| Error::Model(format!("Failed to create ONNX session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::Model(format!("Failed to set optimization level: {}", e)))?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(|e| Error::Model(format!("Failed to register execution providers: {}", e)))?
            .commit_from_file(&config.model_path)
            .map_err(|e| {
                Error::Model(format!(
                    "Failed to load YOLO model from {:?}: {}",
                    config.model_path, e
                ))
            })?;

        info!("YOLO model loaded from {:?}", config.model_path);

        Ok(Self {
            session,
            input_size: config.input_size,
            confidence_threshold: config.confidence_threshold,
            iou_threshold: config.iou_threshold,
        })
    }

    /// Resize to the model input, NCHW float tensor normalized to [0, 1].
    fn preprocess(&self, frame: &RgbImage) -> Result<ort::value::DynValue> {
        let (width, height) = self.input_size;
        let resized = image::imageops::resize(frame, width, height, FilterType::Triangle);

        let size = (width * height) as usize;
        let raw = resized.as_raw();
        let mut data = vec![0f32; 3 * size];
        for idx in 0..size {
            data[idx] = raw[idx * 3] as f32 / 255.0;
            data[size + idx] = raw[idx * 3 + 1] as f32 / 255.0;
            data[2 * size + idx] = raw[idx * 3 + 2] as f32 / 255.0;
        }

        let shape = [1usize, 3, height as usize, width as usize];
        Ok(Tensor::from_array((shape, data.into_boxed_slice()))
            .map_err(|e| Error::Model(format!("Failed to create input tensor: {}", e)))?
            .into_dyn())
    }

    /// Parse the `[1, 4 + classes, proposals]` output layout: box coords and
    /// class scores stored column-major over the proposals.
    fn postprocess(
        &self,
        shape: &[i64],
        data: &[f32],
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<Detection>> {
        if shape.len() != 3 || shape[1] < 5 {
            return Err(Error::Model(format!(
                "Unexpected YOLO output shape: {:?}",
                shape
            )));
        }

        let num_attrs = shape[1] as usize;
        let num_proposals = shape[2] as usize;
        let num_classes = (num_attrs - 4).min(COCO_CLASSES.len());
        if data.len() < num_attrs * num_proposals {
            return Err(Error::Model(format!(
                "YOLO output buffer too small: {} < {}",
                data.len(),
                num_attrs * num_proposals
            )));
        }

        let scale_x = frame_width as f32 / self.input_size.0 as f32;
        let scale_y = frame_height as f32 / self.input_size.1 as f32;

        let mut candidates = Vec::new();
        for i in 0..num_proposals {
            let mut class_id = 0usize;
            let mut score = 0f32;
            for c in 0..num_classes {
                let s = data[(4 + c) * num_proposals + i];
                if s > score {
                    score = s;
                    class_id = c;
                }
            }

            if score < self.confidence_threshold || !score.is_finite() {
                continue;
            }

            // Center-size in input space -> corners in original frame space
            let cx = data[i];
            let cy = data[num_proposals + i];
            let w = data[2 * num_proposals + i];
            let h = data[3 * num_proposals + i];
            if !cx.is_finite() || !cy.is_finite() || !w.is_finite() || !h.is_finite() {
                continue;
            }

            candidates.push(Candidate {
                x1: (cx - w / 2.0) * scale_x,
                y1: (cy - h / 2.0) * scale_y,
                x2: (cx + w / 2.0) * scale_x,
                y2: (cy + h / 2.0) * scale_y,
                class_id,
                score,
            });
        }

        let kept = nms(candidates, self.iou_threshold);
        Ok(kept
            .into_iter()
            .map(|c| to_detection(c, frame_width, frame_height))
            .collect())
    }
}

impl ObjectDetector for YoloDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>> {
        debug!("Running YOLO detection on {}x{} frame", frame.width(), frame.height());

        let input = self.preprocess(frame)?;
        let (frame_width, frame_height) = (frame.width(), frame.height());

        let outputs = self
            .session
            .run(ort::inputs!["images" => input])
            .map_err(|e| Error::Model(format!("YOLO inference failed: {}", e)))?;

        let (shape, data) = outputs["output0"]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Model(format!("Failed to extract output tensor: {}", e)))?;
        let (shape, data) = (shape.to_vec(), data.to_vec());
        drop(outputs);

        let detections = self.postprocess(&shape, &data, frame_width, frame_height)?;
        debug!("YOLO detected {} objects", detections.len());
        Ok(detections)
    }

    fn labels(&self) -> &'static [&'static str] {
        COCO_CLASSES
    }
}

/// Clamp to the frame and truncate to integer pixel coordinates.
fn to_detection(candidate: Candidate, frame_width: u32, frame_height: u32) -> Detection {
    let x1 = candidate.x1.max(0.0).min(frame_width as f32);
    let y1 = candidate.y1.max(0.0).min(frame_height as f32);
    let x2 = candidate.x2.max(0.0).min(frame_width as f32);
    let y2 = candidate.y2.max(0.0).min(frame_height as f32);

    Detection {
        class_id: candidate.class_id,
        class_name: COCO_CLASSES[candidate.class_id].to_string(),
        bbox: BoundingBox::new(x1 as i64, y1 as i64, x2 as i64, y2 as i64),
        confidence: candidate.score,
    }
}

fn iou(a: &Candidate, b: &Candidate) -> f32 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }

    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    let union = area_a + area_b - inter;
    if union <= 0.0 {
        return 0.0;
    }

    inter / union
}

/// Greedy NMS: sort by score descending, suppress overlapping boxes.
fn nms(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_unstable_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Candidate> = Vec::new();
    let mut suppressed = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }
        kept.push(candidates[i]);
        for j in (i + 1)..candidates.len() {
            if iou(&candidates[i], &candidates[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    kept
}
