//! Frame processor: one inference cycle per frame
//!
//! decode -> detect -> estimate -> format. Both delivery modes go through
//! [`FrameProcessor::process`], so WebSocket-streamed and one-shot-uploaded
//! frames produce the same estimates for the same bytes.

use crate::decode::decode_frame;
use crate::detector::ObjectDetector;
use parallax_core::{format_frame, DistanceEstimator, FormatOptions, FrameResult, Result};
use parking_lot::Mutex;
use tracing::debug;

/// Shared, process-wide frame processor.
///
/// Owns the detector behind a mutex: the ONNX session is not assumed
/// reentrant, so concurrent frames serialize on the model while decode,
/// estimation and formatting stay lock-free.
pub struct FrameProcessor {
    detector: Mutex<Box<dyn ObjectDetector>>,
    estimator: DistanceEstimator,
}

impl FrameProcessor {
    /// Build a processor, validating the reference table against the
    /// detector's label set up front.
    pub fn new(detector: Box<dyn ObjectDetector>, estimator: DistanceEstimator) -> Result<Self> {
        estimator.table().validate_against(detector.labels())?;
        Ok(Self {
            detector: Mutex::new(detector),
            estimator,
        })
    }

    /// Process one frame's raw bytes into a formatted result.
    ///
    /// An empty detection list is a success with an empty result, not an
    /// error; decode and model failures propagate to the delivery layer.
    pub fn process(&self, bytes: &[u8], options: FormatOptions) -> Result<FrameResult> {
        let frame = decode_frame(bytes)?;

        let detections = self.detector.lock().detect(&frame)?;
        debug!("Frame produced {} detections", detections.len());

        let estimates: Vec<_> = detections
            .iter()
            .map(|d| self.estimator.estimate(d))
            .collect();

        Ok(format_frame(&estimates, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::MockObjectDetector;
    use crate::models::COCO_CLASSES;
    use parallax_core::{BoundingBox, Detection, Error, ReferenceTable};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageOutputFormat::Png).unwrap();
        buf.into_inner()
    }

    fn estimator() -> DistanceEstimator {
        DistanceEstimator::new(ReferenceTable::with_defaults(), 700.0).unwrap()
    }

    fn detection(class_id: usize, class_name: &str, x1: i64, x2: i64) -> Detection {
        Detection {
            class_id,
            class_name: class_name.to_string(),
            bbox: BoundingBox::new(x1, 0, x2, 200),
            confidence: 0.9,
        }
    }

    const ROUNDED: FormatOptions = FormatOptions {
        round_distance: true,
    };

    #[test]
    fn test_process_formats_detections_in_order() {
        let mut mock = MockObjectDetector::new();
        mock.expect_labels().return_const(COCO_CLASSES);
        mock.expect_detect().returning(|_| {
            Ok(vec![
                detection(0, "person", 0, 140),
                detection(25, "umbrella", 10, 90),
            ])
        });

        let processor = FrameProcessor::new(Box::new(mock), estimator()).unwrap();
        let result = processor.process(&png_bytes(), ROUNDED).unwrap();
        assert_eq!(
            result.objects,
            vec!["person: 80 inches away".to_string(), "umbrella".to_string()]
        );
    }

    #[test]
    fn test_process_empty_detections_is_empty_result() {
        let mut mock = MockObjectDetector::new();
        mock.expect_labels().return_const(COCO_CLASSES);
        mock.expect_detect().returning(|_| Ok(Vec::new()));

        let processor = FrameProcessor::new(Box::new(mock), estimator()).unwrap();
        let result = processor.process(&png_bytes(), ROUNDED).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.to_text(), "");
    }

    #[test]
    fn test_process_invalid_bytes_never_reaches_detector() {
        let mut mock = MockObjectDetector::new();
        mock.expect_labels().return_const(COCO_CLASSES);
        mock.expect_detect().times(0);

        let processor = FrameProcessor::new(Box::new(mock), estimator()).unwrap();
        match processor.process(b"not an image", ROUNDED) {
            Err(Error::Decode(_)) => {}
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_process_propagates_model_error() {
        let mut mock = MockObjectDetector::new();
        mock.expect_labels().return_const(COCO_CLASSES);
        mock.expect_detect()
            .returning(|_| Err(Error::Model("inference failed".to_string())));

        let processor = FrameProcessor::new(Box::new(mock), estimator()).unwrap();
        match processor.process(&png_bytes(), ROUNDED) {
            Err(Error::Model(_)) => {}
            other => panic!("Expected Model error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_table_outside_label_set() {
        const SMALL_LABELS: &[&str] = &["person", "bicycle"];
        let mut mock = MockObjectDetector::new();
        mock.expect_labels().return_const(SMALL_LABELS);

        let table = ReferenceTable::from_entries(vec![("unicorn".to_string(), 40.0)]).unwrap();
        let estimator = DistanceEstimator::new(table, 700.0).unwrap();
        match FrameProcessor::new(Box::new(mock), estimator) {
            Err(Error::Configuration(_)) => {}
            other => panic!(
                "Expected Configuration error, got {:?}",
                other.map(|_| "processor")
            ),
        }
    }

    #[test]
    fn test_process_degenerate_box_is_label_only() {
        let mut mock = MockObjectDetector::new();
        mock.expect_labels().return_const(COCO_CLASSES);
        mock.expect_detect()
            .returning(|_| Ok(vec![detection(0, "person", 50, 50)]));

        let processor = FrameProcessor::new(Box::new(mock), estimator()).unwrap();
        let result = processor.process(&png_bytes(), ROUNDED).unwrap();
        assert_eq!(result.objects, vec!["person".to_string()]);
    }
}
