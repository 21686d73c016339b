//! Distance estimation via the pinhole-camera similar-triangles relation
//!
//! `distance = (reference_width * focal_length) / pixel_width`
//!
//! All arithmetic is f64 with no clamping or rounding; rounding is a
//! presentation concern handled by the formatting layer.

use crate::error::{Error, Result};
use crate::reference::ReferenceTable;
use crate::types::{Detection, DistanceEstimate};
use tracing::debug;

/// Distance estimator: the reference table plus the calibrated focal length.
#[derive(Debug, Clone)]
pub struct DistanceEstimator {
    table: ReferenceTable,
    focal_length: f64,
}

impl DistanceEstimator {
    /// Create an estimator. The focal length must be a positive number in
    /// pixel-equivalent units consistent with the reference widths.
    pub fn new(table: ReferenceTable, focal_length: f64) -> Result<Self> {
        if !focal_length.is_finite() || focal_length <= 0.0 {
            return Err(Error::Configuration(format!(
                "Focal length must be a positive number, got {}",
                focal_length
            )));
        }
        Ok(Self {
            table,
            focal_length,
        })
    }

    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Estimate the distance for one detection.
    ///
    /// A zero or negative pixel width is plausible detector noise and yields
    /// "no distance" rather than an error, as does a class with no entry in
    /// the reference table.
    pub fn estimate(&self, detection: &Detection) -> DistanceEstimate {
        let pixel_width = detection.bbox.width();

        let distance = if pixel_width <= 0 {
            debug!(
                "Degenerate box for '{}' (pixel width {}), skipping distance",
                detection.class_name, pixel_width
            );
            None
        } else {
            self.table
                .lookup(&detection.class_name)
                .map(|known_width| (known_width * self.focal_length) / pixel_width as f64)
        };

        DistanceEstimate {
            class_name: detection.class_name.clone(),
            pixel_width,
            distance,
        }
    }
}
