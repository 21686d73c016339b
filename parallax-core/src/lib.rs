//! parallax-core: domain layer for monocular distance estimation
//!
//! Pure data and arithmetic: detection types, the reference-width table,
//! the pinhole-camera distance estimator, and result formatting. No I/O
//! and no model code lives here; parallax-vision feeds this layer with
//! detections and parallax-server serializes what comes out.

pub mod error;
pub mod estimate;
pub mod format;
pub mod reference;
pub mod types;

pub use error::{Error, Result};
pub use estimate::DistanceEstimator;
pub use format::{format_estimate, format_frame, FormatOptions};
pub use reference::ReferenceTable;
pub use types::{BoundingBox, Detection, DistanceEstimate, FrameResult};
