//! Presentation formatting for distance estimates
//!
//! Rounding is a declared configuration here, not an accident of the
//! transport: HTTP responses default to rounded distances, the WebSocket
//! stream to unrounded, and both go through the same code path.

use crate::types::{DistanceEstimate, FrameResult};
use serde::{Deserialize, Serialize};

/// Formatting options for one frame's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Round distances to the nearest whole inch before rendering.
    pub round_distance: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            round_distance: true,
        }
    }
}

/// Render one estimate as `"<class>: <distance> inches away"`, or the bare
/// class name when no distance exists.
pub fn format_estimate(estimate: &DistanceEstimate, options: FormatOptions) -> String {
    match estimate.distance {
        Some(distance) => format!(
            "{}: {} inches away",
            estimate.class_name,
            format_distance(distance, options.round_distance)
        ),
        None => estimate.class_name.clone(),
    }
}

/// Render a whole frame's estimates in detector order.
pub fn format_frame<'a, I>(estimates: I, options: FormatOptions) -> FrameResult
where
    I: IntoIterator<Item = &'a DistanceEstimate>,
{
    FrameResult::new(
        estimates
            .into_iter()
            .map(|e| format_estimate(e, options))
            .collect(),
    )
}

/// Render the numeric distance. Unrounded whole numbers keep a trailing
/// `.0` so the two modes stay visually distinguishable and externally
/// rounding the unrounded form reproduces the rounded form.
///
/// Halves round away from zero (`80.5` renders `81`), not to even.
fn format_distance(distance: f64, round: bool) -> String {
    if round {
        format!("{}", distance.round() as i64)
    } else if distance.fract() == 0.0 {
        format!("{:.1}", distance)
    } else {
        format!("{}", distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(class_name: &str, distance: Option<f64>) -> DistanceEstimate {
        DistanceEstimate {
            class_name: class_name.to_string(),
            pixel_width: 140,
            distance,
        }
    }

    const ROUNDED: FormatOptions = FormatOptions {
        round_distance: true,
    };
    const UNROUNDED: FormatOptions = FormatOptions {
        round_distance: false,
    };

    #[test]
    fn test_rounded_whole_distance() {
        let text = format_estimate(&estimate("person", Some(80.0)), ROUNDED);
        assert_eq!(text, "person: 80 inches away");
    }

    #[test]
    fn test_unrounded_whole_distance_keeps_decimal() {
        let text = format_estimate(&estimate("person", Some(80.0)), UNROUNDED);
        assert_eq!(text, "person: 80.0 inches away");
    }

    #[test]
    fn test_rounded_fractional_distance() {
        let text = format_estimate(&estimate("car", Some(81.6)), ROUNDED);
        assert_eq!(text, "car: 82 inches away");
    }

    #[test]
    fn test_unrounded_fractional_distance() {
        let text = format_estimate(&estimate("car", Some(81.5)), UNROUNDED);
        assert_eq!(text, "car: 81.5 inches away");
    }

    #[test]
    fn test_no_distance_is_bare_label() {
        assert_eq!(format_estimate(&estimate("umbrella", None), ROUNDED), "umbrella");
        assert_eq!(
            format_estimate(&estimate("umbrella", None), UNROUNDED),
            "umbrella"
        );
    }

    #[test]
    fn test_rounding_halves_away_from_zero() {
        assert_eq!(
            format_estimate(&estimate("person", Some(80.5)), ROUNDED),
            "person: 81 inches away"
        );
        assert_eq!(
            format_estimate(&estimate("person", Some(81.5)), ROUNDED),
            "person: 82 inches away"
        );
        assert_eq!(
            format_estimate(&estimate("person", Some(0.5)), ROUNDED),
            "person: 1 inches away"
        );
    }

    #[test]
    fn test_round_trip_consistency() {
        // Rounding the unrounded rendering externally must equal the
        // rounded rendering for the same input.
        for distance in [80.0, 81.5, 13.277, 0.4, 1234.9999] {
            let unrounded = format_distance(distance, false);
            let externally_rounded =
                format!("{}", unrounded.parse::<f64>().unwrap().round() as i64);
            assert_eq!(externally_rounded, format_distance(distance, true));
        }
    }

    #[test]
    fn test_format_frame_preserves_order() {
        let estimates = vec![
            estimate("person", Some(80.0)),
            estimate("umbrella", None),
            estimate("car", Some(120.25)),
        ];
        let result = format_frame(&estimates, ROUNDED);
        assert_eq!(
            result.objects,
            vec![
                "person: 80 inches away".to_string(),
                "umbrella".to_string(),
                "car: 120 inches away".to_string(),
            ]
        );
        assert_eq!(
            result.to_text(),
            "person: 80 inches away, umbrella, car: 120 inches away"
        );
    }

    #[test]
    fn test_format_frame_empty() {
        let result = format_frame(&[], ROUNDED);
        assert!(result.is_empty());
        assert_eq!(result.to_text(), "");
    }

    #[test]
    fn test_default_options_round() {
        assert!(FormatOptions::default().round_distance);
    }
}
