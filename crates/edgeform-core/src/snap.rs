//! Rotation angle snapping.

use crate::geometry::{circular_distance, normalize_degrees};

/// Angle snap increment in degrees, used while the step modifier is held.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Result of snapping a candidate rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSnapResult {
    /// The rotation to apply, in [0, 360).
    pub angle: f64,
    /// The candidate before snapping, in [0, 360).
    pub original_angle: f64,
    pub snapped: bool,
}

impl AngleSnapResult {
    /// A result that keeps the candidate.
    pub fn none(angle: f64) -> Self {
        let angle = normalize_degrees(angle);
        Self {
            angle,
            original_angle: angle,
            snapped: false,
        }
    }
}

/// Snap an angle to the nearest increment, normalized to [0, 360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    if !increment.is_finite() || increment <= 0.0 {
        return normalize_degrees(angle_degrees);
    }
    normalize_degrees((angle_degrees / increment).round() * increment)
}

/// The snap value circularly nearest to `candidate`, with its distance.
pub fn nearest_snap(candidate: f64, snaps: &[f64]) -> Option<(f64, f64)> {
    snaps
        .iter()
        .map(|snap| (*snap, circular_distance(candidate, *snap)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Resolve the rotation to apply for a candidate.
///
/// With an explicit snap set, the nearest snap replaces the candidate when it
/// lies within `tolerance`. Without one, `step_held` rounds to 15° steps.
pub fn snap_rotation(
    candidate: f64,
    snaps: Option<&[f64]>,
    tolerance: f64,
    step_held: bool,
) -> AngleSnapResult {
    let candidate = normalize_degrees(candidate);
    match snaps {
        Some(snaps) if !snaps.is_empty() => match nearest_snap(candidate, snaps) {
            Some((snap, distance)) if distance <= tolerance => AngleSnapResult {
                angle: normalize_degrees(snap),
                original_angle: candidate,
                snapped: true,
            },
            _ => AngleSnapResult::none(candidate),
        },
        _ if step_held => AngleSnapResult {
            angle: snap_angle(candidate, ANGLE_SNAP_INCREMENT),
            original_angle: candidate,
            snapped: true,
        },
        _ => AngleSnapResult::none(candidate),
    }
}
