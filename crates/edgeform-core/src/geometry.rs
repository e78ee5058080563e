//! Coordinate-space helpers shared by every controller.
//!
//! Three spaces are involved:
//! - *local*: a node's own untransformed coordinates,
//! - *parent*: the coordinates of the node's parent (where `position` lives),
//! - *absolute*: screen pixels, after the camera and every ancestor.
//!
//! All corrections (anchor-lock, center-lock) measure in absolute space and
//! convert back through [`absolute_delta_to_parent`].

use crate::error::{OverlayError, OverlayResult};
use crate::scene::{NodeId, Scene};
use kurbo::{Affine, Point, Rect, Vec2};

/// Smallest scale magnitude treated as non-degenerate.
const SCALE_EPSILON: f64 = 1e-9;

/// Translation, rotation and scale recovered from an affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposed {
    pub translation: Vec2,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Per-axis scale. Negative `y` means the transform mirrors.
    pub scale: Vec2,
}

/// Decompose an affine into translation, rotation (degrees) and scale.
///
/// Skew is folded into the y scale, which is all the overlay needs.
pub fn decompose(affine: Affine) -> Decomposed {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let scale_x = a.hypot(b);
    let det = a * d - b * c;
    let scale_y = if scale_x > SCALE_EPSILON { det / scale_x } else { c.hypot(d) };
    Decomposed {
        translation: Vec2::new(e, f),
        rotation: b.atan2(a).to_degrees(),
        scale: Vec2::new(scale_x, scale_y),
    }
}

/// Replace a zero or non-finite scale factor with 1.
pub fn safe_scale(value: f64) -> f64 {
    if value.is_finite() && value.abs() > SCALE_EPSILON {
        value
    } else {
        1.0
    }
}

/// Absolute per-axis scale magnitude of a transform, never zero.
pub fn absolute_scale(affine: Affine) -> Vec2 {
    let scale = decompose(affine).scale;
    Vec2::new(safe_scale(scale.x.abs()), safe_scale(scale.y.abs()))
}

/// Apply only the linear part of `affine` to a vector.
pub fn map_vector(affine: Affine, v: Vec2) -> Vec2 {
    let [a, b, c, d, _, _] = affine.as_coeffs();
    Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
}

/// Invert a transform, failing on a singular matrix.
pub fn checked_inverse(affine: Affine) -> OverlayResult<Affine> {
    let det = affine.determinant();
    if !det.is_finite() || det.abs() < SCALE_EPSILON * SCALE_EPSILON {
        return Err(OverlayError::Degenerate("singular transform"));
    }
    Ok(affine.inverse())
}

/// Map an absolute point into the local space of a transform.
pub fn to_local(absolute: Affine, point: Point) -> OverlayResult<Point> {
    Ok(checked_inverse(absolute)? * point)
}

/// Map a local point into absolute space.
pub fn to_absolute(absolute: Affine, point: Point) -> Point {
    absolute * point
}

/// Convert an absolute-space displacement into a displacement of the node's
/// `position`, given the absolute transform of the node's parent.
///
/// Used by both the resize anchor-lock and the rotation center-lock.
pub fn absolute_delta_to_parent(parent_absolute: Affine, delta: Vec2) -> OverlayResult<Vec2> {
    let inverse = checked_inverse(parent_absolute)?;
    Ok(map_vector(inverse, delta))
}

/// Absolute positions of a local rectangle's corners: top-left, top-right,
/// bottom-right, bottom-left.
pub fn absolute_corners(absolute: Affine, rect: Rect) -> [Point; 4] {
    [
        absolute * Point::new(rect.x0, rect.y0),
        absolute * Point::new(rect.x1, rect.y0),
        absolute * Point::new(rect.x1, rect.y1),
        absolute * Point::new(rect.x0, rect.y1),
    ]
}

/// Absolute position of a local rectangle's center.
pub fn absolute_center(absolute: Affine, rect: Rect) -> Point {
    absolute * rect.center()
}

/// Axis-aligned absolute bounding box of a local rectangle.
pub fn absolute_bounds(absolute: Affine, rect: Rect) -> Rect {
    let [a, b, c, d] = absolute_corners(absolute, rect);
    Rect::from_points(a, b).union_pt(c).union_pt(d)
}

/// Angle in degrees of `point` around `center`, screen convention (y down).
pub fn angle_degrees(center: Point, point: Point) -> f64 {
    let v = point - center;
    v.y.atan2(v.x).to_degrees()
}

/// Normalize an angle to [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negatives
    if a >= 360.0 { 0.0 } else { a }
}

/// Shortest distance between two angles on the circle, in [0, 180].
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Unit vector from `from` towards `to`, or `None` when they coincide.
pub fn unit_towards(from: Point, to: Point) -> Option<Vec2> {
    let v = to - from;
    let len = v.length();
    if len.is_finite() && len > SCALE_EPSILON {
        Some(v / len)
    } else {
        None
    }
}

/// Everything a sync pass or drag frame needs to know about the bound node,
/// measured once from the scene.
#[derive(Debug, Clone, Copy)]
pub struct NodeGeometry {
    pub node: NodeId,
    pub layer: NodeId,
    /// Node local-to-screen transform.
    pub absolute: Affine,
    /// Parent local-to-screen transform.
    pub parent_absolute: Affine,
    /// Layer local-to-screen transform.
    pub layer_absolute: Affine,
    /// Untransformed node rectangle.
    pub rect: Rect,
}

impl NodeGeometry {
    /// Measure `node`, failing when it, its parent or its layer is missing.
    pub fn measure(scene: &dyn Scene, node: NodeId) -> OverlayResult<Self> {
        let absolute = scene
            .absolute_transform(node)
            .ok_or(OverlayError::NodeMissing(node))?;
        let rect = scene.self_rect(node).ok_or(OverlayError::NodeMissing(node))?;
        let parent = scene.parent(node).ok_or(OverlayError::NoLayer(node))?;
        let parent_absolute = scene
            .absolute_transform(parent)
            .ok_or(OverlayError::NodeMissing(parent))?;
        let layer = scene.layer_of(node).ok_or(OverlayError::NoLayer(node))?;
        let layer_absolute = scene
            .absolute_transform(layer)
            .ok_or(OverlayError::NoLayer(node))?;
        Ok(Self {
            node,
            layer,
            absolute,
            parent_absolute,
            layer_absolute,
            rect,
        })
    }

    /// Absolute corners, clockwise from the local top-left.
    pub fn corners(&self) -> [Point; 4] {
        absolute_corners(self.absolute, self.rect)
    }

    pub fn center(&self) -> Point {
        absolute_center(self.absolute, self.rect)
    }

    /// Absolute per-axis scale of the node (viewport included).
    pub fn node_scale(&self) -> Vec2 {
        absolute_scale(self.absolute)
    }

    /// Absolute per-axis scale of the layer the overlays live in.
    pub fn layer_scale(&self) -> Vec2 {
        absolute_scale(self.layer_absolute)
    }

    /// Absolute rotation of the node, in degrees.
    pub fn absolute_rotation(&self) -> f64 {
        decompose(self.absolute).rotation
    }

    /// Rotation of the node as seen from the layer, in degrees.
    pub fn rotation_in_layer(&self) -> f64 {
        decompose(self.absolute).rotation - decompose(self.layer_absolute).rotation
    }

    /// Map an absolute point into layer-local coordinates.
    pub fn to_layer(&self, absolute: Point) -> OverlayResult<Point> {
        to_local(self.layer_absolute, absolute)
    }

    /// Convert a pixel length into the layer's local units (using the x scale).
    pub fn px_to_layer(&self, px: f64) -> f64 {
        px / self.layer_scale().x
    }
}
