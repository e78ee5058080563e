//! Resize drags with the opposite corner locked in place.
//!
//! A corner drag records the absolute position of the diagonally opposite
//! corner when it starts (the lock point). Each frame resizes the node from
//! the pointer, then translates it so that corner lands back on the lock
//! point, whatever the rotation and nesting scale. Edge drags keep the
//! opposite edge where it was on the previous frame.

use crate::error::{OverlayError, OverlayResult};
use crate::geometry::{NodeGeometry, absolute_delta_to_parent, to_local};
use crate::handles::{Corner, Edge, ResizeAnchor};
use crate::scene::{NodeId, Scene};
use kurbo::{Point, Rect, Size, Vec2};

/// Corrections smaller than this (in pixels) are not applied.
const LOCK_EPSILON: f64 = 1e-9;

/// Where the opposite corner has to stay during a corner drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockPoint {
    /// The corner of the local rectangle being held.
    pub corner: Corner,
    /// Its absolute position at drag start.
    pub absolute: Point,
}

/// State of one resize drag.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    pub anchor: ResizeAnchor,
    lock: Option<LockPoint>,
}

impl ResizeSession {
    /// Start a resize drag on `anchor`, capturing the lock point for corners.
    pub fn begin(scene: &dyn Scene, node: NodeId, anchor: ResizeAnchor) -> OverlayResult<Self> {
        let geometry = NodeGeometry::measure(scene, node)?;
        let lock = match anchor {
            ResizeAnchor::Corner(corner) => {
                let held = corner.opposite();
                Some(LockPoint {
                    corner: held,
                    absolute: geometry.absolute * held.of(geometry.rect),
                })
            }
            ResizeAnchor::Edge(_) => None,
        };
        log::trace!("Resize drag started on {:?}", anchor);
        Ok(Self { anchor, lock })
    }

    pub fn lock_point(&self) -> Option<LockPoint> {
        self.lock
    }

    /// Resize the node towards the current pointer and restore the lock.
    ///
    /// Returns the new local size. On error the node is left untouched.
    pub fn drag(&self, scene: &mut dyn Scene, node: NodeId, keep_ratio: bool) -> OverlayResult<Size> {
        let pointer = scene.pointer_position().ok_or(OverlayError::NoPointer)?;
        let before = NodeGeometry::measure(scene, node)?;
        let local = to_local(before.absolute, pointer)?;
        let scale = before.node_scale();
        let min = Vec2::new(1.0 / scale.x, 1.0 / scale.y);
        let size = proposed_size(self.anchor, before.rect, local, keep_ratio, min);
        if !size.width.is_finite() || !size.height.is_finite() {
            return Err(OverlayError::Degenerate("non-finite resize"));
        }

        // Absolute point that must not move this frame
        let (target, held) = match (self.anchor, self.lock) {
            (ResizeAnchor::Corner(_), Some(lock)) => (lock.absolute, Held::Corner(lock.corner)),
            (ResizeAnchor::Edge(edge), _) => {
                let held = edge.opposite();
                (before.absolute * held.midpoint(before.rect), Held::Edge(held))
            }
            (ResizeAnchor::Corner(_), None) => return Err(OverlayError::Degenerate("missing lock point")),
        };

        scene.set_size(node, size);

        let after = NodeGeometry::measure(scene, node)?;
        let current = after.absolute * held.point(after.rect);
        let delta = target - current;
        if delta.length() > LOCK_EPSILON {
            let shift = absolute_delta_to_parent(after.parent_absolute, delta)?;
            let position = scene.position(node).ok_or(OverlayError::NodeMissing(node))?;
            scene.set_position(node, position + shift);
        }
        Ok(size)
    }
}

/// The part of the local rectangle held in place.
#[derive(Debug, Clone, Copy)]
enum Held {
    Corner(Corner),
    Edge(Edge),
}

impl Held {
    fn point(self, rect: Rect) -> Point {
        match self {
            Held::Corner(corner) => corner.of(rect),
            Held::Edge(edge) => edge.midpoint(rect),
        }
    }
}

/// New local size for a pointer at `local`, never below `min` on either axis.
pub fn proposed_size(anchor: ResizeAnchor, rect: Rect, local: Point, keep_ratio: bool, min: Vec2) -> Size {
    let (mut width, mut height) = (rect.width(), rect.height());
    match anchor {
        ResizeAnchor::Corner(corner) => {
            let fixed = corner.opposite().of(rect);
            let (sx, sy) = corner.signs();
            width = (local.x - fixed.x) * sx;
            height = (local.y - fixed.y) * sy;
            if keep_ratio && rect.width() > 0.0 && rect.height() > 0.0 {
                let ratio = rect.width() / rect.height();
                if width / ratio > height {
                    height = width / ratio;
                } else {
                    width = height * ratio;
                }
            }
        }
        ResizeAnchor::Edge(Edge::Top) => height = rect.y1 - local.y,
        ResizeAnchor::Edge(Edge::Bottom) => height = local.y - rect.y0,
        ResizeAnchor::Edge(Edge::Left) => width = rect.x1 - local.x,
        ResizeAnchor::Edge(Edge::Right) => width = local.x - rect.x0,
    }
    Size::new(width.max(min.x), height.max(min.y))
}
