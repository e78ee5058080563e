//! The scene-graph interface the overlay engine consumes.
//!
//! The engine never owns nodes. It holds a [`NodeId`] for the bound node and
//! reads or corrects that node's transform through the [`Scene`] trait on
//! every call.

mod tree;

pub use tree::{NodeKind, SceneNode, SceneTree};

use crate::handles::Corner;
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene nodes.
pub type NodeId = Uuid;

/// Per-corner radius of a rectangle, in the node's local units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    /// The same radius on every corner.
    pub fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    pub fn get(&self, corner: Corner) -> f64 {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomRight => self.bottom_right,
            Corner::BottomLeft => self.bottom_left,
        }
    }

    pub fn set(&mut self, corner: Corner, radius: f64) {
        match corner {
            Corner::TopLeft => self.top_left = radius,
            Corner::TopRight => self.top_right = radius,
            Corner::BottomRight => self.bottom_right = radius,
            Corner::BottomLeft => self.bottom_left = radius,
        }
    }

    /// Clamp every corner into `[0, max]`.
    pub fn clamped(self, max: f64) -> Self {
        let clamp = |r: f64| if r.is_finite() { r.clamp(0.0, max.max(0.0)) } else { 0.0 };
        Self {
            top_left: clamp(self.top_left),
            top_right: clamp(self.top_right),
            bottom_right: clamp(self.bottom_right),
            bottom_left: clamp(self.bottom_left),
        }
    }
}

/// Which property of a node changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeChange {
    Position,
    Rotation,
    Scale,
    Dimensions,
    CornerRadius,
}

/// A typed change notification from the scene or the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Node(NodeId, NodeChange),
    /// The camera panned or zoomed.
    Viewport,
}

/// Scene-graph and render-surface operations used by the overlay engine.
///
/// Absolute coordinates are screen pixels: they include the viewport camera.
pub trait Scene {
    fn contains(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// The drawing layer the node lives in. Overlays are placed in this layer.
    fn layer_of(&self, node: NodeId) -> Option<NodeId>;

    /// Full local-to-screen transform of a node.
    fn absolute_transform(&self, node: NodeId) -> Option<Affine>;

    /// Untransformed bounding rectangle, without stroke or shadow.
    fn self_rect(&self, node: NodeId) -> Option<Rect>;

    /// Position in the parent's local space.
    fn position(&self, node: NodeId) -> Option<Point>;

    fn set_position(&mut self, node: NodeId, position: Point);

    /// Rotation relative to the parent, in degrees.
    fn rotation(&self, node: NodeId) -> Option<f64>;

    fn set_rotation(&mut self, node: NodeId, degrees: f64);

    /// Resize so that [`Scene::self_rect`] spans `size` in the current local units.
    fn set_size(&mut self, node: NodeId, size: Size);

    /// Per-corner radii, or `None` when the node has no rounded corners.
    fn corner_radii(&self, node: NodeId) -> Option<CornerRadii>;

    fn set_corner_radii(&mut self, node: NodeId, radii: CornerRadii);

    /// World-to-screen scale factor of the viewport.
    fn viewport_scale(&self) -> f64;

    /// Pointer position in screen pixels, `None` when outside the surface.
    fn pointer_position(&self) -> Option<Point>;

    /// Request a coalesced redraw.
    fn batch_draw(&mut self);

    /// The node followed by all of its ancestors.
    fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}
