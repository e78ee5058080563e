//! Corner-radius handles.
//!
//! Each handle slides along the diagonal from its corner to the node
//! center. The pointer's projection on that diagonal, converted to local
//! units, becomes the corner radius.

use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};
use crate::geometry::{NodeGeometry, unit_towards};
use crate::handles::{Corner, HandleFactory, HandleRole};
use crate::input::Modifiers;
use crate::lifecycle::Lifecycle;
use crate::overlay::{OverlayId, OverlaySet};
use crate::scene::{CornerRadii, NodeId, Scene};
use kurbo::Point;

/// Largest radius a node accepts, in its local units.
pub fn max_radius(geometry: &NodeGeometry) -> f64 {
    geometry.rect.width().abs().min(geometry.rect.height().abs()) / 2.0
}

/// Owns the four radius markers of the bound node.
#[derive(Debug, Default)]
pub struct RadiusController {
    handles: Lifecycle<Vec<(Corner, OverlayId)>>,
}

impl RadiusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.handles.is_attached()
    }

    /// Create the markers if the node has rounded corners.
    pub fn attach(
        &mut self,
        scene: &dyn Scene,
        node: NodeId,
        overlays: &mut OverlaySet,
        factory: &HandleFactory,
        config: &OverlayConfig,
    ) {
        if self.handles.is_attached() || scene.corner_radii(node).is_none() {
            return;
        }
        let handles = Corner::ALL
            .into_iter()
            .map(|corner| {
                let mut marker = factory.marker(HandleRole::Radius(corner), config.handle_radius);
                marker.visible = false;
                (corner, overlays.insert(marker))
            })
            .collect();
        self.handles = Lifecycle::Attached(handles);
    }

    pub fn detach(&mut self, overlays: &mut OverlaySet) {
        for (_, id) in self.handles.take().unwrap_or_default() {
            overlays.remove(id);
        }
    }

    pub fn handle_id(&self, corner: Corner) -> Option<OverlayId> {
        self.handles
            .get()?
            .iter()
            .find(|(c, _)| *c == corner)
            .map(|(_, id)| *id)
    }

    /// Absolute position of the handle for `corner`.
    ///
    /// Inset from the corner by handle radius plus gap (in pixels), but never
    /// more than a quarter of the node's width or height.
    pub fn handle_point(geometry: &NodeGeometry, corner: Corner, config: &OverlayConfig) -> Point {
        let at = geometry.corners()[corner.index()];
        let to_center = geometry.center() - at;
        let half_diagonal = to_center.length();
        if !half_diagonal.is_finite() || half_diagonal <= f64::EPSILON {
            return at;
        }
        let inset = config.handle_radius + config.radius_handle_gap;
        // Halfway to the center is a quarter of the width and height
        let t = (inset / half_diagonal).min(0.5);
        at + to_center * t
    }

    /// Place and show or hide the markers.
    pub fn reposition(
        &self,
        geometry: &NodeGeometry,
        config: &OverlayConfig,
        overlays: &mut OverlaySet,
        visible: bool,
    ) -> OverlayResult<()> {
        let Some(handles) = self.handles.get() else {
            return Ok(());
        };
        let scale = 1.0 / geometry.layer_scale().x;
        for (corner, id) in handles {
            let position = geometry.to_layer(Self::handle_point(geometry, *corner, config))?;
            if let Some(entity) = overlays.get_mut(*id) {
                entity.position = position;
                entity.scale = scale;
                entity.visible = visible;
            }
        }
        Ok(())
    }
}

/// Radius in local units for a pointer at `pointer` (screen pixels).
pub fn radius_from_pointer(geometry: &NodeGeometry, corner: Corner, pointer: Point) -> OverlayResult<f64> {
    let at = geometry.corners()[corner.index()];
    let inward = unit_towards(at, geometry.center()).ok_or(OverlayError::Degenerate("zero-size node"))?;
    let distance = (pointer - at).dot(inward).max(0.0);
    let scale = geometry.node_scale();
    let local = (distance / scale.x).min(distance / scale.y);
    Ok(local.clamp(0.0, max_radius(geometry)))
}

/// State of one radius drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusSession {
    pub corner: Corner,
}

impl RadiusSession {
    pub fn begin(scene: &dyn Scene, node: NodeId, corner: Corner) -> OverlayResult<Self> {
        if scene.corner_radii(node).is_none() {
            return Err(OverlayError::Degenerate("node has no corner radii"));
        }
        Ok(Self { corner })
    }

    /// Apply the pointer's radius to the dragged corner, or to every corner
    /// while the uniform modifier is held. Returns the new radius.
    pub fn drag(
        &self,
        scene: &mut dyn Scene,
        node: NodeId,
        config: &OverlayConfig,
        modifiers: Modifiers,
    ) -> OverlayResult<f64> {
        let pointer = scene.pointer_position().ok_or(OverlayError::NoPointer)?;
        let geometry = NodeGeometry::measure(scene, node)?;
        let radius = radius_from_pointer(&geometry, self.corner, pointer)?;
        let mut radii = scene
            .corner_radii(node)
            .ok_or(OverlayError::Degenerate("node has no corner radii"))?;
        if modifiers.holds(config.uniform_radius_modifier) {
            radii = CornerRadii::uniform(radius);
        } else {
            radii.set(self.corner, radius);
        }
        scene.set_corner_radii(node, radii.clamped(max_radius(&geometry)));
        Ok(radius)
    }
}
