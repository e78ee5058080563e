//! Rotation handles and center-locked rotation drags.

use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};
use crate::geometry::{
    NodeGeometry, absolute_delta_to_parent, angle_degrees, normalize_degrees, unit_towards,
};
use crate::handles::{Corner, HandleFactory, HandleRole};
use crate::input::Modifiers;
use crate::lifecycle::Lifecycle;
use crate::overlay::{OverlayId, OverlaySet};
use crate::scene::{NodeId, Scene};
use crate::snap::{AngleSnapResult, snap_rotation};
use kurbo::{Point, Vec2};

/// Owns the four rotation proxies placed outside the node's corners.
#[derive(Debug, Default)]
pub struct RotationController {
    handles: Lifecycle<Vec<(Corner, OverlayId)>>,
}

impl RotationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.handles.is_attached()
    }

    /// Create the four proxies. No-op when already attached.
    pub fn attach(&mut self, overlays: &mut OverlaySet, factory: &HandleFactory, config: &OverlayConfig) {
        if self.handles.is_attached() {
            return;
        }
        let handles = Corner::ALL
            .into_iter()
            .map(|corner| {
                let proxy = factory.proxy(HandleRole::Rotation(corner), config.rotation_handle_radius);
                (corner, overlays.insert(proxy))
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

    /// Absolute position of the handle assigned to `corner`: outward from the
    /// corner by the configured pixel offset, along the center-to-corner line.
    pub fn handle_point(geometry: &NodeGeometry, corner: Corner, config: &OverlayConfig) -> Point {
        let at = geometry.corners()[corner.index()];
        let outward = unit_towards(geometry.center(), at).unwrap_or_else(|| {
            let (sx, sy) = corner.signs();
            Vec2::new(sx, sy).normalize()
        });
        at + outward * config.rotation_handle_offset
    }

    /// Move every proxy to its current corner.
    pub fn reposition(
        &self,
        geometry: &NodeGeometry,
        config: &OverlayConfig,
        overlays: &mut OverlaySet,
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
            }
        }
        Ok(())
    }

    /// Quadrant the handle created for `assigned` currently sits in.
    ///
    /// Once the node turns past 90° the assigned corner no longer matches
    /// what the user sees, so the hint is classified from live positions.
    pub fn corner_hint(&self, geometry: &NodeGeometry, overlays: &OverlaySet, assigned: Corner) -> Option<Corner> {
        let entity = overlays.get(self.handle_id(assigned)?)?;
        let at = geometry.layer_absolute * entity.position;
        let offset = at - geometry.center();
        Some(Corner::from_offset(offset.x, offset.y))
    }
}

/// State of one rotation drag.
#[derive(Debug, Clone, Copy)]
pub struct RotationSession {
    /// Absolute center captured at drag start.
    center: Point,
    /// Absolute rotation at drag start, degrees in [0, 360).
    start_rotation: f64,
    /// Pointer angle around `center` at drag start.
    start_angle: f64,
}

impl RotationSession {
    pub fn begin(scene: &dyn Scene, node: NodeId) -> OverlayResult<Self> {
        let pointer = scene.pointer_position().ok_or(OverlayError::NoPointer)?;
        let geometry = NodeGeometry::measure(scene, node)?;
        let absolute = geometry.absolute_rotation();
        let center = geometry.center();
        log::trace!("Rotation drag started at {:.1}°", normalize_degrees(absolute));
        Ok(Self {
            center,
            start_rotation: normalize_degrees(absolute),
            start_angle: angle_degrees(center, pointer),
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn start_rotation(&self) -> f64 {
        self.start_rotation
    }

    /// Rotate towards the pointer, snap, then pull the center back in place.
    ///
    /// Returns the applied absolute rotation.
    pub fn drag(
        &self,
        scene: &mut dyn Scene,
        node: NodeId,
        config: &OverlayConfig,
        modifiers: Modifiers,
    ) -> OverlayResult<AngleSnapResult> {
        let pointer = scene.pointer_position().ok_or(OverlayError::NoPointer)?;
        let angle = angle_degrees(self.center, pointer);
        let candidate = self.start_rotation + (angle - self.start_angle);
        let snaps = config.effective_snaps();
        let result = snap_rotation(
            candidate,
            snaps.as_deref(),
            config.rotation_snap_tolerance,
            modifiers.holds(config.rotation_step_modifier),
        );
        if !result.angle.is_finite() {
            return Err(OverlayError::Degenerate("non-finite rotation"));
        }

        // The local angle whose x-axis lands on the target direction on screen.
        // Differs from a plain offset when an ancestor scales non-uniformly.
        let before = NodeGeometry::measure(scene, node)?;
        let (sin, cos) = result.angle.to_radians().sin_cos();
        let local = absolute_delta_to_parent(before.parent_absolute, Vec2::new(cos, sin))?;
        scene.set_rotation(node, normalize_degrees(local.y.atan2(local.x).to_degrees()));

        let after = NodeGeometry::measure(scene, node)?;
        let delta = self.center - after.center();
        if delta.length() > 1e-9 {
            let shift = absolute_delta_to_parent(after.parent_absolute, delta)?;
            let position = scene.position(node).ok_or(OverlayError::NodeMissing(node))?;
            scene.set_position(node, position + shift);
        }
        Ok(result)
    }
}
