//! Overlay entities and the draw-ordered set that owns them.

use crate::geometry::{absolute_scale, checked_inverse};
use crate::handles::HandleRole;
use kurbo::{Affine, Point, Size};
use peniko::Color;
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for overlay entities.
pub type OverlayId = Uuid;

/// What an overlay entity is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayRole {
    Handle(HandleRole),
    /// Border drawn around the bound node.
    Frame,
    /// Measurement label.
    Label,
}

/// Geometry of an overlay entity.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayKind {
    /// Circle of `radius` pixels, multiplied by the entity scale.
    Marker { radius: f64 },
    /// Rectangle centered on the entity position, in layer units.
    Anchor { size: Size },
    /// Closed quadrilateral in layer units; position and scale are ignored.
    Frame { corners: [Point; 4] },
    /// Text whose top-center sits at the entity position.
    Label { text: String, font_size: f64 },
}

/// Visual and hit-area styling shared by handles.
#[derive(Debug, Clone)]
pub struct HandleStyle {
    pub fill: Color,
    pub stroke: Color,
    /// Stroke width in screen pixels.
    pub stroke_width: f64,
    /// Width of the invisible hit stroke in screen pixels.
    pub hit_stroke_width: f64,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            fill: Color::from_rgba8(255, 255, 255, 255),
            stroke: Color::from_rgba8(24, 144, 255, 255),
            stroke_width: 1.0,
            hit_stroke_width: 0.0,
        }
    }
}

/// One drawable, possibly hittable, piece of the selection overlay.
///
/// Positions live in the local space of the layer the bound node is drawn in.
#[derive(Debug, Clone)]
pub struct OverlayEntity {
    pub id: OverlayId,
    pub role: OverlayRole,
    pub kind: OverlayKind,
    /// Position in layer-local coordinates.
    pub position: Point,
    /// Rotation in degrees, layer-local.
    pub rotation: f64,
    /// Uniform scale; the inverse of the layer scale for screen-constant entities.
    pub scale: f64,
    pub visible: bool,
    /// 0 = invisible but still hittable.
    pub opacity: f64,
    /// Whether the entity takes part in hit testing.
    pub listening: bool,
    pub style: HandleStyle,
}

impl OverlayEntity {
    /// Create a visible, listening entity at the layer origin.
    pub fn new(role: OverlayRole, kind: OverlayKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            kind,
            position: Point::ZERO,
            rotation: 0.0,
            scale: 1.0,
            visible: true,
            opacity: 1.0,
            listening: true,
            style: HandleStyle::default(),
        }
    }

    /// Full transform from entity space to screen space.
    pub fn screen_transform(&self, layer_absolute: Affine) -> Affine {
        layer_absolute
            * Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.scale)
    }

    /// On-screen radius of a marker, in pixels.
    pub fn rendered_radius(&self, layer_absolute: Affine) -> Option<f64> {
        match self.kind {
            OverlayKind::Marker { radius } => {
                Some(radius * self.scale * absolute_scale(layer_absolute).x)
            }
            _ => None,
        }
    }

    /// Whether a screen point hits this entity.
    pub fn hit_test(&self, layer_absolute: Affine, screen: Point) -> bool {
        if !self.visible || !self.listening {
            return false;
        }
        let pad = self.style.hit_stroke_width / 2.0;
        match &self.kind {
            OverlayKind::Marker { radius } => {
                let center = layer_absolute * self.position;
                let reach = radius * self.scale * absolute_scale(layer_absolute).x + pad;
                (screen - center).length() <= reach
            }
            OverlayKind::Anchor { size } => {
                let transform = self.screen_transform(layer_absolute);
                let Ok(inverse) = checked_inverse(transform) else {
                    return false;
                };
                let local = inverse * screen;
                let unit = absolute_scale(transform);
                let half_w = size.width / 2.0 + pad / unit.x;
                let half_h = size.height / 2.0 + pad / unit.y;
                local.x.abs() <= half_w && local.y.abs() <= half_h
            }
            OverlayKind::Frame { .. } | OverlayKind::Label { .. } => false,
        }
    }
}

/// Entities owned by the frame manager, with an explicit back-to-front order.
#[derive(Debug, Clone, Default)]
pub struct OverlaySet {
    entities: HashMap<OverlayId, OverlayEntity>,
    /// Draw order, back to front.
    z_order: Vec<OverlayId>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity on top of the draw order.
    pub fn insert(&mut self, entity: OverlayEntity) -> OverlayId {
        let id = entity.id;
        if self.entities.insert(id, entity).is_none() {
            self.z_order.push(id);
        }
        id
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<OverlayEntity> {
        self.z_order.retain(|z| *z != id);
        self.entities.remove(&id)
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayEntity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut OverlayEntity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Position in the draw order (0 = back).
    pub fn z_index(&self, id: OverlayId) -> Option<usize> {
        self.z_order.iter().position(|z| *z == id)
    }

    pub fn move_to_top(&mut self, id: OverlayId) {
        if let Some(index) = self.z_index(id) {
            self.z_order.remove(index);
            self.z_order.push(id);
        }
    }

    pub fn move_to_bottom(&mut self, id: OverlayId) {
        if let Some(index) = self.z_index(id) {
            self.z_order.remove(index);
            self.z_order.insert(0, id);
        }
    }

    /// Entities back to front.
    pub fn draw_order(&self) -> impl Iterator<Item = &OverlayEntity> {
        self.z_order.iter().filter_map(|id| self.entities.get(id))
    }

    /// First entity carrying the given role.
    pub fn find_role(&self, role: OverlayRole) -> Option<&OverlayEntity> {
        self.entities.values().find(|e| e.role == role)
    }

    /// Topmost entity under a screen point.
    pub fn hit_test(&self, layer_absolute: Affine, screen: Point) -> Option<&OverlayEntity> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.entities.get(id))
            .find(|e| e.hit_test(layer_absolute, screen))
    }

    /// Current visibility of every entity.
    pub fn visibility(&self) -> HashMap<OverlayId, bool> {
        self.entities.iter().map(|(id, e)| (*id, e.visible)).collect()
    }

    pub fn set_all_visible(&mut self, visible: bool) {
        for entity in self.entities.values_mut() {
            entity.visible = visible;
        }
    }

    /// Reapply a visibility snapshot; entities not in the snapshot are untouched.
    pub fn restore_visibility(&mut self, snapshot: &HashMap<OverlayId, bool>) {
        for (id, visible) in snapshot {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.visible = *visible;
            }
        }
    }
}
