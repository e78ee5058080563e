//! In-memory scene graph implementing [`Scene`].

use super::{ChangeEvent, CornerRadii, NodeChange, NodeId, Scene};
use crate::camera::Camera;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use std::collections::HashMap;
use uuid::Uuid;

/// What a scene node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Top-level drawing layer. Overlays for nodes inside it are placed here.
    Layer,
    /// Container; its rectangle is the union of its children.
    Group,
    /// Rectangle with its own size and rounded corners.
    Rect { size: Size, corner_radii: CornerRadii },
}

/// A node of the in-memory scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Position in the parent's space.
    pub position: Point,
    /// Rotation in degrees around the node origin.
    pub rotation: f64,
    pub scale: Vec2,
}

impl SceneNode {
    fn new(kind: NodeKind, parent: Option<NodeId>, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            parent,
            children: Vec::new(),
            position,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }

    /// Node-to-parent transform: translate, then rotate, then scale.
    pub fn local_transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

/// A scene graph of layers, groups and rectangles under a viewport camera.
///
/// Every mutation is recorded as a [`ChangeEvent`]; hosts drain them with
/// [`SceneTree::drain_changes`] and forward them to the frame manager.
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    nodes: HashMap<NodeId, SceneNode>,
    /// Top-level layers, back to front.
    layers: Vec<NodeId>,
    camera: Camera,
    pointer: Option<Point>,
    changes: Vec<ChangeEvent>,
    redraw_pending: bool,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn layers(&self) -> &[NodeId] {
        &self.layers
    }

    /// Add a top-level layer.
    pub fn add_layer(&mut self) -> NodeId {
        let node = SceneNode::new(NodeKind::Layer, None, Point::ZERO);
        let id = node.id;
        self.nodes.insert(id, node);
        self.layers.push(id);
        id
    }

    /// Add an empty group under `parent`.
    pub fn add_group(&mut self, parent: NodeId, position: Point) -> Option<NodeId> {
        self.add_child(parent, SceneNode::new(NodeKind::Group, Some(parent), position))
    }

    /// Add a rectangle of the given size under `parent`.
    pub fn add_rect(&mut self, parent: NodeId, position: Point, size: Size) -> Option<NodeId> {
        let kind = NodeKind::Rect {
            size,
            corner_radii: CornerRadii::default(),
        };
        self.add_child(parent, SceneNode::new(kind, Some(parent), position))
    }

    fn add_child(&mut self, parent: NodeId, node: SceneNode) -> Option<NodeId> {
        let id = node.id;
        let parent_node = self.nodes.get_mut(&parent)?;
        if matches!(parent_node.kind, NodeKind::Rect { .. }) {
            return None;
        }
        parent_node.children.push(id);
        self.nodes.insert(id, node);
        Some(id)
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        self.layers.retain(|l| *l != id);
        for child in node.children {
            self.remove(child);
        }
    }

    /// Local size of a rectangle node.
    pub fn size(&self, id: NodeId) -> Option<Size> {
        match self.nodes.get(&id)?.kind {
            NodeKind::Rect { size, .. } => Some(size),
            _ => self.self_rect(id).map(|r| r.size()),
        }
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.scale = scale;
            self.changes.push(ChangeEvent::Node(id, NodeChange::Scale));
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Zoom around a screen point.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if self.camera.zoom_at(screen_point, factor) {
            self.changes.push(ChangeEvent::Viewport);
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
        self.changes.push(ChangeEvent::Viewport);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
        self.changes.push(ChangeEvent::Viewport);
    }

    /// Pan so the node's center sits in the middle of a `viewport`-sized surface.
    /// The zoom is kept.
    pub fn look_at(&mut self, id: NodeId, viewport: Size) {
        let Some(screen) = self
            .self_rect(id)
            .zip(self.absolute_transform(id))
            .map(|(rect, transform)| transform * rect.center())
        else {
            return;
        };
        let world = self.camera.screen_to_world(screen);
        self.camera.center_on(world, viewport);
        self.changes.push(ChangeEvent::Viewport);
    }

    /// Set the pointer position in screen pixels (`None` = left the surface).
    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    /// Take every change recorded since the last drain.
    pub fn drain_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.changes)
    }

    /// Consume the pending redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw_pending, false)
    }

    fn local_transform(&self, id: NodeId) -> Option<Affine> {
        self.nodes.get(&id).map(SceneNode::local_transform)
    }
}

impl Scene for SceneTree {
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node)?.parent
    }

    fn layer_of(&self, node: NodeId) -> Option<NodeId> {
        self.ancestry(node)
            .into_iter()
            .find(|id| matches!(self.nodes.get(id).map(|n| &n.kind), Some(NodeKind::Layer)))
    }

    fn absolute_transform(&self, node: NodeId) -> Option<Affine> {
        if !self.contains(node) {
            return None;
        }
        let mut transform = Affine::IDENTITY;
        for id in self.ancestry(node) {
            transform = self.local_transform(id)? * transform;
        }
        Some(self.camera.transform() * transform)
    }

    fn self_rect(&self, node: NodeId) -> Option<Rect> {
        let entry = self.nodes.get(&node)?;
        match &entry.kind {
            NodeKind::Rect { size, .. } => Some(Rect::from_origin_size(Point::ZERO, *size)),
            NodeKind::Group | NodeKind::Layer => {
                let union = entry
                    .children
                    .iter()
                    .filter_map(|child| {
                        let rect = self.self_rect(*child)?;
                        Some(self.local_transform(*child)?.transform_rect_bbox(rect))
                    })
                    .reduce(|a, b| a.union(b));
                Some(union.unwrap_or(Rect::ZERO))
            }
        }
    }

    fn position(&self, node: NodeId) -> Option<Point> {
        self.nodes.get(&node).map(|n| n.position)
    }

    fn set_position(&mut self, node: NodeId, position: Point) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.position = position;
            self.changes.push(ChangeEvent::Node(node, NodeChange::Position));
        }
    }

    fn rotation(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(&node).map(|n| n.rotation)
    }

    fn set_rotation(&mut self, node: NodeId, degrees: f64) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.rotation = degrees;
            self.changes.push(ChangeEvent::Node(node, NodeChange::Rotation));
        }
    }

    fn set_size(&mut self, node: NodeId, new_size: Size) {
        let Some(current) = self.self_rect(node) else {
            return;
        };
        let Some(entry) = self.nodes.get_mut(&node) else {
            return;
        };
        match &mut entry.kind {
            NodeKind::Rect { size, .. } => {
                *size = Size::new(new_size.width.max(0.0), new_size.height.max(0.0));
                self.changes.push(ChangeEvent::Node(node, NodeChange::Dimensions));
            }
            NodeKind::Group | NodeKind::Layer => {
                // Containers keep their children and rescale instead
                if current.width() > 0.0 && current.height() > 0.0 {
                    entry.scale.x *= new_size.width / current.width();
                    entry.scale.y *= new_size.height / current.height();
                    self.changes.push(ChangeEvent::Node(node, NodeChange::Scale));
                }
            }
        }
    }

    fn corner_radii(&self, node: NodeId) -> Option<CornerRadii> {
        match self.nodes.get(&node)?.kind {
            NodeKind::Rect { corner_radii, .. } => Some(corner_radii),
            _ => None,
        }
    }

    fn set_corner_radii(&mut self, node: NodeId, radii: CornerRadii) {
        if let Some(NodeKind::Rect { corner_radii, .. }) = self.nodes.get_mut(&node).map(|n| &mut n.kind) {
            *corner_radii = radii;
            self.changes.push(ChangeEvent::Node(node, NodeChange::CornerRadius));
        }
    }

    fn viewport_scale(&self) -> f64 {
        self.camera.scale()
    }

    fn pointer_position(&self) -> Option<Point> {
        self.pointer
    }

    fn batch_draw(&mut self) {
        self.redraw_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_transform_includes_camera_and_ancestors() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let group = scene.add_group(layer, Point::new(100.0, 0.0)).unwrap();
        scene.set_scale(group, Vec2::new(2.0, 2.0));
        let rect = scene.add_rect(group, Point::new(10.0, 10.0), Size::new(20.0, 10.0)).unwrap();
        scene.set_zoom(0.5);

        let abs = scene.absolute_transform(rect).unwrap();
        let origin = abs * Point::ZERO;
        assert!((origin.x - 60.0).abs() < 1e-9);
        assert!((origin.y - 10.0).abs() < 1e-9);
        assert_eq!(scene.layer_of(rect), Some(layer));
        assert_eq!(scene.ancestry(rect), vec![rect, group, layer]);
    }

    #[test]
    fn test_group_rect_is_union_of_children() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let group = scene.add_group(layer, Point::ZERO).unwrap();
        scene.add_rect(group, Point::new(10.0, 10.0), Size::new(10.0, 10.0));
        scene.add_rect(group, Point::new(40.0, 0.0), Size::new(10.0, 30.0));
        assert_eq!(scene.self_rect(group), Some(Rect::new(10.0, 0.0, 50.0, 30.0)));
    }

    #[test]
    fn test_group_resize_rescales() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let group = scene.add_group(layer, Point::ZERO).unwrap();
        scene.add_rect(group, Point::ZERO, Size::new(40.0, 20.0));
        scene.set_size(group, Size::new(80.0, 10.0));
        let node = scene.node(group).unwrap();
        assert!((node.scale.x - 2.0).abs() < 1e-9);
        assert!((node.scale.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_mutations_record_changes_and_redraw_coalesces() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let rect = scene.add_rect(layer, Point::ZERO, Size::new(10.0, 10.0)).unwrap();
        scene.set_position(rect, Point::new(5.0, 5.0));
        scene.set_rotation(rect, 30.0);
        scene.pan(Vec2::new(1.0, 0.0));
        assert_eq!(
            scene.drain_changes(),
            vec![
                ChangeEvent::Node(rect, NodeChange::Position),
                ChangeEvent::Node(rect, NodeChange::Rotation),
                ChangeEvent::Viewport,
            ]
        );
        assert!(scene.drain_changes().is_empty());

        scene.batch_draw();
        scene.batch_draw();
        assert!(scene.take_redraw());
        assert!(!scene.take_redraw());
    }

    #[test]
    fn test_corner_radius_change_is_recorded() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let rect = scene.add_rect(layer, Point::ZERO, Size::new(10.0, 10.0)).unwrap();
        scene.set_corner_radii(rect, CornerRadii::uniform(3.0));
        assert_eq!(scene.drain_changes(), vec![ChangeEvent::Node(rect, NodeChange::CornerRadius)]);

        // Nodes without corners record nothing
        scene.set_corner_radii(layer, CornerRadii::uniform(3.0));
        assert!(scene.drain_changes().is_empty());
    }

    #[test]
    fn test_look_at_centers_node_and_keeps_zoom() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let group = scene.add_group(layer, Point::new(200.0, 50.0)).unwrap();
        scene.set_scale(group, Vec2::new(2.0, 2.0));
        let rect = scene.add_rect(group, Point::new(10.0, 10.0), Size::new(40.0, 20.0)).unwrap();
        scene.set_zoom(1.5);
        scene.drain_changes();

        scene.look_at(rect, Size::new(800.0, 600.0));
        let center = scene.absolute_transform(rect).unwrap() * Point::new(20.0, 10.0);
        assert!((center - Point::new(400.0, 300.0)).length() < 1e-9);
        assert_eq!(scene.camera().zoom, 1.5);
        assert_eq!(scene.drain_changes(), vec![ChangeEvent::Viewport]);

        // Unknown nodes leave the camera alone
        scene.look_at(uuid::Uuid::new_v4(), Size::new(800.0, 600.0));
        assert!(scene.drain_changes().is_empty());
    }

    #[test]
    fn test_remove_subtree() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let group = scene.add_group(layer, Point::ZERO).unwrap();
        let rect = scene.add_rect(group, Point::ZERO, Size::new(1.0, 1.0)).unwrap();
        scene.remove(group);
        assert!(!scene.contains(rect));
        assert!(scene.node(layer).unwrap().children.is_empty());
    }

    #[test]
    fn test_rect_cannot_have_children() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let rect = scene.add_rect(layer, Point::ZERO, Size::new(1.0, 1.0)).unwrap();
        assert!(scene.add_rect(rect, Point::ZERO, Size::new(1.0, 1.0)).is_none());
    }
}
