//! The frame manager: one bound node, its overlay, and every drag on it.
//!
//! This is the only type hosts talk to. Internal failures (node gone,
//! pointer off the surface, degenerate geometry) are logged and turn the
//! current call into a no-op.

use crate::anchors::AnchorStyler;
use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};
use crate::geometry::{NodeGeometry, angle_degrees, map_vector};
use crate::handles::{Corner, Cursor, Edge, HandleFactory, HandleRole, ResizeAnchor, ResizeAxis};
use crate::input::Modifiers;
use crate::label::{Measurement, MeasurementLabel};
use crate::lifecycle::Lifecycle;
use crate::overlay::{OverlayEntity, OverlayId, OverlayKind, OverlayRole, OverlaySet};
use crate::radius::{RadiusController, RadiusSession};
use crate::resize::ResizeSession;
use crate::rotation::{RotationController, RotationSession};
use crate::scene::{ChangeEvent, NodeId, Scene};
use crate::sync::SyncScheduler;
use kurbo::{Point, Vec2};
use std::collections::{HashMap, HashSet};

/// Something the pointer can be inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// The bound node itself.
    Node,
    /// The selection frame border.
    Frame,
    Handle(HandleRole),
}

/// Regions the pointer is currently inside of.
#[derive(Debug, Clone, Default)]
pub struct InteractiveRegions {
    inside: HashSet<HitTarget>,
}

impl InteractiveRegions {
    /// Returns `true` if the target was not already entered.
    pub fn enter(&mut self, target: HitTarget) -> bool {
        self.inside.insert(target)
    }

    /// Returns `true` if the target had been entered.
    pub fn leave(&mut self, target: HitTarget) -> bool {
        self.inside.remove(&target)
    }

    pub fn contains(&self, target: HitTarget) -> bool {
        self.inside.contains(&target)
    }

    /// Whether the pointer is inside any region.
    pub fn is_active(&self) -> bool {
        !self.inside.is_empty()
    }

    /// The radius handle being hovered, if any.
    pub fn hovered_radius(&self) -> Option<Corner> {
        self.inside.iter().find_map(|target| match target {
            HitTarget::Handle(HandleRole::Radius(corner)) => Some(*corner),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.inside.clear();
    }
}

/// The node the manager is bound to.
#[derive(Debug, Clone)]
struct Binding {
    node: NodeId,
    layer: NodeId,
    /// The node and its ancestors; a change on any of them moves the overlay.
    watched: HashSet<NodeId>,
    frame: OverlayId,
}

/// The single active drag.
#[derive(Debug, Clone)]
enum DragSession {
    Resize(ResizeSession),
    Rotate(RotationSession),
    Radius(RadiusSession),
}

/// Owns the selection overlay of at most one node.
#[derive(Debug)]
pub struct FrameManager {
    config: OverlayConfig,
    factory: HandleFactory,
    binding: Lifecycle<Binding>,
    overlays: OverlaySet,
    anchors: AnchorStyler,
    rotation: RotationController,
    radius: RadiusController,
    label: MeasurementLabel,
    scheduler: SyncScheduler,
    session: Option<DragSession>,
    regions: InteractiveRegions,
    /// Visibility snapshot taken while the node is being moved.
    drag_visibility: Option<HashMap<OverlayId, bool>>,
}

impl Default for FrameManager {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl FrameManager {
    pub fn new(config: OverlayConfig) -> Self {
        Self::with_factory(config, HandleFactory::default())
    }

    /// Use a custom handle factory (colors and stroke widths).
    pub fn with_factory(config: OverlayConfig, factory: HandleFactory) -> Self {
        Self {
            config,
            factory,
            binding: Lifecycle::Detached,
            overlays: OverlaySet::new(),
            anchors: AnchorStyler::new(),
            rotation: RotationController::new(),
            radius: RadiusController::new(),
            label: MeasurementLabel::new(),
            scheduler: SyncScheduler::new(),
            session: None,
            regions: InteractiveRegions::default(),
            drag_visibility: None,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    pub fn bound_node(&self) -> Option<NodeId> {
        self.binding.get().map(|b| b.node)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_hidden_for_drag(&self) -> bool {
        self.drag_visibility.is_some()
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.text(&self.overlays)
    }

    /// Bind to `node`, replacing any previous binding.
    ///
    /// Nothing is created when the node is missing, has no parent, or is not
    /// inside a layer.
    pub fn attach(&mut self, scene: &mut dyn Scene, node: NodeId) {
        self.detach();
        let layer = match NodeGeometry::measure(&*scene, node) {
            Ok(geometry) => geometry.layer,
            Err(err) => {
                log::debug!("Not attaching overlay: {}", err);
                return;
            }
        };

        self.anchors.attach(&mut self.overlays, &self.config);
        self.rotation.attach(&mut self.overlays, &self.factory, &self.config);
        self.radius
            .attach(&*scene, node, &mut self.overlays, &self.factory, &self.config);
        self.label.attach(&mut self.overlays, &self.config);
        let mut border = OverlayEntity::new(
            OverlayRole::Frame,
            OverlayKind::Frame {
                corners: [Point::ZERO; 4],
            },
        );
        border.listening = false;
        border.style = self.factory.style().clone();
        let frame = self.overlays.insert(border);

        self.binding = Lifecycle::Attached(Binding {
            node,
            layer,
            watched: scene.ancestry(node).into_iter().collect(),
            frame,
        });
        log::debug!("Overlay attached to node {} ({} entities)", node, self.overlays.len());
        self.force_update(scene);
    }

    /// Unbind, dropping the overlay and any drag. Idempotent.
    pub fn detach(&mut self) {
        if self.session.take().is_some() {
            log::trace!("Drag cancelled by detach");
        }
        self.drag_visibility = None;
        self.regions.clear();
        self.scheduler.cancel();
        self.anchors.detach(&mut self.overlays);
        self.rotation.detach(&mut self.overlays);
        self.radius.detach(&mut self.overlays);
        self.label.detach(&mut self.overlays);
        if let Some(binding) = self.binding.take() {
            self.overlays.remove(binding.frame);
            log::debug!("Overlay detached from node {}", binding.node);
        }
    }

    /// Recompute and redraw right away, dropping any pending pass.
    pub fn force_update(&mut self, scene: &mut dyn Scene) {
        self.scheduler.cancel();
        self.run_pass(scene);
    }

    /// Feed a scene or viewport change.
    ///
    /// Returns `true` when a pass was newly scheduled and the host should
    /// request an animation frame.
    pub fn handle_change(&mut self, event: &ChangeEvent) -> bool {
        let Some(binding) = self.binding.get() else {
            return false;
        };
        let relevant = match event {
            ChangeEvent::Node(id, _) => binding.watched.contains(id),
            ChangeEvent::Viewport => true,
        };
        relevant && self.scheduler.request()
    }

    /// Run the pending pass, if any. Call once per rendered frame.
    pub fn on_animation_frame(&mut self, scene: &mut dyn Scene) -> bool {
        if !self.scheduler.take() {
            return false;
        }
        self.run_pass(scene);
        true
    }

    /// Hide every overlay entity while the node is moved, remembering
    /// their visibility.
    pub fn hide_overlays_for_drag(&mut self) {
        if !self.binding.is_attached() || self.drag_visibility.is_some() {
            return;
        }
        self.drag_visibility = Some(self.overlays.visibility());
        self.overlays.set_all_visible(false);
    }

    /// Undo [`FrameManager::hide_overlays_for_drag`] and resync.
    pub fn restore_overlays_after_drag(&mut self, scene: &mut dyn Scene) {
        let Some(snapshot) = self.drag_visibility.take() else {
            return;
        };
        self.overlays.restore_visibility(&snapshot);
        self.force_update(scene);
    }

    /// Topmost handle under a screen point.
    pub fn hit_test(&self, scene: &dyn Scene, screen: Point) -> Option<HandleRole> {
        let binding = self.binding.get()?;
        let layer_absolute = scene.absolute_transform(binding.layer)?;
        match self.overlays.hit_test(layer_absolute, screen)?.role {
            OverlayRole::Handle(role) => Some(role),
            _ => None,
        }
    }

    /// Pointer entered a region. Returns `true` when a pass was scheduled.
    pub fn pointer_enter(&mut self, target: HitTarget) -> bool {
        self.regions.enter(target) && self.binding.is_attached() && self.scheduler.request()
    }

    /// Pointer left a region. Returns `true` when a pass was scheduled.
    pub fn pointer_leave(&mut self, target: HitTarget) -> bool {
        self.regions.leave(target) && self.binding.is_attached() && self.scheduler.request()
    }

    /// Start a drag on a handle. Refused while another drag is active.
    pub fn pointer_down(&mut self, scene: &mut dyn Scene, role: HandleRole) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(node) = self.bound_node() else {
            return false;
        };
        let session = match role {
            HandleRole::Resize(anchor) => ResizeSession::begin(&*scene, node, anchor).map(DragSession::Resize),
            HandleRole::Rotation(_) => RotationSession::begin(&*scene, node).map(DragSession::Rotate),
            HandleRole::Radius(corner) => RadiusSession::begin(&*scene, node, corner).map(DragSession::Radius),
        };
        match session {
            Ok(session) => {
                self.session = Some(session);
                self.run_pass(scene);
                true
            }
            Err(err) => {
                log::trace!("Drag on {:?} not started: {}", role, err);
                false
            }
        }
    }

    /// Advance the active drag to the current pointer position.
    ///
    /// A frame without a resolvable pointer is skipped; the drag stays
    /// active for the next one.
    pub fn pointer_move(&mut self, scene: &mut dyn Scene, modifiers: Modifiers) -> bool {
        let Some(node) = self.bound_node() else {
            return false;
        };
        let result = match &self.session {
            Some(DragSession::Resize(session)) => session
                .drag(scene, node, self.config.keep_ratio.holds(modifiers))
                .map(drop),
            Some(DragSession::Rotate(session)) => {
                session.drag(scene, node, &self.config, modifiers).map(drop)
            }
            Some(DragSession::Radius(session)) => {
                session.drag(scene, node, &self.config, modifiers).map(drop)
            }
            None => return false,
        };
        match result {
            Ok(()) => {
                self.force_update(scene);
                true
            }
            Err(OverlayError::NoPointer) => {
                log::trace!("Drag frame skipped: pointer outside surface");
                false
            }
            Err(err) => {
                log::debug!("Drag frame skipped: {}", err);
                false
            }
        }
    }

    /// End the active drag.
    pub fn pointer_up(&mut self, scene: &mut dyn Scene) {
        if self.session.take().is_some() {
            log::trace!("Drag ended");
            self.force_update(scene);
        }
    }

    /// Cursor to show over a handle, following the node's current rotation.
    pub fn cursor_for(&self, scene: &dyn Scene, role: HandleRole) -> Cursor {
        let Some(node) = self.bound_node() else {
            return Cursor::Default;
        };
        let Ok(geometry) = NodeGeometry::measure(scene, node) else {
            return Cursor::Default;
        };
        match role {
            HandleRole::Resize(anchor) => {
                let outward = match anchor {
                    ResizeAnchor::Corner(corner) => {
                        let (sx, sy) = corner.signs();
                        Vec2::new(sx, sy)
                    }
                    ResizeAnchor::Edge(Edge::Top) => Vec2::new(0.0, -1.0),
                    ResizeAnchor::Edge(Edge::Right) => Vec2::new(1.0, 0.0),
                    ResizeAnchor::Edge(Edge::Bottom) => Vec2::new(0.0, 1.0),
                    ResizeAnchor::Edge(Edge::Left) => Vec2::new(-1.0, 0.0),
                };
                let on_screen = map_vector(geometry.absolute, outward);
                let angle = angle_degrees(Point::ZERO, on_screen.to_point());
                Cursor::Resize(ResizeAxis::from_angle(angle))
            }
            HandleRole::Rotation(corner) => self
                .rotation
                .corner_hint(&geometry, &self.overlays, corner)
                .map_or(Cursor::Default, Cursor::Rotate),
            HandleRole::Radius(_) => Cursor::Pointer,
        }
    }

    fn run_pass(&mut self, scene: &mut dyn Scene) {
        if let Err(err) = self.sync(scene) {
            log::trace!("Overlay sync skipped: {}", err);
        }
    }

    /// Recompute every overlay from the node's current transform.
    fn sync(&mut self, scene: &mut dyn Scene) -> OverlayResult<()> {
        let Some(binding) = self.binding.get() else {
            return Ok(());
        };
        if self.drag_visibility.is_some() {
            return Ok(());
        }
        let (node, frame) = (binding.node, binding.frame);
        let geometry = NodeGeometry::measure(&*scene, node)?;

        self.anchors.restyle(&geometry, &self.config, &mut self.overlays)?;
        self.rotation.reposition(&geometry, &self.config, &mut self.overlays)?;

        let dragged_radius = match &self.session {
            Some(DragSession::Radius(session)) => Some(session.corner),
            _ => None,
        };
        let show_radius = dragged_radius.is_some() || self.regions.is_active();
        self.radius
            .reposition(&geometry, &self.config, &mut self.overlays, show_radius)?;

        // The size does not change while rotating
        if matches!(self.session, Some(DragSession::Rotate(_))) {
            self.label.hide(&mut self.overlays);
        } else {
            let measurement = match dragged_radius.or_else(|| self.regions.hovered_radius()) {
                Some(corner) => self.radius_measurement(&*scene, &geometry, corner),
                None => Measurement::size_of(&geometry, scene.viewport_scale()),
            };
            self.label
                .show(&geometry, measurement, &self.config, &mut self.overlays)?;
        }

        let corners = geometry.corners();
        let mut layer_corners = [Point::ZERO; 4];
        for (slot, corner) in layer_corners.iter_mut().zip(corners) {
            *slot = geometry.to_layer(corner)?;
        }
        if let Some(border) = self.overlays.get_mut(frame) {
            border.kind = OverlayKind::Frame {
                corners: layer_corners,
            };
        }
        self.overlays.move_to_top(frame);

        scene.batch_draw();
        Ok(())
    }

    fn radius_measurement(&self, scene: &dyn Scene, geometry: &NodeGeometry, corner: Corner) -> Measurement {
        let local = scene.corner_radii(geometry.node).map_or(0.0, |radii| radii.get(corner));
        let scale = geometry.node_scale();
        let viewport = scene.viewport_scale();
        let viewport = if viewport > 0.0 { viewport } else { 1.0 };
        Measurement::Radius {
            value: local * scale.x.min(scale.y) / viewport,
            handle: RadiusController::handle_point(geometry, corner, &self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CornerRadii, NodeChange, SceneTree};
    use kurbo::Size;

    fn setup() -> (SceneTree, NodeId, NodeId) {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let a = scene
            .add_rect(layer, Point::new(100.0, 100.0), Size::new(100.0, 70.0))
            .unwrap();
        let b = scene
            .add_rect(layer, Point::new(300.0, 100.0), Size::new(50.0, 50.0))
            .unwrap();
        (scene, a, b)
    }

    fn handle_entity<'a>(manager: &'a FrameManager, role: HandleRole) -> &'a OverlayEntity {
        manager
            .overlays()
            .find_role(OverlayRole::Handle(role))
            .unwrap()
    }

    fn screen_position(scene: &SceneTree, manager: &FrameManager, role: HandleRole) -> Point {
        let node = manager.bound_node().unwrap();
        let layer = scene.layer_of(node).unwrap();
        scene.absolute_transform(layer).unwrap() * handle_entity(manager, role).position
    }

    #[test]
    fn test_detach_twice_leaves_nothing() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        assert_eq!(manager.overlays().len(), 8 + 4 + 4 + 2);
        manager.detach();
        manager.detach();
        assert!(manager.overlays().is_empty());
        assert_eq!(manager.bound_node(), None);
    }

    #[test]
    fn test_attach_replaces_previous_binding() {
        let (mut scene, a, b) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let old: Vec<_> = manager.overlays().draw_order().map(|e| e.id).collect();

        manager.attach(&mut scene, b);
        assert_eq!(manager.bound_node(), Some(b));
        assert_eq!(manager.overlays().len(), old.len());
        assert!(old.iter().all(|id| !manager.overlays().contains(*id)));
        // Changes on the old node no longer schedule anything
        assert!(!manager.handle_change(&ChangeEvent::Node(a, NodeChange::Position)));
    }

    #[test]
    fn test_missing_node_is_a_no_op() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, NodeId::new_v4());
        assert!(manager.overlays().is_empty());
        assert_eq!(manager.bound_node(), None);

        manager.attach(&mut scene, a);
        scene.remove(a);
        manager.force_update(&mut scene);
        assert!(!manager.pointer_down(&mut scene, HandleRole::Resize(ResizeAnchor::Edge(Edge::Top))));
        assert_eq!(manager.bound_node(), Some(a));
    }

    #[test]
    fn test_attach_to_layer_creates_nothing() {
        let (mut scene, a, _) = setup();
        let layer = scene.layer_of(a).unwrap();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, layer);
        assert_eq!(manager.bound_node(), None);
        assert!(manager.overlays().is_empty());
        assert_eq!(manager.hit_test(&scene, Point::ZERO), None);
        assert!(!manager.handle_change(&ChangeEvent::Viewport));
    }

    #[test]
    fn test_detach_cancels_active_drag() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let role = HandleRole::Resize(ResizeAnchor::Corner(Corner::BottomRight));
        let grab = screen_position(&scene, &manager, role);
        scene.set_pointer(Some(grab));
        assert!(manager.pointer_down(&mut scene, role));

        manager.detach();
        assert!(!manager.is_dragging());
        scene.set_pointer(Some(grab + Vec2::new(40.0, 25.0)));
        assert!(!manager.pointer_move(&mut scene, Modifiers::NONE));
        assert_eq!(scene.position(a), Some(Point::new(100.0, 100.0)));
        assert_eq!(scene.rotation(a), Some(0.0));
        assert_eq!(scene.size(a), Some(Size::new(100.0, 70.0)));
        assert!(!manager.is_dragging());

        // A fresh binding does not pick the old drag back up
        manager.attach(&mut scene, a);
        assert!(!manager.pointer_move(&mut scene, Modifiers::NONE));
        assert_eq!(scene.size(a), Some(Size::new(100.0, 70.0)));
    }

    #[test]
    fn test_external_radius_edit_refreshes_label() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        manager.pointer_enter(HitTarget::Handle(HandleRole::Radius(Corner::TopLeft)));
        manager.on_animation_frame(&mut scene);
        assert_eq!(manager.label_text(), Some("R 0"));

        scene.set_corner_radii(a, CornerRadii::uniform(12.0));
        let scheduled: Vec<bool> = scene
            .drain_changes()
            .iter()
            .map(|event| manager.handle_change(event))
            .collect();
        assert_eq!(scheduled, vec![true]);
        assert!(manager.on_animation_frame(&mut scene));
        assert_eq!(manager.label_text(), Some("R 12"));
    }

    #[test]
    fn test_radius_handles_are_screen_constant() {
        let config = OverlayConfig::default();
        for zoom in [0.2, 1.0, 5.0] {
            let (mut scene, a, _) = setup();
            scene.set_zoom(zoom);
            let mut manager = FrameManager::default();
            manager.attach(&mut scene, a);
            manager.pointer_enter(HitTarget::Node);
            manager.force_update(&mut scene);

            let entity = handle_entity(&manager, HandleRole::Radius(Corner::TopLeft));
            assert!(entity.visible);
            let layer = scene.layer_of(a).unwrap();
            let radius = entity
                .rendered_radius(scene.absolute_transform(layer).unwrap())
                .unwrap();
            assert!((radius - config.handle_radius).abs() / config.handle_radius < 0.01);
        }
    }

    #[test]
    fn test_radius_handles_follow_hover() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let role = HandleRole::Radius(Corner::BottomLeft);
        assert!(!handle_entity(&manager, role).visible);

        assert!(manager.pointer_enter(HitTarget::Node));
        assert!(manager.on_animation_frame(&mut scene));
        assert!(handle_entity(&manager, role).visible);

        assert!(manager.pointer_leave(HitTarget::Node));
        assert!(manager.on_animation_frame(&mut scene));
        assert!(!handle_entity(&manager, role).visible);
    }

    #[test]
    fn test_changes_coalesce_into_one_pass() {
        let (mut scene, a, b) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        scene.take_redraw();

        assert!(manager.handle_change(&ChangeEvent::Node(a, NodeChange::Position)));
        assert!(!manager.handle_change(&ChangeEvent::Viewport));
        assert!(!manager.handle_change(&ChangeEvent::Node(a, NodeChange::Scale)));
        assert!(!manager.handle_change(&ChangeEvent::Node(b, NodeChange::Position)));

        assert!(manager.on_animation_frame(&mut scene));
        assert!(!manager.on_animation_frame(&mut scene));
        assert_eq!(manager.scheduler().passes(), 1);
        assert!(scene.take_redraw());
    }

    #[test]
    fn test_unrelated_change_is_ignored() {
        let (mut scene, a, b) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        assert!(!manager.handle_change(&ChangeEvent::Node(b, NodeChange::Rotation)));
        assert!(!manager.scheduler().is_pending());
    }

    #[test]
    fn test_frame_border_draws_on_top() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let top = manager.overlays().draw_order().last().unwrap();
        assert_eq!(top.role, OverlayRole::Frame);
        let OverlayKind::Frame { corners } = &top.kind else {
            panic!("expected frame");
        };
        assert_eq!(corners[0], Point::new(100.0, 100.0));
        assert_eq!(corners[2], Point::new(200.0, 170.0));
        let bottom = manager.overlays().draw_order().next().unwrap();
        assert!(matches!(bottom.role, OverlayRole::Handle(HandleRole::Resize(_))));
    }

    #[test]
    fn test_hide_and_restore_preserve_visibility() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let before = manager.overlays().visibility();

        manager.hide_overlays_for_drag();
        assert!(manager.overlays().draw_order().all(|e| !e.visible));
        // Passes are skipped while hidden
        scene.set_position(a, Point::new(150.0, 120.0));
        for event in scene.drain_changes() {
            manager.handle_change(&event);
        }
        manager.on_animation_frame(&mut scene);
        assert!(manager.overlays().draw_order().all(|e| !e.visible));

        manager.restore_overlays_after_drag(&mut scene);
        assert_eq!(manager.overlays().visibility(), before);
        let OverlayKind::Frame { corners } = &manager.overlays().find_role(OverlayRole::Frame).unwrap().kind else {
            panic!("expected frame");
        };
        assert_eq!(corners[0], Point::new(150.0, 120.0));
    }

    #[test]
    fn test_resize_drag_through_manager_keeps_opposite_corner() {
        let (mut scene, a, _) = setup();
        scene.set_rotation(a, 30.0);
        scene.set_zoom(2.0);
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);

        let role = HandleRole::Resize(ResizeAnchor::Corner(Corner::BottomRight));
        let grab = screen_position(&scene, &manager, role);
        assert_eq!(manager.hit_test(&scene, grab), Some(role));
        let lock = {
            let geometry = NodeGeometry::measure(&scene, a).unwrap();
            geometry.corners()[Corner::TopLeft.index()]
        };

        scene.set_pointer(Some(grab));
        assert!(manager.pointer_down(&mut scene, role));
        assert!(!manager.pointer_down(&mut scene, HandleRole::Rotation(Corner::TopLeft)));
        for step in 1..=3 {
            scene.set_pointer(Some(grab + Vec2::new(10.0, 6.0) * step as f64));
            assert!(manager.pointer_move(&mut scene, Modifiers::NONE));
            let geometry = NodeGeometry::measure(&scene, a).unwrap();
            assert!((geometry.corners()[Corner::TopLeft.index()] - lock).length() < 0.01);
        }
        assert!(manager.label_text().unwrap().contains('×'));
        manager.pointer_up(&mut scene);
        assert!(!manager.is_dragging());
    }

    #[test]
    fn test_rotation_drag_through_manager_keeps_center() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let center = NodeGeometry::measure(&scene, a).unwrap().center();

        let role = HandleRole::Rotation(Corner::TopRight);
        let grab = screen_position(&scene, &manager, role);
        assert_eq!(manager.hit_test(&scene, grab), Some(role));
        scene.set_pointer(Some(grab));
        assert!(manager.pointer_down(&mut scene, role));

        let offset = grab - center;
        let turned = kurbo::Affine::rotate(100f64.to_radians()) * offset.to_point();
        scene.set_pointer(Some(center + turned.to_vec2()));
        assert!(manager.pointer_move(&mut scene, Modifiers::NONE));
        let geometry = NodeGeometry::measure(&scene, a).unwrap();
        assert!((geometry.center() - center).length() < 0.01);
        assert!((scene.rotation(a).unwrap() - 100.0).abs() < 0.5);
        let label = manager.label.id().unwrap();
        assert!(!manager.overlays().get(label).unwrap().visible);

        // TopRight proxy now sits in the bottom-right quadrant
        assert_eq!(manager.cursor_for(&scene, role), Cursor::Rotate(Corner::BottomRight));
        manager.pointer_up(&mut scene);
        assert!(manager.overlays().get(label).unwrap().visible);
        assert_eq!(manager.label_text(), Some("100 × 70"));
    }

    #[test]
    fn test_pointer_outside_surface_keeps_session() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let role = HandleRole::Resize(ResizeAnchor::Edge(Edge::Right));
        scene.set_pointer(Some(Point::new(200.0, 135.0)));
        assert!(manager.pointer_down(&mut scene, role));

        scene.set_pointer(None);
        assert!(!manager.pointer_move(&mut scene, Modifiers::NONE));
        assert!(manager.is_dragging());
        assert_eq!(scene.size(a), Some(Size::new(100.0, 70.0)));

        scene.set_pointer(Some(Point::new(240.0, 135.0)));
        assert!(manager.pointer_move(&mut scene, Modifiers::NONE));
        assert_eq!(scene.size(a), Some(Size::new(140.0, 70.0)));
    }

    #[test]
    fn test_radius_drag_updates_label() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        manager.pointer_enter(HitTarget::Node);
        manager.force_update(&mut scene);

        let role = HandleRole::Radius(Corner::TopLeft);
        let grab = screen_position(&scene, &manager, role);
        assert_eq!(manager.hit_test(&scene, grab), Some(role));
        scene.set_pointer(Some(grab));
        assert!(manager.pointer_down(&mut scene, role));

        let diagonal = Vec2::new(100.0, 70.0).normalize();
        scene.set_pointer(Some(Point::new(100.0, 100.0) + diagonal * 20.0));
        assert!(manager.pointer_move(&mut scene, Modifiers::NONE));
        assert_eq!(manager.label_text(), Some("R 20"));
        assert!((scene.corner_radii(a).unwrap().top_left - 20.0).abs() < 1e-9);

        manager.pointer_up(&mut scene);
        manager.pointer_leave(HitTarget::Node);
        manager.force_update(&mut scene);
        assert_eq!(manager.label_text(), Some("100 × 70"));
    }

    #[test]
    fn test_resize_cursor_follows_rotation() {
        let (mut scene, a, _) = setup();
        let mut manager = FrameManager::default();
        manager.attach(&mut scene, a);
        let top = HandleRole::Resize(ResizeAnchor::Edge(Edge::Top));
        assert_eq!(manager.cursor_for(&scene, top), Cursor::Resize(ResizeAxis::NorthSouth));
        scene.set_rotation(a, 90.0);
        assert_eq!(manager.cursor_for(&scene, top), Cursor::Resize(ResizeAxis::EastWest));
        assert_eq!(
            manager.cursor_for(&scene, HandleRole::Radius(Corner::TopLeft)),
            Cursor::Pointer
        );
    }
}
