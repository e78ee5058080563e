//! Live measurement label.

use crate::config::OverlayConfig;
use crate::error::OverlayResult;
use crate::geometry::{NodeGeometry, absolute_bounds};
use crate::lifecycle::Lifecycle;
use crate::overlay::{OverlayEntity, OverlayId, OverlayKind, OverlayRole, OverlaySet};
use kurbo::Point;

/// What the label is currently showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Logical width and height of the node.
    Size { width: f64, height: f64 },
    /// Corner radius under a handle at the given absolute position.
    Radius { value: f64, handle: Point },
}

impl Measurement {
    /// Size of the node in world units, independent of zoom.
    pub fn size_of(geometry: &NodeGeometry, viewport_scale: f64) -> Self {
        let scale = geometry.node_scale();
        let viewport = if viewport_scale > 0.0 { viewport_scale } else { 1.0 };
        Self::Size {
            width: geometry.rect.width().abs() * scale.x / viewport,
            height: geometry.rect.height().abs() * scale.y / viewport,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Measurement::Size { width, height } => {
                format!("{} × {}", width.round(), height.round())
            }
            Measurement::Radius { value, .. } => format!("R {}", value.round()),
        }
    }
}

/// Owns the single label entity.
#[derive(Debug, Default)]
pub struct MeasurementLabel {
    entity: Lifecycle<OverlayId>,
}

impl MeasurementLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, overlays: &mut OverlaySet, config: &OverlayConfig) {
        if self.entity.is_attached() {
            return;
        }
        let mut entity = OverlayEntity::new(
            OverlayRole::Label,
            OverlayKind::Label {
                text: String::new(),
                font_size: config.label_font_size,
            },
        );
        entity.visible = false;
        entity.listening = false;
        self.entity = Lifecycle::Attached(overlays.insert(entity));
    }

    pub fn detach(&mut self, overlays: &mut OverlaySet) {
        if let Some(id) = self.entity.take() {
            overlays.remove(id);
        }
    }

    pub fn id(&self) -> Option<OverlayId> {
        self.entity.get().copied()
    }

    /// Show `measurement` under the node's bounding box, or under the
    /// handle for a radius.
    pub fn show(
        &self,
        geometry: &NodeGeometry,
        measurement: Measurement,
        config: &OverlayConfig,
        overlays: &mut OverlaySet,
    ) -> OverlayResult<()> {
        let Some(entity) = self.entity.get().and_then(|id| overlays.get_mut(*id)) else {
            return Ok(());
        };
        let anchor = match measurement {
            Measurement::Size { .. } => {
                let bounds = absolute_bounds(geometry.absolute, geometry.rect);
                Point::new(bounds.center().x, bounds.y1 + config.label_gap)
            }
            Measurement::Radius { handle, .. } => {
                Point::new(handle.x, handle.y + config.handle_radius + config.label_gap)
            }
        };
        entity.position = geometry.to_layer(anchor)?;
        entity.scale = 1.0 / geometry.layer_scale().x;
        entity.kind = OverlayKind::Label {
            text: measurement.text(),
            font_size: config.label_font_size,
        };
        entity.visible = true;
        Ok(())
    }

    pub fn hide(&self, overlays: &mut OverlaySet) {
        if let Some(entity) = self.entity.get().and_then(|id| overlays.get_mut(*id)) {
            entity.visible = false;
        }
    }

    /// Current label text, if attached.
    pub fn text<'a>(&self, overlays: &'a OverlaySet) -> Option<&'a str> {
        match &overlays.get(*self.entity.get()?)?.kind {
            OverlayKind::Label { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneTree;
    use kurbo::{Size, Vec2};

    #[test]
    fn test_size_text_ignores_zoom() {
        let config = OverlayConfig::default();
        for zoom in [0.5, 1.0, 4.0] {
            let mut scene = SceneTree::new();
            let layer = scene.add_layer();
            let rect = scene
                .add_rect(layer, Point::new(10.0, 10.0), Size::new(120.4, 79.6))
                .unwrap();
            scene.set_zoom(zoom);
            let geometry = NodeGeometry::measure(&scene, rect).unwrap();

            let mut overlays = OverlaySet::new();
            let mut label = MeasurementLabel::new();
            label.attach(&mut overlays, &config);
            let measurement = Measurement::size_of(&geometry, scene.camera().scale());
            label.show(&geometry, measurement, &config, &mut overlays).unwrap();

            assert_eq!(label.text(&overlays), Some("120 × 80"));
            let entity = overlays.get(label.id().unwrap()).unwrap();
            assert!(entity.visible);
            assert!((entity.scale * zoom - 1.0).abs() < 1e-9);
            // Centered under the box, one gap below it
            let on_screen = geometry.layer_absolute * entity.position;
            assert!((on_screen.x - (10.0 + 60.2) * zoom).abs() < 1e-9);
            assert!((on_screen.y - (89.6 * zoom + config.label_gap)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_size_includes_node_scale() {
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let group = scene.add_group(layer, Point::ZERO).unwrap();
        scene.set_scale(group, Vec2::new(2.0, 3.0));
        let rect = scene.add_rect(group, Point::ZERO, Size::new(10.0, 10.0)).unwrap();
        let geometry = NodeGeometry::measure(&scene, rect).unwrap();
        assert_eq!(Measurement::size_of(&geometry, 1.0).text(), "20 × 30");
    }

    #[test]
    fn test_radius_text_and_hide() {
        let config = OverlayConfig::default();
        let mut scene = SceneTree::new();
        let layer = scene.add_layer();
        let rect = scene.add_rect(layer, Point::ZERO, Size::new(50.0, 50.0)).unwrap();
        let geometry = NodeGeometry::measure(&scene, rect).unwrap();

        let mut overlays = OverlaySet::new();
        let mut label = MeasurementLabel::new();
        label.attach(&mut overlays, &config);
        let measurement = Measurement::Radius {
            value: 12.6,
            handle: Point::new(13.0, 13.0),
        };
        label.show(&geometry, measurement, &config, &mut overlays).unwrap();
        assert_eq!(label.text(&overlays), Some("R 13"));
        let entity = overlays.get(label.id().unwrap()).unwrap();
        assert!((entity.position.y - (13.0 + config.handle_radius + config.label_gap)).abs() < 1e-9);

        label.hide(&mut overlays);
        assert!(!overlays.get(label.id().unwrap()).unwrap().visible);
        label.detach(&mut overlays);
        label.detach(&mut overlays);
        assert!(overlays.is_empty());
    }
}
