//! Styling of the eight resize anchors.
//!
//! Edge anchors stretch along the full side of the node on screen so the
//! whole edge is draggable; corner anchors keep a fixed pixel size. All of
//! them are drawn transparent and sent to the back of the overlay so the
//! rotation and radius handles stay clickable above them.

use crate::config::OverlayConfig;
use crate::error::OverlayResult;
use crate::geometry::NodeGeometry;
use crate::handles::{Corner, Edge, HandleRole, ResizeAnchor};
use crate::lifecycle::Lifecycle;
use crate::overlay::{OverlayEntity, OverlayId, OverlayKind, OverlayRole, OverlaySet};
use kurbo::Size;

/// Owns the resize anchor entities of the bound node.
#[derive(Debug, Default)]
pub struct AnchorStyler {
    anchors: Lifecycle<Vec<(ResizeAnchor, OverlayId)>>,
}

impl AnchorStyler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.anchors.is_attached()
    }

    /// Create the 8 anchors. No-op when already attached.
    pub fn attach(&mut self, overlays: &mut OverlaySet, config: &OverlayConfig) {
        if self.anchors.is_attached() {
            return;
        }
        let all = Corner::ALL
            .into_iter()
            .map(ResizeAnchor::Corner)
            .chain(Edge::ALL.into_iter().map(ResizeAnchor::Edge));
        let anchors = all
            .map(|anchor| {
                let mut entity = OverlayEntity::new(
                    OverlayRole::Handle(HandleRole::Resize(anchor)),
                    OverlayKind::Anchor { size: Size::ZERO },
                );
                entity.opacity = 0.0;
                if let ResizeAnchor::Edge(_) = anchor {
                    entity.style.hit_stroke_width = config.edge_hit_thickness;
                }
                (anchor, overlays.insert(entity))
            })
            .collect();
        self.anchors = Lifecycle::Attached(anchors);
    }

    /// Remove the anchors. Idempotent.
    pub fn detach(&mut self, overlays: &mut OverlaySet) {
        for (_, id) in self.anchors.take().unwrap_or_default() {
            overlays.remove(id);
        }
    }

    /// Overlay id of a given anchor.
    pub fn anchor_id(&self, anchor: ResizeAnchor) -> Option<OverlayId> {
        self.anchors
            .get()?
            .iter()
            .find(|(a, _)| *a == anchor)
            .map(|(_, id)| *id)
    }

    /// Re-fit every anchor to the node's current screen geometry.
    pub fn restyle(
        &self,
        geometry: &NodeGeometry,
        config: &OverlayConfig,
        overlays: &mut OverlaySet,
    ) -> OverlayResult<()> {
        let Some(anchors) = self.anchors.get() else {
            return Ok(());
        };
        let corners = geometry.corners();
        let layer_scale = geometry.layer_scale();
        let rotation = geometry.rotation_in_layer();

        for (anchor, id) in anchors {
            let (position, size) = match anchor {
                ResizeAnchor::Corner(corner) => (
                    geometry.to_layer(corners[corner.index()])?,
                    Size::new(
                        config.anchor_size / layer_scale.x,
                        config.anchor_size / layer_scale.y,
                    ),
                ),
                ResizeAnchor::Edge(edge) => {
                    let (a, b) = edge.endpoints();
                    let (a, b) = (corners[a.index()], corners[b.index()]);
                    let side = (b - a).length();
                    let size = if edge.is_horizontal() {
                        Size::new(side / layer_scale.x, config.edge_thickness / layer_scale.y)
                    } else {
                        Size::new(config.edge_thickness / layer_scale.x, side / layer_scale.y)
                    };
                    (geometry.to_layer(a.midpoint(b))?, size)
                }
            };
            if let Some(entity) = overlays.get_mut(*id) {
                entity.position = position;
                entity.rotation = rotation;
                entity.kind = OverlayKind::Anchor { size };
                entity.opacity = 0.0;
            }
        }

        // Back of the draw order, edges below corners
        for (_, id) in anchors {
            overlays.move_to_bottom(*id);
        }
        Ok(())
    }
}
