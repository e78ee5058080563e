//! Edgeform Core
//!
//! Selection overlay and transform interactions for a 2D scene graph:
//! resize anchors that keep the opposite corner fixed, rotation about the
//! node center with angle snapping, corner-radius handles and a live
//! measurement label, all kept at a constant size on screen.
//!
//! Hosts drive a [`FrameManager`] against anything implementing [`Scene`];
//! [`SceneTree`] is an in-memory implementation.

pub mod anchors;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod handles;
pub mod input;
pub mod label;
pub mod lifecycle;
pub mod overlay;
pub mod radius;
pub mod resize;
pub mod rotation;
pub mod scene;
pub mod snap;
pub mod sync;

pub use camera::Camera;
pub use config::OverlayConfig;
pub use error::{ConfigError, OverlayError, OverlayResult};
pub use frame::{FrameManager, HitTarget, InteractiveRegions};
pub use handles::{Corner, Cursor, Edge, HandleFactory, HandleRole, ResizeAnchor, ResizeAxis};
pub use input::{ModifierKey, Modifiers, RatioLock};
pub use overlay::{HandleStyle, OverlayEntity, OverlayId, OverlayKind, OverlayRole, OverlaySet};
pub use scene::{ChangeEvent, CornerRadii, NodeChange, NodeId, NodeKind, Scene, SceneNode, SceneTree};
pub use snap::{ANGLE_SNAP_INCREMENT, AngleSnapResult, snap_rotation};
pub use sync::SyncScheduler;
