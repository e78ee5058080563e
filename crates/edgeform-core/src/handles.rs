//! Handle roles, cursor hints and the shared marker factory.

use crate::overlay::{HandleStyle, OverlayEntity, OverlayKind, OverlayRole};
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Corner positions of a node's local rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// All corners, clockwise from top-left.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Index into clockwise-from-top-left arrays.
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }

    /// Direction of the corner from the rectangle center: -1 for left/top, +1 for right/bottom.
    pub fn signs(self) -> (f64, f64) {
        match self {
            Corner::TopLeft => (-1.0, -1.0),
            Corner::TopRight => (1.0, -1.0),
            Corner::BottomRight => (1.0, 1.0),
            Corner::BottomLeft => (-1.0, 1.0),
        }
    }

    /// This corner of a rectangle.
    pub fn of(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
        }
    }

    /// Classify a screen-space offset from a center by quadrant (y grows down).
    pub fn from_offset(dx: f64, dy: f64) -> Corner {
        match (dx < 0.0, dy < 0.0) {
            (true, true) => Corner::TopLeft,
            (false, true) => Corner::TopRight,
            (false, false) => Corner::BottomRight,
            (true, false) => Corner::BottomLeft,
        }
    }
}

/// Edge positions of a node's local rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    /// Top and bottom edges run along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }

    /// End points of this edge, in clockwise order.
    pub fn endpoints(self) -> (Corner, Corner) {
        match self {
            Edge::Top => (Corner::TopLeft, Corner::TopRight),
            Edge::Right => (Corner::TopRight, Corner::BottomRight),
            Edge::Bottom => (Corner::BottomRight, Corner::BottomLeft),
            Edge::Left => (Corner::BottomLeft, Corner::TopLeft),
        }
    }

    /// Midpoint of this edge of a rectangle.
    pub fn midpoint(self, rect: Rect) -> Point {
        let (a, b) = self.endpoints();
        a.of(rect).midpoint(b.of(rect))
    }
}

/// Which resize anchor is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeAnchor {
    Corner(Corner),
    Edge(Edge),
}

/// Role of an interactive handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleRole {
    /// One of the 8 resize anchors.
    Resize(ResizeAnchor),
    /// Rotation proxy assigned to a corner at creation time.
    Rotation(Corner),
    /// Corner-radius handle for one corner.
    Radius(Corner),
}

/// Axis of a bidirectional resize cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeAxis {
    /// ↔
    EastWest,
    /// ↘↖
    NorthWestSouthEast,
    /// ↕
    NorthSouth,
    /// ↙↗
    NorthEastSouthWest,
}

impl ResizeAxis {
    /// Pick the cursor axis closest to a screen direction angle (degrees, y down).
    pub fn from_angle(angle: f64) -> ResizeAxis {
        let sector = ((angle + 22.5).rem_euclid(180.0) / 45.0).floor() as i64;
        match sector {
            0 => ResizeAxis::EastWest,
            1 => ResizeAxis::NorthWestSouthEast,
            2 => ResizeAxis::NorthSouth,
            _ => ResizeAxis::NorthEastSouthWest,
        }
    }
}

/// Cursor hint for a hovered or dragged handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    Default,
    Resize(ResizeAxis),
    /// Rotation cursor for the quadrant the handle currently sits in.
    Rotate(Corner),
    /// Corner-radius handle.
    Pointer,
}

/// Builds circular handle markers with shared defaults.
///
/// Every marker has a native radius in screen pixels; callers keep it
/// screen-constant by setting the entity scale to the inverse layer scale.
#[derive(Debug, Clone)]
pub struct HandleFactory {
    style: HandleStyle,
}

impl Default for HandleFactory {
    fn default() -> Self {
        Self::new(HandleStyle::default())
    }
}

impl HandleFactory {
    pub fn new(style: HandleStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &HandleStyle {
        &self.style
    }

    /// A visible, listening marker for `role`.
    pub fn marker(&self, role: HandleRole, radius: f64) -> OverlayEntity {
        let mut entity = OverlayEntity::new(OverlayRole::Handle(role), OverlayKind::Marker { radius });
        entity.style = self.style.clone();
        entity
    }

    /// A transparent marker that only provides a hit area.
    pub fn proxy(&self, role: HandleRole, radius: f64) -> OverlayEntity {
        let mut entity = self.marker(role, radius);
        entity.opacity = 0.0;
        entity.style.fill = Color::from_rgba8(0, 0, 0, 0);
        entity.style.stroke = Color::from_rgba8(0, 0, 0, 0);
        entity
    }
}
