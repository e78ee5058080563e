//! Viewport camera: the pan/zoom transform at the root of every absolute transform.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// World-to-screen mapping of the render surface.
///
/// A world point `p` lands on screen at `offset + p * zoom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the world origin, in pixels.
    pub offset: Vec2,
    /// Pixels per world unit. This is the viewport absolute scale.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.05,
            max_zoom: 20.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// World-to-screen transform, prepended to every node's ancestor chain.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    pub fn scale(&self) -> f64 {
        self.zoom
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.offset) / self.zoom).to_point()
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        (world.to_vec2() * self.zoom + self.offset).to_point()
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom (clamped) around the screen origin. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Scale the zoom by `factor` around a screen point, which stays put.
    ///
    /// Returns `false` when the clamped zoom did not change.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) -> bool {
        if !factor.is_finite() {
            return false;
        }
        let zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let ratio = zoom / self.zoom;
        self.offset = screen.to_vec2() - (screen.to_vec2() - self.offset) * ratio;
        self.zoom = zoom;
        true
    }

    /// Pan so `world` sits in the middle of a viewport of `viewport` pixels.
    pub fn center_on(&mut self, world: Point, viewport: Size) {
        let middle = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);
        self.offset = middle - world.to_vec2() * self.zoom;
    }
}
