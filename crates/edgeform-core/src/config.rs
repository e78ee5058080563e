//! Overlay configuration.

use crate::error::ConfigError;
use crate::input::{ModifierKey, RatioLock};
use serde::{Deserialize, Serialize};

/// Tunables for the overlay engine. All lengths are in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Explicit rotation snap angles in degrees. Empty = modifier rounding only.
    pub rotation_snaps: Vec<f64>,
    /// Maximum circular distance (degrees) within which a snap angle wins.
    pub rotation_snap_tolerance: f64,
    /// Modifier that rounds rotation to 15° steps when no snap set is configured.
    pub rotation_step_modifier: ModifierKey,
    /// Hit-stroke width of the invisible edge anchors.
    pub edge_hit_thickness: f64,
    /// Visual thickness of edge anchors.
    pub edge_thickness: f64,
    /// Side of the square corner anchors.
    pub anchor_size: f64,
    /// Keep-aspect-ratio predicate for corner resizes.
    pub keep_ratio: RatioLock,
    /// Radius of the visible handle markers.
    pub handle_radius: f64,
    /// Distance of rotation handles outward from the node's corners.
    pub rotation_handle_offset: f64,
    /// Hit radius of the rotation proxies.
    pub rotation_handle_radius: f64,
    /// Gap between a corner and its radius handle, on top of the handle radius.
    pub radius_handle_gap: f64,
    /// Modifier that applies a radius drag to all four corners.
    pub uniform_radius_modifier: ModifierKey,
    /// Vertical gap between a box and its measurement label.
    pub label_gap: f64,
    /// Font size of the measurement label.
    pub label_font_size: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            rotation_snaps: Vec::new(),
            rotation_snap_tolerance: 5.0,
            rotation_step_modifier: ModifierKey::Shift,
            edge_hit_thickness: 12.0,
            edge_thickness: 2.0,
            anchor_size: 10.0,
            keep_ratio: RatioLock::default(),
            handle_radius: 5.0,
            rotation_handle_offset: 18.0,
            rotation_handle_radius: 10.0,
            radius_handle_gap: 8.0,
            uniform_radius_modifier: ModifierKey::Shift,
            label_gap: 8.0,
            label_font_size: 12.0,
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject negative or non-finite pixel constants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("rotation_snap_tolerance", self.rotation_snap_tolerance),
            ("edge_hit_thickness", self.edge_hit_thickness),
            ("edge_thickness", self.edge_thickness),
            ("anchor_size", self.anchor_size),
            ("handle_radius", self.handle_radius),
            ("rotation_handle_offset", self.rotation_handle_offset),
            ("rotation_handle_radius", self.rotation_handle_radius),
            ("radius_handle_gap", self.radius_handle_gap),
            ("label_gap", self.label_gap),
            ("label_font_size", self.label_font_size),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// The usable snap set: finite angles normalized to [0, 360), deduplicated.
    ///
    /// `None` means rotation falls back to modifier rounding.
    pub fn effective_snaps(&self) -> Option<Vec<f64>> {
        let mut snaps: Vec<f64> = self
            .rotation_snaps
            .iter()
            .copied()
            .filter(|a| a.is_finite())
            .map(|a| a.rem_euclid(360.0))
            .collect();
        if snaps.len() != self.rotation_snaps.len() {
            log::warn!(
                "Dropped {} non-finite rotation snap angle(s)",
                self.rotation_snaps.len() - snaps.len()
            );
        }
        snaps.sort_by(f64::total_cmp);
        snaps.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);
        if snaps.is_empty() { None } else { Some(snaps) }
    }
}
