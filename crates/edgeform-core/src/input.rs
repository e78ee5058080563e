//! Modifier-key state passed along with pointer events.

use serde::{Deserialize, Serialize};

/// Modifier keys state at the time of a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only alt held.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
        meta: false,
    };

    /// Check whether a given key is held.
    pub fn holds(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// A single modifier key, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

/// Keep-aspect-ratio predicate, evaluated live on every resize frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioLock {
    Never,
    Always,
    While(ModifierKey),
}

impl Default for RatioLock {
    fn default() -> Self {
        Self::While(ModifierKey::Shift)
    }
}

impl RatioLock {
    /// Whether the aspect ratio must be preserved given the current modifiers.
    pub fn holds(&self, modifiers: Modifiers) -> bool {
        match self {
            RatioLock::Never => false,
            RatioLock::Always => true,
            RatioLock::While(key) => modifiers.holds(*key),
        }
    }
}
