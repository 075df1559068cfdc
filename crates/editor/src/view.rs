//! Pan/zoom view transform
//!
//! The view transform is applied to the whole diagram layer: a translation
//! in container pixels followed by a uniform scale about the layer's top-left
//! corner (CSS `transform-origin: 0 0`).

use plano_core::{Affine, Position};
use serde::{Deserialize, Serialize};

/// Smallest allowed scale
pub const MIN_SCALE: f64 = 0.5;

/// Largest allowed scale
pub const MAX_SCALE: f64 = 3.0;

/// Scale change per unit of wheel delta
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.001;

// ============================================================================
// Pan Anchor
// ============================================================================

/// Start point of a pan gesture
///
/// Stores the pointer position minus the offset at gesture start, so every
/// later pointer position maps to an absolute offset without accumulating
/// per-frame deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanAnchor {
    start: Position,
}

impl PanAnchor {
    /// Offset corresponding to the given pointer position
    pub fn offset_for(&self, pointer: Position) -> Position {
        pointer - self.start
    }
}

// ============================================================================
// View Transform
// ============================================================================

/// Scale and offset of the diagram layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    scale: f64,
    offset: Position,
    sensitivity: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_SENSITIVITY)
    }
}

impl ViewTransform {
    /// Identity view with the given zoom sensitivity
    pub fn new(sensitivity: f64) -> Self {
        let sensitivity = if sensitivity.is_finite() && sensitivity > 0.0 {
            sensitivity
        } else {
            DEFAULT_ZOOM_SENSITIVITY
        };
        Self {
            scale: 1.0,
            offset: Position::zero(),
            sensitivity,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Position {
        self.offset
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Apply a wheel delta and return the new scale
    ///
    /// `delta` is the raw vertical wheel delta; negative values (scrolling
    /// up) zoom in. The result is always clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn apply_zoom(&mut self, delta: f64) -> f64 {
        if delta.is_finite() {
            self.scale = (self.scale - delta * self.sensitivity).clamp(MIN_SCALE, MAX_SCALE);
        }
        self.scale
    }

    /// Start a pan gesture at the given pointer position
    pub fn begin_pan(&self, pointer: Position) -> PanAnchor {
        PanAnchor {
            start: pointer - self.offset,
        }
    }

    /// Set the offset from a pointer position relative to a pan anchor
    pub fn pan_to(&mut self, anchor: &PanAnchor, pointer: Position) {
        self.apply_pan(anchor.offset_for(pointer));
    }

    /// Set the absolute offset
    pub fn apply_pan(&mut self, offset: Position) {
        if offset.is_finite() {
            self.offset = offset;
        }
    }

    /// Back to scale 1 with no offset
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Position::zero();
    }

    /// Current transform as a matrix (translate, then scale about the origin)
    pub fn matrix(&self) -> Affine {
        Affine::translate(self.offset.x, self.offset.y) * Affine::scale(self.scale)
    }

    /// CSS `transform` value for the diagram layer
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset.x, self.offset.y, self.scale
        )
    }
}
