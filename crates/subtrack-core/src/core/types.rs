//! Subtrack Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Effect unique identifier (ULID for effects created here, opaque otherwise)
pub type EffectId = String;

/// Track unique identifier (ULID)
pub type TrackId = String;

/// Operation unique identifier (ULID)
pub type OpId = String;

/// Content hash of a media file in the host's file store
pub type FileHash = String;

// =============================================================================
// Time / Track Types
// =============================================================================

/// Time in integer milliseconds
pub type TimeMs = i64;

/// Index into the ordered track list (0 = top row in the editor, bottom-most layer)
pub type TrackIndex = usize;

/// Generates a fresh effect/track/operation identifier.
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

// =============================================================================
// Spatial Types
// =============================================================================

/// 2D coordinates (pixel or fractional, depending on context)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamps both components into `[0, 1]`, used for pivot fractions.
    pub fn clamped_unit(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Canvas size in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Width of the reference canvas all named positions are defined against
    pub const REFERENCE_WIDTH: u32 = 1920;
    /// Height of the reference canvas all named positions are defined against
    pub const REFERENCE_HEIGHT: u32 = 1080;

    pub fn new(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            warn!(
                "Canvas created with zero dimension ({}x{}), using reference size",
                width, height
            );
            return Self::reference();
        }
        Self { width, height }
    }

    /// The 1920x1080 reference canvas
    pub fn reference() -> Self {
        Self {
            width: Self::REFERENCE_WIDTH,
            height: Self::REFERENCE_HEIGHT,
        }
    }

    /// Maps a point on the reference canvas onto this canvas.
    pub fn scale_from_reference(&self, point: Point2D) -> Point2D {
        Point2D {
            x: point.x * self.width as f64 / Self::REFERENCE_WIDTH as f64,
            y: point.y * self.height as f64 / Self::REFERENCE_HEIGHT as f64,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::reference()
    }
}
