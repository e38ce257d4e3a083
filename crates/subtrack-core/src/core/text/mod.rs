//! Text Style Module
//!
//! Data models for the typography, drop shadow and placement of text
//! effects, plus the pure style resolver that fills every field from a
//! named default set, per-span overrides and a named screen position.
//!
//! # Example
//!
//! ```rust,ignore
//! use subtrack_core::core::text::{ScreenPosition, StyleDefaults, StylePreset};
//!
//! let defaults = StyleDefaults::new(StylePreset::file_import());
//! let resolved = defaults.resolve(None, ScreenPosition::BottomCenter);
//! assert_eq!(resolved.placement.position.y, 920.0);
//! ```

mod defaults;
mod property;
mod style;

pub use defaults::{ResolvedStyle, ScreenPosition, StyleDefaults, StylePreset};
pub(crate) use property::is_hex_color;
pub use property::TextPropertyChange;
pub use style::{
    DropShadow, FontStyle, FontVariant, FontWeight, GradientType, LineJoin, Placement,
    StyleOverrides, TextAlignment, TextBaseline, TextStyle,
};
