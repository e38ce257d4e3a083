//! Style Defaults
//!
//! Pure resolution of a complete style + geometry record from a named
//! default set, optional overrides and a named screen position. Used both
//! when synthesizing new effects and when re-applying settings in bulk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{DropShadow, Placement, StyleOverrides, TextPropertyChange, TextStyle};
use crate::core::{Canvas, Point2D};

// =============================================================================
// Screen Position
// =============================================================================

/// One of the nine canonical anchors on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenPosition {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

/// Distance of the outer anchors from the reference canvas edges
const EDGE_MARGIN: f64 = 160.0;

impl ScreenPosition {
    pub const ALL: [ScreenPosition; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleCenter,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Resolves a position name such as `"bottom-center"`.
    ///
    /// Unknown names fall back to `BottomCenter`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_else(|| {
                warn!("Unknown screen position '{}', using bottom-center", name);
                Self::BottomCenter
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::MiddleLeft => "middle-left",
            Self::MiddleCenter => "middle-center",
            Self::MiddleRight => "middle-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Anchor point on the 1920x1080 reference canvas.
    pub fn reference_point(&self) -> Point2D {
        let width = Canvas::REFERENCE_WIDTH as f64;
        let height = Canvas::REFERENCE_HEIGHT as f64;
        let (fx, fy) = self.fractions();

        let x = EDGE_MARGIN + fx * (width - 2.0 * EDGE_MARGIN);
        let y = EDGE_MARGIN + fy * (height - 2.0 * EDGE_MARGIN);
        Point2D::new(x, y)
    }

    /// Pivot fraction that makes the box's matching edge/center sit on the anchor.
    pub fn pivot(&self) -> Point2D {
        let (fx, fy) = self.fractions();
        Point2D::new(fx, fy)
    }

    fn fractions(&self) -> (f64, f64) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::MiddleLeft => (0.0, 0.5),
            Self::MiddleCenter => (0.5, 0.5),
            Self::MiddleRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

impl FromStr for ScreenPosition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for ScreenPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Style Preset
// =============================================================================

/// A named default set: every field a text effect needs when nothing is overridden.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub style: TextStyle,
    pub shadow: DropShadow,
    /// Default placement box width
    pub box_width: f64,
    /// Default placement box height
    pub box_height: f64,
}

impl StylePreset {
    /// Name of the preset used for SRT file import and demo inserts
    pub const FILE_IMPORT: &'static str = "import";
    /// Name of the preset used for matched-span batches created from the UI
    pub const MATCHED: &'static str = "matched";

    /// Plain Arial 38 with a thin outline.
    pub fn file_import() -> Self {
        Self {
            style: TextStyle::default(),
            shadow: DropShadow::default(),
            box_width: 100.0,
            box_height: 20.0,
        }
    }

    /// Themed font, size 60, outlined and shadowed, wide wrap for long verses.
    pub fn matched_batch() -> Self {
        Self {
            style: TextStyle {
                font_family: "Uthmanic Hafs".to_string(),
                font_size: 60.0,
                stroke: "#000000".to_string(),
                stroke_thickness: 3.0,
                line_height: 90.0,
                word_wrap_width: 1700.0,
                ..TextStyle::default()
            },
            shadow: DropShadow {
                enabled: true,
                distance: 3.0,
                blur: 2.0,
                ..DropShadow::default()
            },
            box_width: 1800.0,
            box_height: 200.0,
        }
    }
}

impl Default for StylePreset {
    fn default() -> Self {
        Self::file_import()
    }
}

// =============================================================================
// Resolved Style
// =============================================================================

/// Complete style and geometry for one text effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub style: TextStyle,
    pub shadow: DropShadow,
    pub placement: Placement,
}

impl ResolvedStyle {
    /// Decomposes the record into the host's named single-property setters.
    pub fn property_changes(&self) -> Vec<TextPropertyChange> {
        vec![
            TextPropertyChange::FontFamily(self.style.font_family.clone()),
            TextPropertyChange::FontSize(self.style.font_size),
            TextPropertyChange::Align(self.style.align),
            TextPropertyChange::Fill(self.style.fill.clone()),
            TextPropertyChange::WordWrapWidth(self.style.word_wrap_width),
            TextPropertyChange::LineHeight(self.style.line_height),
            TextPropertyChange::StrokeColor(self.style.stroke.clone()),
            TextPropertyChange::StrokeThickness(self.style.stroke_thickness),
            TextPropertyChange::DropShadow(self.shadow.enabled),
            TextPropertyChange::DropShadowColor(self.shadow.color.clone()),
            TextPropertyChange::DropShadowDistance(self.shadow.distance),
            TextPropertyChange::DropShadowBlur(self.shadow.blur),
            TextPropertyChange::DropShadowAlpha(self.shadow.alpha),
        ]
    }
}

// =============================================================================
// Style Defaults
// =============================================================================

/// Resolver bound to one default set and one target canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleDefaults {
    preset: StylePreset,
    canvas: Canvas,
}

impl StyleDefaults {
    pub fn new(preset: StylePreset) -> Self {
        Self {
            preset,
            canvas: Canvas::reference(),
        }
    }

    /// Targets a canvas other than the 1920x1080 reference.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn preset(&self) -> &StylePreset {
        &self.preset
    }

    /// Builds a complete record. Pure: equal inputs give equal outputs.
    pub fn resolve(&self, overrides: Option<&StyleOverrides>, position: ScreenPosition) -> ResolvedStyle {
        let mut style = self.preset.style.clone();
        let mut shadow = self.preset.shadow.clone();
        let mut width = self.preset.box_width;
        let mut height = self.preset.box_height;

        if let Some(o) = overrides {
            if let Some(v) = &o.font_family {
                style.font_family = v.clone();
            }
            if let Some(v) = o.font_size {
                style.font_size = v;
            }
            if let Some(v) = &o.fill {
                style.fill = v.clone();
            }
            if let Some(v) = &o.stroke {
                style.stroke = v.clone();
            }
            if let Some(v) = o.stroke_thickness {
                style.stroke_thickness = v;
            }
            if let Some(v) = o.line_height {
                style.line_height = v;
            }
            if let Some(v) = o.word_wrap_width {
                style.word_wrap_width = v;
            }
            if let Some(v) = o.align {
                style.align = v;
            }
            if let Some(v) = o.drop_shadow {
                shadow.enabled = v;
            }
            if let Some(v) = &o.drop_shadow_color {
                shadow.color = v.clone();
            }
            if let Some(v) = o.drop_shadow_distance {
                shadow.distance = v;
            }
            if let Some(v) = o.drop_shadow_blur {
                shadow.blur = v;
            }
            if let Some(v) = o.drop_shadow_alpha {
                shadow.alpha = v.clamp(0.0, 1.0);
            }
            if let Some(v) = o.width {
                width = v;
            }
            if let Some(v) = o.height {
                height = v;
            }
        }

        let placement = Placement {
            position: self.canvas.scale_from_reference(position.reference_point()),
            pivot: position.pivot(),
            scale_x: 1.0,
            scale_y: 1.0,
            width,
            height,
            rotation: 0.0,
        };

        ResolvedStyle {
            style,
            shadow,
            placement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_center_anchor() {
        let defaults = StyleDefaults::new(StylePreset::file_import());
        let resolved = defaults.resolve(None, ScreenPosition::BottomCenter);
        assert_eq!(resolved.placement.position, Point2D::new(960.0, 920.0));
        assert_eq!(resolved.placement.pivot, Point2D::new(0.5, 1.0));
    }

    #[test]
    fn test_anchor_lands_on_point_regardless_of_box_size() {
        let defaults = StyleDefaults::new(StylePreset::file_import());
        for position in ScreenPosition::ALL {
            for (w, h) in [(100.0, 20.0), (1800.0, 200.0)] {
                let overrides = StyleOverrides {
                    width: Some(w),
                    height: Some(h),
                    ..Default::default()
                };
                let p = defaults.resolve(Some(&overrides), position).placement;
                let tl = p.top_left();
                let anchor_x = tl.x + p.pivot.x * p.width;
                let anchor_y = tl.y + p.pivot.y * p.height;
                assert!((anchor_x - p.position.x).abs() < 1e-9);
                assert!((anchor_y - p.position.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_named_positions() {
        assert_eq!(ScreenPosition::from_name("top-left").reference_point(), Point2D::new(160.0, 160.0));
        assert_eq!(ScreenPosition::from_name("middle-center").reference_point(), Point2D::new(960.0, 540.0));
        assert_eq!(ScreenPosition::from_name("BOTTOM-RIGHT").pivot(), Point2D::new(1.0, 1.0));
    }

    #[test]
    fn test_unknown_position_falls_back() {
        assert_eq!(ScreenPosition::from_name("upside-down"), ScreenPosition::BottomCenter);
        assert_eq!("".parse::<ScreenPosition>().unwrap(), ScreenPosition::BottomCenter);
    }

    #[test]
    fn test_file_import_defaults() {
        let resolved = StyleDefaults::new(StylePreset::file_import()).resolve(None, ScreenPosition::default());
        assert_eq!(resolved.style.font_family, "Arial");
        assert_eq!(resolved.style.font_size, 38.0);
        assert_eq!(resolved.style.fill, vec!["#FFFFFF".to_string()]);
        assert!(resolved.shadow.enabled);
    }

    #[test]
    fn test_matched_defaults_differ_from_import() {
        let resolved = StyleDefaults::new(StylePreset::matched_batch()).resolve(None, ScreenPosition::default());
        assert_eq!(resolved.style.font_size, 60.0);
        assert_ne!(resolved.style.font_family, "Arial");
        assert!(resolved.style.stroke_thickness > 0.0);
        assert!(resolved.shadow.enabled);
    }

    #[test]
    fn test_overrides_win_and_rest_stays_default() {
        let overrides = StyleOverrides {
            font_size: Some(42.0),
            stroke: Some("#112233".to_string()),
            drop_shadow: Some(false),
            ..Default::default()
        };
        let defaults = StyleDefaults::new(StylePreset::file_import());
        let resolved = defaults.resolve(Some(&overrides), ScreenPosition::TopCenter);
        assert_eq!(resolved.style.font_size, 42.0);
        assert_eq!(resolved.style.stroke, "#112233");
        assert!(!resolved.shadow.enabled);
        assert_eq!(resolved.style.font_family, "Arial");
        assert_eq!(resolved.placement.pivot, Point2D::new(0.5, 0.0));
    }

    #[test]
    fn test_resolve_is_pure() {
        let defaults = StyleDefaults::new(StylePreset::matched_batch());
        let overrides = StyleOverrides {
            line_height: Some(70.0),
            ..Default::default()
        };
        assert_eq!(
            defaults.resolve(Some(&overrides), ScreenPosition::MiddleLeft),
            defaults.resolve(Some(&overrides), ScreenPosition::MiddleLeft)
        );
    }

    #[test]
    fn test_canvas_scaling() {
        let defaults = StyleDefaults::new(StylePreset::file_import()).with_canvas(Canvas::new(3840, 2160));
        let resolved = defaults.resolve(None, ScreenPosition::BottomCenter);
        assert_eq!(resolved.placement.position, Point2D::new(1920.0, 1840.0));
    }

    #[test]
    fn test_property_changes_cover_every_setter() {
        let resolved = StyleDefaults::new(StylePreset::file_import()).resolve(None, ScreenPosition::default());
        let changes = resolved.property_changes();
        assert_eq!(changes.len(), 13);
        assert!(changes.contains(&TextPropertyChange::FontSize(38.0)));
        assert!(changes.contains(&TextPropertyChange::DropShadow(true)));
    }
}
