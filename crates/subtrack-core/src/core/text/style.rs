//! Typography, shadow and placement records.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;

// =============================================================================
// Enumerations
// =============================================================================

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Bolder,
    Lighter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontVariant {
    #[default]
    Normal,
    SmallCaps,
}

/// Stroke corner join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
    Bottom,
    Hanging,
    Ideographic,
}

/// Direction of a multi-color fill gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradientType {
    #[default]
    LinearVertical,
    LinearHorizontal,
}

// =============================================================================
// Text Style
// =============================================================================

/// Complete typography record of a text effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in pixels on the reference canvas
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub font_variant: FontVariant,

    /// Fill colors (`#RRGGBB`); more than one forms a gradient
    pub fill: Vec<String>,
    /// Gradient stop offsets in `[0, 1]`, empty for evenly spaced stops
    #[serde(default)]
    pub fill_gradient_stops: Vec<f64>,
    #[serde(default)]
    pub fill_gradient_type: GradientType,

    pub stroke: String,
    /// Stroke width in pixels, 0 disables the outline
    pub stroke_thickness: f64,
    #[serde(default)]
    pub line_join: LineJoin,
    #[serde(default = "default_miter_limit")]
    pub miter_limit: f64,

    #[serde(default)]
    pub letter_spacing: f64,
    /// Line height in pixels, 0 = derived from the font size
    #[serde(default)]
    pub line_height: f64,
    #[serde(default)]
    pub leading: f64,

    pub word_wrap: bool,
    pub word_wrap_width: f64,
    #[serde(default)]
    pub break_words: bool,

    #[serde(default)]
    pub align: TextAlignment,
    #[serde(default)]
    pub text_baseline: TextBaseline,
}

fn default_miter_limit() -> f64 {
    10.0
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 38.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            font_variant: FontVariant::Normal,
            fill: vec!["#FFFFFF".to_string()],
            fill_gradient_stops: Vec::new(),
            fill_gradient_type: GradientType::LinearVertical,
            stroke: "#000000".to_string(),
            stroke_thickness: 2.0,
            line_join: LineJoin::Miter,
            miter_limit: default_miter_limit(),
            letter_spacing: 0.0,
            line_height: 0.0,
            leading: 0.0,
            word_wrap: true,
            word_wrap_width: 500.0,
            break_words: false,
            align: TextAlignment::Center,
            text_baseline: TextBaseline::Alphabetic,
        }
    }
}

// =============================================================================
// Drop Shadow
// =============================================================================

/// Drop shadow behind the glyphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropShadow {
    pub enabled: bool,
    pub color: String,
    /// Opacity (0.0 ~ 1.0)
    pub alpha: f64,
    /// Direction in radians
    pub angle: f64,
    pub blur: f64,
    pub distance: f64,
}

impl Default for DropShadow {
    fn default() -> Self {
        Self {
            enabled: true,
            color: "#000000".to_string(),
            alpha: 1.0,
            angle: 0.5,
            blur: 0.0,
            distance: 2.0,
        }
    }
}

impl DropShadow {
    /// A disabled shadow with default parameters.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Placement rectangle of a text effect on the canvas.
///
/// `pivot` is the fraction of the box (0..1 on each axis) that lands exactly
/// on `position`, so `(0.5, 1.0)` hangs the box above a bottom-center point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub position: Point2D,
    pub pivot: Point2D,
    pub scale_x: f64,
    pub scale_y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees (clockwise)
    pub rotation: f64,
}

impl Placement {
    /// Top-left corner of the unscaled box on the canvas.
    pub fn top_left(&self) -> Point2D {
        Point2D::new(
            self.position.x - self.pivot.x * self.width * self.scale_x,
            self.position.y - self.pivot.y * self.height * self.scale_y,
        )
    }
}

// =============================================================================
// Style Overrides
// =============================================================================

/// Partial style supplied per span or per bulk edit; `None` keeps the default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_blur: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl StyleOverrides {
    /// True when nothing is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_serializes_camel_case() {
        let json = serde_json::to_value(TextStyle::default()).unwrap();
        assert_eq!(json["fontFamily"], "Arial");
        assert_eq!(json["wordWrapWidth"], 500.0);
        assert_eq!(json["lineJoin"], "miter");
        assert_eq!(json["textBaseline"], "alphabetic");
    }

    #[test]
    fn test_overrides_deserialize_partial() {
        let overrides: StyleOverrides =
            serde_json::from_str(r##"{"fontSize": 42, "fill": ["#FF0000"]}"##).unwrap();
        assert_eq!(overrides.font_size, Some(42.0));
        assert_eq!(overrides.fill, Some(vec!["#FF0000".to_string()]));
        assert!(overrides.stroke.is_none());
        assert!(!overrides.is_empty());
        assert!(StyleOverrides::default().is_empty());
    }

    #[test]
    fn test_placement_top_left_respects_pivot() {
        let placement = Placement {
            position: Point2D::new(960.0, 920.0),
            pivot: Point2D::new(0.5, 1.0),
            scale_x: 1.0,
            scale_y: 1.0,
            width: 200.0,
            height: 50.0,
            rotation: 0.0,
        };
        assert_eq!(placement.top_left(), Point2D::new(860.0, 870.0));
    }

    #[test]
    fn test_disabled_shadow() {
        let shadow = DropShadow::disabled();
        assert!(!shadow.enabled);
        assert_eq!(shadow.distance, 2.0);
    }
}
