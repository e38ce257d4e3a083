//! Single-property style changes.
//!
//! Mirrors the host's per-property setters: every bulk edit and every
//! re-application of defaults is expressed as a sequence of these.

use serde::{Deserialize, Serialize};

use super::{DropShadow, TextAlignment, TextStyle};
use crate::core::{CoreError, CoreResult};

/// One named style property and its new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "camelCase")]
pub enum TextPropertyChange {
    FontSize(f64),
    FontFamily(String),
    Align(TextAlignment),
    Fill(Vec<String>),
    WordWrapWidth(f64),
    LineHeight(f64),
    StrokeColor(String),
    StrokeThickness(f64),
    DropShadow(bool),
    DropShadowColor(String),
    DropShadowDistance(f64),
    DropShadowBlur(f64),
    DropShadowAlpha(f64),
}

impl TextPropertyChange {
    /// Setter name, used in logs and status messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FontSize(_) => "fontSize",
            Self::FontFamily(_) => "fontFamily",
            Self::Align(_) => "align",
            Self::Fill(_) => "fill",
            Self::WordWrapWidth(_) => "wordWrapWidth",
            Self::LineHeight(_) => "lineHeight",
            Self::StrokeColor(_) => "strokeColor",
            Self::StrokeThickness(_) => "strokeThickness",
            Self::DropShadow(_) => "dropShadow",
            Self::DropShadowColor(_) => "dropShadowColor",
            Self::DropShadowDistance(_) => "dropShadowDistance",
            Self::DropShadowBlur(_) => "dropShadowBlur",
            Self::DropShadowAlpha(_) => "dropShadowAlpha",
        }
    }

    /// Rejects values no renderer could draw.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |what: &str| -> CoreResult<()> {
            Err(CoreError::ValidationError(format!("{}: {}", self.name(), what)))
        };

        match self {
            Self::FontSize(v) | Self::WordWrapWidth(v) if !(v.is_finite() && *v > 0.0) => {
                invalid("must be a positive number")
            }
            Self::LineHeight(v)
            | Self::StrokeThickness(v)
            | Self::DropShadowDistance(v)
            | Self::DropShadowBlur(v)
                if !(v.is_finite() && *v >= 0.0) =>
            {
                invalid("must be a non-negative number")
            }
            Self::DropShadowAlpha(v) if !(0.0..=1.0).contains(v) => invalid("must be within 0..1"),
            Self::FontFamily(v) if v.trim().is_empty() => invalid("must not be empty"),
            Self::Fill(colors) if colors.is_empty() || !colors.iter().all(|c| is_hex_color(c)) => {
                invalid("expects one or more #RRGGBB colors")
            }
            Self::StrokeColor(c) | Self::DropShadowColor(c) if !is_hex_color(c) => {
                invalid("expects a #RRGGBB color")
            }
            _ => Ok(()),
        }
    }

    /// Applies the change to a style/shadow pair in place.
    pub fn apply_to(&self, style: &mut TextStyle, shadow: &mut DropShadow) {
        match self {
            Self::FontSize(v) => style.font_size = *v,
            Self::FontFamily(v) => style.font_family = v.clone(),
            Self::Align(v) => style.align = *v,
            Self::Fill(v) => style.fill = v.clone(),
            Self::WordWrapWidth(v) => style.word_wrap_width = *v,
            Self::LineHeight(v) => style.line_height = *v,
            Self::StrokeColor(v) => style.stroke = v.clone(),
            Self::StrokeThickness(v) => style.stroke_thickness = *v,
            Self::DropShadow(v) => shadow.enabled = *v,
            Self::DropShadowColor(v) => shadow.color = v.clone(),
            Self::DropShadowDistance(v) => shadow.distance = *v,
            Self::DropShadowBlur(v) => shadow.blur = *v,
            Self::DropShadowAlpha(v) => shadow.alpha = *v,
        }
    }

    /// The change that would restore the current value of this property.
    pub fn inverse_from(&self, style: &TextStyle, shadow: &DropShadow) -> Self {
        match self {
            Self::FontSize(_) => Self::FontSize(style.font_size),
            Self::FontFamily(_) => Self::FontFamily(style.font_family.clone()),
            Self::Align(_) => Self::Align(style.align),
            Self::Fill(_) => Self::Fill(style.fill.clone()),
            Self::WordWrapWidth(_) => Self::WordWrapWidth(style.word_wrap_width),
            Self::LineHeight(_) => Self::LineHeight(style.line_height),
            Self::StrokeColor(_) => Self::StrokeColor(style.stroke.clone()),
            Self::StrokeThickness(_) => Self::StrokeThickness(style.stroke_thickness),
            Self::DropShadow(_) => Self::DropShadow(shadow.enabled),
            Self::DropShadowColor(_) => Self::DropShadowColor(shadow.color.clone()),
            Self::DropShadowDistance(_) => Self::DropShadowDistance(shadow.distance),
            Self::DropShadowBlur(_) => Self::DropShadowBlur(shadow.blur),
            Self::DropShadowAlpha(_) => Self::DropShadowAlpha(shadow.alpha),
        }
    }
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[0] != b'#' {
        return false;
    }
    bytes[1..].iter().all(|b| b.is_ascii_hexdigit())
}
