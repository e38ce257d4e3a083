//! Timed Text Span
//!
//! A transient interval of text awaiting conversion into a text effect.

use serde::Serialize;

use crate::core::{text::StyleOverrides, CoreError, CoreResult, TimeMs};

/// Validated timed text: `0 <= start_ms < end_ms`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    text: String,
    start_ms: TimeMs,
    end_ms: TimeMs,
    #[serde(skip_serializing_if = "Option::is_none")]
    style_overrides: Option<StyleOverrides>,
}

impl Span {
    /// Creates a span, rejecting negative starts and non-positive durations.
    pub fn new(text: impl Into<String>, start_ms: TimeMs, end_ms: TimeMs) -> CoreResult<Self> {
        if start_ms < 0 {
            return Err(CoreError::InvalidSpan {
                start_ms,
                end_ms,
                reason: "negative start",
            });
        }
        if end_ms <= start_ms {
            return Err(CoreError::InvalidSpan {
                start_ms,
                end_ms,
                reason: "non-positive duration",
            });
        }

        Ok(Self {
            text: text.into(),
            start_ms,
            end_ms,
            style_overrides: None,
        })
    }

    /// Attaches per-span style overrides.
    pub fn with_overrides(mut self, overrides: StyleOverrides) -> Self {
        self.style_overrides = Some(overrides);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_ms(&self) -> TimeMs {
        self.start_ms
    }

    pub fn end_ms(&self) -> TimeMs {
        self.end_ms
    }

    /// Always positive.
    pub fn duration_ms(&self) -> TimeMs {
        self.end_ms - self.start_ms
    }

    pub fn style_overrides(&self) -> Option<&StyleOverrides> {
        self.style_overrides.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_span() {
        let span = Span::new("Hello", 1000, 2500).unwrap();
        assert_eq!(span.text(), "Hello");
        assert_eq!(span.duration_ms(), 1500);
        assert!(span.style_overrides().is_none());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = Span::new("A", 2000, 2000);
        assert!(matches!(result, Err(CoreError::InvalidSpan { .. })));
    }

    #[test]
    fn test_negative_duration_rejected() {
        assert!(Span::new("A", 3000, 1000).is_err());
    }

    #[test]
    fn test_negative_start_rejected() {
        assert!(Span::new("A", -5, 1000).is_err());
    }

    #[test]
    fn test_overrides_attach() {
        let overrides = StyleOverrides {
            font_size: Some(42.0),
            ..Default::default()
        };
        let span = Span::new("A", 0, 10).unwrap().with_overrides(overrides);
        assert_eq!(span.style_overrides().unwrap().font_size, Some(42.0));
    }
}
