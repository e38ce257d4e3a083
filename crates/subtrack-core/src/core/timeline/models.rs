//! Timeline Model Definitions
//!
//! Track 0 is the top row in the editor but the bottom-most layer when
//! compositing: render order is the reverse of the track index.

use serde::{Deserialize, Serialize};

use crate::core::{
    captions::Span,
    new_id,
    text::{DropShadow, Placement, ResolvedStyle, TextStyle},
    EffectId, FileHash, TimeMs, TrackId, TrackIndex,
};

/// Layer position of a track in compositing order (higher draws on top).
///
/// `zIndex = track_count - 1 - track`.
pub fn visual_layer(track: TrackIndex, track_count: usize) -> usize {
    track_count.saturating_sub(1).saturating_sub(track)
}

// =============================================================================
// Track
// =============================================================================

/// One layer of the timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub muted: bool,
}

fn default_true() -> bool {
    true
}

impl Track {
    pub fn new(name: &str) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            visible: true,
            locked: false,
            muted: false,
        }
    }
}

// =============================================================================
// Effects
// =============================================================================

/// Effect kind tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Text,
    Video,
    Audio,
    Image,
}

impl EffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
        }
    }

    /// True for kinds that carry an audio stream the matcher can use.
    pub fn has_audio(&self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }
}

/// A fully specified, render-ready text object on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEffect {
    pub id: EffectId,
    pub track: TrackIndex,
    pub start_ms: TimeMs,
    pub duration_ms: TimeMs,
    pub text: String,
    pub style: TextStyle,
    pub shadow: DropShadow,
    pub placement: Placement,
}

impl TextEffect {
    /// Builds an effect with a fresh identity from a span and a resolved style.
    pub fn from_span(span: &Span, track: TrackIndex, resolved: ResolvedStyle) -> Self {
        Self {
            id: new_id(),
            track,
            start_ms: span.start_ms(),
            duration_ms: span.duration_ms(),
            text: span.text().to_string(),
            style: resolved.style,
            shadow: resolved.shadow,
            placement: resolved.placement,
        }
    }

    pub fn end_ms(&self) -> TimeMs {
        self.start_ms + self.duration_ms
    }
}

/// Video/audio/image clip; opaque apart from identity, track and source file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEffect {
    pub id: EffectId,
    pub track: TrackIndex,
    pub start_ms: TimeMs,
    pub duration_ms: TimeMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<FileHash>,
    #[serde(default)]
    pub name: String,
}

/// Any effect placed on the timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimelineEffect {
    Text(TextEffect),
    Video(MediaEffect),
    Audio(MediaEffect),
    Image(MediaEffect),
}

impl TimelineEffect {
    pub fn id(&self) -> &str {
        match self {
            Self::Text(e) => &e.id,
            Self::Video(e) | Self::Audio(e) | Self::Image(e) => &e.id,
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Text(_) => EffectKind::Text,
            Self::Video(_) => EffectKind::Video,
            Self::Audio(_) => EffectKind::Audio,
            Self::Image(_) => EffectKind::Image,
        }
    }

    pub fn track(&self) -> TrackIndex {
        match self {
            Self::Text(e) => e.track,
            Self::Video(e) | Self::Audio(e) | Self::Image(e) => e.track,
        }
    }

    pub fn set_track(&mut self, track: TrackIndex) {
        match self {
            Self::Text(e) => e.track = track,
            Self::Video(e) | Self::Audio(e) | Self::Image(e) => e.track = track,
        }
    }

    pub fn as_text(&self) -> Option<&TextEffect> {
        match self {
            Self::Text(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextEffect> {
        match self {
            Self::Text(e) => Some(e),
            _ => None,
        }
    }

    pub fn summary(&self) -> EffectSummary {
        let (start_ms, duration_ms, file_hash) = match self {
            Self::Text(e) => (e.start_ms, e.duration_ms, None),
            Self::Video(e) | Self::Audio(e) | Self::Image(e) => {
                (e.start_ms, e.duration_ms, e.file_hash.clone())
            }
        };
        EffectSummary {
            id: self.id().to_string(),
            kind: self.kind(),
            track: self.track(),
            start_ms,
            duration_ms,
            file_hash,
        }
    }
}

/// Read-only view of an effect: what allocation and selection need.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSummary {
    pub id: EffectId,
    pub kind: EffectKind,
    pub track: TrackIndex,
    pub start_ms: TimeMs,
    pub duration_ms: TimeMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<FileHash>,
}
