//! Host Capabilities
//!
//! The engine never owns the timeline. It reads a snapshot and issues
//! writes through these traits, so the host stays the single source of
//! truth and can apply its own change notification and undo tracking.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{EffectSummary, TextEffect};
use crate::core::{text::TextPropertyChange, CoreError, CoreResult, TimeMs, TrackIndex};

/// Mutable timeline document exposed by the host application.
pub trait TimelineHost {
    /// Number of tracks currently in the ordered track list.
    fn track_count(&self) -> usize;

    /// Snapshot of every effect on the timeline.
    fn effects(&self) -> Vec<EffectSummary>;

    /// Currently selected effect, if any.
    fn selected_effect(&self) -> Option<EffectSummary>;

    /// Appends one track and returns its index.
    fn add_track(&mut self) -> CoreResult<TrackIndex>;

    /// Moves an existing effect to another track.
    fn set_effect_track(&mut self, effect_id: &str, track: TrackIndex) -> CoreResult<()>;

    /// Registers a new text effect. The host takes ownership.
    fn add_text_effect(&mut self, effect: TextEffect) -> CoreResult<()>;

    /// Sets one style property of an existing text effect.
    fn set_text_property(&mut self, effect_id: &str, change: &TextPropertyChange) -> CoreResult<()>;

    /// Current playhead position.
    fn current_timecode(&self) -> TimeMs;

    /// Re-renders the canvas at the given timecode.
    fn compose_at_timecode(&mut self, timecode: TimeMs);
}

/// Content-addressed media file store.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Resolves a file hash to a readable local path.
    async fn fetch_file(&self, hash: &str) -> CoreResult<PathBuf>;
}

/// Media store backed by a directory of files named after their hash
/// (with or without an extension).
#[derive(Clone, Debug)]
pub struct DirectoryMediaStore {
    root: PathBuf,
}

impl DirectoryMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for DirectoryMediaStore {
    async fn fetch_file(&self, hash: &str) -> CoreResult<PathBuf> {
        if hash.is_empty() || hash.contains(['/', '\\']) || hash.starts_with('.') {
            return Err(CoreError::MediaNotFound(hash.to_string()));
        }

        let exact = self.root.join(hash);
        if tokio::fs::metadata(&exact).await.is_ok_and(|m| m.is_file()) {
            return Ok(exact);
        }

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let stem_matches = path.file_stem().is_some_and(|stem| stem == hash);
            if stem_matches && entry.file_type().await?.is_file() {
                debug!("Resolved media {} to {}", hash, path.display());
                return Ok(path);
            }
        }

        Err(CoreError::MediaNotFound(hash.to_string()))
    }
}
