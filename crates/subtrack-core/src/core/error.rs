//! Subtrack Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

use super::{EffectId, FileHash, TimeMs, TrackIndex};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Invalid span: {start_ms}~{end_ms} ms ({reason})")]
    InvalidSpan {
        start_ms: TimeMs,
        end_ms: TimeMs,
        reason: &'static str,
    },

    // =========================================================================
    // Timeline Errors
    // =========================================================================
    #[error("Track {track} out of range (track count {track_count})")]
    TrackOutOfRange {
        track: TrackIndex,
        track_count: usize,
    },

    #[error("Effect not found: {0}")]
    EffectNotFound(EffectId),

    #[error("Effect {0} is not a text effect")]
    NotATextEffect(EffectId),

    #[error("No effect selected")]
    NoSelection,

    #[error("Selected effect {id} has kind '{kind}', expected video or audio")]
    InvalidSelection { id: EffectId, kind: String },

    // =========================================================================
    // External Dependency Errors
    // =========================================================================
    #[error("Media file not found: {0}")]
    MediaNotFound(FileHash),

    #[error("Audio extraction failed: {0}")]
    AudioExtractionFailed(String),

    #[error("Matching service failed: {0}")]
    MatchingFailed(String),

    // =========================================================================
    // Command Errors
    // =========================================================================
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// True for failures caused by collaborators outside this engine
    /// (media store, audio extraction, matching service).
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::MediaNotFound(_) | Self::AudioExtractionFailed(_) | Self::MatchingFailed(_)
        )
    }
}
