//! Timeline Module
//!
//! - `models.rs`   - tracks, text/media effects and the read-only summaries
//!   the allocator works from
//! - `host.rs`     - capability traits the engine receives instead of
//!   reaching into global application state
//! - `document.rs` - an in-memory, serializable host whose mutations run
//!   through the undoable command executor

mod document;
mod host;
mod models;

pub use document::{TimelineDocument, TimelineState};
pub use host::{DirectoryMediaStore, MediaStore, TimelineHost};
pub use models::{
    visual_layer, EffectKind, EffectSummary, MediaEffect, TextEffect, TimelineEffect, Track,
};
