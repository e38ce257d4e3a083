//! Subtrack Core Engine
//!
//! Handles subtitle parsing, style resolution, track allocation and
//! effect synthesis against a host timeline.

pub mod captions;
pub mod commands;
pub mod fs;
pub mod settings;
pub mod subtitles;
pub mod text;
pub mod timeline;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
