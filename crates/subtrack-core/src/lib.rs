//! Subtrack Core Library
//!
//! Subtitle track allocation and text-effect synthesis engine.
//! Parses timed text (SRT files or speech-matching results), decides which
//! timeline track it belongs on, and registers fully styled text effects
//! with a host timeline through an injected capability object.

pub mod core;

pub use crate::core::{CoreError, CoreResult};
