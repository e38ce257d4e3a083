//! Caption Input Module
//!
//! Turns raw subtitle input into validated, ordered timed text spans:
//! - `timestamp.rs` - number-or-`HH:MM:SS,mmm` timestamps to milliseconds
//! - `span.rs`      - the transient `Span` value consumed by synthesis
//! - `srt.rs`       - tolerant SRT (SubRip) parsing and export
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use subtrack_core::core::captions::parse_srt;
//!
//! let spans = parse_srt("1\n00:00:01,000 --> 00:00:02,500\nHello\n\n");
//! assert_eq!(spans[0].start_ms(), 1000);
//! ```

mod span;
mod srt;
mod timestamp;

pub use span::Span;
pub use srt::{export_srt, format_srt_timestamp, parse_srt, parse_srt_with_report, SrtParseOutcome};
pub use timestamp::{parse_srt_timestamp, parse_timestamp, RawTimestamp};
