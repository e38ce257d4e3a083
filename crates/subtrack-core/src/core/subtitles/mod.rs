//! Subtitle Engine
//!
//! - `allocator.rs`   - picks the track for a batch and plans track growth
//!   and clip relocation
//! - `synthesizer.rs` - spans to fully styled text effects
//! - `matching.rs`    - match-service records, adapter and client
//! - `extract.rs`     - audio extraction for the matcher
//! - `manager.rs`     - the facade tying the above to a host timeline

mod allocator;
mod extract;
mod manager;
mod matching;
mod synthesizer;

pub use allocator::{
    allocate, apply_plan, AllocationPlan, AppliedAllocation, PlacementHint, PlacementPolicy,
    Relocation,
};
pub use extract::{AudioExtractor, FfmpegAudioExtractor};
pub use manager::{demo_spans, BulkEditStatus, GenerationStage, ImportReport, SubtitleManager};
#[cfg(feature = "remote-matcher")]
pub use matching::HttpMatchingService;
pub use matching::{
    adapt_matches, AdaptedMatches, MatchRecord, MatchRequest, MatchResponse, MatchingService,
    TextSource,
};
pub use synthesizer::{register, synthesize};
