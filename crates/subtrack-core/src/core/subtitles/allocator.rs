//! Track Allocation
//!
//! Decides which track a batch of new text occupies. Planning is a pure
//! function of a timeline snapshot; applying the plan issues host writes
//! in a fixed order: grow the track list, relocate clips, and only then
//! is the batch registered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::core::{
    timeline::{EffectSummary, TimelineHost},
    CoreError, CoreResult, EffectId, TrackIndex,
};

// =============================================================================
// Placement
// =============================================================================

/// Policy for batches placed relative to a selected clip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlacementPolicy {
    /// Text goes on the row after the clip's row, so it draws on top.
    #[default]
    AnchorAbove,
    /// The clip moves down one row and text takes over its old row.
    DisplaceSwap,
}

impl PlacementPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AnchorAbove => "anchor-above",
            Self::DisplaceSwap => "displace-swap",
        }
    }
}

impl FromStr for PlacementPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "anchor-above" | "anchorabove" => Ok(Self::AnchorAbove),
            "displace-swap" | "displaceswap" => Ok(Self::DisplaceSwap),
            other => Err(CoreError::ValidationError(format!(
                "Unknown placement policy '{}' (expected anchor-above or displace-swap)",
                other
            ))),
        }
    }
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller-supplied selector for where a batch goes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum PlacementHint {
    /// Append after the highest track holding any effect.
    #[default]
    NoHint,
    /// Place on `track + 1`.
    #[serde(rename_all = "camelCase")]
    AnchorAbove { track: TrackIndex },
    /// Move `effect_id` from `track` to `track + 1` and place on `track`.
    #[serde(rename_all = "camelCase")]
    DisplaceSwap { effect_id: EffectId, track: TrackIndex },
}

impl PlacementHint {
    /// Builds the hint for a batch anchored on the given clip.
    pub fn for_clip(policy: PlacementPolicy, clip: &EffectSummary) -> Self {
        match policy {
            PlacementPolicy::AnchorAbove => Self::AnchorAbove { track: clip.track },
            PlacementPolicy::DisplaceSwap => Self::DisplaceSwap {
                effect_id: clip.id.clone(),
                track: clip.track,
            },
        }
    }
}

// =============================================================================
// Allocation Plan
// =============================================================================

/// An existing effect that must move before the batch is registered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relocation {
    pub effect_id: EffectId,
    pub from: TrackIndex,
    pub to: TrackIndex,
}

/// Target track plus the topology changes needed to reach it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPlan {
    pub target_track: TrackIndex,
    /// Tracks to append before anything is assigned
    pub tracks_to_create: usize,
    pub relocations: Vec<Relocation>,
}

impl AllocationPlan {
    fn on_track(target_track: TrackIndex, track_count: usize) -> Self {
        Self {
            target_track,
            tracks_to_create: (target_track + 1).saturating_sub(track_count),
            relocations: Vec::new(),
        }
    }

    /// True when applying the plan changes nothing on the host.
    pub fn is_noop(&self) -> bool {
        self.tracks_to_create == 0 && self.relocations.is_empty()
    }
}

/// Outcome of applying a plan to a host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedAllocation {
    /// Track the batch must be registered on (always in range)
    pub track: TrackIndex,
    pub created_tracks: Vec<TrackIndex>,
    pub relocated: Vec<Relocation>,
}

/// Plans the placement of a batch of `span_count` spans.
///
/// An empty batch gets the target the policy would choose but never any
/// topology change.
pub fn allocate(
    span_count: usize,
    track_count: usize,
    effects: &[EffectSummary],
    hint: &PlacementHint,
) -> AllocationPlan {
    let mut plan = match hint {
        PlacementHint::NoHint => {
            let target = effects
                .iter()
                .map(|e| e.track)
                .max()
                .map_or(0, |highest| highest + 1);
            AllocationPlan::on_track(target, track_count)
        }
        PlacementHint::AnchorAbove { track } => AllocationPlan::on_track(track + 1, track_count),
        PlacementHint::DisplaceSwap { effect_id, track } => {
            // Trust the snapshot over the hint when they disagree.
            let current = effects
                .iter()
                .find(|e| &e.id == effect_id)
                .map_or(*track, |e| e.track);
            let mut plan = AllocationPlan::on_track(current, track_count);
            plan.tracks_to_create = (current + 2).saturating_sub(track_count);
            plan.relocations.push(Relocation {
                effect_id: effect_id.clone(),
                from: current,
                to: current + 1,
            });
            plan
        }
    };

    if span_count == 0 {
        plan.tracks_to_create = 0;
        plan.relocations.clear();
    }

    debug!(
        "Allocation for {} spans with {:?}: track {}, {} new tracks, {} relocations",
        span_count,
        hint,
        plan.target_track,
        plan.tracks_to_create,
        plan.relocations.len()
    );
    plan
}

/// Applies a plan: creates tracks first, then relocates clips.
///
/// Every relocation is checked against the host before the first write,
/// so a plan naming a missing effect fails with the timeline unchanged.
/// If the target is still out of range afterwards it is clamped to the
/// last track and an error is logged.
pub fn apply_plan(host: &mut dyn TimelineHost, plan: &AllocationPlan) -> CoreResult<AppliedAllocation> {
    let effects = host.effects();
    let grown_count = host.track_count() + plan.tracks_to_create;
    for relocation in &plan.relocations {
        if !effects.iter().any(|e| e.id == relocation.effect_id) {
            return Err(CoreError::EffectNotFound(relocation.effect_id.clone()));
        }
        if relocation.to >= grown_count {
            return Err(CoreError::TrackOutOfRange {
                track: relocation.to,
                track_count: grown_count,
            });
        }
    }

    let mut created_tracks = Vec::with_capacity(plan.tracks_to_create);
    for _ in 0..plan.tracks_to_create {
        created_tracks.push(host.add_track()?);
    }

    let mut relocated = Vec::with_capacity(plan.relocations.len());
    for relocation in &plan.relocations {
        host.set_effect_track(&relocation.effect_id, relocation.to)?;
        relocated.push(relocation.clone());
    }

    let track_count = host.track_count();
    if track_count == 0 {
        return Err(CoreError::TrackOutOfRange {
            track: plan.target_track,
            track_count,
        });
    }

    let track = if plan.target_track >= track_count {
        error!(
            "Allocated track {} is out of range after growth (track count {}), clamping to {}",
            plan.target_track,
            track_count,
            track_count - 1
        );
        track_count - 1
    } else {
        plan.target_track
    };

    if !created_tracks.is_empty() || !relocated.is_empty() {
        info!(
            "Prepared track {}: created {:?}, relocated {} effect(s)",
            track,
            created_tracks,
            relocated.len()
        );
    }

    Ok(AppliedAllocation {
        track,
        created_tracks,
        relocated,
    })
}
