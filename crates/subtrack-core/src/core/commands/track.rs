//! Track Commands Module
//!
//! Growing the track list and moving effects between tracks.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, StateChange},
    timeline::{TimelineState, Track},
    CoreError, CoreResult, EffectId, TrackIndex,
};

// =============================================================================
// AddTrackCommand
// =============================================================================

/// Appends a track to the end of the track list
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackCommand {
    /// Track name
    pub name: String,
    /// Created track (kept so redo restores the same identity)
    #[serde(skip)]
    created_track: Option<Track>,
}

impl AddTrackCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created_track: None,
        }
    }
}

impl Command for AddTrackCommand {
    fn execute(&mut self, state: &mut TimelineState) -> CoreResult<CommandResult> {
        let track = self
            .created_track
            .get_or_insert_with(|| Track::new(&self.name))
            .clone();
        let track_id = track.id.clone();
        let index = state.tracks.len();

        state.tracks.push(track);

        Ok(CommandResult::new()
            .with_change(StateChange::TrackCreated {
                track_id: track_id.clone(),
                index,
            })
            .with_created_id(&track_id))
    }

    fn undo(&self, state: &mut TimelineState) -> CoreResult<()> {
        if let Some(track) = &self.created_track {
            if state.tracks.last().is_some_and(|t| t.id == track.id) {
                state.tracks.pop();
            } else {
                state.tracks.retain(|t| t.id != track.id);
            }
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "AddTrack"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// SetEffectTrackCommand
// =============================================================================

/// Moves an effect (text or media) onto another existing track
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEffectTrackCommand {
    pub effect_id: EffectId,
    pub track: TrackIndex,
    /// Track before the move (for undo)
    #[serde(skip)]
    previous_track: Option<TrackIndex>,
}

impl SetEffectTrackCommand {
    pub fn new(effect_id: &str, track: TrackIndex) -> Self {
        Self {
            effect_id: effect_id.to_string(),
            track,
            previous_track: None,
        }
    }
}

impl Command for SetEffectTrackCommand {
    fn execute(&mut self, state: &mut TimelineState) -> CoreResult<CommandResult> {
        let track_count = state.tracks.len();
        if self.track >= track_count {
            return Err(CoreError::TrackOutOfRange {
                track: self.track,
                track_count,
            });
        }

        let effect = state
            .find_effect_mut(&self.effect_id)
            .ok_or_else(|| CoreError::EffectNotFound(self.effect_id.clone()))?;

        let from = effect.track();
        effect.set_track(self.track);
        self.previous_track = Some(from);

        Ok(CommandResult::new().with_change(StateChange::EffectMoved {
            effect_id: self.effect_id.clone(),
            from,
            to: self.track,
        }))
    }

    fn undo(&self, state: &mut TimelineState) -> CoreResult<()> {
        if let Some(previous) = self.previous_track {
            if let Some(effect) = state.find_effect_mut(&self.effect_id) {
                effect.set_track(previous);
            }
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "SetEffectTrack"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}
