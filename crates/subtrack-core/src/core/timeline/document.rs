//! Timeline Document
//!
//! Serializable in-memory timeline. Implements [`TimelineHost`] so the
//! subtitle engine can run against it; every mutation goes through the
//! command executor and can be undone.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{EffectSummary, TextEffect, TimelineEffect, TimelineHost, Track};
use crate::core::{
    captions::Span,
    commands::{
        AddTextEffectCommand, AddTrackCommand, Command, CommandExecutor, CommandResult,
        SetEffectTrackCommand, SetTextPropertyCommand,
    },
    fs::atomic_write_json_pretty,
    text::TextPropertyChange,
    Canvas, CoreError, CoreResult, EffectId, TimeMs, TrackIndex,
};

// =============================================================================
// Timeline State
// =============================================================================

/// Plain timeline data, the part that is persisted
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineState {
    pub canvas: Canvas,
    /// Ordered track list (index 0 is the top row)
    pub tracks: Vec<Track>,
    pub effects: Vec<TimelineEffect>,
    pub selected_effect_id: Option<EffectId>,
    pub playhead_ms: TimeMs,
    /// Timecode of the last composite
    pub last_composed_ms: Option<TimeMs>,
    /// Number of composites requested since load
    #[serde(skip)]
    pub compose_count: usize,
}

impl TimelineState {
    pub fn find_effect(&self, id: &str) -> Option<&TimelineEffect> {
        self.effects.iter().find(|e| e.id() == id)
    }

    pub fn find_effect_mut(&mut self, id: &str) -> Option<&mut TimelineEffect> {
        self.effects.iter_mut().find(|e| e.id() == id)
    }

    /// Looks up a text effect, distinguishing "missing" from "wrong kind".
    pub fn text_effect_mut(&mut self, id: &str) -> CoreResult<&mut TextEffect> {
        let effect = self
            .find_effect_mut(id)
            .ok_or_else(|| CoreError::EffectNotFound(id.to_string()))?;
        effect
            .as_text_mut()
            .ok_or_else(|| CoreError::NotATextEffect(id.to_string()))
    }

    pub fn summaries(&self) -> Vec<EffectSummary> {
        self.effects.iter().map(TimelineEffect::summary).collect()
    }

    /// Text effects on one track, ordered by start time.
    pub fn text_effects_on_track(&self, track: TrackIndex) -> Vec<&TextEffect> {
        let mut effects: Vec<&TextEffect> = self
            .effects
            .iter()
            .filter_map(TimelineEffect::as_text)
            .filter(|e| e.track == track)
            .collect();
        effects.sort_by_key(|e| e.start_ms);
        effects
    }
}

// =============================================================================
// Timeline Document
// =============================================================================

/// Timeline state plus its undo history
#[derive(Debug, Default)]
pub struct TimelineDocument {
    state: TimelineState,
    executor: CommandExecutor,
}

impl TimelineDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: TimelineState) -> Self {
        Self {
            state,
            executor: CommandExecutor::new(),
        }
    }

    /// Reads a document from a JSON file. History starts empty.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let state: TimelineState = serde_json::from_str(&content)?;
        info!(
            "Loaded timeline {} ({} tracks, {} effects)",
            path.display(),
            state.tracks.len(),
            state.effects.len()
        );
        Ok(Self::from_state(state))
    }

    /// Writes the document state atomically.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        atomic_write_json_pretty(path, &self.state)?;
        debug!("Saved timeline {}", path.display());
        Ok(())
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Selects an effect by id, or clears the selection.
    pub fn select(&mut self, effect_id: Option<&str>) -> CoreResult<()> {
        if let Some(id) = effect_id {
            if self.state.find_effect(id).is_none() {
                return Err(CoreError::EffectNotFound(id.to_string()));
            }
        }
        self.state.selected_effect_id = effect_id.map(str::to_string);
        Ok(())
    }

    pub fn set_playhead(&mut self, timecode: TimeMs) {
        self.state.playhead_ms = timecode.max(0);
    }

    /// Inserts a media clip directly, outside of the command history.
    pub fn insert_media(&mut self, effect: TimelineEffect) -> CoreResult<()> {
        if effect.track() >= self.state.tracks.len() {
            return Err(CoreError::TrackOutOfRange {
                track: effect.track(),
                track_count: self.state.tracks.len(),
            });
        }
        self.state.effects.push(effect);
        Ok(())
    }

    pub fn undo(&mut self) -> CoreResult<()> {
        self.executor.undo(&mut self.state)
    }

    pub fn redo(&mut self) -> CoreResult<CommandResult> {
        self.executor.redo(&mut self.state)
    }

    /// Text on one track as spans, ordered by start time (for SRT export).
    pub fn track_spans(&self, track: TrackIndex) -> CoreResult<Vec<Span>> {
        self.state
            .text_effects_on_track(track)
            .into_iter()
            .map(|e| Span::new(e.text.clone(), e.start_ms, e.end_ms()))
            .collect()
    }

    fn run(&mut self, command: impl Command + 'static) -> CoreResult<CommandResult> {
        self.executor.execute(Box::new(command), &mut self.state)
    }
}

impl TimelineHost for TimelineDocument {
    fn track_count(&self) -> usize {
        self.state.tracks.len()
    }

    fn effects(&self) -> Vec<EffectSummary> {
        self.state.summaries()
    }

    fn selected_effect(&self) -> Option<EffectSummary> {
        let id = self.state.selected_effect_id.as_deref()?;
        self.state.find_effect(id).map(TimelineEffect::summary)
    }

    fn add_track(&mut self) -> CoreResult<TrackIndex> {
        let name = format!("Track {}", self.state.tracks.len() + 1);
        self.run(AddTrackCommand::new(&name))?;
        Ok(self.state.tracks.len() - 1)
    }

    fn set_effect_track(&mut self, effect_id: &str, track: TrackIndex) -> CoreResult<()> {
        self.run(SetEffectTrackCommand::new(effect_id, track))?;
        Ok(())
    }

    fn add_text_effect(&mut self, effect: TextEffect) -> CoreResult<()> {
        self.run(AddTextEffectCommand::new(effect))?;
        Ok(())
    }

    fn set_text_property(&mut self, effect_id: &str, change: &TextPropertyChange) -> CoreResult<()> {
        self.run(SetTextPropertyCommand::new(effect_id, change.clone()))?;
        Ok(())
    }

    fn current_timecode(&self) -> TimeMs {
        self.state.playhead_ms
    }

    fn compose_at_timecode(&mut self, timecode: TimeMs) {
        self.state.last_composed_ms = Some(timecode);
        self.state.compose_count += 1;
    }
}
