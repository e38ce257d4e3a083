//! Text Commands Module
//!
//! Registering text effects and changing their style one property at a time.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, StateChange},
    text::TextPropertyChange,
    timeline::{TextEffect, TimelineEffect, TimelineState},
    CoreError, CoreResult, EffectId,
};

// =============================================================================
// AddTextEffectCommand
// =============================================================================

/// Registers a fully specified text effect
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTextEffectCommand {
    pub effect: TextEffect,
}

impl AddTextEffectCommand {
    pub fn new(effect: TextEffect) -> Self {
        Self { effect }
    }
}

impl Command for AddTextEffectCommand {
    fn execute(&mut self, state: &mut TimelineState) -> CoreResult<CommandResult> {
        let track_count = state.tracks.len();
        if self.effect.track >= track_count {
            return Err(CoreError::TrackOutOfRange {
                track: self.effect.track,
                track_count,
            });
        }
        if self.effect.duration_ms <= 0 || self.effect.start_ms < 0 {
            return Err(CoreError::InvalidSpan {
                start_ms: self.effect.start_ms,
                end_ms: self.effect.end_ms(),
                reason: "text effect needs a non-negative start and positive duration",
            });
        }
        if state.find_effect(&self.effect.id).is_some() {
            return Err(CoreError::ValidationError(format!(
                "Effect {} already exists",
                self.effect.id
            )));
        }

        state.effects.push(TimelineEffect::Text(self.effect.clone()));

        Ok(CommandResult::new()
            .with_change(StateChange::EffectCreated {
                effect_id: self.effect.id.clone(),
            })
            .with_created_id(&self.effect.id))
    }

    fn undo(&self, state: &mut TimelineState) -> CoreResult<()> {
        state.effects.retain(|e| e.id() != self.effect.id);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "AddTextEffect"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "effectId": self.effect.id,
            "track": self.effect.track,
            "startMs": self.effect.start_ms,
            "durationMs": self.effect.duration_ms,
        })
    }
}

// =============================================================================
// SetTextPropertyCommand
// =============================================================================

/// Sets a single style property on a text effect
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTextPropertyCommand {
    pub effect_id: EffectId,
    pub change: TextPropertyChange,
    /// Value before the change (for undo)
    #[serde(skip)]
    previous: Option<TextPropertyChange>,
}

impl SetTextPropertyCommand {
    pub fn new(effect_id: &str, change: TextPropertyChange) -> Self {
        Self {
            effect_id: effect_id.to_string(),
            change,
            previous: None,
        }
    }
}

impl Command for SetTextPropertyCommand {
    fn execute(&mut self, state: &mut TimelineState) -> CoreResult<CommandResult> {
        self.change.validate()?;

        let effect = state.text_effect_mut(&self.effect_id)?;
        self.previous = Some(self.change.inverse_from(&effect.style, &effect.shadow));
        self.change.apply_to(&mut effect.style, &mut effect.shadow);

        Ok(CommandResult::new().with_change(StateChange::EffectModified {
            effect_id: self.effect_id.clone(),
            property: self.change.name().to_string(),
        }))
    }

    fn undo(&self, state: &mut TimelineState) -> CoreResult<()> {
        if let Some(previous) = &self.previous {
            let effect = state.text_effect_mut(&self.effect_id)?;
            previous.apply_to(&mut effect.style, &mut effect.shadow);
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "SetTextProperty"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}
