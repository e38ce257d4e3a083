//! Command Trait Definition
//!
//! Defines the trait that all timeline document commands implement.

use serde::{Deserialize, Serialize};

use crate::core::{timeline::TimelineState, CoreResult, OpId};

/// Command execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Generated Operation ID
    pub op_id: OpId,

    /// List of state changes
    pub changes: Vec<StateChange>,

    /// Newly created IDs (effects, tracks)
    pub created_ids: Vec<String>,
}

impl CommandResult {
    /// Creates a new empty command result with a fresh operation ID
    pub fn new() -> Self {
        Self {
            op_id: crate::core::new_id(),
            changes: vec![],
            created_ids: vec![],
        }
    }

    /// Adds a state change
    pub fn with_change(mut self, change: StateChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Adds a created ID
    pub fn with_created_id(mut self, id: &str) -> Self {
        self.created_ids.push(id.to_string());
        self
    }
}

impl Default for CommandResult {
    fn default() -> Self {
        Self::new()
    }
}

/// State change types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StateChange {
    TrackCreated { track_id: String, index: usize },
    EffectCreated { effect_id: String },
    EffectMoved { effect_id: String, from: usize, to: usize },
    EffectModified { effect_id: String, property: String },
}

/// Trait that all document commands implement
///
/// # Core Principles
/// - All document changes go through Commands.
/// - All Commands are undoable.
/// - On failure, `execute` leaves the state unchanged.
pub trait Command: Send + Sync {
    /// Execute the command, storing whatever `undo` needs.
    fn execute(&mut self, state: &mut TimelineState) -> CoreResult<CommandResult>;

    /// Inverse of `execute`. Only called after `execute` succeeded.
    fn undo(&self, state: &mut TimelineState) -> CoreResult<()>;

    /// Redo the command. Defaults to `execute`.
    fn redo(&mut self, state: &mut TimelineState) -> CoreResult<CommandResult> {
        self.execute(state)
    }

    /// Command type name, used for history and debugging.
    fn type_name(&self) -> &'static str;

    /// JSON form of the command parameters.
    fn to_json(&self) -> serde_json::Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_change_serialization() {
        let change = StateChange::EffectMoved {
            effect_id: "fx_01".to_string(),
            from: 0,
            to: 1,
        };
        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("effectMoved"));
    }

    #[test]
    fn test_command_result_builder() {
        let result = CommandResult::new()
            .with_change(StateChange::EffectCreated {
                effect_id: "fx_001".to_string(),
            })
            .with_created_id("fx_001");

        assert!(!result.op_id.is_empty());
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.created_ids, vec!["fx_001".to_string()]);
    }
}
