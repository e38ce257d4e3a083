//! Command Executor Module
//!
//! Handles command execution and undo/redo history.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::{
    commands::{Command, CommandResult},
    timeline::TimelineState,
    CoreError, CoreResult, OpId,
};

/// Entry in the undo/redo history
pub struct HistoryEntry {
    /// Operation ID
    pub op_id: OpId,
    /// Command that was executed
    pub command: Box<dyn Command>,
    /// Result from command execution
    pub result: CommandResult,
    /// Timestamp when command was executed
    pub timestamp: String,
}

impl std::fmt::Debug for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("op_id", &self.op_id)
            .field("type", &self.command.type_name())
            .field("result", &self.result)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl HistoryEntry {
    fn new(command: Box<dyn Command>, result: CommandResult) -> Self {
        Self {
            op_id: result.op_id.clone(),
            command,
            result,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Executes commands and manages undo/redo history
pub struct CommandExecutor {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    max_history_size: usize,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_history_size: 500,
        }
    }

    /// Sets the maximum history size
    pub fn with_max_history(mut self, size: usize) -> Self {
        self.max_history_size = size;
        self
    }

    /// Executes a command and adds it to history
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        state: &mut TimelineState,
    ) -> CoreResult<CommandResult> {
        let result = command.execute(state)?;
        debug!("Executed {} ({})", command.type_name(), command.to_json());

        self.redo_stack.clear();
        self.undo_stack.push_back(HistoryEntry::new(command, result.clone()));

        while self.undo_stack.len() > self.max_history_size {
            self.undo_stack.pop_front();
        }

        Ok(result)
    }

    /// Undoes the last command
    pub fn undo(&mut self, state: &mut TimelineState) -> CoreResult<()> {
        let entry = self.undo_stack.pop_back().ok_or(CoreError::NothingToUndo)?;
        entry.command.undo(state)?;
        self.redo_stack.push_back(entry);
        Ok(())
    }

    /// Redoes the last undone command
    pub fn redo(&mut self, state: &mut TimelineState) -> CoreResult<CommandResult> {
        let mut entry = self.redo_stack.pop_back().ok_or(CoreError::NothingToRedo)?;
        let result = entry.command.redo(state)?;

        entry.op_id = result.op_id.clone();
        entry.result = result.clone();
        entry.timestamp = chrono::Utc::now().to_rfc3339();
        self.undo_stack.push_back(entry);

        Ok(result)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clears all history (undo and redo)
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Gets the last executed command type name
    pub fn last_command_type(&self) -> Option<&'static str> {
        self.undo_stack.back().map(|e| e.command.type_name())
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("max_history_size", &self.max_history_size)
            .finish()
    }
}
