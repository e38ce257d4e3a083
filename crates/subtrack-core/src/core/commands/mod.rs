//! Commands Module
//!
//! Every mutation of a `TimelineDocument` is a `Command` executed through
//! the `CommandExecutor`, which keeps undo/redo history.

mod executor;
mod text;
mod track;
mod traits;

pub use executor::{CommandExecutor, HistoryEntry};
pub use text::{AddTextEffectCommand, SetTextPropertyCommand};
pub use track::{AddTrackCommand, SetEffectTrackCommand};
pub use traits::{Command, CommandResult, StateChange};
