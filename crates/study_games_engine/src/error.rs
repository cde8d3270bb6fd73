//! Errors returned by engine commands.

use crate::{GameMode, SessionState, SlotId};

/// Error that can occur when executing a session command.
///
/// None of these are fatal: the session stays usable after every one of
/// them. Only [`EngineError::EmptyItemSet`] is meant to reach the player;
/// the others are developer-facing diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// The chapter has no entry with both a term and a definition.
    #[display("Chapter has no usable term/definition pairs")]
    EmptyItemSet,

    /// A command referenced an unknown item, slot or card.
    #[display("Invalid target: {}", _0)]
    InvalidTarget(String),

    /// The command is not accepted in the current session state.
    #[display("Cannot {} while session is {}", command, state)]
    IllegalStateTransition {
        /// Name of the rejected command.
        command: &'static str,
        /// State the session was in.
        state: SessionState,
    },

    /// The command has no meaning for the session's game mode.
    #[display("{} is not supported in {} mode", command, mode)]
    Unsupported {
        /// Name of the rejected command.
        command: &'static str,
        /// Mode of the session.
        mode: GameMode,
    },

    /// An undo/redo entry no longer matches the board; it was dropped.
    #[display("History corruption: {}", _0)]
    HistoryCorruption(String),

    /// The slot holds a settled answer and cannot be changed.
    #[display("{} is locked", _0)]
    SlotLocked(SlotId),

    /// The character cannot be guessed in hangman.
    #[display("'{}' is not a guessable character", _0)]
    InvalidGuess(char),

    /// A state invariant failed after a transition.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for EngineError {}
