//! Events the engine queues for the presentation layer.

use crate::{ItemId, SessionState, SlotId};
use serde::{Deserialize, Serialize};

/// Something the presentation layer should re-render.
///
/// Events are queued in the order they happen and drained with
/// [`crate::SessionController::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A slot's occupant or correctness tag changed.
    PlacementChanged {
        /// The slot.
        slot: SlotId,
        /// Its occupant, if any.
        occupant: Option<ItemId>,
        /// Correctness tag; `None` when empty or while tags are hidden.
        correct: Option<bool>,
    },
    /// An immediate-feedback drop was refused.
    PlacementRejected {
        /// Item the player tried to drop.
        item: ItemId,
        /// Slot it was dropped on.
        slot: SlotId,
    },
    /// The running score changed.
    ScoreChanged {
        /// New score.
        score: u32,
    },
    /// The clock advanced (or was reset).
    TimeChanged {
        /// Elapsed seconds.
        seconds: u64,
    },
    /// The session moved to a new lifecycle state.
    SessionStateChanged {
        /// New state.
        state: SessionState,
    },
    /// Undo/redo availability changed.
    MoveHistoryChanged {
        /// Whether undo would do something.
        can_undo: bool,
        /// Whether redo would do something.
        can_redo: bool,
    },
    /// A hangman guess was applied.
    GuessResolved {
        /// The upper-cased letter.
        letter: char,
        /// Whether the word contains it.
        hit: bool,
        /// Wrong guesses so far.
        wrong_guesses: u32,
    },
    /// The hangman word was shown in full.
    WordRevealed {
        /// The word.
        word: String,
        /// Positions the player never guessed.
        missed: Vec<usize>,
    },
    /// The matching move counter changed.
    MovesChanged {
        /// Attempts made so far.
        moves: u32,
    },
    /// A chapter could not be played.
    LoadFailed {
        /// Message for the player.
        reason: String,
    },
}
