//! Serializable commands and their results.

use crate::{
    ClockToken, FeedbackMode, GuessOutcome, ItemId, Move, SessionConfig, SessionState, SlotId,
    SubmitReport,
};
use serde::{Deserialize, Serialize};

/// A command from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "command", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    /// Start the loaded session.
    Start,
    /// Put an item into a slot, evicting any occupant to the bank.
    Place {
        /// Item to move.
        item: ItemId,
        /// Destination.
        slot: SlotId,
    },
    /// Put an item into a slot, exchanging it with the occupant.
    Swap {
        /// Item to move.
        item: ItemId,
        /// Destination.
        slot: SlotId,
    },
    /// Move a slot's occupant back to the bank.
    ReturnToBank {
        /// Slot to empty.
        slot: SlotId,
    },
    /// Revert the last move.
    Undo,
    /// Re-apply the last undone move.
    Redo,
    /// Judge the whole board.
    SubmitAll,
    /// Fill every slot correctly and end the session.
    SolveAll,
    /// Return to the freshly loaded state.
    Reset,
    /// Give up.
    End,
    /// Switch feedback mode.
    ToggleFeedback {
        /// `true` for immediate feedback.
        immediate: bool,
    },
    /// Guess a hangman letter.
    Guess {
        /// The letter.
        letter: char,
    },
    /// Select a term card.
    SelectTerm {
        /// The term card.
        item: ItemId,
    },
    /// Select a definition card.
    SelectDefinition {
        /// The definition card.
        slot: SlotId,
    },
    /// Re-derive one slot's correctness tag.
    EvaluateSingle {
        /// The slot.
        slot: SlotId,
    },
    /// Change the hangman wrong-guess budget for the next round.
    SetDifficulty {
        /// Wrong guesses that lose a round.
        max_wrong_guesses: u32,
    },
}

impl Command {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// What became of a placement, swap or match attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaceOutcome {
    /// The move was applied.
    Placed {
        /// The applied move.
        action: Move,
    },
    /// Nothing to do (e.g. dropped onto its own slot).
    Unchanged,
    /// Refused by immediate feedback.
    Rejected,
    /// A matching pair was found.
    Matched {
        /// Term card.
        item: ItemId,
        /// Definition card.
        slot: SlotId,
    },
    /// A matching attempt failed.
    Mismatched {
        /// Term card.
        item: ItemId,
        /// Definition card.
        slot: SlotId,
    },
    /// A card was selected; waiting for the other side.
    Selected,
    /// The card is already matched.
    Ignored,
}

/// Result of [`crate::SessionController::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandStatus {
    /// The session started.
    Started {
        /// Token ticks must carry.
        token: ClockToken,
    },
    /// Result of a placement-type command.
    Placement {
        /// What happened.
        outcome: PlaceOutcome,
    },
    /// Result of undo/redo; `None` when there was nothing to do.
    History {
        /// The reverted or re-applied move.
        action: Option<Move>,
    },
    /// Board judgement.
    Submitted {
        /// Per-board counts.
        report: SubmitReport,
    },
    /// Result of a guess.
    Guessed {
        /// What happened.
        outcome: GuessOutcome,
    },
    /// Slot correctness, `None` for an empty slot or hidden tags.
    Evaluated {
        /// The tag.
        correct: Option<bool>,
    },
    /// Feedback mode now in force.
    Feedback {
        /// The mode.
        mode: FeedbackMode,
    },
    /// Configuration for the next round.
    Configured {
        /// The configuration now stored.
        config: SessionConfig,
    },
    /// The session is now in `state`.
    Transitioned {
        /// New state.
        state: SessionState,
    },
}
