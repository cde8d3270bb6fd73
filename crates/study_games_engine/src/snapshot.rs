//! Read-only views of a session for rendering.

use crate::{
    FeedbackMode, FillBlankBoard, GameMode, HangmanBoard, ItemId, LetterCell, MatchingBoard,
    PlacementState, SessionState, SlotId,
};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A word or term card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    /// Item id.
    pub id: ItemId,
    /// Text on the item.
    pub text: String,
    /// Whether it sits in a slot.
    pub placed: bool,
}

/// A blank or definition card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// Slot id.
    pub id: SlotId,
    /// Definition text.
    pub prompt: String,
    /// Occupant, if any.
    pub occupant: Option<ItemView>,
    /// Correctness tag, when tags are shown.
    pub correct: Option<bool>,
    /// Whether the slot is locked.
    pub locked: bool,
}

/// Mode-specific board contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BoardView {
    /// Fill-in-the-blank.
    FillBlank {
        /// Words still in the bank, in bank order.
        bank: Vec<ItemView>,
        /// Blanks in order.
        slots: Vec<SlotView>,
        /// Whether the board was submitted.
        submitted: bool,
    },
    /// Hangman.
    Hangman {
        /// The word as the player sees it.
        cells: Vec<LetterCell>,
        /// The definition used as a hint.
        clue: String,
        /// Letters guessed, in order.
        guessed: Vec<char>,
        /// Wrong guesses so far.
        wrong_guesses: u32,
        /// Wrong guesses allowed.
        max_wrong_guesses: u32,
    },
    /// Matching cards.
    Matching {
        /// Term cards in display order.
        terms: Vec<ItemView>,
        /// Definition cards in display order.
        definitions: Vec<SlotView>,
        /// Selected term card.
        selected_term: Option<ItemId>,
        /// Selected definition card.
        selected_definition: Option<SlotId>,
        /// Attempts so far.
        moves: u32,
        /// Pairs matched.
        matched: usize,
        /// Pairs on the table.
        total: usize,
    },
}

/// Everything a presentation layer needs to draw a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionSnapshot {
    /// Lifecycle state.
    pub(crate) state: SessionState,
    /// Game mode.
    pub(crate) mode: GameMode,
    /// Feedback mode in force.
    pub(crate) feedback_mode: FeedbackMode,
    /// Current score.
    pub(crate) score: u32,
    /// Elapsed seconds.
    pub(crate) elapsed: u64,
    /// Whether undo would do something.
    pub(crate) can_undo: bool,
    /// Whether redo would do something.
    pub(crate) can_redo: bool,
    /// Board contents; `None` before a chapter is loaded.
    pub(crate) board: Option<BoardView>,
}

fn item_view(placement: &PlacementState, id: ItemId) -> Option<ItemView> {
    let item = placement.item(id)?;
    Some(ItemView {
        id,
        text: item.display_text().clone(),
        placed: placement.location(id).and_then(|c| c.slot()).is_some(),
    })
}

fn slot_view(placement: &PlacementState, id: SlotId, tags_visible: bool) -> Option<SlotView> {
    let slot = placement.slot(id)?;
    Some(SlotView {
        id,
        prompt: slot.prompt().clone(),
        occupant: placement.occupant(id).and_then(|item| item_view(placement, item)),
        correct: if tags_visible { placement.tag(id) } else { None },
        locked: placement.is_locked(id),
    })
}

impl FillBlankBoard {
    /// Renders the board; correctness tags only when `tags_visible`.
    pub fn view(&self, tags_visible: bool) -> BoardView {
        let placement = self.placement();
        BoardView::FillBlank {
            bank: placement
                .bank_items()
                .into_iter()
                .filter_map(|id| item_view(placement, id))
                .collect(),
            slots: placement
                .slots()
                .iter()
                .filter_map(|s| slot_view(placement, *s.id(), tags_visible))
                .collect(),
            submitted: self.is_submitted(),
        }
    }
}

impl HangmanBoard {
    /// Renders the board.
    pub fn view(&self) -> BoardView {
        BoardView::Hangman {
            cells: self.cells(),
            clue: self.clue().to_string(),
            guessed: self.guessed().to_vec(),
            wrong_guesses: self.wrong_guesses(),
            max_wrong_guesses: self.max_wrong_guesses(),
        }
    }
}

impl MatchingBoard {
    /// Renders the board.
    pub fn view(&self) -> BoardView {
        let placement = self.placement();
        BoardView::Matching {
            terms: self
                .term_order()
                .iter()
                .filter_map(|id| item_view(placement, *id))
                .collect(),
            definitions: self
                .definition_order()
                .iter()
                .filter_map(|id| slot_view(placement, *id, true))
                .collect(),
            selected_term: self.selected_term(),
            selected_definition: self.selected_definition(),
            moves: self.moves(),
            matched: self.matched_pairs(),
            total: self.total_pairs(),
        }
    }
}
