//! Matching-cards board: pair term cards with definition cards.
//!
//! Term cards are the items and definition cards the slots of a
//! [`PlacementState`]. A successful match places the term into its
//! definition and locks it there for good.

use crate::{Container, EngineError, ItemBank, ItemId, PlacementState, SlotId, shuffle};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Result of pairing a term card with a definition card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The cards belong together and are now matched.
    Matched,
    /// The cards do not belong together.
    Mismatched,
    /// One of the cards is already matched; the attempt did not count.
    AlreadyMatched,
}

/// Where a card selection left the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    /// The card is matched; selecting it does nothing.
    Ignored,
    /// Waiting for a card from the other side.
    Pending,
    /// One card of each side is selected; the selection was cleared.
    Pair(ItemId, SlotId),
}

/// Cards, their matches, the current selection and the move counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchingBoard {
    placement: PlacementState,
    definition_order: Vec<SlotId>,
    selected_term: Option<ItemId>,
    selected_definition: Option<SlotId>,
    moves: u32,
}

impl MatchingBoard {
    /// Deals one term card and one definition card per entry, each side
    /// shuffled on its own.
    #[instrument(skip_all, fields(pairs = bank.len()))]
    pub fn new<R: Rng + ?Sized>(bank: &ItemBank, rng: &mut R) -> Self {
        let (items, slots) = bank.matching_layout();
        let mut terms: Vec<ItemId> = items.iter().map(|i| *i.id()).collect();
        let mut definitions: Vec<SlotId> = slots.iter().map(|s| *s.id()).collect();
        shuffle(&mut terms, rng);
        shuffle(&mut definitions, rng);
        Self {
            placement: PlacementState::new(items, slots).with_bank_order(terms),
            definition_order: definitions,
            selected_term: None,
            selected_definition: None,
            moves: 0,
        }
    }

    /// Card occupancy: a matched term sits in its definition.
    pub fn placement(&self) -> &PlacementState {
        &self.placement
    }

    /// Term cards in display order.
    pub fn term_order(&self) -> &[ItemId] {
        self.placement.bank_order()
    }

    /// Definition cards in display order.
    pub fn definition_order(&self) -> &[SlotId] {
        &self.definition_order
    }

    /// Currently selected term card.
    pub fn selected_term(&self) -> Option<ItemId> {
        self.selected_term
    }

    /// Currently selected definition card.
    pub fn selected_definition(&self) -> Option<SlotId> {
        self.selected_definition
    }

    /// Attempts made so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Pairs matched so far.
    pub fn matched_pairs(&self) -> usize {
        self.placement.filled_count()
    }

    /// Pairs on the table.
    pub fn total_pairs(&self) -> usize {
        self.placement.slots().len()
    }

    /// Whether every pair is matched.
    pub fn is_complete(&self) -> bool {
        self.matched_pairs() == self.total_pairs()
    }

    /// Whether a term card is already matched.
    pub fn is_term_matched(&self, item: ItemId) -> bool {
        matches!(self.placement.location(item), Some(Container::Slot(_)))
    }

    /// Pairs a term card with a definition card.
    ///
    /// Every attempt on two unmatched cards counts as a move.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidTarget`] for an unknown card.
    #[instrument(skip(self))]
    pub fn attempt(&mut self, item: ItemId, slot: SlotId) -> Result<MatchOutcome, EngineError> {
        let Some(term) = self.placement.item(item) else {
            return Err(EngineError::InvalidTarget(format!("unknown {}", item)));
        };
        let Some(definition) = self.placement.slot(slot) else {
            return Err(EngineError::InvalidTarget(format!("unknown {}", slot)));
        };
        if self.is_term_matched(item) || self.placement.occupant(slot).is_some() {
            debug!(%item, %slot, "Card already matched");
            return Ok(MatchOutcome::AlreadyMatched);
        }

        let matches = term.answers(definition);
        self.moves += 1;
        if !matches {
            return Ok(MatchOutcome::Mismatched);
        }
        self.placement.place(item, slot)?;
        self.placement.lock(slot)?;
        Ok(MatchOutcome::Matched)
    }

    /// Selects a term card, replacing any earlier term selection.
    pub(crate) fn select_term(&mut self, item: ItemId) -> Result<Selection, EngineError> {
        if self.placement.item(item).is_none() {
            return Err(EngineError::InvalidTarget(format!("unknown {}", item)));
        }
        if self.is_term_matched(item) {
            return Ok(Selection::Ignored);
        }
        self.selected_term = Some(item);
        Ok(self.take_pair())
    }

    /// Selects a definition card, replacing any earlier definition selection.
    pub(crate) fn select_definition(&mut self, slot: SlotId) -> Result<Selection, EngineError> {
        if self.placement.slot(slot).is_none() {
            return Err(EngineError::InvalidTarget(format!("unknown {}", slot)));
        }
        if self.placement.occupant(slot).is_some() {
            return Ok(Selection::Ignored);
        }
        self.selected_definition = Some(slot);
        Ok(self.take_pair())
    }

    fn take_pair(&mut self) -> Selection {
        match (self.selected_term, self.selected_definition) {
            (Some(item), Some(slot)) => {
                self.clear_selection();
                Selection::Pair(item, slot)
            }
            _ => Selection::Pending,
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_term = None;
        self.selected_definition = None;
    }

    /// Matches every remaining pair and zeroes the move counter.
    pub(crate) fn solve(&mut self) -> Vec<SlotId> {
        self.clear_selection();
        self.moves = 0;
        let unsolved = self.placement.solve();
        self.placement.lock_all();
        unsolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Chapter, TermDefinition};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board() -> MatchingBoard {
        let chapter = Chapter::new(
            "1",
            vec![
                TermDefinition::new("Dog", "barks"),
                TermDefinition::new("Cat", "meows"),
                TermDefinition::new("Cow", "moos"),
            ],
        );
        MatchingBoard::new(&ItemBank::load(&chapter), &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_every_attempt_counts() {
        let mut board = board();
        assert_eq!(board.attempt(ItemId(0), SlotId(1)), Ok(MatchOutcome::Mismatched));
        assert_eq!(board.attempt(ItemId(0), SlotId(0)), Ok(MatchOutcome::Matched));
        assert_eq!(board.moves(), 2);
        assert!(board.placement().is_locked(SlotId(0)));
    }

    #[test]
    fn test_matched_cards_are_ignored() {
        let mut board = board();
        board.attempt(ItemId(1), SlotId(1)).unwrap();
        assert_eq!(board.attempt(ItemId(1), SlotId(2)), Ok(MatchOutcome::AlreadyMatched));
        assert_eq!(board.select_term(ItemId(1)), Ok(Selection::Ignored));
        assert_eq!(board.select_definition(SlotId(1)), Ok(Selection::Ignored));
        assert_eq!(board.moves(), 1);
    }

    #[test]
    fn test_selection_pairs_in_either_order() {
        let mut board = board();
        assert_eq!(board.select_definition(SlotId(2)), Ok(Selection::Pending));
        assert_eq!(board.select_term(ItemId(2)), Ok(Selection::Pair(ItemId(2), SlotId(2))));
        assert_eq!(board.selected_term(), None);
        assert_eq!(board.selected_definition(), None);
    }

    #[test]
    fn test_solve_matches_everything() {
        let mut board = board();
        board.attempt(ItemId(0), SlotId(2)).unwrap();
        board.solve();
        assert!(board.is_complete());
        assert_eq!(board.moves(), 0);
    }
}
