//! Fill-in-the-blank board: words from a bank dropped into definition blanks.

use crate::{
    EngineError, FeedbackMode, ItemBank, ItemId, Move, PlacementState, SlotId, shuffle,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Board judgement produced by a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReport {
    /// Slots holding a correct word.
    pub correct: Vec<SlotId>,
    /// Slots holding a wrong word.
    pub wrong: Vec<SlotId>,
    /// Number of blanks.
    pub total: usize,
}

impl SubmitReport {
    /// Whether every blank holds a correct word.
    pub fn all_correct(&self) -> bool {
        self.correct.len() == self.total
    }

    /// Number of filled blanks.
    pub fn filled(&self) -> usize {
        self.correct.len() + self.wrong.len()
    }
}

/// Result of trying a placement on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Attempt {
    /// The item was already there.
    Unchanged,
    /// Immediate feedback refused the move; the board is untouched.
    Rejected,
    /// The move was applied and earned `awards` acceptance bonuses.
    Applied { action: Move, awards: usize },
}

/// Placement state plus the fill-in-blank scoring bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillBlankBoard {
    placement: PlacementState,
    settled: BTreeSet<SlotId>,
    submitted: bool,
}

impl FillBlankBoard {
    /// Lays out one word and one blank per entry, with the bank shuffled.
    #[instrument(skip_all, fields(entries = bank.len()))]
    pub fn new<R: Rng + ?Sized>(bank: &ItemBank, rng: &mut R) -> Self {
        let (items, slots) = bank.fill_blank_layout();
        let mut order: Vec<ItemId> = items.iter().map(|i| *i.id()).collect();
        shuffle(&mut order, rng);
        Self {
            placement: PlacementState::new(items, slots).with_bank_order(order),
            settled: BTreeSet::new(),
            submitted: false,
        }
    }

    /// Current occupancy.
    pub fn placement(&self) -> &PlacementState {
        &self.placement
    }

    pub(crate) fn placement_mut(&mut self) -> &mut PlacementState {
        &mut self.placement
    }

    /// Whether the slot has already earned its points.
    pub fn is_settled(&self, slot: SlotId) -> bool {
        self.settled.contains(&slot)
    }

    /// Whether the board was submitted; the score no longer changes.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Tries a placement (or a swap) under the given feedback mode.
    ///
    /// Under immediate feedback the move is applied to a copy first; if any
    /// slot it fills would hold a wrong word the copy is thrown away, and
    /// each slot earns its bonus the first time it is filled correctly.
    /// On-submit drops are not judged; every accepted one earns a bonus.
    #[instrument(skip(self))]
    pub(crate) fn attempt(
        &mut self,
        item: ItemId,
        slot: SlotId,
        swap: bool,
        feedback: FeedbackMode,
        lock_correct: bool,
    ) -> Result<Attempt, EngineError> {
        let mut trial = self.placement.clone();
        let action = if swap {
            trial.swap(item, slot)?
        } else {
            trial.place(item, slot)?
        };
        let Some(action) = action else {
            return Ok(Attempt::Unchanged);
        };

        let awards = match feedback {
            FeedbackMode::OnSubmit => 1,
            FeedbackMode::Immediate => {
                if action.filled_slots().any(|s| !trial.is_correct(s)) {
                    debug!(%action, "Rejected wrong drop");
                    return Ok(Attempt::Rejected);
                }
                let mut awards = 0;
                for filled in action.filled_slots() {
                    if self.settled.insert(filled) {
                        awards += 1;
                    }
                    if lock_correct {
                        trial.lock(filled)?;
                    }
                }
                awards
            }
        };
        self.placement = trial;
        Ok(Attempt::Applied { action, awards })
    }

    /// Marks a correct slot as settled. Returns `true` the first time only.
    pub(crate) fn settle(&mut self, slot: SlotId) -> bool {
        self.placement.is_correct(slot) && self.settled.insert(slot)
    }

    /// Re-locks settled slots that hold a correct word again, e.g. after
    /// an undo moved them.
    pub(crate) fn relock(&mut self) {
        for slot in self.settled.iter().copied() {
            if self.placement.is_correct(slot) && !self.placement.is_locked(slot) {
                let _ = self.placement.lock(slot);
            }
        }
    }

    /// Judges every filled slot. From now on the score is frozen.
    #[instrument(skip(self))]
    pub(crate) fn submit(&mut self) -> SubmitReport {
        let mut report = SubmitReport {
            correct: Vec::new(),
            wrong: Vec::new(),
            total: self.placement.slots().len(),
        };
        for slot in self.placement.slots().iter().map(|s| *s.id()) {
            match self.placement.tag(slot) {
                Some(true) => report.correct.push(slot),
                Some(false) => report.wrong.push(slot),
                None => {}
            }
        }
        self.submitted = true;
        report
    }

    /// Fills every blank correctly and locks the board.
    pub(crate) fn solve(&mut self) -> Vec<SlotId> {
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

    fn board() -> FillBlankBoard {
        let chapter = Chapter::new(
            "1",
            vec![
                TermDefinition::new("A", "first letter"),
                TermDefinition::new("B", "second letter"),
            ],
        );
        FillBlankBoard::new(&ItemBank::load(&chapter), &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_bank_lists_every_word_once() {
        let board = board();
        let mut bank = board.placement().bank_items();
        bank.sort();
        assert_eq!(bank, vec![ItemId(0), ItemId(1)]);
    }

    #[test]
    fn test_immediate_rejects_wrong_drop() {
        let mut board = board();
        let before = board.clone();
        let attempt = board
            .attempt(ItemId(0), SlotId(1), false, FeedbackMode::Immediate, false)
            .unwrap();
        assert_eq!(attempt, Attempt::Rejected);
        assert_eq!(board, before);
    }

    #[test]
    fn test_immediate_settles_once() {
        let mut board = board();
        let first = board
            .attempt(ItemId(0), SlotId(0), false, FeedbackMode::Immediate, false)
            .unwrap();
        assert!(matches!(first, Attempt::Applied { awards: 1, .. }));

        board.placement_mut().clear(SlotId(0)).unwrap();
        let again = board
            .attempt(ItemId(0), SlotId(0), false, FeedbackMode::Immediate, false)
            .unwrap();
        assert!(matches!(again, Attempt::Applied { awards: 0, .. }));
    }

    #[test]
    fn test_swap_rejected_when_displaced_lands_wrong() {
        let mut board = board();
        board
            .attempt(ItemId(0), SlotId(1), false, FeedbackMode::OnSubmit, false)
            .unwrap();
        board
            .attempt(ItemId(1), SlotId(0), false, FeedbackMode::OnSubmit, false)
            .unwrap();
        // Moving B from slot 0 to slot 1 would put A into slot 0: both right.
        let swap = board
            .attempt(ItemId(1), SlotId(1), true, FeedbackMode::Immediate, false)
            .unwrap();
        assert!(matches!(swap, Attempt::Applied { awards: 2, .. }));
        assert!(board.placement().all_correct());
    }

    #[test]
    fn test_lock_correct_locks_settled_slot() {
        let mut board = board();
        board
            .attempt(ItemId(0), SlotId(0), false, FeedbackMode::Immediate, true)
            .unwrap();
        assert!(board.placement().is_locked(SlotId(0)));
    }

    #[test]
    fn test_on_submit_drop_earns_bonus_even_when_wrong() {
        let mut board = board();
        let attempt = board
            .attempt(ItemId(1), SlotId(0), false, FeedbackMode::OnSubmit, false)
            .unwrap();
        assert!(matches!(attempt, Attempt::Applied { awards: 1, .. }));
        assert!(!board.is_settled(SlotId(0)));
    }

    #[test]
    fn test_submit_reports_filled_slots() {
        let mut board = board();
        board
            .attempt(ItemId(0), SlotId(0), false, FeedbackMode::OnSubmit, false)
            .unwrap();
        let report = board.submit();
        assert_eq!(report.correct, vec![SlotId(0)]);
        assert!(report.wrong.is_empty());
        assert_eq!(report.filled(), 1);
        assert!(!report.all_correct());
        assert!(board.is_submitted());
    }
}
