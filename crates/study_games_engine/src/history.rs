//! Reversible moves and the undo/redo log.
//!
//! Moves are first-class records of one placement transition. They can be
//! reverted (undo) and re-applied (redo) against a [`PlacementState`].

use crate::{Container, EngineError, ItemId, PlacementState, SlotId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// An occupant pushed out of a slot by a move, and where it went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Displaced {
    /// The item that was in the target slot.
    pub item: ItemId,
    /// Where it ended up: the bank for a plain placement, the mover's
    /// origin for a swap.
    pub to: Container,
}

/// One recorded placement or swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The item the player moved.
    pub item: ItemId,
    /// Where it came from.
    pub from: Container,
    /// Where it went.
    pub to: Container,
    /// The previous occupant of `to`, if any.
    pub displaced: Option<Displaced>,
}

impl Move {
    /// Slots that hold a (possibly new) occupant after this move.
    pub fn filled_slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.to
            .slot()
            .into_iter()
            .chain(self.displaced.and_then(|d| d.to.slot()))
    }

    /// Every slot whose occupancy this move changes.
    pub fn touched_slots(&self) -> Vec<SlotId> {
        let mut slots: Vec<SlotId> = [
            self.from.slot(),
            self.to.slot(),
            self.displaced.and_then(|d| d.to.slot()),
        ]
        .into_iter()
        .flatten()
        .collect();
        slots.sort_unstable();
        slots.dedup();
        slots
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.item, self.from, self.to)?;
        if let Some(displaced) = self.displaced {
            write!(f, " ({} -> {})", displaced.item, displaced.to)?;
        }
        Ok(())
    }
}

/// Undo/redo stacks of moves.
///
/// A disabled log ignores every record; modes whose actions are terminal
/// (matching) or append-only (hangman) run with a disabled log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveLog {
    enabled: bool,
    undo: Vec<Move>,
    redo: Vec<Move>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// Whether moves are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records a new move. Invalidates everything that was undone.
    #[instrument(skip(self), fields(%action))]
    pub fn record(&mut self, action: Move) {
        if !self.enabled {
            return;
        }
        self.undo.push(action);
        self.redo.clear();
    }

    /// Reverts the most recent move.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. A move that no
    /// longer matches the board is dropped and reported as
    /// [`EngineError::HistoryCorruption`]; the board is left untouched.
    #[instrument(skip(self, state))]
    pub fn undo(&mut self, state: &mut PlacementState) -> Result<Option<Move>, EngineError> {
        let Some(action) = self.undo.pop() else {
            debug!("Nothing to undo");
            return Ok(None);
        };
        match state.revert(&action) {
            Ok(()) => {
                self.redo.push(action);
                Ok(Some(action))
            }
            Err(e) => {
                error!(%action, error = %e, "Dropping move that no longer applies");
                Err(EngineError::HistoryCorruption(format!("undo {}: {}", action, e)))
            }
        }
    }

    /// Re-applies the most recently undone move.
    #[instrument(skip(self, state))]
    pub fn redo(&mut self, state: &mut PlacementState) -> Result<Option<Move>, EngineError> {
        let Some(action) = self.redo.pop() else {
            debug!("Nothing to redo");
            return Ok(None);
        };
        match state.reapply(&action) {
            Ok(()) => {
                self.undo.push(action);
                Ok(Some(action))
            }
            Err(e) => {
                error!(%action, error = %e, "Dropping move that no longer applies");
                Err(EngineError::HistoryCorruption(format!("redo {}: {}", action, e)))
            }
        }
    }

    /// Forgets all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Whether `undo` would do anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether `redo` would do anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Recorded moves, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.undo
    }
}
