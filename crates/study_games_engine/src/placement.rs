//! Slot occupancy and its transactional mutations.

use crate::contracts::{Contract, PlacementContract, PlacementRequest};
use crate::history::{Displaced, Move};
use crate::{Container, EngineError, Item, ItemId, Slot, SlotId};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// Which item sits in which slot at one point in time.
///
/// Occupancy is tracked from both sides (slot -> occupant and
/// item -> container) and every mutation updates both in one step, so an
/// item never has two homes or none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementState {
    pub(crate) items: Vec<Item>,
    pub(crate) slots: Vec<Slot>,
    pub(crate) bank_order: Vec<ItemId>,
    pub(crate) occupants: Vec<Option<ItemId>>,
    pub(crate) locations: Vec<Container>,
    pub(crate) locked: BTreeSet<SlotId>,
}

impl PlacementState {
    /// Creates a board with every item in the bank and every slot empty.
    ///
    /// Item and slot ids must equal their position in the given vectors,
    /// which is how [`crate::ItemBank`] lays them out.
    #[instrument(skip_all, fields(items = items.len(), slots = slots.len()))]
    pub fn new(items: Vec<Item>, slots: Vec<Slot>) -> Self {
        debug_assert!(items.iter().enumerate().all(|(n, i)| i.id().index() == n));
        debug_assert!(slots.iter().enumerate().all(|(n, s)| s.id().index() == n));
        let bank_order = items.iter().map(|i| *i.id()).collect();
        Self {
            occupants: vec![None; slots.len()],
            locations: vec![Container::Bank; items.len()],
            locked: BTreeSet::new(),
            bank_order,
            items,
            slots,
        }
    }

    /// Sets the order the bank lists its items in.
    pub fn with_bank_order(mut self, order: Vec<ItemId>) -> Self {
        debug_assert_eq!(order.len(), self.items.len());
        self.bank_order = order;
        self
    }

    /// Looks an item up.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    /// Looks a slot up.
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    /// All items in id order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// All slots in id order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Where an item currently is.
    pub fn location(&self, id: ItemId) -> Option<Container> {
        self.locations.get(id.index()).copied()
    }

    /// Current occupant of a slot (`None` for an empty or unknown slot).
    pub fn occupant(&self, id: SlotId) -> Option<ItemId> {
        self.occupants.get(id.index()).copied().flatten()
    }

    /// Every item in bank display order, wherever it is now.
    pub fn bank_order(&self) -> &[ItemId] {
        &self.bank_order
    }

    /// Items currently in the bank, in bank display order.
    pub fn bank_items(&self) -> Vec<ItemId> {
        self.bank_order
            .iter()
            .copied()
            .filter(|id| self.location(*id) == Some(Container::Bank))
            .collect()
    }

    /// Places `item` into `slot`.
    ///
    /// A previous occupant is evicted to the bank. Placing an item onto the
    /// slot it already occupies changes nothing and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidTarget`] for an unknown item or slot and
    /// [`EngineError::SlotLocked`] when either end of the move is locked.
    #[instrument(skip(self))]
    pub fn place(&mut self, item: ItemId, slot: SlotId) -> Result<Option<Move>, EngineError> {
        self.relocate(item, slot, |_| Container::Bank)
    }

    /// Places `item` into `slot`, sending any occupant to `item`'s origin.
    ///
    /// Both items change containers in one step.
    #[instrument(skip(self))]
    pub fn swap(&mut self, item: ItemId, slot: SlotId) -> Result<Option<Move>, EngineError> {
        self.relocate(item, slot, |from| from)
    }

    fn relocate(
        &mut self,
        item: ItemId,
        slot: SlotId,
        evict_to: impl Fn(Container) -> Container,
    ) -> Result<Option<Move>, EngineError> {
        PlacementContract::pre(self, &PlacementRequest::new(item, slot))?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let from = self.locations[item.index()];
        let to = Container::Slot(slot);
        if from == to {
            debug!(%item, %slot, "Dropped onto its own slot");
            return Ok(None);
        }

        let displaced = self.occupant(slot).map(|previous| Displaced {
            item: previous,
            to: evict_to(from),
        });
        let action = Move {
            item,
            from,
            to,
            displaced,
        };
        self.reapply(&action)?;

        #[cfg(debug_assertions)]
        PlacementContract::post(&before, self)?;

        debug!(%action, "Placement applied");
        Ok(Some(action))
    }

    /// Moves the occupant of `slot` back to the bank.
    ///
    /// Returns `Ok(None)` if the slot was already empty.
    #[instrument(skip(self))]
    pub fn return_to_bank(&mut self, slot: SlotId) -> Result<Option<Move>, EngineError> {
        if self.slot(slot).is_none() {
            return Err(EngineError::InvalidTarget(format!("unknown {}", slot)));
        }
        if self.is_locked(slot) {
            return Err(EngineError::SlotLocked(slot));
        }
        let Some(item) = self.occupant(slot) else {
            return Ok(None);
        };
        let action = Move {
            item,
            from: Container::Slot(slot),
            to: Container::Bank,
            displaced: None,
        };
        self.reapply(&action)?;
        Ok(Some(action))
    }

    /// Empties a slot, returning its former occupant.
    pub fn clear(&mut self, slot: SlotId) -> Result<Option<ItemId>, EngineError> {
        Ok(self.return_to_bank(slot)?.map(|action| action.item))
    }

    /// Whether the slot's occupant carries the slot's expected key.
    ///
    /// False for an empty or unknown slot.
    pub fn is_correct(&self, slot: SlotId) -> bool {
        self.tag(slot).unwrap_or(false)
    }

    /// Correctness of the slot's occupant, or `None` if it is empty.
    pub fn tag(&self, slot: SlotId) -> Option<bool> {
        let target = self.slot(slot)?;
        let occupant = self.item(self.occupant(slot)?)?;
        Some(occupant.answers(target))
    }

    /// Whether every slot holds an item.
    pub fn all_filled(&self) -> bool {
        self.occupants.iter().all(Option::is_some)
    }

    /// Whether every slot holds a correct item.
    pub fn all_correct(&self) -> bool {
        self.slots.iter().all(|s| self.is_correct(*s.id()))
    }

    /// Number of occupied slots.
    pub fn filled_count(&self) -> usize {
        self.occupants.iter().filter(|o| o.is_some()).count()
    }

    /// Number of correctly occupied slots.
    pub fn correct_count(&self) -> usize {
        self.slots.iter().filter(|s| self.is_correct(*s.id())).count()
    }

    /// Whether user placements may no longer touch this slot.
    pub fn is_locked(&self, slot: SlotId) -> bool {
        self.locked.contains(&slot)
    }

    /// Locks an occupied slot.
    pub fn lock(&mut self, slot: SlotId) -> Result<(), EngineError> {
        if self.occupant(slot).is_none() {
            return Err(EngineError::InvalidTarget(format!("cannot lock empty {}", slot)));
        }
        self.locked.insert(slot);
        Ok(())
    }

    /// Unlocks a slot. Unlocking an unlocked slot is a no-op.
    pub fn unlock(&mut self, slot: SlotId) {
        self.locked.remove(&slot);
    }

    /// Locks every occupied slot.
    pub fn lock_all(&mut self) {
        self.locked = self
            .slots
            .iter()
            .map(|s| *s.id())
            .filter(|id| self.occupant(*id).is_some())
            .collect();
    }

    /// Fills every slot with a correct item, deterministically.
    ///
    /// Slots are filled in id order, each taking the lowest-id unused item
    /// that answers it. Returns the slots no item could answer.
    #[instrument(skip(self))]
    pub fn solve(&mut self) -> Vec<SlotId> {
        self.locations.fill(Container::Bank);
        self.occupants.fill(None);
        self.locked.clear();

        let mut used = vec![false; self.items.len()];
        let mut unsolved = Vec::new();
        for slot in &self.slots {
            let candidate = self
                .items
                .iter()
                .find(|item| !used[item.id().index()] && item.answers(slot));
            match candidate {
                Some(item) => {
                    let id = *item.id();
                    used[id.index()] = true;
                    self.occupants[slot.id().index()] = Some(id);
                    self.locations[id.index()] = Container::Slot(*slot.id());
                }
                None => unsolved.push(*slot.id()),
            }
        }
        if !unsolved.is_empty() {
            warn!(?unsolved, "No item answers some slots");
        }
        unsolved
    }

    /// Re-applies a move: its item goes `from -> to` and any displaced
    /// occupant goes to its recorded destination.
    pub(crate) fn reapply(&mut self, action: &Move) -> Result<(), EngineError> {
        let mut expected = vec![(action.item, action.from)];
        let mut targets = vec![(action.item, action.to)];
        if let Some(displaced) = action.displaced {
            expected.push((displaced.item, action.to));
            targets.push((displaced.item, displaced.to));
        }
        self.transfer(&expected, &targets)
    }

    /// Reverts a move: its item goes back to `from` and any displaced
    /// occupant back into `to`.
    pub(crate) fn revert(&mut self, action: &Move) -> Result<(), EngineError> {
        let mut expected = vec![(action.item, action.to)];
        let mut targets = vec![(action.item, action.from)];
        if let Some(displaced) = action.displaced {
            expected.push((displaced.item, displaced.to));
            targets.push((displaced.item, action.to));
        }
        self.transfer(&expected, &targets)
    }

    /// Moves several items at once after checking where they are now.
    ///
    /// Nothing changes unless every check passes. Slots vacated by the
    /// transfer are unlocked.
    fn transfer(
        &mut self,
        expected: &[(ItemId, Container)],
        targets: &[(ItemId, Container)],
    ) -> Result<(), EngineError> {
        for &(item, at) in expected {
            match self.location(item) {
                Some(current) if current == at => {}
                Some(current) => {
                    return Err(EngineError::InvalidTarget(format!(
                        "{} is in {}, expected {}",
                        item, current, at
                    )));
                }
                None => return Err(EngineError::InvalidTarget(format!("unknown {}", item))),
            }
        }

        let moving: Vec<ItemId> = targets.iter().map(|(item, _)| *item).collect();
        let mut claimed = BTreeSet::new();
        for &(_, to) in targets {
            let Container::Slot(slot) = to else {
                continue;
            };
            if self.slot(slot).is_none() {
                return Err(EngineError::InvalidTarget(format!("unknown {}", slot)));
            }
            if !claimed.insert(slot) {
                return Err(EngineError::InvalidTarget(format!("{} targeted twice", slot)));
            }
            if let Some(occupant) = self.occupant(slot)
                && !moving.contains(&occupant)
            {
                return Err(EngineError::InvalidTarget(format!(
                    "{} is occupied by {}",
                    slot, occupant
                )));
            }
        }

        for &(item, _) in targets {
            if let Container::Slot(slot) = self.locations[item.index()] {
                self.occupants[slot.index()] = None;
                self.locked.remove(&slot);
            }
        }
        for &(item, to) in targets {
            self.locations[item.index()] = to;
            if let Container::Slot(slot) = to {
                self.occupants[slot.index()] = Some(item);
            }
        }
        Ok(())
    }
}
