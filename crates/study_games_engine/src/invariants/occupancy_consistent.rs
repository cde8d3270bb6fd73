//! Occupancy consistency invariant: both occupancy indexes agree.

use super::Invariant;
use crate::{Container, PlacementState};

/// Invariant: a slot lists an item as occupant exactly when the item
/// lists that slot as its location.
pub struct OccupancyConsistentInvariant;

impl Invariant<PlacementState> for OccupancyConsistentInvariant {
    fn holds(state: &PlacementState) -> bool {
        let slots_agree = state.occupants.iter().enumerate().all(|(n, occupant)| {
            occupant.is_none_or(|item| {
                let home = state.locations.get(item.index()).and_then(|c| c.slot());
                home.map(|s| s.index()) == Some(n)
            })
        });
        let items_agree = state.locations.iter().enumerate().all(|(n, location)| match location {
            Container::Bank => true,
            Container::Slot(slot) => {
                state.occupants.get(slot.index()).copied().flatten().map(|i| i.index()) == Some(n)
            }
        });
        slots_agree && items_agree
    }

    fn description() -> &'static str {
        "Slot occupants and item locations agree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerKey, Item, ItemId, Slot, SlotId};

    #[test]
    fn test_dangling_location_violates() {
        let mut state = PlacementState::new(
            vec![Item::new(ItemId(0), "a".into(), AnswerKey::new("a"))],
            vec![Slot::new(SlotId(0), "A".into(), AnswerKey::new("a"))],
        );
        assert!(OccupancyConsistentInvariant::holds(&state));

        state.locations[0] = Container::Slot(SlotId(0));
        assert!(!OccupancyConsistentInvariant::holds(&state));
    }
}
