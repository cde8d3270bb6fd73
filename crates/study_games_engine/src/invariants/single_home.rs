//! Single home invariant: no item occupies two slots.

use super::Invariant;
use crate::PlacementState;
use std::collections::BTreeSet;

/// Invariant: each item id appears as the occupant of at most one slot.
pub struct SingleHomeInvariant;

impl Invariant<PlacementState> for SingleHomeInvariant {
    fn holds(state: &PlacementState) -> bool {
        let mut seen = BTreeSet::new();
        state.occupants.iter().flatten().all(|item| seen.insert(*item))
    }

    fn description() -> &'static str {
        "Each item occupies at most one slot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerKey, Item, ItemId, Slot, SlotId};

    #[test]
    fn test_double_occupancy_violates() {
        let mut state = PlacementState::new(
            vec![Item::new(ItemId(0), "a".into(), AnswerKey::new("a"))],
            vec![
                Slot::new(SlotId(0), "A".into(), AnswerKey::new("a")),
                Slot::new(SlotId(1), "B".into(), AnswerKey::new("a")),
            ],
        );
        state.place(ItemId(0), SlotId(0)).unwrap();
        assert!(SingleHomeInvariant::holds(&state));

        state.occupants[1] = Some(ItemId(0));
        assert!(!SingleHomeInvariant::holds(&state));
    }
}
