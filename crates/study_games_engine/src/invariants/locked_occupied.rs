//! Locked slots are never empty.

use super::Invariant;
use crate::PlacementState;

/// Invariant: every locked slot holds an item.
pub struct LockedOccupiedInvariant;

impl Invariant<PlacementState> for LockedOccupiedInvariant {
    fn holds(state: &PlacementState) -> bool {
        state.locked.iter().all(|slot| state.occupant(*slot).is_some())
    }

    fn description() -> &'static str {
        "Locked slots are occupied"
    }
}
