//! Occupancy rules every [`PlacementState`] obeys between commands.
//!
//! Each rule lives in its own type so tests can check it alone; the
//! controller asserts the whole [`PlacementInvariants`] set in debug builds.

mod locked_occupied;
mod occupancy_consistent;
mod single_home;

pub use locked_occupied::LockedOccupiedInvariant;
pub use occupancy_consistent::OccupancyConsistentInvariant;
pub use single_home::SingleHomeInvariant;

use crate::PlacementState;
use tracing::instrument;

/// One rule about a board state `S`.
pub trait Invariant<S> {
    /// `true` when `state` obeys the rule.
    fn holds(state: &S) -> bool;

    /// The rule in words, used in violation reports.
    fn description() -> &'static str;
}

/// A rule a board state broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// The broken rule, as worded by [`Invariant::description`].
    pub description: String,
}

impl InvariantViolation {
    /// Records a broken rule.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Several rules checked in one pass; implemented for tuples of rules.
pub trait InvariantSet<S> {
    /// Runs every rule and reports all that fail, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = match <(I1, I2)>::check_all(state) {
            Ok(()) => Vec::new(),
            Err(v) => v,
        };
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

/// The rules a placement board must obey after every command.
pub type PlacementInvariants = (
    SingleHomeInvariant,
    OccupancyConsistentInvariant,
    LockedOccupiedInvariant,
);

/// Asserts that all placement invariants hold (debug builds only).
#[instrument(skip(state))]
pub fn assert_invariants(state: &PlacementState) {
    debug_assert!(
        PlacementInvariants::check_all(state).is_ok(),
        "Placement invariants violated: {:?}",
        PlacementInvariants::check_all(state)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerKey, Item, ItemId, Slot, SlotId};

    fn board() -> PlacementState {
        PlacementState::new(
            vec![
                Item::new(ItemId(0), "a".into(), AnswerKey::new("a")),
                Item::new(ItemId(1), "b".into(), AnswerKey::new("b")),
            ],
            vec![
                Slot::new(SlotId(0), "A".into(), AnswerKey::new("a")),
                Slot::new(SlotId(1), "B".into(), AnswerKey::new("b")),
            ],
        )
    }

    #[test]
    fn test_invariant_set_holds_for_fresh_board() {
        assert!(PlacementInvariants::check_all(&board()).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        let mut state = board();
        state.place(ItemId(0), SlotId(0)).unwrap();
        state.occupants[1] = Some(ItemId(0));
        state.locked.insert(SlotId(1));
        state.occupants[1] = None;
        state.occupants[0] = None;

        let violations = PlacementInvariants::check_all(&state).unwrap_err();
        assert!(!violations.is_empty());
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (SingleHomeInvariant, OccupancyConsistentInvariant);
        assert!(TwoInvariants::check_all(&board()).is_ok());
    }
}
