//! Pre- and postconditions for placement transitions.

use crate::invariants::{InvariantSet, PlacementInvariants};
use crate::{Container, EngineError, ItemId, PlacementState, SlotId};
use derive_new::new;
use tracing::{instrument, warn};

/// A contract over a state `S` and an action `A`.
///
/// Preconditions are checked on every call; postconditions are meant for
/// debug builds.
pub trait Contract<S, A> {
    /// Checks that `action` may be applied to `state`.
    fn pre(state: &S, action: &A) -> Result<(), EngineError>;

    /// Checks that the transition from `before` to `after` kept the
    /// state's guarantees.
    fn post(before: &S, after: &S) -> Result<(), EngineError>;
}

/// A request to move `item` into `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct PlacementRequest {
    /// Item being moved.
    pub item: ItemId,
    /// Destination slot.
    pub slot: SlotId,
}

/// Contract for user placements and swaps.
///
/// Preconditions:
/// - Item and slot exist
/// - Neither the destination slot nor the item's current slot is locked
///
/// Postconditions:
/// - Item and slot tables are unchanged
/// - All placement invariants hold
pub struct PlacementContract;

impl Contract<PlacementState, PlacementRequest> for PlacementContract {
    #[instrument(skip(state))]
    fn pre(state: &PlacementState, request: &PlacementRequest) -> Result<(), EngineError> {
        let Some(origin) = state.location(request.item) else {
            warn!(item = %request.item, "Unknown item");
            return Err(EngineError::InvalidTarget(format!("unknown {}", request.item)));
        };
        if state.slot(request.slot).is_none() {
            warn!(slot = %request.slot, "Unknown slot");
            return Err(EngineError::InvalidTarget(format!("unknown {}", request.slot)));
        }
        if origin == Container::Slot(request.slot) {
            return Ok(());
        }
        if state.is_locked(request.slot) {
            return Err(EngineError::SlotLocked(request.slot));
        }
        if let Container::Slot(from) = origin
            && state.is_locked(from)
        {
            return Err(EngineError::SlotLocked(from));
        }
        Ok(())
    }

    fn post(before: &PlacementState, after: &PlacementState) -> Result<(), EngineError> {
        if before.items() != after.items() || before.slots() != after.slots() {
            return Err(EngineError::InvariantViolation(
                "Postcondition failed: item or slot table changed".to_string(),
            ));
        }
        PlacementInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            EngineError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
