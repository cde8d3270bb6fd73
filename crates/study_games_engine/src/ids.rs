//! Identifiers for items, slots and the containers that hold them.

use serde::{Deserialize, Serialize};

/// Identifier of a placeable item, unique within one session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("item {}", _0)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Position of the item in its session's item table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a target slot, unique within one session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("slot {}", _0)]
pub struct SlotId(pub u32);

impl SlotId {
    /// Position of the slot in its session's slot table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where an item currently lives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Container {
    /// The word bank (or card deck) items start in.
    #[display("bank")]
    Bank,
    /// A target slot.
    #[display("{}", _0)]
    Slot(SlotId),
}

impl Container {
    /// Returns the slot id if this container is a slot.
    pub fn slot(self) -> Option<SlotId> {
        match self {
            Container::Bank => None,
            Container::Slot(slot) => Some(slot),
        }
    }
}

/// Key an item answers with and a slot expects.
///
/// An item is correct in a slot when both carry the same key.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct AnswerKey(String);

impl AnswerKey {
    /// Creates a new answer key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
