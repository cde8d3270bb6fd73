//! Items (what gets placed) and slots (where it goes).

use crate::{AnswerKey, ItemId, SlotId};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// An atomic placeable unit: a word in the bank or a term card.
///
/// Immutable for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize, Deserialize)]
pub struct Item {
    /// Session-unique id.
    id: ItemId,
    /// Text shown to the player.
    display_text: String,
    /// Key of the slot(s) this item belongs in.
    answer_key: AnswerKey,
}

impl Item {
    /// Whether this item is a correct answer for `slot`.
    pub fn answers(&self, slot: &Slot) -> bool {
        self.answer_key == slot.expected
    }
}

/// A target position expecting one item: a blank or a definition card.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize, Deserialize)]
pub struct Slot {
    /// Session-unique id.
    id: SlotId,
    /// Prompt shown next to the slot (the definition).
    prompt: String,
    /// Key an occupant must carry to be correct.
    expected: AnswerKey,
}
