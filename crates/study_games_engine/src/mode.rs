//! Game mode descriptor.

use serde::{Deserialize, Serialize};

/// Which of the three study games a session plays.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameMode {
    /// Drag words from a bank into definition blanks.
    FillBlank,
    /// Guess the letters of a hidden term.
    Hangman,
    /// Pair term cards with definition cards.
    Matching,
}

impl GameMode {
    /// Whether placements in this mode are recorded for undo/redo.
    ///
    /// A match is final and guesses only accumulate, so only fill-in-blank
    /// keeps history.
    pub fn history_enabled(self) -> bool {
        matches!(self, GameMode::FillBlank)
    }
}
