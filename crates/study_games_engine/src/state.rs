//! Session lifecycle states.

use serde::{Deserialize, Serialize};

/// Where a session is in its lifecycle.
///
/// `Idle -> Loading -> Ready -> Active -> Won | Lost | Ended`; `reset`
/// returns to `Ready` (or `Idle` without a chapter).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No chapter selected.
    #[default]
    Idle,
    /// Chapter data being fetched.
    Loading,
    /// Chapter loaded, session not started.
    Ready,
    /// Clock running, actions accepted.
    Active,
    /// Win condition met.
    Won,
    /// Hangman only: out of wrong guesses.
    Lost,
    /// Solved or given up.
    Ended,
}

impl SessionState {
    /// Whether the session has finished and awaits a reset.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Won | SessionState::Lost | SessionState::Ended)
    }

    /// Whether player actions are accepted.
    pub fn accepts_actions(self) -> bool {
        self == SessionState::Active
    }
}
