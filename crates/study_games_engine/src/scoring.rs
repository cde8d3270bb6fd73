//! Running score and per-mode scoring deltas.

use crate::GameMode;
use serde::{Deserialize, Serialize};

/// A score that never drops below zero.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct Score(u32);

impl Score {
    /// Zero points.
    pub const ZERO: Score = Score(0);

    /// Applies a signed delta, clamping at zero. Returns the new score.
    pub fn apply(&mut self, delta: i32) -> Score {
        let next = i64::from(self.0) + i64::from(delta);
        self.0 = u32::try_from(next.max(0)).unwrap_or(u32::MAX);
        *self
    }

    /// Point value.
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Score deltas for one game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Awarded for an accepted placement (or a correct match).
    pub accept: i32,
    /// Applied to a rejected immediate-feedback drop (or a failed match).
    pub reject: i32,
}

impl ScoringPolicy {
    /// Deltas for `mode`.
    ///
    /// Hangman keeps no running score; its wrong-guess counter decides loss.
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::FillBlank => Self {
                accept: 10,
                reject: -1,
            },
            GameMode::Matching => Self {
                accept: 10,
                reject: -2,
            },
            GameMode::Hangman => Self {
                accept: 0,
                reject: 0,
            },
        }
    }
}
