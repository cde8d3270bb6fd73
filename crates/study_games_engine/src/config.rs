//! Per-session configuration.

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// When placements are judged.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum FeedbackMode {
    /// Every drop is judged as it happens; wrong drops are rejected.
    #[default]
    Immediate,
    /// Drops are free; the board is judged on submit.
    OnSubmit,
}

/// Options for a round of play, replaceable between rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct SessionConfig {
    /// Initial feedback mode (fill-in-blank only).
    pub feedback_mode: FeedbackMode,
    /// Wrong guesses that lose a hangman round.
    pub max_wrong_guesses: u32,
    /// Maximum number of card pairs (matching only); `None` plays them all.
    #[setters(strip_option)]
    pub pair_limit: Option<usize>,
    /// Lock slots once their occupant is settled correct.
    pub lock_correct: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            feedback_mode: FeedbackMode::Immediate,
            max_wrong_guesses: 6,
            pair_limit: None,
            lock_correct: false,
        }
    }
}

impl SessionConfig {
    /// Returns the config with out-of-range values replaced.
    ///
    /// A pair limit of zero means "no limit" and at least one wrong guess
    /// is always allowed.
    pub fn normalized(mut self) -> Self {
        if self.pair_limit == Some(0) {
            self.pair_limit = None;
        }
        self.max_wrong_guesses = self.max_wrong_guesses.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.feedback_mode, FeedbackMode::Immediate);
        assert_eq!(config.max_wrong_guesses, 6);
        assert_eq!(config.pair_limit, None);
    }

    #[test]
    fn test_normalized() {
        let config = SessionConfig::default()
            .with_pair_limit(0)
            .with_max_wrong_guesses(0)
            .normalized();
        assert_eq!(config.pair_limit, None);
        assert_eq!(config.max_wrong_guesses, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"feedback_mode":"on_submit","pair_limit":4}"#).unwrap();
        assert_eq!(config.feedback_mode, FeedbackMode::OnSubmit);
        assert_eq!(config.pair_limit, Some(4));
        assert_eq!(config.max_wrong_guesses, 6);
    }
}
