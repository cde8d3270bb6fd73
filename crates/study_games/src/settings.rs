//! Player settings loaded from a TOML file.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use study_games_engine::{FeedbackMode, SessionConfig};
use tracing::{debug, info, instrument};

/// Host settings.
///
/// Every field has a default, so a partial file (or none at all) is fine.
///
/// ```toml
/// sound_enabled = false
/// tick_millis = 1000
///
/// [session]
/// feedback_mode = "on_submit"
/// max_wrong_guesses = 8
/// pair_limit = 6
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ring the terminal bell on wrong answers.
    sound_enabled: bool,
    /// Clock period in milliseconds.
    tick_millis: u64,
    /// Session options handed to the engine.
    session: SessionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            tick_millis: 1000,
            session: SessionConfig::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file. A missing file yields defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Settings file not found, using defaults");
            return Ok(Self::default());
        }
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;
        let settings = Self::from_toml(&content)?;
        info!(
            sound_enabled = settings.sound_enabled,
            tick_millis = settings.tick_millis,
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Parses settings from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;
        if settings.tick_millis == 0 {
            return Err(ConfigError::new("tick_millis must be positive".to_string()));
        }
        Ok(settings)
    }

    /// Clock period.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Replaces session options given on the command line.
    #[instrument(skip(self))]
    pub fn apply_overrides(
        &mut self,
        feedback_mode: Option<FeedbackMode>,
        pair_limit: Option<usize>,
        max_wrong_guesses: Option<u32>,
    ) {
        if let Some(mode) = feedback_mode {
            self.session.feedback_mode = mode;
        }
        if let Some(limit) = pair_limit {
            self.session.pair_limit = Some(limit);
        }
        if let Some(max) = max_wrong_guesses {
            self.session.max_wrong_guesses = max;
        }
    }

    /// Turns the bell on or off, e.g. for `--quiet`.
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }
}

/// A settings file that could not be read or used.
#[derive(Debug, Clone, Display, Error)]
#[display("Settings error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// What went wrong with the file.
    pub message: String,
    /// Line of the code that raised it.
    pub line: u32,
    /// Source file of the code that raised it.
    pub file: &'static str,
}

impl ConfigError {
    /// Wraps `message`, recording the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml("sound_enabled = false\n").unwrap();
        assert!(!settings.sound_enabled());
        assert_eq!(*settings.tick_millis(), 1000);
        assert_eq!(settings.session(), &SessionConfig::default());
    }

    #[test]
    fn test_zero_tick_rejected() {
        assert!(Settings::from_toml("tick_millis = 0\n").is_err());
    }

    #[test]
    fn test_with_sound_overrides_file() {
        let settings = Settings::from_toml("tick_millis = 250\n")
            .unwrap()
            .with_sound(false);
        assert!(!settings.sound_enabled());
        assert_eq!(settings.tick_period(), Duration::from_millis(250));
    }

    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(Some(FeedbackMode::OnSubmit), Some(4), None);
        assert_eq!(settings.session().feedback_mode, FeedbackMode::OnSubmit);
        assert_eq!(settings.session().pair_limit, Some(4));
        assert_eq!(settings.session().max_wrong_guesses, 6);
    }
}
