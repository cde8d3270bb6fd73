//! Tests for loading settings and course files from disk.

use std::io::Write;
use study_games::{CourseFile, Settings};
use study_games_engine::FeedbackMode;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_settings_from_file() {
    let file = write_temp(
        r#"
sound_enabled = false
tick_millis = 250

[session]
feedback_mode = "on_submit"
max_wrong_guesses = 4
"#,
    );
    let settings = Settings::from_file(file.path()).unwrap();
    assert!(!settings.sound_enabled());
    assert_eq!(settings.tick_period().as_millis(), 250);
    assert_eq!(settings.session().feedback_mode, FeedbackMode::OnSubmit);
    assert_eq!(settings.session().max_wrong_guesses, 4);
    assert_eq!(settings.session().pair_limit, None);
}

#[test]
fn test_missing_settings_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::from_file(dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_malformed_settings_file_is_an_error() {
    let file = write_temp("sound_enabled = \"loud\"\n");
    let err = Settings::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("parse"));
}

#[test]
fn test_course_file_lookup() {
    let file = write_temp(
        r#"{"chapters": [
            {"chapter_id": "1", "chapter_title": "Cells",
             "term_definitions": [{"term": "Nucleus", "definition": "control center"}]},
            {"chapter_id": "", "term_definitions": []}
        ]}"#,
    );
    let course = CourseFile::load(file.path()).unwrap();
    assert_eq!(course.course().selectable().count(), 1);
    assert_eq!(course.chapter("1").unwrap().term_definitions().len(), 1);
    assert!(course.chapter("2").is_err());
}

#[test]
fn test_course_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CourseFile::load(dir.path().join("missing.json")).is_err());
    let file = write_temp("not json");
    let err = CourseFile::load(file.path()).unwrap_err();
    assert!(err.message.contains("parse"));
}
