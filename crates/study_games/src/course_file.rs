//! Course files: the JSON the chapters of a course are read from.

use derive_getters::Getters;
use derive_more::{Display, Error};
use std::path::{Path, PathBuf};
use study_games_engine::{Chapter, Course};
use tracing::{info, instrument};

/// A course read from disk.
#[derive(Debug, Clone, Getters)]
pub struct CourseFile {
    /// Where it was read from.
    path: PathBuf,
    /// Its chapters.
    course: Course,
}

impl CourseFile {
    /// Reads and parses a course file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CourseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CourseError::new(format!("Failed to read course file: {}", e)))?;
        let course = Course::from_json(&content)?;
        info!(chapters = course.chapters.len(), "Course loaded");
        Ok(Self {
            path: path.to_path_buf(),
            course,
        })
    }

    /// Looks a chapter up by id.
    #[instrument(skip(self))]
    pub fn chapter(&self, id: &str) -> Result<&Chapter, CourseError> {
        self.course
            .chapter(id)
            .ok_or_else(|| CourseError::new(format!("No chapter with id {:?}", id)))
    }
}

/// Course file error.
#[derive(Debug, Clone, Display, Error)]
#[display("Course error: {} at {}:{}", message, file, line)]
pub struct CourseError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl CourseError {
    /// Creates a new course error.
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

impl From<serde_json::Error> for CourseError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Failed to parse course: {}", err))
    }
}
