//! Study games host - runs engine sessions in a terminal.
//!
//! Composes [`study_games_engine`] with a tokio-driven clock, a TOML
//! settings file, a course-file reader and a line-oriented console.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod console;
pub mod course_file;
pub mod driver;
pub mod settings;

pub use course_file::{CourseError, CourseFile};
pub use driver::{DriverOutput, Input, SessionDriver};
pub use settings::{ConfigError, Settings};
