//! Study games engine - one session state machine for three study games
//!
//! The engine drives fill-in-the-blank, hangman and matching-card sessions
//! over a chapter of term/definition pairs. It has no rendering surface:
//! a presentation layer sends commands and renders the events the engine
//! queues in response.
//!
//! # Architecture
//!
//! - **ItemBank**: validated term/definition pairs for the chosen chapter
//! - **PlacementState**: which item occupies which slot, mutated atomically
//! - **MoveLog**: undo/redo stacks of reversible placements
//! - **Score / ScoringPolicy**: per-mode deltas, floored at zero
//! - **Clock**: cancellable one-tick-per-second elapsed counter
//! - **SessionController**: the `Idle -> Loading -> Ready -> Active -> Won|Lost|Ended`
//!   state machine tying the pieces together
//!
//! # Example
//!
//! ```
//! use study_games_engine::{Chapter, GameMode, SessionConfig, SessionController, TermDefinition};
//!
//! let chapter = Chapter::new(
//!     "1",
//!     vec![TermDefinition::new("Cat", "A small feline")],
//! );
//! let mut session = SessionController::with_seed(GameMode::Hangman, SessionConfig::default(), 7);
//! session.load_chapter(&chapter)?;
//! session.start()?;
//! for letter in ['C', 'A', 'T'] {
//!     session.guess(letter)?;
//! }
//! assert!(session.state().is_terminal());
//! # Ok::<(), study_games_engine::EngineError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bank;
mod chapter;
mod clock;
mod command;
mod config;
mod contracts;
mod error;
mod events;
mod fill_blank;
mod hangman;
mod history;
mod ids;
mod item;
mod matching;
mod mode;
mod placement;
mod scoring;
mod session;
mod snapshot;
mod state;

pub mod invariants;

// Crate-level exports - Content
pub use bank::{Entry, ItemBank, shuffle};
pub use chapter::{Chapter, Course, TermDefinition};
pub use item::{Item, Slot};
pub use ids::{AnswerKey, Container, ItemId, SlotId};

// Crate-level exports - Placement and history
pub use contracts::{Contract, PlacementContract, PlacementRequest};
pub use history::{Displaced, Move, MoveLog};
pub use placement::PlacementState;

// Crate-level exports - Game boards
pub use fill_blank::{FillBlankBoard, SubmitReport};
pub use hangman::{GUESSABLE, GuessOutcome, HangmanBoard, LetterCell, is_guessable, normalize_word};
pub use matching::{MatchOutcome, MatchingBoard};

// Crate-level exports - Session
pub use clock::{Clock, ClockToken};
pub use command::{Command, CommandStatus, PlaceOutcome};
pub use config::{FeedbackMode, SessionConfig};
pub use error::EngineError;
pub use events::SessionEvent;
pub use mode::GameMode;
pub use scoring::{Score, ScoringPolicy};
pub use session::SessionController;
pub use snapshot::{BoardView, ItemView, SessionSnapshot, SlotView};
pub use state::SessionState;
