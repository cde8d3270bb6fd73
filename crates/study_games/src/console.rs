//! Text front end: parses typed lines and renders engine output.

use crate::driver::{DriverOutput, Input};
use derive_more::{Display, Error};
use study_games_engine::{
    BoardView, Command, CommandStatus, GuessOutcome, ItemId, LetterCell, PlaceOutcome,
    SessionEvent, SessionSnapshot, SlotId, SlotView,
};

const BELL: char = '\u{7}';

/// Help text listing every console command.
pub const HELP: &str = "\
commands:
  start                 start the session
  place <item> <slot>   drop a word into a blank (or try a card pair)
  swap <item> <slot>    exchange a word with a blank's occupant
  back <slot>           return a blank's word to the bank
  undo | redo           step through move history
  submit                judge the whole board
  solve                 fill every blank and end
  reset                 start over with the same chapter
  end                   give up
  feedback on|off       immediate or on-submit feedback
  guess <letter>        guess a hangman letter
  difficulty <n>        wrong guesses allowed from the next round
  term <item>           select a term card
  def <slot>            select a definition card
  show                  draw the board
  quit                  leave";

/// A line that is not a console command.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{}", message)]
pub struct ParseError {
    /// What was wrong with the line.
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn number(word: Option<&str>, what: &str) -> Result<u32, ParseError> {
    let word = word.ok_or_else(|| ParseError::new(format!("missing {}", what)))?;
    word.parse()
        .map_err(|_| ParseError::new(format!("{} must be a number, got {:?}", what, word)))
}

/// Parses one typed line.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<Input>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let command = match verb.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(Some(Input::Quit)),
        "show" | "board" => return Ok(Some(Input::Show)),
        "start" => Command::Start,
        "place" => Command::Place {
            item: ItemId(number(words.next(), "item")?),
            slot: SlotId(number(words.next(), "slot")?),
        },
        "swap" => Command::Swap {
            item: ItemId(number(words.next(), "item")?),
            slot: SlotId(number(words.next(), "slot")?),
        },
        "back" => Command::ReturnToBank {
            slot: SlotId(number(words.next(), "slot")?),
        },
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "submit" => Command::SubmitAll,
        "solve" => Command::SolveAll,
        "reset" => Command::Reset,
        "end" | "giveup" => Command::End,
        "feedback" => match words.next() {
            Some("on") => Command::ToggleFeedback { immediate: true },
            Some("off") => Command::ToggleFeedback { immediate: false },
            _ => return Err(ParseError::new("usage: feedback on|off")),
        },
        "guess" => {
            let word = words.next().unwrap_or_default();
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => Command::Guess { letter },
                _ => return Err(ParseError::new("usage: guess <letter>")),
            }
        }
        "difficulty" => Command::SetDifficulty {
            max_wrong_guesses: number(words.next(), "wrong-guess limit")?,
        },
        "term" => Command::SelectTerm {
            item: ItemId(number(words.next(), "item")?),
        },
        "def" => Command::SelectDefinition {
            slot: SlotId(number(words.next(), "slot")?),
        },
        other => return Err(ParseError::new(format!("unknown command {:?}", other))),
    };
    Ok(Some(Input::Command(command)))
}

/// Renders one driver output, or `None` if it is not worth a line.
pub fn render(output: &DriverOutput, sound_enabled: bool) -> Option<String> {
    match output {
        DriverOutput::Event(event) => render_event(event, sound_enabled),
        DriverOutput::Status(status) => render_status(status),
        DriverOutput::Error(e) => Some(format!("! {}", e)),
        DriverOutput::Snapshot(snapshot) => Some(render_snapshot(snapshot)),
    }
}

fn bell(sound_enabled: bool) -> String {
    if sound_enabled {
        BELL.to_string()
    } else {
        String::new()
    }
}

fn render_event(event: &SessionEvent, sound_enabled: bool) -> Option<String> {
    match event {
        SessionEvent::PlacementChanged {
            slot,
            occupant,
            correct,
        } => {
            let occupant = occupant.map_or_else(|| "empty".to_string(), |i| i.to_string());
            let tag = match correct {
                Some(true) => " (correct)",
                Some(false) => " (wrong)",
                None => "",
            };
            Some(format!("{}: {}{}", slot, occupant, tag))
        }
        SessionEvent::PlacementRejected { item, slot } => Some(format!(
            "{}{} does not belong in {}",
            bell(sound_enabled),
            item,
            slot
        )),
        SessionEvent::ScoreChanged { score } => Some(format!("score: {}", score)),
        SessionEvent::TimeChanged { seconds } if *seconds > 0 && seconds % 10 == 0 => {
            Some(format!("time: {}", clock_face(*seconds)))
        }
        SessionEvent::TimeChanged { .. } => None,
        SessionEvent::SessionStateChanged { state } => Some(format!("== {} ==", state)),
        SessionEvent::MoveHistoryChanged { .. } => None,
        SessionEvent::GuessResolved {
            letter,
            hit,
            wrong_guesses,
        } => Some(if *hit {
            format!("{} is in the word", letter)
        } else {
            format!(
                "{}{} is not in the word ({} wrong)",
                bell(sound_enabled),
                letter,
                wrong_guesses
            )
        }),
        SessionEvent::WordRevealed { word, .. } => Some(format!("the word was {}", word)),
        SessionEvent::MovesChanged { moves } if *moves > 0 => Some(format!("moves: {}", moves)),
        SessionEvent::MovesChanged { .. } => None,
        SessionEvent::LoadFailed { reason } => Some(format!("! {}", reason)),
    }
}

fn render_status(status: &CommandStatus) -> Option<String> {
    match status {
        CommandStatus::Submitted { report } => Some(format!(
            "{} of {} correct ({} filled)",
            report.correct.len(),
            report.total,
            report.filled()
        )),
        CommandStatus::Guessed {
            outcome: GuessOutcome::Repeated,
        } => Some("already guessed".to_string()),
        CommandStatus::Placement {
            outcome: PlaceOutcome::Selected,
        } => Some("selected".to_string()),
        CommandStatus::History { action: None } => Some("nothing to do".to_string()),
        CommandStatus::Feedback { mode } => Some(format!("feedback: {}", mode)),
        CommandStatus::Configured { config } => Some(format!(
            "next round allows {} wrong guesses",
            config.max_wrong_guesses
        )),
        _ => None,
    }
}

fn clock_face(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn render_slot(slot: &SlotView) -> String {
    let occupant = slot
        .occupant
        .as_ref()
        .map_or_else(|| "______".to_string(), |item| format!("[{}] {}", item.id.0, item.text));
    let tag = match slot.correct {
        Some(true) => " ✓",
        Some(false) => " ✗",
        None => "",
    };
    format!("  ({}) {}  {}{}", slot.id.0, slot.prompt, occupant, tag)
}

/// Draws the whole board.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = format!(
        "{} | {} | score {} | time {}",
        snapshot.mode(),
        snapshot.state(),
        snapshot.score(),
        clock_face(*snapshot.elapsed())
    );
    match snapshot.board() {
        None => out.push_str("\n  (no chapter loaded)"),
        Some(BoardView::FillBlank {
            bank,
            slots,
            submitted,
        }) => {
            out.push_str(&format!(
                " | feedback {}{}",
                snapshot.feedback_mode(),
                if *submitted { " | submitted" } else { "" }
            ));
            for slot in slots {
                out.push('\n');
                out.push_str(&render_slot(slot));
            }
            let words: Vec<String> = bank
                .iter()
                .map(|item| format!("[{}] {}", item.id.0, item.text))
                .collect();
            out.push_str(&format!("\n  bank: {}", words.join("  ")));
            if *snapshot.can_undo() || *snapshot.can_redo() {
                out.push_str(&format!(
                    "\n  undo: {}  redo: {}",
                    snapshot.can_undo(),
                    snapshot.can_redo()
                ));
            }
        }
        Some(BoardView::Hangman {
            cells,
            clue,
            guessed,
            wrong_guesses,
            max_wrong_guesses,
        }) => {
            let word: Vec<String> = cells
                .iter()
                .map(|cell| match cell {
                    LetterCell::Space => " ".to_string(),
                    LetterCell::Hidden => "_".to_string(),
                    LetterCell::Shown(c) => c.to_string(),
                    LetterCell::Missed(c) => c.to_ascii_lowercase().to_string(),
                })
                .collect();
            let guessed: String = guessed.iter().collect();
            out.push_str(&format!(
                "\n  clue: {}\n  word: {}\n  guessed: {}  wrong: {}/{}",
                clue,
                word.join(" "),
                guessed,
                wrong_guesses,
                max_wrong_guesses
            ));
        }
        Some(BoardView::Matching {
            terms,
            definitions,
            selected_term,
            selected_definition,
            moves,
            matched,
            total,
        }) => {
            out.push_str(&format!(" | moves {} | matched {}/{}", moves, matched, total));
            out.push_str("\n  terms:");
            for term in terms.iter().filter(|t| !t.placed) {
                let mark = if *selected_term == Some(term.id) { "*" } else { "" };
                out.push_str(&format!("\n    {}[{}] {}", mark, term.id.0, term.text));
            }
            out.push_str("\n  definitions:");
            for definition in definitions {
                let mark = if *selected_definition == Some(definition.id) {
                    "*"
                } else {
                    ""
                };
                out.push_str(&format!("\n  {}{}", mark, render_slot(definition).trim_start()));
            }
        }
    }
    out
}
