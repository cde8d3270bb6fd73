//! Hangman board: guess the letters of a hidden term.

use crate::{EngineError, ItemBank};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Characters a player can guess.
pub const GUESSABLE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-/";

/// Whether `c` (in either case) can be guessed.
pub fn is_guessable(c: char) -> bool {
    GUESSABLE.contains(c.to_ascii_uppercase())
}

/// Turns a term into the word to guess.
///
/// Upper-cases the term, drops parenthesised fragments and trims. Falls
/// back to the whole upper-cased term when nothing is left.
pub fn normalize_word(term: &str) -> String {
    let upper = term.to_uppercase();
    let mut word = String::with_capacity(upper.len());
    let mut rest = upper.as_str();
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        word.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    word.push_str(rest);

    let trimmed = word.trim();
    if trimmed.is_empty() {
        upper.trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Result of a guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuessOutcome {
    /// The word contains the letter at these positions.
    Hit {
        /// Newly revealed positions.
        positions: Vec<usize>,
    },
    /// The word does not contain the letter.
    Miss,
    /// The letter was guessed before; nothing changed.
    Repeated,
}

/// One position of the word as the player sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cell", content = "letter", rename_all = "snake_case")]
pub enum LetterCell {
    /// A gap between words.
    Space,
    /// Not guessed yet.
    Hidden,
    /// Guessed, or shown from the start.
    Shown(char),
    /// Revealed at the end without having been guessed.
    Missed(char),
}

/// A hidden word, the guesses made against it and the loss counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HangmanBoard {
    word: Vec<char>,
    clue: String,
    revealed: Vec<bool>,
    guessed: Vec<char>,
    wrong_guesses: u32,
    max_wrong_guesses: u32,
    exposed: bool,
}

impl HangmanBoard {
    /// Creates a board for `term` with `clue` as the hint.
    ///
    /// Whitespace and characters that cannot be guessed start revealed.
    pub fn new(term: &str, clue: impl Into<String>, max_wrong_guesses: u32) -> Self {
        let word: Vec<char> = normalize_word(term).chars().collect();
        let revealed = word
            .iter()
            .map(|c| c.is_whitespace() || !is_guessable(*c))
            .collect();
        Self {
            word,
            clue: clue.into(),
            revealed,
            guessed: Vec::new(),
            wrong_guesses: 0,
            max_wrong_guesses: max_wrong_guesses.max(1),
            exposed: false,
        }
    }

    /// Picks a random entry of the bank as the word.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyItemSet`] if the bank is empty.
    #[instrument(skip_all, fields(entries = bank.len()))]
    pub fn from_bank<R: Rng + ?Sized>(
        bank: &ItemBank,
        rng: &mut R,
        max_wrong_guesses: u32,
    ) -> Result<Self, EngineError> {
        if bank.is_empty() {
            return Err(EngineError::EmptyItemSet);
        }
        let pick = rng.gen_range(0..bank.len());
        let entry = bank.entries().get(pick).ok_or(EngineError::EmptyItemSet)?;
        debug!(index = pick, "Picked hangman word");
        Ok(Self::new(entry.term(), entry.definition().clone(), max_wrong_guesses))
    }

    /// Applies a guess.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidGuess`] for a character outside [`GUESSABLE`].
    #[instrument(skip(self))]
    pub fn guess(&mut self, letter: char) -> Result<GuessOutcome, EngineError> {
        if !is_guessable(letter) {
            return Err(EngineError::InvalidGuess(letter));
        }
        let letter = letter.to_ascii_uppercase();
        if self.guessed.contains(&letter) {
            return Ok(GuessOutcome::Repeated);
        }
        self.guessed.push(letter);

        let positions: Vec<usize> = self
            .word
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == letter)
            .map(|(n, _)| n)
            .collect();
        if positions.is_empty() {
            self.wrong_guesses += 1;
            return Ok(GuessOutcome::Miss);
        }
        for n in &positions {
            self.revealed[*n] = true;
        }
        Ok(GuessOutcome::Hit { positions })
    }

    /// Whether every letter has been revealed.
    pub fn is_solved(&self) -> bool {
        self.revealed.iter().all(|r| *r)
    }

    /// Whether the wrong-guess budget is spent.
    pub fn is_lost(&self) -> bool {
        self.wrong_guesses >= self.max_wrong_guesses
    }

    /// Shows the whole word. Returns the positions never guessed.
    pub fn reveal(&mut self) -> Vec<usize> {
        self.exposed = true;
        self.revealed
            .iter()
            .enumerate()
            .filter(|(_, r)| !**r)
            .map(|(n, _)| n)
            .collect()
    }

    /// The word as the player currently sees it.
    pub fn cells(&self) -> Vec<LetterCell> {
        self.word
            .iter()
            .zip(&self.revealed)
            .map(|(c, revealed)| match (c.is_whitespace(), revealed, self.exposed) {
                (true, _, _) => LetterCell::Space,
                (false, true, _) => LetterCell::Shown(*c),
                (false, false, true) => LetterCell::Missed(*c),
                (false, false, false) => LetterCell::Hidden,
            })
            .collect()
    }

    /// The word to guess.
    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    /// The hint shown to the player.
    pub fn clue(&self) -> &str {
        &self.clue
    }

    /// Letters guessed so far, in order.
    pub fn guessed(&self) -> &[char] {
        &self.guessed
    }

    /// Wrong guesses so far.
    pub fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    /// Wrong guesses allowed.
    pub fn max_wrong_guesses(&self) -> u32 {
        self.max_wrong_guesses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Cat"), "CAT");
        assert_eq!(normalize_word("  Photosynthesis (process) "), "PHOTOSYNTHESIS");
        assert_eq!(normalize_word("(only)"), "(ONLY)");
        assert_eq!(normalize_word("a (b) c (d"), "A  C (D");
    }

    #[test]
    fn test_guessable_set() {
        assert!(is_guessable('a'));
        assert!(is_guessable('7'));
        assert!(is_guessable('/'));
        assert!(!is_guessable(' '));
        assert!(!is_guessable('!'));
    }

    #[test]
    fn test_guesses_reveal_letters() {
        let mut board = HangmanBoard::new("Cat", "pet", 6);
        assert_eq!(board.guess('c'), Ok(GuessOutcome::Hit { positions: vec![0] }));
        assert_eq!(board.guess('C'), Ok(GuessOutcome::Repeated));
        assert_eq!(board.guess('x'), Ok(GuessOutcome::Miss));
        assert_eq!(board.wrong_guesses(), 1);
        assert_eq!(
            board.cells(),
            vec![LetterCell::Shown('C'), LetterCell::Hidden, LetterCell::Hidden]
        );
        board.guess('a').unwrap();
        board.guess('t').unwrap();
        assert!(board.is_solved());
    }

    #[test]
    fn test_invalid_guess_changes_nothing() {
        let mut board = HangmanBoard::new("Cat", "pet", 6);
        let before = board.clone();
        assert_eq!(board.guess('?'), Err(EngineError::InvalidGuess('?')));
        assert_eq!(board, before);
    }

    #[test]
    fn test_spaces_and_punctuation_start_revealed() {
        let board = HangmanBoard::new("Ice age!", "cold", 6);
        let cells = board.cells();
        assert_eq!(cells[3], LetterCell::Space);
        assert_eq!(cells[7], LetterCell::Shown('!'));
    }

    #[test]
    fn test_reveal_marks_missed_positions() {
        let mut board = HangmanBoard::new("Cat", "pet", 2);
        board.guess('a').unwrap();
        board.guess('x').unwrap();
        board.guess('y').unwrap();
        assert!(board.is_lost());
        assert_eq!(board.reveal(), vec![0, 2]);
        assert_eq!(
            board.cells(),
            vec![LetterCell::Missed('C'), LetterCell::Shown('A'), LetterCell::Missed('T')]
        );
    }
}
