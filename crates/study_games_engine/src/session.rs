//! The session state machine.
//!
//! [`SessionController`] owns one item bank, one board, the move log, the
//! score and the clock, and runs every command to completion before the
//! next one. Commands return `Result`s; what the player should see is
//! queued as [`SessionEvent`]s.

use crate::fill_blank::Attempt;
use crate::matching::Selection;
use crate::{
    Chapter, Clock, ClockToken, Command, CommandStatus, EngineError, FeedbackMode,
    FillBlankBoard, GameMode, GuessOutcome, HangmanBoard, ItemBank, ItemId, MatchOutcome,
    MatchingBoard, Move, MoveLog, PlaceOutcome, PlacementState, Score, ScoringPolicy,
    SessionConfig, SessionEvent, SessionSnapshot, SessionState, SlotId, SubmitReport,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Board
// ─────────────────────────────────────────────────────────────

/// The mode-specific part of a session.
#[derive(Debug, Clone)]
enum Board {
    FillBlank(FillBlankBoard),
    Hangman(HangmanBoard),
    Matching(MatchingBoard),
}

impl Board {
    fn placement(&self) -> Option<&PlacementState> {
        match self {
            Board::FillBlank(board) => Some(board.placement()),
            Board::Matching(board) => Some(board.placement()),
            Board::Hangman(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Controller
// ─────────────────────────────────────────────────────────────

/// One study-game session.
///
/// `Idle -> Loading -> Ready -> Active -> Won | Lost | Ended`, with
/// [`SessionController::reset`] leading back to `Ready` (or `Idle` when no
/// chapter is loaded).
#[derive(Debug, Clone)]
pub struct SessionController {
    mode: GameMode,
    config: SessionConfig,
    policy: ScoringPolicy,
    feedback: FeedbackMode,
    state: SessionState,
    bank: Option<ItemBank>,
    board: Option<Board>,
    history: MoveLog,
    score: Score,
    clock: Clock,
    rng: StdRng,
    events: Vec<SessionEvent>,
}

impl SessionController {
    /// Creates an idle session with an entropy-seeded shuffle.
    pub fn new(mode: GameMode, config: SessionConfig) -> Self {
        Self::with_rng(mode, config, StdRng::from_entropy())
    }

    /// Creates an idle session whose shuffles are reproducible.
    pub fn with_seed(mode: GameMode, config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(mode, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: GameMode, config: SessionConfig, rng: StdRng) -> Self {
        let config = config.normalized();
        Self {
            mode,
            policy: ScoringPolicy::for_mode(mode),
            feedback: config.feedback_mode,
            state: SessionState::Idle,
            bank: None,
            board: None,
            history: MoveLog::new(mode.history_enabled()),
            score: Score::ZERO,
            clock: Clock::new(),
            rng,
            events: Vec::new(),
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────

    /// Game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current score.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Elapsed seconds.
    pub fn elapsed(&self) -> u64 {
        self.clock.elapsed()
    }

    /// Configuration for the current (or next) round.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Feedback mode in force.
    pub fn feedback_mode(&self) -> FeedbackMode {
        self.feedback
    }

    /// Token of the running clock, if any.
    pub fn clock_token(&self) -> Option<ClockToken> {
        self.clock.token()
    }

    /// Undo/redo log.
    pub fn history(&self) -> &MoveLog {
        &self.history
    }

    /// Loaded chapter entries.
    pub fn bank(&self) -> Option<&ItemBank> {
        self.bank.as_ref()
    }

    /// Slot occupancy, for the placement-based modes.
    pub fn placement(&self) -> Option<&PlacementState> {
        self.board.as_ref().and_then(Board::placement)
    }

    /// The fill-in-blank board, if this is a fill-in-blank session.
    pub fn fill_blank(&self) -> Option<&FillBlankBoard> {
        match &self.board {
            Some(Board::FillBlank(board)) => Some(board),
            _ => None,
        }
    }

    /// The hangman board, if this is a hangman session.
    pub fn hangman(&self) -> Option<&HangmanBoard> {
        match &self.board {
            Some(Board::Hangman(board)) => Some(board),
            _ => None,
        }
    }

    /// The matching board, if this is a matching session.
    pub fn matching(&self) -> Option<&MatchingBoard> {
        match &self.board {
            Some(Board::Matching(board)) => Some(board),
            _ => None,
        }
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ─── Loading ─────────────────────────────────────────────

    /// Marks a chapter fetch as in flight. Any running session stops.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn begin_loading(&mut self) {
        self.clock.stop();
        self.transition(SessionState::Loading);
    }

    /// Reports a failed chapter fetch and returns to `Idle`.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn load_failed(&mut self, reason: impl Into<String> + std::fmt::Debug) {
        let reason = reason.into();
        warn!(%reason, "Chapter load failed");
        self.clock.stop();
        self.bank = None;
        self.board = None;
        self.history.clear();
        self.transition(SessionState::Idle);
        self.events.push(SessionEvent::LoadFailed { reason });
    }

    /// Loads a chapter and prepares a fresh board.
    ///
    /// Accepted in any state. Returns the number of usable entries.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyItemSet`] if no entry has both a term and a
    /// definition; the session is then `Idle`.
    #[instrument(
        skip(self, chapter),
        fields(mode = %self.mode, chapter_id = %chapter.chapter_id())
    )]
    pub fn load_chapter(&mut self, chapter: &Chapter) -> Result<usize, EngineError> {
        self.begin_loading();
        let bank = match self.mode {
            GameMode::Matching => {
                ItemBank::load_limited(chapter, self.config.pair_limit, &mut self.rng)
            }
            GameMode::FillBlank | GameMode::Hangman => ItemBank::load(chapter),
        };
        if bank.is_empty() {
            self.load_failed(EngineError::EmptyItemSet.to_string());
            return Err(EngineError::EmptyItemSet);
        }

        let entries = bank.len();
        self.bank = Some(bank);
        self.prepare()?;
        info!(entries, "Chapter loaded");
        self.transition(SessionState::Ready);
        Ok(entries)
    }

    /// Builds a fresh board from the bank and zeroes score, time and history.
    fn prepare(&mut self) -> Result<(), EngineError> {
        let Some(bank) = self.bank.as_ref() else {
            return Err(EngineError::EmptyItemSet);
        };
        let board = match self.mode {
            GameMode::FillBlank => Board::FillBlank(FillBlankBoard::new(bank, &mut self.rng)),
            GameMode::Hangman => Board::Hangman(HangmanBoard::from_bank(
                bank,
                &mut self.rng,
                self.config.max_wrong_guesses,
            )?),
            GameMode::Matching => Board::Matching(MatchingBoard::new(bank, &mut self.rng)),
        };
        self.board = Some(board);
        self.history = MoveLog::new(self.mode.history_enabled());
        self.feedback = self.config.feedback_mode;
        self.clock.reset();
        self.score = Score::ZERO;

        self.events.push(SessionEvent::ScoreChanged { score: 0 });
        self.events.push(SessionEvent::TimeChanged { seconds: 0 });
        if self.mode == GameMode::Matching {
            self.events.push(SessionEvent::MovesChanged { moves: 0 });
        }
        self.history_changed();
        Ok(())
    }

    /// Replaces the configuration between rounds.
    ///
    /// Feedback mode, wrong-guess budget and lock policy take effect when
    /// the next round is prepared (`start` or `reset`); a `Ready` board is
    /// rebuilt at once. The pair limit takes effect at the next chapter load.
    ///
    /// # Errors
    ///
    /// [`EngineError::IllegalStateTransition`] while a round is `Active`.
    #[instrument(skip(self), fields(mode = %self.mode, state = %self.state))]
    pub fn set_config(&mut self, config: SessionConfig) -> Result<(), EngineError> {
        if self.state.accepts_actions() {
            warn!("Configuration change refused mid-round");
            return Err(EngineError::IllegalStateTransition {
                command: "set_config",
                state: self.state,
            });
        }
        self.config = config.normalized();
        info!(config = ?self.config, "Configuration replaced");
        if self.state == SessionState::Ready {
            self.prepare()?;
        }
        Ok(())
    }

    // ─── Lifecycle ───────────────────────────────────────────

    /// Starts the session: fresh board, score 0, elapsed 0, clock running.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyItemSet`] when no chapter is loaded and
    /// [`EngineError::IllegalStateTransition`] from any state but `Ready`.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn start(&mut self) -> Result<ClockToken, EngineError> {
        match self.state {
            SessionState::Ready => {}
            SessionState::Idle => return Err(EngineError::EmptyItemSet),
            state => {
                return Err(EngineError::IllegalStateTransition {
                    command: "start",
                    state,
                });
            }
        }
        self.prepare()?;
        let token = self.clock.start();
        self.transition(SessionState::Active);

        if self.hangman().is_some_and(HangmanBoard::is_solved) {
            info!("Word has nothing to guess");
            self.finish(SessionState::Won);
        }
        Ok(token)
    }

    /// Returns to the freshly loaded state, or `Idle` without a chapter.
    ///
    /// Accepted in any state.
    #[instrument(skip(self), fields(mode = %self.mode, state = %self.state))]
    pub fn reset(&mut self) -> SessionState {
        self.clock.reset();
        if self.bank.is_some() && self.prepare().is_ok() {
            self.transition(SessionState::Ready);
        } else {
            self.board = None;
            self.history.clear();
            self.score = Score::ZERO;
            self.events.push(SessionEvent::TimeChanged { seconds: 0 });
            self.transition(SessionState::Idle);
        }
        self.state
    }

    /// Gives up. Hangman reveals the word.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn end(&mut self) -> Result<(), EngineError> {
        self.require_active("end")?;
        self.finish(SessionState::Ended);
        Ok(())
    }

    /// Advances the clock for a tick issued under `token`.
    ///
    /// Ticks for an inactive session or an earlier clock run are dropped.
    pub fn tick(&mut self, token: ClockToken) -> Option<u64> {
        if !self.state.accepts_actions() {
            debug!(state = %self.state, "Discarding tick for inactive session");
            return None;
        }
        let seconds = self.clock.tick(token)?;
        self.events.push(SessionEvent::TimeChanged { seconds });
        Some(seconds)
    }

    // ─── Placement ───────────────────────────────────────────

    /// Drops an item into a slot.
    ///
    /// Fill-in-blank evicts any occupant to the bank; matching treats the
    /// drop as a match attempt.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn place(&mut self, item: ItemId, slot: SlotId) -> Result<PlaceOutcome, EngineError> {
        self.require_active("place")?;
        let outcome = match self.mode {
            GameMode::FillBlank => self.fill_attempt(item, slot, false),
            GameMode::Matching => self.match_attempt(item, slot),
            GameMode::Hangman => Err(unsupported(self.mode, "place")),
        };
        self.check_invariants();
        outcome
    }

    /// Drops an item into a slot, sending the occupant to the item's origin.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn swap(&mut self, item: ItemId, slot: SlotId) -> Result<PlaceOutcome, EngineError> {
        self.require_active("swap")?;
        if self.mode != GameMode::FillBlank {
            return Err(unsupported(self.mode, "swap"));
        }
        let outcome = self.fill_attempt(item, slot, true);
        self.check_invariants();
        outcome
    }

    /// Drags a slot's occupant back to the word bank.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn return_to_bank(&mut self, slot: SlotId) -> Result<Option<Move>, EngineError> {
        self.require_active("return_to_bank")?;
        let Some(Board::FillBlank(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "return_to_bank"));
        };
        let Some(action) = board.placement_mut().return_to_bank(slot)? else {
            return Ok(None);
        };
        self.history.record(action);
        self.emit_slots(&action.touched_slots());
        self.history_changed();
        self.check_invariants();
        Ok(Some(action))
    }

    fn fill_attempt(
        &mut self,
        item: ItemId,
        slot: SlotId,
        swap: bool,
    ) -> Result<PlaceOutcome, EngineError> {
        let feedback = self.feedback;
        let lock_correct = self.config.lock_correct;
        let Some(Board::FillBlank(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "place"));
        };
        let attempt = board.attempt(item, slot, swap, feedback, lock_correct)?;
        let frozen = board.is_submitted();

        match attempt {
            Attempt::Unchanged => Ok(PlaceOutcome::Unchanged),
            Attempt::Rejected => {
                info!(%item, %slot, "Wrong drop rejected");
                self.events.push(SessionEvent::PlacementRejected { item, slot });
                if !frozen {
                    self.adjust_score(self.policy.reject);
                }
                Ok(PlaceOutcome::Rejected)
            }
            Attempt::Applied { action, awards } => {
                debug!(%action, awards, "Placement accepted");
                self.history.record(action);
                self.emit_slots(&action.touched_slots());
                if !frozen {
                    for _ in 0..awards {
                        self.adjust_score(self.policy.accept);
                    }
                }
                self.history_changed();
                Ok(PlaceOutcome::Placed { action })
            }
        }
    }

    // ─── History ─────────────────────────────────────────────

    /// Reverts the last move. A no-op outside `Active` or with nothing to undo.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn undo(&mut self) -> Result<Option<Move>, EngineError> {
        self.step_history(true)
    }

    /// Re-applies the last undone move. A no-op outside `Active` or with
    /// nothing to redo.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn redo(&mut self) -> Result<Option<Move>, EngineError> {
        self.step_history(false)
    }

    fn step_history(&mut self, backwards: bool) -> Result<Option<Move>, EngineError> {
        if !self.state.accepts_actions() {
            debug!(state = %self.state, "Ignoring history step outside active session");
            return Ok(None);
        }
        let Some(Board::FillBlank(board)) = self.board.as_mut() else {
            return Ok(None);
        };
        let result = if backwards {
            self.history.undo(board.placement_mut())
        } else {
            self.history.redo(board.placement_mut())
        };
        if self.config.lock_correct {
            board.relock();
        }

        match result {
            Ok(Some(action)) => {
                self.emit_slots(&action.touched_slots());
                self.history_changed();
                self.check_invariants();
                Ok(Some(action))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.history_changed();
                Err(e)
            }
        }
    }

    // ─── Judgement ───────────────────────────────────────────

    /// Judges the whole board and freezes the score.
    ///
    /// The session is won only if every blank is correct, otherwise the
    /// board stays interactive.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn submit_all(&mut self) -> Result<SubmitReport, EngineError> {
        self.require_active("submit_all")?;
        let Some(Board::FillBlank(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "submit_all"));
        };
        let report = board.submit();
        info!(
            correct = report.correct.len(),
            filled = report.filled(),
            total = report.total,
            "Board submitted"
        );
        self.emit_all_slots();
        if report.all_correct() {
            self.finish(SessionState::Won);
        }
        Ok(report)
    }

    /// Re-derives one slot's correctness tag under immediate feedback.
    ///
    /// A correct slot earns its points the first time only. Returns `None`
    /// for an empty slot or while tags are hidden.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn evaluate_single(&mut self, slot: SlotId) -> Result<Option<bool>, EngineError> {
        self.require_active("evaluate_single")?;
        let immediate = self.feedback == FeedbackMode::Immediate;
        let Some(Board::FillBlank(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "evaluate_single"));
        };
        if board.placement().slot(slot).is_none() {
            return Err(EngineError::InvalidTarget(format!("unknown {}", slot)));
        }
        if !immediate {
            debug!(%slot, "Tags hidden until submit");
            return Ok(None);
        }
        let frozen = board.is_submitted();
        let newly_settled = board.settle(slot);
        let tag = board.placement().tag(slot);
        if newly_settled && !frozen {
            self.adjust_score(self.policy.accept);
        }
        self.emit_slots(&[slot]);
        Ok(tag)
    }

    /// Fills every slot correctly, zeroes the score, clears history and
    /// ends the session. Hangman reveals the word.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn solve_all(&mut self) -> Result<(), EngineError> {
        self.require_active("solve_all")?;
        let unsolved = match self.board.as_mut() {
            Some(Board::FillBlank(board)) => board.solve(),
            Some(Board::Matching(board)) => {
                let unsolved = board.solve();
                self.events.push(SessionEvent::MovesChanged { moves: 0 });
                unsolved
            }
            Some(Board::Hangman(_)) | None => Vec::new(),
        };
        if !unsolved.is_empty() {
            warn!(?unsolved, "Some slots have no correct item");
        }
        self.history.clear();
        self.score = Score::ZERO;
        self.events.push(SessionEvent::ScoreChanged { score: 0 });
        self.history_changed();
        self.emit_all_slots();
        self.check_invariants();
        self.finish(SessionState::Ended);
        Ok(())
    }

    /// Switches between immediate and on-submit feedback.
    ///
    /// Accepted in any state. Re-tags occupied slots without touching
    /// score or occupancy.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn toggle_feedback_mode(&mut self, immediate: bool) -> Result<FeedbackMode, EngineError> {
        if self.mode != GameMode::FillBlank {
            return Err(unsupported(self.mode, "toggle_feedback"));
        }
        self.feedback = if immediate {
            FeedbackMode::Immediate
        } else {
            FeedbackMode::OnSubmit
        };
        info!(feedback = %self.feedback, "Feedback mode changed");
        self.emit_all_slots();
        Ok(self.feedback)
    }

    // ─── Hangman ─────────────────────────────────────────────

    /// Guesses a letter. Wins when the word is complete, loses when the
    /// wrong-guess budget is spent.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn guess(&mut self, letter: char) -> Result<GuessOutcome, EngineError> {
        self.require_active("guess")?;
        let Some(Board::Hangman(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "guess"));
        };
        let outcome = board.guess(letter)?;
        let wrong_guesses = board.wrong_guesses();
        let solved = board.is_solved();
        let lost = board.is_lost();

        let hit = match &outcome {
            GuessOutcome::Repeated => {
                debug!(%letter, "Letter already guessed");
                return Ok(outcome);
            }
            GuessOutcome::Hit { .. } => true,
            GuessOutcome::Miss => false,
        };
        self.events.push(SessionEvent::GuessResolved {
            letter: letter.to_ascii_uppercase(),
            hit,
            wrong_guesses,
        });
        if solved {
            self.finish(SessionState::Won);
        } else if lost {
            self.finish(SessionState::Lost);
        }
        Ok(outcome)
    }

    // ─── Matching ────────────────────────────────────────────

    /// Selects a term card; pairs it with a selected definition card.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn select_term(&mut self, item: ItemId) -> Result<PlaceOutcome, EngineError> {
        self.require_active("select_term")?;
        let Some(Board::Matching(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "select_term"));
        };
        let selection = board.select_term(item)?;
        self.resolve_selection(selection)
    }

    /// Selects a definition card; pairs it with a selected term card.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn select_definition(&mut self, slot: SlotId) -> Result<PlaceOutcome, EngineError> {
        self.require_active("select_definition")?;
        let Some(Board::Matching(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "select_definition"));
        };
        let selection = board.select_definition(slot)?;
        self.resolve_selection(selection)
    }

    fn resolve_selection(&mut self, selection: Selection) -> Result<PlaceOutcome, EngineError> {
        match selection {
            Selection::Ignored => Ok(PlaceOutcome::Ignored),
            Selection::Pending => Ok(PlaceOutcome::Selected),
            Selection::Pair(item, slot) => {
                let outcome = self.match_attempt(item, slot);
                self.check_invariants();
                outcome
            }
        }
    }

    fn match_attempt(&mut self, item: ItemId, slot: SlotId) -> Result<PlaceOutcome, EngineError> {
        let Some(Board::Matching(board)) = self.board.as_mut() else {
            return Err(unsupported(self.mode, "place"));
        };
        let outcome = board.attempt(item, slot)?;
        let moves = board.moves();
        let complete = board.is_complete();

        match outcome {
            MatchOutcome::AlreadyMatched => Ok(PlaceOutcome::Ignored),
            MatchOutcome::Mismatched => {
                self.events.push(SessionEvent::MovesChanged { moves });
                self.events.push(SessionEvent::PlacementRejected { item, slot });
                self.adjust_score(self.policy.reject);
                Ok(PlaceOutcome::Mismatched { item, slot })
            }
            MatchOutcome::Matched => {
                self.events.push(SessionEvent::MovesChanged { moves });
                self.emit_slots(&[slot]);
                self.adjust_score(self.policy.accept);
                if complete {
                    self.finish(SessionState::Won);
                }
                Ok(PlaceOutcome::Matched { item, slot })
            }
        }
    }

    // ─── Dispatch ────────────────────────────────────────────

    /// Runs a command.
    #[instrument(skip(self), fields(command = command.name()))]
    pub fn execute(&mut self, command: Command) -> Result<CommandStatus, EngineError> {
        let status = match command {
            Command::Start => CommandStatus::Started {
                token: self.start()?,
            },
            Command::Place { item, slot } => CommandStatus::Placement {
                outcome: self.place(item, slot)?,
            },
            Command::Swap { item, slot } => CommandStatus::Placement {
                outcome: self.swap(item, slot)?,
            },
            Command::ReturnToBank { slot } => CommandStatus::Placement {
                outcome: match self.return_to_bank(slot)? {
                    Some(action) => PlaceOutcome::Placed { action },
                    None => PlaceOutcome::Unchanged,
                },
            },
            Command::Undo => CommandStatus::History {
                action: self.undo()?,
            },
            Command::Redo => CommandStatus::History {
                action: self.redo()?,
            },
            Command::SubmitAll => CommandStatus::Submitted {
                report: self.submit_all()?,
            },
            Command::SolveAll => {
                self.solve_all()?;
                CommandStatus::Transitioned { state: self.state }
            }
            Command::Reset => CommandStatus::Transitioned {
                state: self.reset(),
            },
            Command::End => {
                self.end()?;
                CommandStatus::Transitioned { state: self.state }
            }
            Command::ToggleFeedback { immediate } => CommandStatus::Feedback {
                mode: self.toggle_feedback_mode(immediate)?,
            },
            Command::Guess { letter } => CommandStatus::Guessed {
                outcome: self.guess(letter)?,
            },
            Command::SelectTerm { item } => CommandStatus::Placement {
                outcome: self.select_term(item)?,
            },
            Command::SelectDefinition { slot } => CommandStatus::Placement {
                outcome: self.select_definition(slot)?,
            },
            Command::EvaluateSingle { slot } => CommandStatus::Evaluated {
                correct: self.evaluate_single(slot)?,
            },
            Command::SetDifficulty { max_wrong_guesses } => {
                let config = self
                    .config
                    .clone()
                    .with_max_wrong_guesses(max_wrong_guesses);
                self.set_config(config)?;
                CommandStatus::Configured {
                    config: self.config.clone(),
                }
            }
        };
        Ok(status)
    }

    /// Captures everything needed to draw the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let board = self.board.as_ref().map(|board| match board {
            Board::FillBlank(board) => board.view(self.tags_visible()),
            Board::Hangman(board) => board.view(),
            Board::Matching(board) => board.view(),
        });
        SessionSnapshot {
            state: self.state,
            mode: self.mode,
            feedback_mode: self.feedback,
            score: self.score.value(),
            elapsed: self.clock.elapsed(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            board,
        }
    }

    // ─── Internals ───────────────────────────────────────────

    fn require_active(&self, command: &'static str) -> Result<(), EngineError> {
        if self.state.accepts_actions() {
            Ok(())
        } else {
            warn!(command, state = %self.state, "Command ignored");
            Err(EngineError::IllegalStateTransition {
                command,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        info!(from = %self.state, to = %next, "Session state changed");
        self.state = next;
        self.events.push(SessionEvent::SessionStateChanged { state: next });
    }

    /// Stops the clock and freezes the board in a terminal state.
    fn finish(&mut self, next: SessionState) {
        self.clock.stop();
        match self.board.as_mut() {
            Some(Board::Hangman(board)) if next != SessionState::Won => {
                let missed = board.reveal();
                let word = board.word();
                self.events.push(SessionEvent::WordRevealed { word, missed });
            }
            Some(Board::Matching(board)) => board.clear_selection(),
            _ => {}
        }
        info!(
            score = self.score.value(),
            elapsed = self.clock.elapsed(),
            "Session finished"
        );
        self.transition(next);
    }

    fn adjust_score(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        let before = self.score;
        let after = self.score.apply(delta);
        debug!(delta, %before, %after, "Score adjusted");
        if after != before {
            self.events.push(SessionEvent::ScoreChanged {
                score: after.value(),
            });
        }
    }

    fn history_changed(&mut self) {
        self.events.push(SessionEvent::MoveHistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn tags_visible(&self) -> bool {
        match &self.board {
            Some(Board::FillBlank(board)) => {
                self.feedback == FeedbackMode::Immediate || board.is_submitted()
            }
            Some(Board::Matching(_)) => true,
            _ => false,
        }
    }

    fn emit_slots(&mut self, slots: &[SlotId]) {
        let tags_visible = self.tags_visible();
        let Some(placement) = self.placement() else {
            return;
        };
        let events: Vec<SessionEvent> = slots
            .iter()
            .map(|slot| SessionEvent::PlacementChanged {
                slot: *slot,
                occupant: placement.occupant(*slot),
                correct: if tags_visible {
                    placement.tag(*slot)
                } else {
                    None
                },
            })
            .collect();
        self.events.extend(events);
    }

    fn emit_all_slots(&mut self) {
        let slots: Vec<SlotId> = self
            .placement()
            .map(|p| p.slots().iter().map(|s| *s.id()).collect())
            .unwrap_or_default();
        self.emit_slots(&slots);
    }

    fn check_invariants(&self) {
        #[cfg(debug_assertions)]
        if let Some(placement) = self.placement() {
            crate::invariants::assert_invariants(placement);
        }
    }
}

fn unsupported(mode: GameMode, command: &'static str) -> EngineError {
    warn!(command, %mode, "Command not supported in mode");
    EngineError::Unsupported { command, mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TermDefinition;

    fn chapter() -> Chapter {
        Chapter::new(
            "1",
            vec![
                TermDefinition::new("A", "first"),
                TermDefinition::new("B", "second"),
            ],
        )
    }

    fn active(mode: GameMode) -> SessionController {
        let mut session = SessionController::with_seed(mode, SessionConfig::default(), 1);
        session.load_chapter(&chapter()).unwrap();
        session.start().unwrap();
        session
    }

    #[test]
    fn test_start_requires_loaded_chapter() {
        let mut session =
            SessionController::with_seed(GameMode::FillBlank, SessionConfig::default(), 1);
        assert_eq!(session.start(), Err(EngineError::EmptyItemSet));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_twice_is_illegal() {
        let mut session = active(GameMode::FillBlank);
        assert!(matches!(
            session.start(),
            Err(EngineError::IllegalStateTransition { command: "start", .. })
        ));
    }

    #[test]
    fn test_commands_outside_active_are_rejected() {
        let mut session =
            SessionController::with_seed(GameMode::FillBlank, SessionConfig::default(), 1);
        session.load_chapter(&chapter()).unwrap();
        assert!(matches!(
            session.place(ItemId(0), SlotId(0)),
            Err(EngineError::IllegalStateTransition { .. })
        ));
        assert_eq!(session.undo(), Ok(None));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_unsupported_commands_per_mode() {
        let mut session = active(GameMode::Hangman);
        assert!(matches!(
            session.place(ItemId(0), SlotId(0)),
            Err(EngineError::Unsupported { .. })
        ));
        let mut session = active(GameMode::Matching);
        assert!(matches!(
            session.swap(ItemId(0), SlotId(0)),
            Err(EngineError::Unsupported { .. })
        ));
        assert!(matches!(session.guess('a'), Err(EngineError::Unsupported { .. })));
    }

    #[test]
    fn test_ticks_only_count_while_active() {
        let mut session = active(GameMode::FillBlank);
        let token = session.clock_token().unwrap();
        assert_eq!(session.tick(token), Some(1));
        session.end().unwrap();
        assert_eq!(session.tick(token), None);
        assert_eq!(session.elapsed(), 1);
    }

    #[test]
    fn test_reset_returns_to_ready() {
        let mut session = active(GameMode::FillBlank);
        session.place(ItemId(0), SlotId(0)).unwrap();
        assert_eq!(session.reset(), SessionState::Ready);
        assert_eq!(session.score(), Score::ZERO);
        assert!(!session.history().can_undo());
        assert_eq!(session.placement().unwrap().filled_count(), 0);
    }

    #[test]
    fn test_execute_dispatches() {
        let mut session =
            SessionController::with_seed(GameMode::FillBlank, SessionConfig::default(), 1);
        session.load_chapter(&chapter()).unwrap();
        assert!(matches!(
            session.execute(Command::Start),
            Ok(CommandStatus::Started { .. })
        ));
        assert!(matches!(
            session.execute(Command::Place {
                item: ItemId(1),
                slot: SlotId(1)
            }),
            Ok(CommandStatus::Placement {
                outcome: PlaceOutcome::Placed { .. }
            })
        ));
        assert_eq!(
            session.execute(Command::End),
            Ok(CommandStatus::Transitioned {
                state: SessionState::Ended
            })
        );
    }
}
