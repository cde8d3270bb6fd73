//! Tests for fill-in-the-blank sessions.

use study_games_engine::{
    Chapter, EngineError, FeedbackMode, GameMode, ItemId, PlaceOutcome, Score, SessionConfig,
    SessionController, SessionEvent, SessionState, SlotId, TermDefinition,
};

fn chapter() -> Chapter {
    Chapter::new(
        "2",
        vec![
            TermDefinition::new("Alpha", "first letter"),
            TermDefinition::new("Beta", "second letter"),
        ],
    )
}

fn session(feedback: FeedbackMode) -> SessionController {
    let config = SessionConfig::default().with_feedback_mode(feedback);
    let mut session = SessionController::with_seed(GameMode::FillBlank, config, 42);
    session.load_chapter(&chapter()).unwrap();
    session.start().unwrap();
    session.drain_events();
    session
}

#[test]
fn test_immediate_feedback_rejects_then_accepts() {
    let mut session = session(FeedbackMode::Immediate);

    let outcome = session.place(ItemId(0), SlotId(1)).unwrap();
    assert_eq!(outcome, PlaceOutcome::Rejected);
    let placement = session.placement().unwrap();
    assert!(!placement.is_correct(SlotId(1)));
    assert_eq!(placement.occupant(SlotId(1)), None);
    assert!(!session.history().can_undo(), "Rejected drops are not recorded");
    assert_eq!(session.score(), Score::ZERO, "Score is floored at zero");
    assert!(
        session
            .drain_events()
            .contains(&SessionEvent::PlacementRejected {
                item: ItemId(0),
                slot: SlotId(1)
            })
    );

    let outcome = session.place(ItemId(0), SlotId(0)).unwrap();
    assert!(matches!(outcome, PlaceOutcome::Placed { .. }));
    assert!(session.placement().unwrap().is_correct(SlotId(0)));
    assert_eq!(session.score().value(), 10);

    // A wrong attempt after points were earned costs one point.
    session.place(ItemId(1), SlotId(0)).unwrap();
    assert_eq!(session.score().value(), 9);
}

#[test]
fn test_settled_slot_scores_once() {
    let mut session = session(FeedbackMode::Immediate);
    session.place(ItemId(0), SlotId(0)).unwrap();
    session.return_to_bank(SlotId(0)).unwrap();
    session.place(ItemId(0), SlotId(0)).unwrap();
    assert_eq!(session.score().value(), 10);
    assert_eq!(session.evaluate_single(SlotId(0)), Ok(Some(true)));
    assert_eq!(session.score().value(), 10);
}

#[test]
fn test_dropping_onto_own_slot_changes_nothing() {
    let mut session = session(FeedbackMode::OnSubmit);
    session.place(ItemId(0), SlotId(1)).unwrap();
    let before = session.placement().unwrap().clone();
    assert_eq!(session.place(ItemId(0), SlotId(1)), Ok(PlaceOutcome::Unchanged));
    assert_eq!(session.placement().unwrap(), &before);
    assert_eq!(session.history().moves().len(), 1);
    assert_eq!(session.score().value(), 10);
}

#[test]
fn test_on_submit_scores_every_accepted_drop() {
    let mut session = session(FeedbackMode::OnSubmit);

    let outcome = session.place(ItemId(0), SlotId(0)).unwrap();
    assert!(matches!(outcome, PlaceOutcome::Placed { .. }));
    assert_eq!(session.score().value(), 10);

    // Drops are not judged before submit, so a wrong one is accepted too.
    session.place(ItemId(1), SlotId(0)).unwrap();
    assert_eq!(session.score().value(), 20);

    session.return_to_bank(SlotId(0)).unwrap();
    assert_eq!(session.score().value(), 20);
}

#[test]
fn test_submit_keeps_board_interactive_until_all_correct() {
    let mut session = session(FeedbackMode::OnSubmit);
    session.place(ItemId(0), SlotId(1)).unwrap();
    session.place(ItemId(1), SlotId(0)).unwrap();
    assert_eq!(session.score().value(), 20);

    let report = session.submit_all().unwrap();
    assert_eq!(report.wrong.len(), 2);
    assert!(!report.all_correct());
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.score().value(), 20, "Submitting does not score");

    session.swap(ItemId(0), SlotId(0)).unwrap();
    assert!(session.placement().unwrap().all_correct());

    let report = session.submit_all().unwrap();
    assert!(report.all_correct());
    assert_eq!(session.state(), SessionState::Won);
    assert_eq!(session.score().value(), 20, "Score froze at first submit");
    assert_eq!(session.clock_token(), None);
}

#[test]
fn test_submit_wins_correct_board() {
    let mut session = session(FeedbackMode::OnSubmit);
    session.place(ItemId(0), SlotId(0)).unwrap();
    session.place(ItemId(1), SlotId(1)).unwrap();
    let report = session.submit_all().unwrap();
    assert_eq!(report.correct.len(), 2);
    assert_eq!(session.score().value(), 20);
    assert_eq!(session.state(), SessionState::Won);
}

#[test]
fn test_toggle_feedback_retags_without_scoring() {
    let mut session = session(FeedbackMode::OnSubmit);
    session.place(ItemId(1), SlotId(0)).unwrap();
    session.drain_events();
    let score = session.score();

    assert_eq!(session.toggle_feedback_mode(true), Ok(FeedbackMode::Immediate));
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::PlacementChanged {
        slot: SlotId(0),
        occupant: Some(ItemId(1)),
        correct: Some(false),
    }));
    assert_eq!(session.score(), score);
}

#[test]
fn test_solve_all_ends_with_zero_score() {
    let mut session = session(FeedbackMode::Immediate);
    session.place(ItemId(0), SlotId(0)).unwrap();
    session.solve_all().unwrap();

    assert_eq!(session.state(), SessionState::Ended);
    assert_eq!(session.score(), Score::ZERO);
    assert!(session.placement().unwrap().all_correct());
    assert!(!session.history().can_undo());
    assert!(matches!(
        session.place(ItemId(0), SlotId(1)),
        Err(EngineError::IllegalStateTransition { .. })
    ));
}

#[test]
fn test_lock_correct_blocks_moves_out_of_settled_slots() {
    let config = SessionConfig::default().with_lock_correct(true);
    let mut session = SessionController::with_seed(GameMode::FillBlank, config, 5);
    session.load_chapter(&chapter()).unwrap();
    session.start().unwrap();

    session.place(ItemId(0), SlotId(0)).unwrap();
    assert_eq!(
        session.return_to_bank(SlotId(0)),
        Err(EngineError::SlotLocked(SlotId(0)))
    );

    // Undo is allowed to take a locked placement back.
    assert!(session.undo().unwrap().is_some());
    assert_eq!(session.placement().unwrap().occupant(SlotId(0)), None);
    assert!(!session.placement().unwrap().is_locked(SlotId(0)));

    session.redo().unwrap();
    assert!(session.placement().unwrap().is_locked(SlotId(0)));
}

#[test]
fn test_empty_chapter_stays_idle() {
    let mut session =
        SessionController::with_seed(GameMode::FillBlank, SessionConfig::default(), 1);
    let empty = Chapter::new("9", vec![TermDefinition::new("", "orphan definition")]);
    assert_eq!(session.load_chapter(&empty), Err(EngineError::EmptyItemSet));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(
        session
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::LoadFailed { .. }))
    );
    assert_eq!(session.start(), Err(EngineError::EmptyItemSet));
}
