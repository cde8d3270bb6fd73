//! Undo/redo properties of fill-in-the-blank sessions.

use study_games_engine::{
    Chapter, FeedbackMode, GameMode, ItemId, SessionConfig, SessionController, SessionState,
    SlotId, TermDefinition,
};

fn session() -> SessionController {
    let chapter = Chapter::new(
        "3",
        vec![
            TermDefinition::new("one", "1"),
            TermDefinition::new("two", "2"),
            TermDefinition::new("three", "3"),
        ],
    );
    let config = SessionConfig::default().with_feedback_mode(FeedbackMode::OnSubmit);
    let mut session = SessionController::with_seed(GameMode::FillBlank, config, 9);
    session.load_chapter(&chapter).unwrap();
    session.start().unwrap();
    session
}

#[test]
fn test_place_then_undo_restores_prior_state() {
    let mut session = session();
    session.place(ItemId(0), SlotId(0)).unwrap();
    let before = session.placement().unwrap().clone();

    session.place(ItemId(1), SlotId(0)).unwrap();
    session.undo().unwrap();
    assert_eq!(session.placement().unwrap(), &before);
}

#[test]
fn test_undo_then_redo_reproduces_post_state() {
    let mut session = session();
    session.place(ItemId(2), SlotId(1)).unwrap();
    session.place(ItemId(0), SlotId(2)).unwrap();
    session.swap(ItemId(2), SlotId(2)).unwrap();
    let after = session.placement().unwrap().clone();

    session.undo().unwrap();
    assert_ne!(session.placement().unwrap(), &after);
    session.redo().unwrap();
    assert_eq!(session.placement().unwrap(), &after);
}

#[test]
fn test_undo_of_swap_restores_both_items() {
    let mut session = session();
    session.place(ItemId(0), SlotId(0)).unwrap();
    session.place(ItemId(1), SlotId(1)).unwrap();
    let before = session.placement().unwrap().clone();

    session.swap(ItemId(0), SlotId(1)).unwrap();
    let placement = session.placement().unwrap();
    assert_eq!(placement.occupant(SlotId(1)), Some(ItemId(0)));
    assert_eq!(placement.occupant(SlotId(0)), Some(ItemId(1)));

    session.undo().unwrap();
    assert_eq!(session.placement().unwrap(), &before);
}

#[test]
fn test_new_action_invalidates_redo() {
    let mut session = session();
    session.place(ItemId(0), SlotId(0)).unwrap();
    session.undo().unwrap();
    assert!(session.history().can_redo());

    session.place(ItemId(1), SlotId(2)).unwrap();
    assert!(!session.history().can_redo());
    let before = session.placement().unwrap().clone();
    assert_eq!(session.redo(), Ok(None));
    assert_eq!(session.placement().unwrap(), &before);
}

#[test]
fn test_undo_on_empty_stack_is_idempotent() {
    let mut session = session();
    let placement = session.placement().unwrap().clone();
    let history = session.history().clone();
    let score = session.score();

    assert_eq!(session.undo(), Ok(None));
    assert_eq!(session.undo(), Ok(None));
    assert_eq!(session.placement().unwrap(), &placement);
    assert_eq!(session.history(), &history);
    assert_eq!(session.score(), score);
}

#[test]
fn test_return_to_bank_is_undoable() {
    let mut session = session();
    session.place(ItemId(1), SlotId(1)).unwrap();
    session.return_to_bank(SlotId(1)).unwrap();
    assert!(session.placement().unwrap().bank_items().contains(&ItemId(1)));

    session.undo().unwrap();
    assert_eq!(session.placement().unwrap().occupant(SlotId(1)), Some(ItemId(1)));
}

#[test]
fn test_history_is_ignored_outside_active() {
    let mut session = session();
    session.place(ItemId(0), SlotId(0)).unwrap();
    session.end().unwrap();
    assert_eq!(session.state(), SessionState::Ended);
    assert_eq!(session.undo(), Ok(None));
    assert_eq!(session.placement().unwrap().occupant(SlotId(0)), Some(ItemId(0)));
}
