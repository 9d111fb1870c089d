use std::sync::Once;

use codecraft_core::{
    update, AppState, FailureCategory, FailureNotice, Msg, ProgressPhase, SessionState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(craft_logging::initialize_for_tests);
}

fn in_flight_state() -> AppState {
    let state = AppState::new();
    let (state, _) = update(state, Msg::PromptChanged("a site".to_string()));
    let (state, _) = update(state, Msg::GenerateClicked);
    state
}

#[test]
fn progress_events_ignored_when_idle() {
    init_logging();
    let mut state = AppState::new();
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::GenerationProgress {
            phase: ProgressPhase::ScriptLogic,
            chars_received: 999,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().phase, ProgressPhase::Init);
    assert!(!state.consume_dirty());
}

#[test]
fn stale_completion_ignored_after_failure() {
    init_logging();
    let state = in_flight_state();
    let (state, _) = update(
        state,
        Msg::GenerationDone {
            result: Err(FailureNotice {
                category: FailureCategory::Network,
                message: "connection refused".to_string(),
            }),
        },
    );
    assert_eq!(state.session(), SessionState::Failed);

    // A late success from an abandoned request must not resurrect the job.
    let (state, effects) = update(
        state,
        Msg::GenerationDone {
            result: Ok("<html></html>".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Failed);
    assert_eq!(state.view().document, None);
}

#[test]
fn edit_and_save_ignored_unless_done() {
    init_logging();
    let state = in_flight_state();

    let (state, effects) = update(state, Msg::DocumentEdited("<p>hi</p>".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.view().document, None);

    let (_state, effects) = update(state, Msg::SaveRequested);
    assert!(effects.is_empty());
}

#[test]
fn stream_opened_ignored_outside_requesting() {
    init_logging();
    let mut state = AppState::new();
    state.consume_dirty();

    let (mut state, effects) = update(state, Msg::StreamOpened);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert!(!state.consume_dirty());
}

#[test]
fn tick_and_noop_leave_state_untouched() {
    init_logging();
    let mut state = in_flight_state();
    state.consume_dirty();
    let before = state.view();

    let (state, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    let (mut state, effects) = update(state, Msg::NoOp);
    assert!(effects.is_empty());

    let mut after = state.view();
    // Ignore the dirty flag when comparing; both views were taken clean.
    after.dirty = before.dirty;
    assert_eq!(after, before);
    assert!(!state.consume_dirty());
}
