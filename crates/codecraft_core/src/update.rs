use crate::{AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PromptChanged(prompt) => {
            // Input is locked while a request is in flight; the request
            // snapshot taken at submission must stay immutable.
            if !state.session().in_flight() {
                state.set_prompt(prompt);
            }
            Vec::new()
        }
        Msg::StyleSelected(style) => {
            if !state.session().in_flight() {
                state.set_style(style);
            }
            Vec::new()
        }
        Msg::GenerateClicked => {
            if state.session().in_flight() {
                return (state, Vec::new());
            }
            let request = state.current_request();
            if request.prompt.trim().is_empty() {
                return (state, Vec::new());
            }
            state.begin_request();
            vec![Effect::StartGeneration { request }]
        }
        Msg::StreamOpened => {
            if state.session() == SessionState::Requesting {
                state.mark_streaming();
            }
            Vec::new()
        }
        Msg::GenerationProgress {
            phase,
            chars_received,
        } => {
            if state.session().in_flight() {
                state.apply_progress(phase, chars_received);
            }
            Vec::new()
        }
        Msg::ExtractionStarted => {
            if matches!(
                state.session(),
                SessionState::Requesting | SessionState::Streaming
            ) {
                state.begin_extraction();
            }
            Vec::new()
        }
        Msg::GenerationDone { result } => {
            if !state.session().in_flight() {
                // Stale completion from an abandoned request; `Done` and
                // `Failed` are only left by a brand-new submission.
                return (state, Vec::new());
            }
            match result {
                Ok(document) => state.complete(document),
                Err(notice) => state.fail(notice),
            }
            Vec::new()
        }
        Msg::DocumentEdited(document) => {
            if state.session() == SessionState::Done {
                state.replace_document(document);
            }
            Vec::new()
        }
        Msg::SaveRequested => {
            if state.session() != SessionState::Done {
                return (state, Vec::new());
            }
            match state.document() {
                Some(document) => vec![Effect::ExportDocument {
                    document: document.to_string(),
                }],
                None => Vec::new(),
            }
        }
        Msg::ExportFinished { path } => {
            if state.session() == SessionState::Done {
                state.record_saved(path);
            }
            Vec::new()
        }
        Msg::ThemeToggled => {
            let dark_mode = state.toggle_theme();
            vec![Effect::PersistTheme { dark_mode }]
        }
        Msg::ApiKeySubmitted(api_key) => {
            let api_key = api_key.trim().to_string();
            if api_key.is_empty() {
                return (state, Vec::new());
            }
            state.credential_supplied();
            vec![Effect::StoreCredential { api_key }]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
