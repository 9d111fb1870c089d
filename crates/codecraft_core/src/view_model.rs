use crate::{FailureNotice, ProgressPhase, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub phase: ProgressPhase,
    pub chars_received: u64,
    pub can_submit: bool,
    pub needs_credential: bool,
    pub document: Option<String>,
    pub saved_path: Option<String>,
    pub failure: Option<FailureNotice>,
    pub dark_mode: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// Status line for the current stage of the generation.
    pub fn progress_message(&self) -> &'static str {
        match self.session {
            SessionState::Idle => "Ready to generate",
            SessionState::Requesting => "Connecting to AI model...",
            SessionState::Streaming => match self.phase {
                ProgressPhase::Init => "Receiving code...",
                ProgressPhase::HtmlStructure => "Creating HTML structure...",
                ProgressPhase::CssStyling => "Adding CSS styling...",
                ProgressPhase::ScriptLogic => "Adding JavaScript functionality...",
                ProgressPhase::Complete => "Completing website...",
            },
            SessionState::Extracting => "Processing final result...",
            SessionState::Done => "Generation complete!",
            SessionState::Failed => "Error occurred during generation",
        }
    }

    /// Coarse completion percentage, banded per phase.
    pub fn progress_percent(&self) -> u8 {
        match self.session {
            SessionState::Idle => 0,
            SessionState::Requesting => 10,
            SessionState::Streaming => match self.phase {
                ProgressPhase::Init => 20,
                ProgressPhase::HtmlStructure => 40,
                ProgressPhase::CssStyling => 60,
                ProgressPhase::ScriptLogic => 80,
                ProgressPhase::Complete => 90,
            },
            SessionState::Extracting => 90,
            SessionState::Done => 100,
            SessionState::Failed => 0,
        }
    }
}
