use crate::view_model::AppViewModel;

/// Styling mode requested for the generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleChoice {
    /// Plain HTML and JavaScript only; fastest to generate.
    NoCss,
    /// Clean, professional design with restrained styling.
    #[default]
    Simple,
    /// Vibrant colors, gradients and playful animations.
    Colorful,
}

/// One submitted generation job. Immutable once sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub style: StyleChoice,
}

/// Lifecycle of the single in-flight generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Requesting,
    Streaming,
    Extracting,
    Done,
    Failed,
}

impl SessionState {
    /// True while a request occupies the engine; submission is blocked.
    pub fn in_flight(self) -> bool {
        matches!(
            self,
            SessionState::Requesting | SessionState::Streaming | SessionState::Extracting
        )
    }
}

/// Heuristic generation phase derived from the accumulated model output.
///
/// Ordered, and monotonically non-decreasing in the common case, but the
/// classifier is substring-based so regressions are possible and tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ProgressPhase {
    #[default]
    Init,
    HtmlStructure,
    CssStyling,
    ScriptLogic,
    Complete,
}

/// Category of a failed generation, for user-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Network,
    Timeout,
    Http,
    Auth,
    RateLimit,
    Stream,
    EmptyDocument,
    Cancelled,
}

impl FailureCategory {
    /// Auth and rate-limit failures force the credential prompt back open.
    pub fn requires_credential(self) -> bool {
        matches!(self, FailureCategory::Auth | FailureCategory::RateLimit)
    }
}

/// A categorized, user-facing description of why a generation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub category: FailureCategory,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    prompt: String,
    style: StyleChoice,
    dark_mode: bool,
    session: SessionState,
    phase: ProgressPhase,
    chars_received: u64,
    document: Option<String>,
    saved_path: Option<String>,
    failure: Option<FailureNotice>,
    needs_credential: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded from persisted preferences at startup.
    pub fn with_preferences(dark_mode: bool) -> Self {
        Self {
            dark_mode,
            ..Self::default()
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            phase: self.phase,
            chars_received: self.chars_received,
            can_submit: !self.session.in_flight() && !self.prompt.trim().is_empty(),
            needs_credential: self.needs_credential,
            document: self.document.clone(),
            saved_path: self.saved_path.clone(),
            failure: self.failure.clone(),
            dark_mode: self.dark_mode,
            dirty: self.dirty,
        }
    }

    /// Returns and clears the dirty flag; the driver renders only when set.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn set_prompt(&mut self, prompt: String) {
        if self.prompt != prompt {
            self.prompt = prompt;
            self.dirty = true;
        }
    }

    pub(crate) fn set_style(&mut self, style: StyleChoice) {
        if self.style != style {
            self.style = style;
            self.dirty = true;
        }
    }

    pub(crate) fn current_request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.clone(),
            style: self.style,
        }
    }

    /// Clears the previous outcome and moves into `Requesting`.
    pub(crate) fn begin_request(&mut self) {
        self.session = SessionState::Requesting;
        self.phase = ProgressPhase::Init;
        self.chars_received = 0;
        self.document = None;
        self.saved_path = None;
        self.failure = None;
        self.needs_credential = false;
        self.dirty = true;
    }

    pub(crate) fn mark_streaming(&mut self) {
        self.session = SessionState::Streaming;
        self.dirty = true;
    }

    pub(crate) fn apply_progress(&mut self, phase: ProgressPhase, chars_received: u64) {
        self.phase = phase;
        self.chars_received = chars_received;
        self.dirty = true;
    }

    pub(crate) fn begin_extraction(&mut self) {
        self.session = SessionState::Extracting;
        self.dirty = true;
    }

    pub(crate) fn complete(&mut self, document: String) {
        self.session = SessionState::Done;
        self.phase = ProgressPhase::Complete;
        self.document = Some(document);
        self.dirty = true;
    }

    /// Aborts the generation: partial output is discarded, never shown.
    pub(crate) fn fail(&mut self, notice: FailureNotice) {
        self.needs_credential = notice.category.requires_credential();
        self.session = SessionState::Failed;
        self.document = None;
        self.failure = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn replace_document(&mut self, document: String) {
        self.document = Some(document);
        self.saved_path = None;
        self.dirty = true;
    }

    pub(crate) fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub(crate) fn record_saved(&mut self, path: Option<String>) {
        self.saved_path = path;
        self.dirty = true;
    }

    pub(crate) fn credential_supplied(&mut self) {
        self.needs_credential = false;
        self.dirty = true;
    }

    pub(crate) fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dirty = true;
        self.dark_mode
    }
}
