use std::fmt;

pub type RequestId = u64;

/// Styling mode carried with a request, mirrored from the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleChoice {
    NoCss,
    #[default]
    Simple,
    Colorful,
}

/// One generation job handed to the engine. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRequest {
    pub prompt: String,
    pub style: StyleChoice,
}

/// Heuristic phase derived from the accumulated model output so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ProgressPhase {
    #[default]
    Init,
    HtmlStructure,
    CssStyling,
    ScriptLogic,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationProgress {
    pub request_id: RequestId,
    pub phase: ProgressPhase,
    pub chars_received: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The response stream opened with a success status.
    StreamOpened { request_id: RequestId },
    Progress(GenerationProgress),
    /// All deltas received; final extraction is running.
    Extracting { request_id: RequestId },
    Completed {
        request_id: RequestId,
        result: Result<GeneratedDocument, GenError>,
    },
}

/// Raw accumulated model output for one request, before extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub chars_received: u64,
}

/// The final, sanitized HTML artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub html: String,
    pub chars_streamed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenError {
    pub kind: FailureKind,
    pub message: String,
}

impl GenError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for GenError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    Auth,
    RateLimit,
    Stream,
    EmptyDocument,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Auth => write!(f, "authentication rejected"),
            FailureKind::RateLimit => write!(f, "rate limit exceeded"),
            FailureKind::Stream => write!(f, "stream error"),
            FailureKind::EmptyDocument => write!(f, "no usable document"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
