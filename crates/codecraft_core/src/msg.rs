#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the site description input.
    PromptChanged(String),
    /// User picked a styling mode.
    StyleSelected(crate::StyleChoice),
    /// User pressed Generate.
    GenerateClicked,
    /// Engine opened the response stream.
    StreamOpened,
    /// Engine progress while streaming deltas.
    GenerationProgress {
        phase: crate::ProgressPhase,
        chars_received: u64,
    },
    /// Engine started final extraction of the accumulated output.
    ExtractionStarted,
    /// Engine finished: the extracted document, or a categorized failure.
    GenerationDone {
        result: Result<String, crate::FailureNotice>,
    },
    /// User edited the generated document before saving.
    DocumentEdited(String),
    /// User asked to save the generated document to disk.
    SaveRequested,
    /// Export effect completed; `None` means the write failed.
    ExportFinished { path: Option<String> },
    /// User toggled the dark/light preference.
    ThemeToggled,
    /// User entered a new API credential.
    ApiKeySubmitted(String),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
