use crate::ProgressPhase;

/// Ordered trigger table: rules are evaluated top to bottom against the
/// full accumulated buffer, and a later match overrides an earlier one.
const RULES: &[(fn(&str) -> bool, ProgressPhase)] = &[
    (has_document_start, ProgressPhase::HtmlStructure),
    (has_unclosed_style, ProgressPhase::CssStyling),
    (has_closed_style_without_script, ProgressPhase::CssStyling),
    (has_script, ProgressPhase::ScriptLogic),
];

/// Best-effort phase for UI feedback, derived from substring evidence.
///
/// Not authoritative: the buffer is whatever the model has emitted so far,
/// so the result is usually, but not provably, non-decreasing.
pub fn classify_progress(buffer: &str) -> ProgressPhase {
    let mut phase = ProgressPhase::Init;
    for (trigger, next) in RULES {
        if trigger(buffer) {
            phase = *next;
        }
    }
    phase
}

fn has_document_start(buffer: &str) -> bool {
    buffer.contains("<html") || buffer.contains("<!DOCTYPE")
}

fn has_unclosed_style(buffer: &str) -> bool {
    buffer.contains("<style") && !buffer.contains("</style>")
}

fn has_closed_style_without_script(buffer: &str) -> bool {
    buffer.contains("</style>") && !buffer.contains("<script")
}

fn has_script(buffer: &str) -> bool {
    buffer.contains("<script")
}
