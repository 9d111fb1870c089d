use codecraft_core::{AppViewModel, FailureCategory, SessionState};

/// One-line progress status for the terminal.
pub fn status_line(view: &AppViewModel) -> String {
    let percent = view.progress_percent();
    let message = view.progress_message();
    if view.chars_received > 0 && view.session.in_flight() {
        format!(
            "[{percent:>3}%] {message} ({} chars)",
            view.chars_received
        )
    } else {
        format!("[{percent:>3}%] {message}")
    }
}

/// Terminal summary of a failed generation.
pub fn failure_lines(view: &AppViewModel) -> Vec<String> {
    let Some(failure) = &view.failure else {
        return Vec::new();
    };
    let headline = match failure.category {
        FailureCategory::Network => "Network connection error. Check your internet connection and try again.",
        FailureCategory::Timeout => "The model took too long to answer. Try again.",
        FailureCategory::Http => "The API rejected the request.",
        FailureCategory::Auth => "API authentication error. Check your API key.",
        FailureCategory::RateLimit => "Rate limit exceeded. Try again later or use a different API key.",
        FailureCategory::Stream => "The response stream broke before the site was complete.",
        FailureCategory::EmptyDocument => "The model returned no usable HTML.",
        FailureCategory::Cancelled => "Generation was cancelled.",
    };
    vec![headline.to_string(), format!("  detail: {}", failure.message)]
}

/// Final line pointing at the saved artifact.
pub fn saved_line(view: &AppViewModel) -> Option<String> {
    if view.session != SessionState::Done {
        return None;
    }
    view.saved_path
        .as_ref()
        .map(|path| format!("Saved generated site to {path}"))
}
