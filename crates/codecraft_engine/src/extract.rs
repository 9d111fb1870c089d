use thiserror::Error;

pub(crate) const DOCUMENT_START: &str = "<!DOCTYPE html>";
pub(crate) const DOCUMENT_START_FALLBACK: &str = "<html";
pub(crate) const DOCUMENT_END: &str = "</html>";

const FENCE_TAGGED: &str = "```html";
const FENCE: &str = "```";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no document content left after cleanup")]
    EmptyDocument,
}

/// Slice the generated document out of the raw model output.
///
/// The document starts at the earliest `<!DOCTYPE html>` (or, failing that,
/// the earliest `<html`) and ends at the *last* `</html>`. Surrounding
/// model chatter is dropped, whitespace trimmed, and any leftover markdown
/// fence markers removed. When no start marker exists at all, the cleaned
/// text is treated as a fragment and wrapped in a minimal document shell,
/// titled from `fallback_title`.
pub fn extract_document(raw: &str, fallback_title: &str) -> Result<String, ExtractError> {
    let start = raw
        .find(DOCUMENT_START)
        .or_else(|| raw.find(DOCUMENT_START_FALLBACK));

    let Some(start) = start else {
        let fragment = strip_fences(raw);
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(ExtractError::EmptyDocument);
        }
        return Ok(wrap_fragment(fragment, fallback_title));
    };

    let mut document = &raw[start..];
    // Last occurrence on purpose: models emit `</html>` inside comments or
    // example markup before the real close.
    if let Some(end) = document.rfind(DOCUMENT_END) {
        document = &document[..end + DOCUMENT_END.len()];
    }

    let cleaned = strip_fences(document.trim());
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        return Err(ExtractError::EmptyDocument);
    }
    Ok(cleaned)
}

fn strip_fences(text: &str) -> String {
    // The tagged opener first, so `html` does not survive on its own.
    text.replace(FENCE_TAGGED, "").replace(FENCE, "")
}

fn wrap_fragment(fragment: &str, title: &str) -> String {
    let title = title.trim();
    let title = if title.is_empty() {
        "Generated Website".to_string()
    } else {
        escape_title(title)
    };
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20 <meta charset=\"UTF-8\">\n\
         \x20 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20 <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         {fragment}\n\
         </body>\n\
         </html>"
    )
}

fn escape_title(title: &str) -> String {
    title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
