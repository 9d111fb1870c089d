use codecraft_engine::{extract_document, ExtractError};
use pretty_assertions::assert_eq;

#[test]
fn document_inside_prose_is_sliced_exactly() {
    let raw = "Here is your website!\n\n<!DOCTYPE html>\n<html><body>Hello</body></html>\n\nLet me know if you need changes.";
    let html = extract_document(raw, "demo").unwrap();
    assert_eq!(html, "<!DOCTYPE html>\n<html><body>Hello</body></html>");
}

#[test]
fn fenced_document_loses_all_backticks() {
    let raw = "Sure! ```html\n<!DOCTYPE html><html><body>Hi</body></html>\n``` Hope that helps!";
    let html = extract_document(raw, "demo").unwrap();
    assert_eq!(html, "<!DOCTYPE html><html><body>Hi</body></html>");
    assert!(!html.contains('`'));
}

#[test]
fn html_tag_is_accepted_when_doctype_is_missing() {
    let raw = "preamble <html lang=\"en\"><body>x</body></html> trailer";
    let html = extract_document(raw, "demo").unwrap();
    assert_eq!(html, "<html lang=\"en\"><body>x</body></html>");
}

#[test]
fn last_closing_tag_wins() {
    // One `</html>` inside a comment, one real close. The end boundary is
    // the *last* occurrence, not the first plausible one.
    let raw = concat!(
        "<!DOCTYPE html><html><body>",
        "<!-- beware stray </html> in comments -->",
        "real content</body></html>",
        " postscript"
    );
    let html = extract_document(raw, "demo").unwrap();
    assert!(html.ends_with("real content</body></html>"));
    assert!(html.contains("<!-- beware stray </html> in comments -->"));
    assert!(!html.contains("postscript"));
}

#[test]
fn extraction_is_idempotent() {
    let raw = "chatter ```html\n<!DOCTYPE html><html><head></head><body>once</body></html>``` bye";
    let first = extract_document(raw, "demo").unwrap();
    let second = extract_document(&first, "demo").unwrap();
    assert_eq!(first, second);
}

#[test]
fn fragment_without_markers_is_wrapped_in_a_shell() {
    let raw = "```\n<h1>Standalone heading</h1>\n```";
    let html = extract_document(raw, "my heading page").unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.ends_with("</html>"));
    assert!(html.contains("<meta charset=\"UTF-8\">"));
    assert!(html.contains("width=device-width"));
    assert!(html.contains("<title>my heading page</title>"));
    assert!(html.contains("<h1>Standalone heading</h1>"));
    assert!(!html.contains('`'));
}

#[test]
fn wrapped_fragment_survives_a_second_extraction() {
    let wrapped = extract_document("just some text", "note").unwrap();
    let again = extract_document(&wrapped, "note").unwrap();
    assert_eq!(wrapped, again);
}

#[test]
fn shell_title_falls_back_when_prompt_is_blank() {
    let html = extract_document("plain text", "   ").unwrap();
    assert!(html.contains("<title>Generated Website</title>"));
}

#[test]
fn shell_title_is_escaped() {
    let html = extract_document("plain text", "a <b> & c").unwrap();
    assert!(html.contains("<title>a &lt;b&gt; &amp; c</title>"));
}

#[test]
fn empty_input_reports_failure() {
    assert_eq!(
        extract_document("", "demo").unwrap_err(),
        ExtractError::EmptyDocument
    );
    assert_eq!(
        extract_document("   \n``` ```\n  ", "demo").unwrap_err(),
        ExtractError::EmptyDocument
    );
}

#[test]
fn document_is_trimmed() {
    let raw = "\n\n   <!DOCTYPE html><html></html>   \n";
    let html = extract_document(raw, "demo").unwrap();
    assert_eq!(html, "<!DOCTYPE html><html></html>");
}
