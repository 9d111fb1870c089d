/// Windows-safe artifact filename: `{slug}--{timestamp}.html`.
///
/// The slug comes from the user's prompt; the timestamp is supplied by the
/// caller so the engine stays clock-free.
pub fn artifact_filename(prompt: &str, timestamp: &str) -> String {
    let slug = slugify(prompt);
    format!("{slug}--{timestamp}.html")
}

fn slugify(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| {
            if is_forbidden(c) || c.is_whitespace() {
                '-'
            } else {
                c
            }
        })
        .collect();
    cleaned = cleaned.trim_matches(&['-', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "generated-site".to_string();
    }
    // Collapse runs of dashes left by replaced characters.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_dash = false;
    for c in cleaned.chars() {
        if c == '-' {
            if !prev_dash {
                compacted.push(c);
            }
            prev_dash = true;
        } else {
            compacted.push(c);
            prev_dash = false;
        }
    }
    let mut slug = compacted;
    truncate_on_char_boundary(&mut slug, 48);
    if is_reserved_windows_name(&slug) {
        slug.push('-');
    }
    slug
}

fn truncate_on_char_boundary(text: &mut String, max_bytes: usize) {
    if text.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
