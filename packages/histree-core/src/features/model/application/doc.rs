//! Javadoc normalization
//!
//! Strips comment markers and the per-line `*` gutter, and unwraps inline
//! `{@code …}`/`{@link …}` tags to their plain-text content.

/// Normalizes a raw `/** … */` comment to plain documentation text.
pub fn normalize(raw: &str) -> String {
    let inner = raw
        .strip_prefix("/**")
        .unwrap_or(raw)
        .strip_suffix("*/")
        .unwrap_or(raw);
    let lines: Vec<String> = inner
        .lines()
        .map(strip_gutter)
        .map(unwrap_inline_tags)
        .collect();
    lines.join("\n").trim().to_string()
}

fn strip_gutter(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    }
}

fn unwrap_inline_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find("{@") {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];
        match matching_brace(tag) {
            Some(end) => {
                // "{@code x + y}" -> "x + y"; the tag word itself is dropped.
                let body = &tag[2..end];
                let content = body
                    .split_once(char::is_whitespace)
                    .map(|(_, c)| c)
                    .unwrap_or("");
                out.push_str(content.trim());
                rest = &tag[end + 1..];
            }
            None => {
                out.push_str(tag);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Byte offset of the brace closing the tag opened at `text[0]`, counting
/// nested braces so `{@code new int[]{1}}` keeps its full content.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}
