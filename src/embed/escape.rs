/// Escapes a string for safe embedding in HTML text or attribute values.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their entity equivalents. The
/// output is not idempotent: escaping it again re-escapes every `&`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
