//! LIKE-pattern helpers for user-supplied search terms.

/// Escape SQL LIKE meta-characters so user input is treated literally.
pub(crate) fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// `%term%` — contains match, used for names and descriptions.
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like_pattern(term))
}

/// `term%` — prefix match, cheaper and stricter, used for secondary
/// columns where a bare substring would be too ambiguous.
pub(crate) fn prefix_pattern(term: &str) -> String {
    format!("{}%", escape_like_pattern(term))
}
