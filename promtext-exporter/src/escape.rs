use std::borrow::Cow;

/// Escape `HELP` text: `\` → `\\`, newline → `\n`.
pub fn escape_help(help: &str) -> Cow<'_, str> {
    escape(help, false)
}

/// Escape a label value: `\` → `\\`, `"` → `\"`, newline → `\n`.
pub fn escape_label_value(value: &str) -> Cow<'_, str> {
    escape(value, true)
}

// Single pass: every input char is rewritten at most once, so an emitted
// backslash is never escaped again.
fn escape(s: &str, quotes: bool) -> Cow<'_, str> {
    let needs = |c: char| c == '\\' || c == '\n' || (quotes && c == '"');
    if !s.contains(needs) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '"' if quotes => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
