//! Text-level layout rules that do not need a syntax tree.

/// Property actions that always print one field per line.
const PROPERTY_ACTIONS: [&str; 4] = [
    "set-properties",
    "check-properties",
    "set-child-properties",
    "check-child-properties",
];

/// Issue structures that are always multiline inside arrays and are
/// promoted from quoted strings to array structures.
const ISSUE_STRUCTURES: [&str; 2] = ["expected-issue", "change-severity"];

/// Whether a top-level structure must be split regardless of its width.
pub fn structure_always_multiline(name: &str) -> bool {
    PROPERTY_ACTIONS.contains(&name) || name == "expected-issue"
}

/// Whether an array structure (`[name, …]`) must be split regardless of its width.
pub fn array_structure_always_multiline(name: &str) -> bool {
    PROPERTY_ACTIONS.contains(&name) || ISSUE_STRUCTURES.contains(&name)
}

/// Whether a structure promoted from a quoted string must be split.
pub fn issue_structure(name: &str) -> bool {
    ISSUE_STRUCTURES.contains(&name)
}

/// Returns the unescaped content of a quoted issue structure.
///
/// `"expected-issue, issue-id=foo"` yields `expected-issue, issue-id=foo`;
/// any other text yields `None`.
pub fn quoted_structure_content(text: &str) -> Option<String> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let convertible = ISSUE_STRUCTURES
        .iter()
        .any(|name| inner.strip_prefix(name).is_some_and(|rest| rest.starts_with(',')));

    convertible.then(|| unescape(inner))
}

/// Unescapes `\"` to `"` and `\\` to `\`, leaving other escapes untouched.
pub fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.next_if(|&next| c == '\\' && matches!(next, '"' | '\\')) {
            Some(escaped) => result.push(escaped),
            None => result.push(c),
        }
    }

    result
}

/// Number of blank lines between two byte offsets of `source`.
///
/// The first newline only terminates the previous node's line.
pub fn blank_lines_between(source: &[u8], end_byte: usize, start_byte: usize) -> usize {
    if start_byte <= end_byte {
        return 0;
    }
    source[end_byte..start_byte]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        .saturating_sub(1)
}

/// Lays out a `#` comment at `indent`, word-wrapping it past `max_line_length`.
///
/// Each returned line carries the indent. Comments that fit are kept verbatim.
pub fn wrap_comment(text: &str, indent: usize, max_line_length: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    if indent + text.len() <= max_line_length {
        return vec![format!("{pad}{text}")];
    }

    let content = text.strip_prefix('#').unwrap_or(text);
    let content = content.strip_prefix(' ').unwrap_or(content);
    let prefix = format!("{pad}# ");
    let max_content_len = max_line_length.saturating_sub(prefix.len());

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_content_len {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(format!("{prefix}{current}"));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(format!("{prefix}{current}"));
    }
    if lines.is_empty() {
        lines.push(format!("{pad}#"));
    }
    lines
}
