//! # ValidateTest formatter
//!
//! Formats GStreamer ValidateTest scenario files using the tree-sitter
//! ValidateTest grammar. Short structures stay on one line; long ones,
//! nested blocks and property actions are split with one field per line.
//!
//! ```no_run
//! use validatetest_fmt::{FormatOptions, format_source};
//!
//! let formatted = format_source("action,foo=bar,baz=123", &FormatOptions::default()).unwrap();
//! assert_eq!(formatted, "action, foo=bar, baz=123\n");
//! ```
pub mod error;
pub mod options;
pub mod rules;

mod formatter;

pub use error::{FormatError, Result};
pub use options::{DEFAULT_INDENT, DEFAULT_LINE_LENGTH, FormatOptions};

use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use crate::formatter::Formatter;

/// Formats `source` with the linked ValidateTest grammar.
///
/// # Errors
///
/// Returns [`FormatError::Binding`] if the grammar is not available, and a
/// syntax error if the source does not parse cleanly.
pub fn format_source(source: &str, options: &FormatOptions) -> Result<String> {
    let language: Language = tree_sitter_validatetest::language_fn()?.into();
    format_with_language(source, &language, options)
}

/// Formats `source` with an explicitly provided grammar.
///
/// # Errors
///
/// Returns an error if the runtime rejects the grammar or the source has
/// syntax errors.
pub fn format_with_language(
    source: &str,
    language: &Language,
    options: &FormatOptions,
) -> Result<String> {
    let mut parser = Parser::new();
    parser.set_language(language)?;

    let tree = parser.parse(source, None).ok_or(FormatError::ParseFailed)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(locate_syntax_error(root));
    }

    debug!(bytes = source.len(), "formatting validatetest source");
    Ok(Formatter::new(source, language, *options).format(root))
}

/// Returns `true` if `source` is already formatted.
///
/// # Errors
///
/// Same as [`format_source`].
pub fn check_source(source: &str, options: &FormatOptions) -> Result<bool> {
    Ok(format_source(source, options)? == source)
}

/// Points at the first top-level node containing an error.
fn locate_syntax_error(root: Node<'_>) -> FormatError {
    let mut cursor = root.walk();
    let error_node = root
        .children(&mut cursor)
        .find(|node| node.has_error() || node.is_error());

    match error_node {
        Some(node) => FormatError::Syntax {
            line: node.start_position().row + 1,
            column: node.start_position().column + 1,
        },
        None => FormatError::SyntaxUnlocated,
    }
}
