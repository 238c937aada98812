use thiserror::Error;
use tree_sitter_validatetest::BindingError;

/// Errors that can occur while formatting a ValidateTest source.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The grammar could not be obtained from the binding.
    #[error("grammar unavailable: {0}")]
    Binding(#[from] BindingError),

    /// The runtime rejected the grammar (ABI mismatch).
    #[error("failed to load parser: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree.
    #[error("failed to parse file")]
    ParseFailed,

    /// The source contains a syntax error at a known position.
    #[error("parse error at line {line}, column {column}")]
    Syntax {
        /// 1-based line of the first erroneous node.
        line: usize,
        /// 1-based column of the first erroneous node.
        column: usize,
    },

    /// The source contains a syntax error that could not be located.
    #[error("parse error in file")]
    SyntaxUnlocated,
}

/// Result type alias for formatter operations.
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = FormatError::Syntax { line: 3, column: 7 };
        assert_eq!(err.to_string(), "parse error at line 3, column 7");

        let err = FormatError::from(BindingError::GrammarNotLinked {
            name: "validatetest",
        });
        assert!(err.to_string().starts_with("grammar unavailable"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormatError>();
    }
}
