use thiserror::Error;

/// Errors raised while producing the grammar handle for a host runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The crate was built without the generated grammar sources.
    #[error("grammar `{name}` is not linked into this build")]
    GrammarNotLinked {
        /// Module name of the adapter that was queried.
        name: &'static str,
    },

    /// The grammar constructor returned a null language pointer.
    #[error("grammar `{name}` constructor returned a null language")]
    GrammarUnavailable {
        /// Module name of the adapter that was queried.
        name: &'static str,
    },
}

/// Result type alias for binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;
