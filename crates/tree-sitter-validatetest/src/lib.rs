//! # tree-sitter-validatetest
//!
//! Binding for the GStreamer ValidateTest tree-sitter grammar. The grammar
//! tables are generated C sources compiled by `build.rs`; this crate hands
//! them to host runtimes as an opaque [`GrammarHandle`] together with the
//! module name and the ABI version the bindings target.
//!
//! ## Quick Start
//!
//! ```rust
//! use tree_sitter_validatetest::{ABI_VERSION, MODULE, NAME};
//!
//! assert_eq!(MODULE.name(), NAME);
//! assert_eq!(MODULE.current_abi_version(), ABI_VERSION);
//!
//! match MODULE.handle() {
//!     Ok(handle) => assert!(!handle.as_raw().is_null()),
//!     Err(err) => eprintln!("grammar unavailable: {err}"),
//! }
//! ```
//!
//! With the grammar linked, Rust consumers load it into a parser through
//! [`LANGUAGE`]:
//!
//! ```ignore
//! let mut parser = tree_sitter::Parser::new();
//! parser.set_language(&tree_sitter_validatetest::LANGUAGE.into()).unwrap();
//! ```
pub mod binding;
pub mod error;
pub mod handle;

pub use binding::{BindingAdapter, ModuleExports};
pub use error::{BindingError, Result};
pub use handle::{GrammarFn, GrammarHandle};
pub use tree_sitter_language::LanguageFn;

/// Module name exported to host runtimes.
pub const NAME: &str = "validatetest";

/// Node-API version the host bindings are built against (`napi9`).
pub const ABI_VERSION: u32 = 9;

/// Whether the generated grammar was compiled into this build.
pub const GRAMMAR_LINKED: bool = cfg!(validatetest_grammar);

#[cfg(validatetest_grammar)]
unsafe extern "C" {
    fn tree_sitter_validatetest() -> *const ();
}

/// Process-wide adapter shared by every host surface.
#[cfg(validatetest_grammar)]
pub static MODULE: BindingAdapter =
    BindingAdapter::new(NAME, ABI_VERSION, tree_sitter_validatetest);

/// Process-wide adapter shared by every host surface.
#[cfg(not(validatetest_grammar))]
pub static MODULE: BindingAdapter = BindingAdapter::unlinked(NAME, ABI_VERSION);

unsafe extern "C" fn cached_language() -> *const () {
    MODULE.cached_raw()
}

/// The tree-sitter [`LanguageFn`] for the ValidateTest grammar.
///
/// It resolves through [`MODULE`], so converting it into a language any
/// number of times runs the generated constructor only once.
#[cfg(validatetest_grammar)]
pub const LANGUAGE: LanguageFn = unsafe { LanguageFn::from_raw(cached_language) };

/// The syntax highlighting query for the ValidateTest grammar.
pub const HIGHLIGHTS_QUERY: &str = include_str!("../queries/highlights.scm");

/// The language injection query for the ValidateTest grammar.
pub const INJECTIONS_QUERY: &str = include_str!("../queries/injections.scm");

/// Resolves the grammar through [`MODULE`] and returns its [`LanguageFn`].
///
/// # Errors
///
/// Returns a [`BindingError`] when the grammar is not linked or its
/// constructor produced no language.
pub fn language_fn() -> Result<LanguageFn> {
    MODULE.handle()?;
    // SAFETY: the handle resolved, so `cached_language` keeps returning the
    // non-null static grammar table.
    Ok(unsafe { LanguageFn::from_raw(cached_language) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_reports_fixed_name_and_version() {
        assert_eq!(MODULE.name(), "validatetest");
        assert_eq!(MODULE.current_abi_version(), ABI_VERSION);
        assert_eq!(MODULE.current_abi_version(), MODULE.current_abi_version());
    }

    #[test]
    fn module_linkage_matches_build() {
        assert_eq!(MODULE.is_linked(), GRAMMAR_LINKED);
        assert_eq!(MODULE.handle().is_ok(), GRAMMAR_LINKED);
    }

    #[cfg(validatetest_grammar)]
    #[test]
    fn grammar_can_be_loaded() {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&LANGUAGE.into())
            .expect("load validatetest grammar");

        let tree = parser.parse("meta, handles-states=true\n", None).unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
        assert!(!tree.root_node().has_error());
    }

    #[cfg(validatetest_grammar)]
    #[test]
    fn module_handle_is_the_grammar_table() {
        let handle = MODULE.handle().unwrap();
        // SAFETY: the generated constructor returns a static table.
        let raw = unsafe { tree_sitter_validatetest() };
        assert_eq!(handle.as_raw(), raw);
    }

    #[cfg(validatetest_grammar)]
    #[test]
    fn language_fn_resolves_to_the_module_handle() {
        let handle = MODULE.handle().unwrap();
        for language in [LANGUAGE, language_fn().unwrap()] {
            // SAFETY: the function only reads MODULE's cached table pointer.
            let raw = unsafe { language.into_raw()() };
            assert_eq!(raw, handle.as_raw());
        }
    }

    #[test]
    fn queries_are_bundled() {
        assert!(HIGHLIGHTS_QUERY.contains("@comment"));
        assert!(INJECTIONS_QUERY.contains("injection.content"));
    }

    #[cfg(validatetest_grammar)]
    #[test]
    fn queries_compile_against_the_grammar() {
        let language = tree_sitter::Language::from(LANGUAGE);
        let queries = [("highlights", HIGHLIGHTS_QUERY), ("injections", INJECTIONS_QUERY)];
        for (name, source) in queries {
            if let Err(err) = tree_sitter::Query::new(&language, source) {
                panic!("{name} query does not compile: {err}");
            }
        }
    }

    #[cfg(not(validatetest_grammar))]
    #[test]
    fn unlinked_build_reports_missing_grammar() {
        assert_eq!(
            language_fn().err(),
            Some(BindingError::GrammarNotLinked { name: NAME })
        );
    }
}
