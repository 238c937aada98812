//! # Binding Adapter
//!
//! Turns the three static facts about the grammar module (its name, the ABI
//! version the host bindings target, and the grammar handle) into values a
//! host surface can export. The grammar constructor is invoked at most once
//! per adapter, on first access, and the result is shared by every reader.

use std::ptr;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::error::{BindingError, Result};
use crate::handle::{GrammarFn, GrammarHandle};

/// The values a host module exports, read as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleExports {
    /// Module name, exported as `name`.
    pub name: &'static str,
    /// Grammar handle, exported as `language`.
    pub language: GrammarHandle,
    /// Value returned by the exported `currentABIVersion` function.
    pub abi_version: u32,
}

impl ModuleExports {
    /// The ABI version the bindings were compiled against.
    #[must_use]
    pub fn current_abi_version(&self) -> u32 {
        self.abi_version
    }
}

/// Lazily initialized adapter between a grammar constructor and a host runtime.
///
/// Construction is `const`, so an adapter can live in a `static` and be
/// shared by every host surface in the process.
///
/// # Example
///
/// ```
/// use tree_sitter_validatetest::binding::BindingAdapter;
///
/// static TABLE: u8 = 0;
///
/// unsafe extern "C" fn grammar() -> *const () {
///     (&raw const TABLE).cast()
/// }
///
/// static ADAPTER: BindingAdapter = BindingAdapter::new("demo", 9, grammar);
///
/// let exports = ADAPTER.exports().unwrap();
/// assert_eq!(exports.name, "demo");
/// assert_eq!(exports.current_abi_version(), 9);
/// assert_eq!(exports.language, ADAPTER.handle().unwrap());
/// ```
pub struct BindingAdapter {
    name: &'static str,
    abi_version: u32,
    constructor: Option<GrammarFn>,
    handle: OnceLock<Option<GrammarHandle>>,
}

impl BindingAdapter {
    /// Creates an adapter backed by a grammar constructor.
    #[must_use]
    pub const fn new(name: &'static str, abi_version: u32, constructor: GrammarFn) -> Self {
        Self {
            name,
            abi_version,
            constructor: Some(constructor),
            handle: OnceLock::new(),
        }
    }

    /// Creates an adapter for a build that has no grammar linked.
    ///
    /// Name and ABI version still resolve; [`handle`](Self::handle) reports
    /// [`BindingError::GrammarNotLinked`].
    #[must_use]
    pub const fn unlinked(name: &'static str, abi_version: u32) -> Self {
        Self {
            name,
            abi_version,
            constructor: None,
            handle: OnceLock::new(),
        }
    }

    /// The module name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The ABI version the host bindings were compiled against.
    #[must_use]
    pub fn current_abi_version(&self) -> u32 {
        self.abi_version
    }

    /// Returns `true` if a grammar constructor is available.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.constructor.is_some()
    }

    /// Returns the grammar handle, invoking the constructor on first access.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::GrammarNotLinked`] for an unlinked adapter and
    /// [`BindingError::GrammarUnavailable`] if the constructor returned null.
    /// A failed construction is remembered and not retried.
    pub fn handle(&self) -> Result<GrammarHandle> {
        let Some(constructor) = self.constructor else {
            return Err(BindingError::GrammarNotLinked { name: self.name });
        };

        let handle = self.handle.get_or_init(|| {
            // SAFETY: generated grammar constructors take no arguments and
            // return a pointer to static data.
            let raw = unsafe { constructor() };
            let handle = GrammarHandle::from_raw(raw);
            match handle {
                Some(handle) => debug!(module = self.name, ?handle, "grammar module initialized"),
                None => warn!(module = self.name, "grammar constructor returned null"),
            }
            handle
        });

        handle.ok_or(BindingError::GrammarUnavailable { name: self.name })
    }

    /// Bundles name, handle and ABI version for a host surface.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`handle`](Self::handle).
    pub fn exports(&self) -> Result<ModuleExports> {
        Ok(ModuleExports {
            name: self.name,
            language: self.handle()?,
            abi_version: self.abi_version,
        })
    }

    /// Returns the cached grammar pointer, or null if it cannot be produced.
    ///
    /// This is the body of the `extern "C"` function behind a [`LanguageFn`]:
    /// a `LanguageFn` is re-invoked every time it is turned into a language,
    /// so it must read the cache instead of calling the constructor.
    ///
    /// [`LanguageFn`]: tree_sitter_language::LanguageFn
    #[must_use]
    pub fn cached_raw(&self) -> *const () {
        self.handle().map_or(ptr::null(), GrammarHandle::as_raw)
    }
}

impl std::fmt::Debug for BindingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingAdapter")
            .field("name", &self.name)
            .field("abi_version", &self.abi_version)
            .field("linked", &self.is_linked())
            .field("handle", &self.handle.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static TABLE: [u8; 16] = [0; 16];

    fn table_ptr() -> *const () {
        (&raw const TABLE).cast()
    }

    #[test]
    fn name_and_abi_version_are_fixed() {
        static ADAPTER: BindingAdapter = BindingAdapter::unlinked("validatetest", 9);

        for _ in 0..3 {
            assert_eq!(ADAPTER.name(), "validatetest");
            assert_eq!(ADAPTER.current_abi_version(), 9);
        }
    }

    #[test]
    fn handle_is_stable_across_reads() {
        unsafe extern "C" fn grammar() -> *const () {
            table_ptr()
        }
        static ADAPTER: BindingAdapter = BindingAdapter::new("validatetest", 9, grammar);

        let first = ADAPTER.handle().unwrap();
        let second = ADAPTER.handle().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_raw(), table_ptr());
        assert!(!first.as_raw().is_null());
    }

    #[test]
    fn constructor_runs_once_under_concurrent_reads() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        unsafe extern "C" fn grammar() -> *const () {
            CALLS.fetch_add(1, Ordering::SeqCst);
            table_ptr()
        }
        static ADAPTER: BindingAdapter = BindingAdapter::new("validatetest", 9, grammar);

        let handles: Vec<GrammarHandle> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|_| s.spawn(|| ADAPTER.handle().unwrap()))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(handles.windows(2).all(|pair| pair[0] == pair[1]));

        ADAPTER.exports().unwrap();
        assert_eq!(ADAPTER.cached_raw(), table_ptr());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn null_constructor_fails_without_retry() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        unsafe extern "C" fn grammar() -> *const () {
            CALLS.fetch_add(1, Ordering::SeqCst);
            std::ptr::null()
        }
        static ADAPTER: BindingAdapter = BindingAdapter::new("validatetest", 9, grammar);

        for _ in 0..3 {
            assert_eq!(
                ADAPTER.handle(),
                Err(BindingError::GrammarUnavailable {
                    name: "validatetest"
                })
            );
        }
        assert!(ADAPTER.exports().is_err());
        assert!(ADAPTER.cached_raw().is_null());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unlinked_adapter_reports_missing_grammar() {
        static ADAPTER: BindingAdapter = BindingAdapter::unlinked("validatetest", 9);

        assert!(!ADAPTER.is_linked());
        assert_eq!(
            ADAPTER.handle(),
            Err(BindingError::GrammarNotLinked {
                name: "validatetest"
            })
        );
        assert!(ADAPTER.cached_raw().is_null());
    }

    #[test]
    fn exports_bundle_all_three_values() {
        unsafe extern "C" fn grammar() -> *const () {
            table_ptr()
        }
        static ADAPTER: BindingAdapter = BindingAdapter::new("validatetest", 9, grammar);

        let exports = ADAPTER.exports().unwrap();
        assert_eq!(exports.name, "validatetest");
        assert_eq!(exports.current_abi_version(), 9);
        assert_eq!(exports.language.as_raw(), table_ptr());
    }

    #[test]
    fn language_fn_reads_the_cache() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        unsafe extern "C" fn grammar() -> *const () {
            CALLS.fetch_add(1, Ordering::SeqCst);
            table_ptr()
        }
        static ADAPTER: BindingAdapter = BindingAdapter::new("validatetest", 9, grammar);
        unsafe extern "C" fn cached() -> *const () {
            ADAPTER.cached_raw()
        }

        ADAPTER.handle().unwrap();
        for _ in 0..3 {
            // SAFETY: `cached` only reads the adapter's static table pointer.
            // Calling the raw function is what `Language::from` does.
            let raw = unsafe { tree_sitter_language::LanguageFn::from_raw(cached).into_raw()() };
            assert_eq!(raw, table_ptr());
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
