//! Opaque grammar handle.

use std::fmt;
use std::ptr::NonNull;

/// Signature of a generated grammar constructor such as
/// `tree_sitter_validatetest`.
pub type GrammarFn = unsafe extern "C" fn() -> *const ();

/// Opaque token for a compiled grammar table owned by the grammar library.
///
/// The pointee is never read or written through this type. The only thing a
/// holder can do is pass the raw pointer back to a tree-sitter runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrammarHandle(NonNull<()>);

// SAFETY: the grammar table is static, immutable data emitted by the grammar
// generator and lives for the whole process.
unsafe impl Send for GrammarHandle {}
unsafe impl Sync for GrammarHandle {}

impl GrammarHandle {
    /// Wraps a pointer returned by a grammar constructor.
    ///
    /// Returns `None` for a null pointer.
    #[must_use]
    pub fn from_raw(ptr: *const ()) -> Option<Self> {
        NonNull::new(ptr.cast_mut()).map(Self)
    }

    /// The raw `TSLanguage` pointer, for handing back to the runtime.
    #[must_use]
    pub fn as_raw(self) -> *const () {
        self.0.as_ptr().cast_const()
    }
}

impl fmt::Debug for GrammarHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GrammarHandle").field(&self.0).finish()
    }
}
