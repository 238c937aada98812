//! C ABI exports.
//!
//! Plain C hosts cannot receive a `Result`, so a failed grammar lookup is
//! flattened to a null pointer after being logged.

use std::ffi::{CStr, c_char, c_void};
use std::ptr;

use tracing::error;
use tree_sitter_validatetest::MODULE;

const NAME_C: &CStr = c"validatetest";

/// Returns the module name as a static NUL-terminated string.
#[unsafe(no_mangle)]
pub extern "C" fn validatetest_binding_name() -> *const c_char {
    NAME_C.as_ptr()
}

/// Returns the ABI version the bindings were compiled against.
#[unsafe(no_mangle)]
pub extern "C" fn validatetest_binding_abi_version() -> u32 {
    MODULE.current_abi_version()
}

/// Returns the `TSLanguage` pointer, or null if the grammar is unavailable.
///
/// The pointer is owned by the grammar library and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn validatetest_binding_language() -> *const c_void {
    match MODULE.handle() {
        Ok(handle) => handle.as_raw().cast(),
        Err(err) => {
            error!(%err, "grammar handle requested by C host");
            ptr::null()
        }
    }
}
