//! Node.js bindings using NAPI.
//!
//! This module provides the `tree-sitter-validatetest` npm package entry
//! point consumed by node-tree-sitter.
//!
//! # Example
//!
//! ```js
//! const Parser = require('tree-sitter');
//! const ValidateTest = require('tree-sitter-validatetest');
//!
//! const parser = new Parser();
//! parser.setLanguage(ValidateTest);
//!
//! console.log(ValidateTest.name); // 'validatetest'
//! console.log(ValidateTest.currentABIVersion()); // 9
//! ```

use std::ptr;

use napi::{
    CallContext, Env, Error, JsExternal, JsNumber, JsObject, NapiValue, Result, Status,
    check_status, sys,
};
use napi_derive::{js_function, module_exports};
use tree_sitter_validatetest::{BindingError, GrammarHandle, MODULE};

/// Fills the module exports with `name`, `language` and `currentABIVersion`.
///
/// # Errors
///
/// Returns a `JsError` if the grammar is unavailable or the exports object
/// cannot be populated.
#[module_exports]
fn init(mut exports: JsObject, env: Env) -> Result<()> {
    let module = MODULE.exports().map_err(binding_error)?;

    exports.set_named_property("name", env.create_string(module.name)?)?;
    exports.set_named_property("language", language_external(&env, module.language)?)?;
    exports.create_named_method("currentABIVersion", current_abi_version)?;

    Ok(())
}

/// Returns the Node-API version the addon was compiled against.
#[js_function(0)]
fn current_abi_version(ctx: CallContext) -> Result<JsNumber> {
    ctx.env.create_uint32(MODULE.current_abi_version())
}

/// Wraps the raw grammar pointer in a JS External.
///
/// node-tree-sitter reads the external's data as a `TSLanguage *`, so the
/// pointer is stored as-is with no finalizer: the grammar outlives the
/// environment.
fn language_external(env: &Env, handle: GrammarHandle) -> Result<JsExternal> {
    let mut raw = ptr::null_mut();
    check_status!(unsafe {
        sys::napi_create_external(
            env.raw(),
            handle.as_raw().cast_mut().cast(),
            None,
            ptr::null_mut(),
            &mut raw,
        )
    })?;

    // SAFETY: `raw` was just produced by `napi_create_external` for this env.
    Ok(unsafe { JsExternal::from_raw_unchecked(env.raw(), raw) })
}

fn binding_error(err: BindingError) -> Error {
    Error::new(
        Status::GenericFailure,
        format!("failed to load validatetest grammar: {}", err),
    )
}
