//! Python bindings for the ValidateTest grammar.
//!
//! `language()` returns a `tree_sitter.Language` capsule that the
//! `tree_sitter` package accepts directly. The highlight and injection
//! queries are exported as `HIGHLIGHTS_QUERY` and `INJECTIONS_QUERY`.

use std::ffi::{CStr, c_void};

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use tree_sitter_validatetest::{BindingError, HIGHLIGHTS_QUERY, INJECTIONS_QUERY, MODULE};

const CAPSULE_NAME: &CStr = c"tree_sitter.Language";

fn to_py_err(err: BindingError) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

/// Returns the grammar handle wrapped in a `tree_sitter.Language` capsule.
#[pyfunction]
fn language(py: Python<'_>) -> PyResult<Bound<'_, PyAny>> {
    let handle = MODULE.handle().map_err(to_py_err)?;

    // The grammar table is static, so the capsule needs no destructor.
    unsafe {
        let capsule = pyo3::ffi::PyCapsule_New(
            handle.as_raw().cast_mut().cast::<c_void>(),
            CAPSULE_NAME.as_ptr(),
            None,
        );
        Bound::from_owned_ptr_or_err(py, capsule)
    }
}

#[pymodule]
#[pyo3(name = "_binding")]
fn binding(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("name", MODULE.name())?;
    m.add("current_abi_version", MODULE.current_abi_version())?;
    m.add("HIGHLIGHTS_QUERY", HIGHLIGHTS_QUERY)?;
    m.add("INJECTIONS_QUERY", INJECTIONS_QUERY)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(language, m)?)?;
    Ok(())
}
