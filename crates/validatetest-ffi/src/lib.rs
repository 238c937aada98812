//! # ValidateTest FFI
//!
//! Host runtime bindings for the ValidateTest grammar.
//! Exports the grammar module to Node (napi-rs, `node` feature) and to C.
//! Every surface reads the same process-wide [`MODULE`], so the grammar
//! constructor runs at most once no matter which host loads first.

pub mod c;

#[cfg(feature = "node")]
mod node;

pub use tree_sitter_validatetest::{ABI_VERSION, GrammarHandle, MODULE, ModuleExports, NAME};
