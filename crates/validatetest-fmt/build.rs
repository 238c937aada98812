use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(validatetest_grammar)");
    println!("cargo:rerun-if-env-changed=DEP_TREE_SITTER_VALIDATETEST_GRAMMAR");

    // Set by the grammar crate's build script through its `links` metadata.
    if env::var("DEP_TREE_SITTER_VALIDATETEST_GRAMMAR").as_deref() == Ok("linked") {
        println!("cargo:rustc-cfg=validatetest_grammar");
    }
}
