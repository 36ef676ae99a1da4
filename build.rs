use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=PIPER_LIB_DIR");
    println!("cargo:rerun-if-env-changed=PIPER_BUNDLE_ZIP");

    if env::var_os("CARGO_FEATURE_PIPER").is_none() {
        return;
    }

    // libpiper and onnxruntime usually sit next to each other in the piper build tree.
    if let Some(dir) = env::var_os("PIPER_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
}
