//! Collects information about the engine build from Git and the build
//! environment. The results end up in the output directory and are reported
//! by the engine in the `hex` handshake and on startup.

use std::path::Path;
use std::{env, fs};

fn generate_file(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join(filename);
    fs::write(dest_path, contents).unwrap();
}

fn generate_build_info() {
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let assertions = if env::var_os("CARGO_CFG_DEBUG_ASSERTIONS").is_some() {
        "+"
    } else {
        "-"
    };
    generate_file(
        "features",
        &format!("{target} {profile} {assertions}debug_assertions"),
    );
}

fn main() -> shadow_rs::SdResult<()> {
    generate_build_info();
    shadow_rs::new()
}
