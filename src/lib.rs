//! Hex engine making one decision per turn: a stone placement found by Monte
//! Carlo Tree Search or alpha-beta search, or the pie-rule swap on the second
//! turn. For more information, see [README].
//!
//! [README]: https://github.com/kirillbobyrev/hexen/blob/main/README.md

pub mod agent;
pub mod evaluation;
pub mod hex;
pub mod search;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Build type and target. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version, author and GitHub repository.
pub fn print_engine_info() {
    println!("Hexen {}", engine_version());
    println!("<https://github.com/kirillbobyrev/hexen>");
}

/// Prints information about the build type, features and whether the build
/// is clean.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Features: {FEATURES}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
