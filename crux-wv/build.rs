//! Build script for crux-wv
//!
//! Exposes `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` to the crate
//! for the startup log line.

use std::process::Command;

fn main() {
    let build_timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    emit("GIT_HASH", &short_git_hash().unwrap_or_else(|| "unknown".to_string()));
    emit("BUILD_TIMESTAMP", &build_timestamp);
    emit("BUILD_PROFILE", &profile);

    // No rerun-if-changed: the timestamp is refreshed on every build
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

/// `git rev-parse --short=8 HEAD`, if this is a checkout
fn short_git_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string())
}
