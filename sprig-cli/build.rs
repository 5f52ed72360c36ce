//! Build script for the sprig binary
//!
//! Embeds the commit hash shown by `sprig --version`.

use std::process::Command;

fn main() {
  embed_git_hash();
  set_rerun_conditions();
}

/// Falls back to `unknown` outside a checkout or without git.
fn embed_git_hash() {
  let git_hash = Command::new("git")
    .args(["rev-parse", "--short", "HEAD"])
    .output()
    .ok()
    .filter(|output| output.status.success())
    .and_then(|output| String::from_utf8(output.stdout).ok())
    .map(|hash| hash.trim().to_string())
    .filter(|hash| !hash.is_empty())
    .unwrap_or_else(|| "unknown".to_string());

  println!("cargo:rustc-env=GIT_HASH={git_hash}");
}

fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=../.git/HEAD");
}
