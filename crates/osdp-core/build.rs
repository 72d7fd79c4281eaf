//! Build script for osdp-core
//!
//! Captures git branch, tag and revision for `version::source_info`.
#![allow(clippy::print_stdout)]

use std::path::Path;
use std::process::Command;

fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_default()
}

fn main() {
    let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"]);
    let tag = git(&["describe", "--tags", "--exact-match"]);
    let rev = git(&["rev-parse", "--short", "HEAD"]);
    // `git diff --quiet` exits 1 when the tree has local changes
    let dirty = Command::new("git")
        .args(["diff", "--quiet", "HEAD"])
        .status()
        .is_ok_and(|status| status.code() == Some(1));

    let branch = if branch.is_empty() { "unknown".to_string() } else { branch };
    println!("cargo:rustc-env=OSDP_GIT_BRANCH={branch}");
    println!("cargo:rustc-env=OSDP_GIT_TAG={tag}");
    println!("cargo:rustc-env=OSDP_GIT_REV={rev}");
    println!(
        "cargo:rustc-env=OSDP_GIT_DIFF={}",
        if dirty && !rev.is_empty() { "+" } else { "" }
    );
    // Only watch HEAD inside a git checkout.
    let head = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../.git/HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }
    println!("cargo:rerun-if-changed=build.rs");
}
