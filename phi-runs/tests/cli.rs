//! CLI tests for the `phi-runs` binary.
//!
//! Only the non-interactive surface is exercised here: the binary takes no
//! options beyond `--help` and `--version`.

use std::process::Command;

#[test]
fn version_exits_cleanly() {
    let output = Command::new(env!("CARGO_BIN_EXE_phi-runs"))
        .arg("--version")
        .output()
        .expect("phi-runs --version");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("phi-runs"));
}

#[test]
fn unknown_flag_is_rejected_before_any_work() {
    let output = Command::new(env!("CARGO_BIN_EXE_phi-runs"))
        .arg("--prefix-len")
        .arg("10")
        .output()
        .expect("phi-runs --prefix-len");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
