//! Stable exit codes for the `phi-runs` binary.

/// Streaming ended normally (interrupt), or the terminal was too small and
/// the program exited after printing a diagnostic.
pub const OK: i32 = 0;
/// The startup self-check did not match the reference table.
pub const VERIFICATION_FAILED: i32 = 1;
/// Unexpected failure (terminal I/O, invalid embedded data).
pub const ERROR: i32 = 2;
