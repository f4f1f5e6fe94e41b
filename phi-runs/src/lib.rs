//! Golden-ratio digit streamer and first-run finder.
//!
//! The crate computes the decimal expansion of phi to arbitrary precision and
//! reports, in position order, the first run of each length 2..9. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (digit engine, run scanner,
//!   classification, reference table). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting adapters (terminal display, keyboard
//!   interrupt) behind traits so tests run headless.
//!
//! Orchestration modules ([`verify`], [`stream`], [`session`]) coordinate core
//! logic with I/O to implement the binary.

pub mod config;
pub mod core;
pub mod digits;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
pub mod stream;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod verify;
