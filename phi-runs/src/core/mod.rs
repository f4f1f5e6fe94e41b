//! Deterministic, pure logic for digit generation and run scanning.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod engine;
pub mod highlight;
pub mod reference;
pub mod scanner;
pub mod types;
