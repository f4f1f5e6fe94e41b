//! Side-effecting adapters: terminal output and cancellation input.

pub mod display;
pub mod interrupt;
pub mod terminal;
