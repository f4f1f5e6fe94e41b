//! Shared deterministic types for the digit scanner.
//!
//! These types define stable contracts between core components. They carry no
//! I/O and must compare equal across runs for the same digit stream.

use std::fmt;
use std::time::Duration;

/// 1-based position in the digit stream, counting the integer digit and the
/// decimal separator.
pub type Position = u64;

/// Snapshot of the run that ends at the most recently scanned character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    /// Digit being repeated, or `None` right after a non-digit character.
    pub active: Option<char>,
    /// Number of consecutive copies of `active` ending at the current position.
    pub length: usize,
}

/// First occurrence of a run of a given length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstRun {
    pub length: usize,
    /// The repeated digit, `length` times.
    pub sequence: String,
    /// Position of the first digit of the run.
    pub start: Position,
}

impl FirstRun {
    pub fn new(digit: char, length: usize, start: Position) -> Self {
        Self {
            length,
            sequence: std::iter::repeat_n(digit, length).collect(),
            start,
        }
    }
}

impl fmt::Display for FirstRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.sequence, self.start)
    }
}

/// A first run paired with the wall-clock time since streaming started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub run: FirstRun,
    pub elapsed: Duration,
}

/// Result of feeding one character through the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStep {
    pub ch: char,
    pub position: Position,
    /// Run state after this character was applied.
    pub run: RunState,
    /// Set when this character completed a previously unseen run length.
    pub first_run: Option<FirstRun>,
}
