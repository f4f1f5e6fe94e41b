//! Unbounded digit source for the live phase.

use tracing::debug;

use crate::core::engine::{EngineConfig, compute_digits};

/// Lazy, infinite, non-restartable sequence of golden-ratio characters.
///
/// Each pull returns the next character from the retained tail of the last
/// computation, or first recomputes the expansion at a longer length. The
/// target grows by at least half of what was already served, so total work
/// stays within a constant factor of the final computation. Only unserved
/// characters are kept between refills.
#[derive(Debug)]
pub struct PhiDigits {
    engine: EngineConfig,
    min_chunk: usize,
    served: usize,
    pending: Vec<u8>,
    cursor: usize,
}

impl PhiDigits {
    /// Start at position 1 (the leading `'1'`).
    pub fn new(engine: EngineConfig, min_chunk: usize) -> Self {
        Self::starting_after(0, engine, min_chunk)
    }

    /// Skip the first `served` characters; the first pull returns position
    /// `served + 1`.
    pub fn starting_after(served: usize, engine: EngineConfig, min_chunk: usize) -> Self {
        Self {
            engine,
            min_chunk: min_chunk.max(1),
            served,
            pending: Vec::new(),
            cursor: 0,
        }
    }

    /// Number of characters handed out so far, including any skipped prefix.
    pub fn served(&self) -> usize {
        self.served
    }

    fn refill(&mut self) {
        let target = self
            .served
            .saturating_add(self.min_chunk)
            .max(self.served.saturating_add(self.served / 2));
        debug!(served = self.served, target, "extending live digits");

        let mut full = compute_digits(target, &self.engine).into_bytes();
        self.pending = if self.served <= full.len() {
            full.split_off(self.served)
        } else {
            Vec::new()
        };
        self.cursor = 0;
    }
}

impl Iterator for PhiDigits {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.cursor >= self.pending.len() {
            self.refill();
        }
        let byte = self.pending.get(self.cursor).copied()?;
        self.cursor += 1;
        self.served += 1;
        Some(char::from(byte))
    }
}
