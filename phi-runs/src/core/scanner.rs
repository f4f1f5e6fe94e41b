//! Run-length state machine over the digit stream.
//!
//! The scanner consumes one character at a time and records, for each
//! interesting run length, the first position at which a run reached that
//! length. Records are written once and never replaced, so they depend only
//! on the characters fed so far and not on how they were chunked.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use crate::core::types::{FirstRun, Position, RunState, ScanStep};

/// Run lengths tracked by default.
pub const DEFAULT_RUN_LENGTHS: RangeInclusive<usize> = 2..=9;

/// First occurrence of each tracked run length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstRunRecord {
    lengths: BTreeSet<usize>,
    found: BTreeMap<usize, FirstRun>,
}

impl FirstRunRecord {
    pub fn new<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        Self {
            lengths: lengths.into_iter().collect(),
            found: BTreeMap::new(),
        }
    }

    pub fn get(&self, length: usize) -> Option<&FirstRun> {
        self.found.get(&length)
    }

    /// Tracked lengths in ascending order.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.lengths.iter().copied()
    }

    /// True once every tracked length has a record.
    pub fn is_complete(&self) -> bool {
        self.found.len() == self.lengths.len()
    }

    /// Tracked lengths still without a record.
    pub fn missing(&self) -> Vec<usize> {
        self.lengths
            .iter()
            .copied()
            .filter(|length| !self.found.contains_key(length))
            .collect()
    }

    fn wants(&self, length: usize) -> bool {
        self.lengths.contains(&length) && !self.found.contains_key(&length)
    }

    fn insert(&mut self, run: FirstRun) {
        self.found.entry(run.length).or_insert(run);
    }
}

impl Default for FirstRunRecord {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_LENGTHS)
    }
}

/// Stateful scanner; see the module docs.
#[derive(Debug, Clone, Default)]
pub struct RunScanner {
    position: Position,
    run: RunState,
    record: FirstRunRecord,
}

impl RunScanner {
    pub fn new<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        Self {
            position: 0,
            run: RunState::default(),
            record: FirstRunRecord::new(lengths),
        }
    }

    /// Advance by one character.
    ///
    /// A non-digit resets the run. A digit extends the active run or starts a
    /// new one of length 1. When the run reaches a tracked length for the
    /// first time the step carries the new [`FirstRun`].
    pub fn step(&mut self, ch: char) -> ScanStep {
        self.position += 1;

        if !ch.is_ascii_digit() {
            self.run = RunState::default();
            return ScanStep {
                ch,
                position: self.position,
                run: self.run,
                first_run: None,
            };
        }

        if self.run.active == Some(ch) {
            self.run.length += 1;
        } else {
            self.run = RunState {
                active: Some(ch),
                length: 1,
            };
        }

        let first_run = if self.record.wants(self.run.length) {
            let start = self.position + 1 - self.run.length as Position;
            let run = FirstRun::new(ch, self.run.length, start);
            self.record.insert(run.clone());
            Some(run)
        } else {
            None
        };

        ScanStep {
            ch,
            position: self.position,
            run: self.run,
            first_run,
        }
    }

    /// Feed a chunk and return the first runs it produced, in position order.
    pub fn feed(&mut self, chunk: &str) -> Vec<FirstRun> {
        chunk
            .chars()
            .filter_map(|ch| self.step(ch).first_run)
            .collect()
    }

    /// Position of the last character consumed (0 before any input).
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn run(&self) -> RunState {
        self.run
    }

    pub fn record(&self) -> &FirstRunRecord {
        &self.record
    }

    pub fn into_record(self) -> FirstRunRecord {
        self.record
    }
}

/// Scan `text` from position 1 and return the first run of each length.
pub fn find_first_runs<I: IntoIterator<Item = usize>>(text: &str, lengths: I) -> FirstRunRecord {
    let mut scanner = RunScanner::new(lengths);
    for ch in text.chars() {
        scanner.step(ch);
        if scanner.record().is_complete() {
            break;
        }
    }
    scanner.into_record()
}
