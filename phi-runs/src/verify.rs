//! Startup self-check of the engine and scanner against the reference table.

use std::fmt;
use std::time::Instant;

use tracing::{error, info, instrument};

use crate::config::StreamConfig;
use crate::core::engine::compute_digits;
use crate::core::reference::{NOT_FOUND, ReferenceTable};
use crate::core::scanner::{FirstRunRecord, find_first_runs};
use crate::core::types::FirstRun;

/// One length whose found first run differs from the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub length: usize,
    pub expected: Option<FirstRun>,
    pub found: Option<FirstRun>,
}

/// Result of comparing a scanned prefix with the reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    /// Number of characters scanned, including `"1."`.
    pub checked_len: usize,
    pub found: FirstRunRecord,
    /// Every mismatching length, ascending.
    pub mismatches: Vec<Mismatch>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Human-readable report for stdout.
impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            let lengths: Vec<usize> = self.found.lengths().collect();
            let span = match (lengths.first(), lengths.last()) {
                (Some(first), Some(last)) => format!("{first}..{last}"),
                _ => "(none)".to_string(),
            };
            return writeln!(
                f,
                "Self-check passed: first runs for n = {span} match the reference in the first {} characters.",
                self.checked_len
            );
        }

        writeln!(
            f,
            "Self-check FAILED for the first {} characters. Discrepancies:",
            self.checked_len
        )?;
        for mismatch in &self.mismatches {
            writeln!(f)?;
            writeln!(f, "  n = {}:", mismatch.length)?;
            writeln!(f, "    Expected: {}", describe(mismatch.expected.as_ref()))?;
            writeln!(f, "    Found:    {}", describe(mismatch.found.as_ref()))?;
        }
        writeln!(f)?;
        writeln!(f, "Exiting: scanner output does not match the reference.")
    }
}

fn describe(run: Option<&FirstRun>) -> String {
    match run {
        Some(run) => format!("seq = {:?}, pos = {}", run.sequence, run.start),
        None => format!("seq = {NOT_FOUND:?}, pos = none"),
    }
}

/// Scan `text` and compare every length in `table`.
pub fn verify_prefix(text: &str, table: &ReferenceTable) -> VerificationReport {
    let found = find_first_runs(text, table.lengths());
    let mismatches = table
        .iter()
        .filter_map(|(length, expected)| {
            let actual = found.get(length);
            (expected != actual).then(|| Mismatch {
                length,
                expected: expected.cloned(),
                found: actual.cloned(),
            })
        })
        .collect();

    VerificationReport {
        checked_len: text.chars().count(),
        found,
        mismatches,
    }
}

/// Compute `config.verify_len` characters and verify them against `table`.
#[instrument(skip_all, fields(verify_len = config.verify_len))]
pub fn run_verification(config: &StreamConfig, table: &ReferenceTable) -> VerificationReport {
    let started = Instant::now();
    let text = compute_digits(config.verify_len, &config.engine);
    let report = verify_prefix(&text, table);

    if report.passed() {
        info!(elapsed_ms = started.elapsed().as_millis(), "self-check passed");
    } else {
        let lengths: Vec<usize> = report.mismatches.iter().map(|m| m.length).collect();
        error!(?lengths, "self-check failed");
    }
    report
}
