//! Known first runs used by the startup self-check.
//!
//! The table ships as an embedded TOML document and is parsed once at startup.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::scanner::DEFAULT_RUN_LENGTHS;
use crate::core::types::{FirstRun, Position};

const EMBEDDED_TABLE: &str = include_str!("../../reference/first_runs.toml");

/// Sequence marker for a length with no run in the checked span.
pub const NOT_FOUND: &str = "N/A";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    run: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableEntry {
    length: usize,
    sequence: String,
    position: Option<Position>,
}

/// Expected first run per length; `None` means no run is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    expected: BTreeMap<usize, Option<FirstRun>>,
}

impl ReferenceTable {
    /// Parse the table compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_TABLE).context("parse embedded reference table")
    }

    /// Parse and validate a reference table document.
    pub fn parse(raw: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(raw).context("parse reference toml")?;

        let errors = validate_entries(&file.run);
        if !errors.is_empty() {
            bail!("invalid reference table:\n- {}", errors.join("\n- "));
        }

        let expected = file
            .run
            .into_iter()
            .map(|entry| {
                let run = entry.position.map(|start| FirstRun {
                    length: entry.length,
                    sequence: entry.sequence,
                    start,
                });
                (entry.length, run)
            })
            .collect();
        Ok(Self { expected })
    }

    /// Lengths covered by the table, ascending.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.expected.keys().copied()
    }

    pub fn expected(&self, length: usize) -> Option<&FirstRun> {
        self.expected.get(&length).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&FirstRun>)> + '_ {
        self.expected
            .iter()
            .map(|(length, run)| (*length, run.as_ref()))
    }
}

/// Semantic checks the TOML shape cannot express:
/// - lengths are unique and within the scanned 2..=9
/// - `"N/A"` entries carry no position
/// - other entries repeat one digit exactly `length` times and have a
///   position of at least 1
fn validate_entries(entries: &[TableEntry]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();

    if entries.is_empty() {
        errors.push("table has no entries".to_string());
    }

    for entry in entries {
        let n = entry.length;
        if !seen.insert(n) {
            errors.push(format!("duplicate length {n}"));
        }
        if !DEFAULT_RUN_LENGTHS.contains(&n) {
            errors.push(format!(
                "length {n}: must be within {}..={}",
                DEFAULT_RUN_LENGTHS.start(),
                DEFAULT_RUN_LENGTHS.end()
            ));
        }

        match (entry.sequence.as_str(), entry.position) {
            (NOT_FOUND, None) => {}
            (NOT_FOUND, Some(position)) => {
                errors.push(format!("length {n}: {NOT_FOUND} with position {position}"));
            }
            (_, None) => {
                errors.push(format!("length {n}: sequence without position"));
            }
            (sequence, Some(position)) => {
                if position == 0 {
                    errors.push(format!("length {n}: position must be >= 1"));
                }
                if !is_repeated_digit(sequence, n) {
                    errors.push(format!(
                        "length {n}: sequence {sequence:?} is not one digit repeated {n} times"
                    ));
                }
            }
        }
    }

    errors
}

fn is_repeated_digit(sequence: &str, length: usize) -> bool {
    let mut chars = sequence.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_digit() && chars.all(|ch| ch == first) && sequence.len() == length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses() {
        let table = ReferenceTable::embedded().expect("embedded");
        assert_eq!(table.lengths().collect::<Vec<_>>(), (2..=9).collect::<Vec<_>>());
        assert_eq!(table.expected(2), Some(&FirstRun::new('3', 2, 7)));
        assert_eq!(table.expected(5), Some(&FirstRun::new('9', 5, 6401)));
        assert_eq!(table.expected(6), None);
    }

    #[test]
    fn rejects_malformed_entries() {
        let raw = r#"
            [[run]]
            length = 3
            sequence = "223"
            position = 5

            [[run]]
            length = 3
            sequence = "N/A"
            position = 9

            [[run]]
            length = 4
            sequence = "4444"

            [[run]]
            length = 12
            sequence = "N/A"

            [[run]]
            length = 1
            sequence = "N/A"
        "#;
        let err = ReferenceTable::parse(raw).expect_err("should reject");
        let message = err.to_string();
        assert!(message.contains("not one digit repeated"));
        assert!(message.contains("duplicate length 3"));
        assert!(message.contains("N/A with position 9"));
        assert!(message.contains("sequence without position"));
        assert!(message.contains("length 12: must be within 2..=9"));
        assert!(message.contains("length 1: must be within 2..=9"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let raw = r#"
            [[run]]
            length = 2
            sequence = "33"
            position = 7
            note = "extra"
        "#;
        assert!(ReferenceTable::parse(raw).is_err());
    }
}
