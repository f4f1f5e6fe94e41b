//! Deterministic highlight classification for streamed characters.

use crate::core::types::RunState;

/// Terminal-independent color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunColor {
    White,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

/// How a single streamed character should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// The decimal separator. Consumed but not drawn as a digit.
    Separator,
    /// A digit outside any run of length 2 or more.
    Singleton,
    /// A digit inside a run; `emphasis` marks odd digits.
    Run { color: RunColor, emphasis: bool },
}

/// Highlight for the status slot of a run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneStyle {
    pub color: RunColor,
    pub bright: bool,
}

/// Color tables, built once and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    digits: [RunColor; 10],
    milestones: [MilestoneStyle; 8],
}

impl Default for Palette {
    fn default() -> Self {
        use RunColor::{Blue, Cyan, Green, Magenta, Red, Yellow};

        let style = |color, bright| MilestoneStyle { color, bright };
        Self {
            digits: [
                Red, Red, Green, Green, Yellow, Yellow, Blue, Blue, Magenta, Magenta,
            ],
            milestones: [
                style(Red, false),
                style(Yellow, false),
                style(Green, false),
                style(Cyan, false),
                style(Blue, false),
                style(Magenta, false),
                style(Red, true),
                style(Yellow, true),
            ],
        }
    }
}

impl Palette {
    /// Color for a digit character, `White` for anything else.
    pub fn digit_color(&self, ch: char) -> RunColor {
        ch.to_digit(10)
            .and_then(|digit| self.digits.get(digit as usize))
            .copied()
            .unwrap_or(RunColor::White)
    }

    /// Status slot style for run length `length` (defined for 2..=9).
    pub fn milestone(&self, length: usize) -> MilestoneStyle {
        length
            .checked_sub(2)
            .and_then(|index| self.milestones.get(index))
            .copied()
            .unwrap_or(MilestoneStyle {
                color: RunColor::White,
                bright: false,
            })
    }

    /// Classify `ch` given the run state after it was scanned.
    pub fn classify(&self, ch: char, run: &RunState) -> Highlight {
        let Some(digit) = ch.to_digit(10) else {
            return Highlight::Separator;
        };
        if run.length < 2 {
            return Highlight::Singleton;
        }
        Highlight::Run {
            color: self.digit_color(ch),
            emphasis: digit % 2 == 1,
        }
    }
}
