//! Display abstraction for streamed digits.
//!
//! The [`Display`] trait decouples the stream coordinator from any concrete
//! rendering technology. The binary uses the crossterm terminal; tests use a
//! recording display that keeps every call in memory.

use std::fmt;

use anyhow::Result;

use crate::core::highlight::Highlight;
use crate::core::types::Milestone;

/// Sink for rendered characters and milestone updates.
pub trait Display {
    /// Prepare the drawing area. Fails with [`DisplayTooSmall`] when the
    /// area is below the display's minimum size.
    fn init(&mut self, width: u16, height: u16) -> Result<()>;

    /// Append one character to the scrolling viewport.
    fn render(&mut self, ch: char, highlight: Highlight) -> Result<()>;

    /// Update the status slot for `milestone.run.length` and alert the user.
    fn render_milestone(&mut self, milestone: &Milestone) -> Result<()>;

    /// Release the drawing area. Safe to call more than once.
    fn teardown(&mut self) -> Result<()>;
}

/// The drawing area is smaller than the display supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTooSmall {
    pub width: u16,
    pub height: u16,
    pub min_width: u16,
    pub min_height: u16,
}

impl fmt::Display for DisplayTooSmall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Terminal too small ({}x{}). Resize to at least {}x{} and retry.",
            self.width, self.height, self.min_width, self.min_height
        )
    }
}

impl std::error::Error for DisplayTooSmall {}

/// Check a drawing area against a minimum size.
pub fn check_size(
    width: u16,
    height: u16,
    min_width: u16,
    min_height: u16,
) -> Result<(), DisplayTooSmall> {
    if width < min_width || height < min_height {
        return Err(DisplayTooSmall {
            width,
            height,
            min_width,
            min_height,
        });
    }
    Ok(())
}
