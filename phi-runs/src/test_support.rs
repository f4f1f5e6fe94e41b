//! Test-only doubles for the display and interrupt seams.

use std::cell::Cell;
use std::time::Duration;

use anyhow::Result;

use crate::config::StreamConfig;
use crate::core::engine::EngineConfig;
use crate::core::highlight::Highlight;
use crate::core::types::Milestone;
use crate::io::display::{Display, check_size};
use crate::io::interrupt::Interrupt;

/// One call made against a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Init { width: u16, height: u16 },
    Render(char, Highlight),
    Milestone(Milestone),
    Teardown,
}

/// Display that records every call and enforces a minimum size.
#[derive(Debug)]
pub struct RecordingDisplay {
    min_width: u16,
    min_height: u16,
    calls: Vec<DisplayCall>,
}

impl RecordingDisplay {
    pub fn new(min_width: u16, min_height: u16) -> Self {
        Self {
            min_width,
            min_height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DisplayCall] {
        &self.calls
    }

    /// Characters passed to `render`, in order.
    pub fn rendered_text(&self) -> String {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Render(ch, _) => Some(*ch),
                _ => None,
            })
            .collect()
    }

    pub fn milestones(&self) -> Vec<&Milestone> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Milestone(milestone) => Some(milestone),
                _ => None,
            })
            .collect()
    }
}

impl Display for RecordingDisplay {
    fn init(&mut self, width: u16, height: u16) -> Result<()> {
        check_size(width, height, self.min_width, self.min_height)?;
        self.calls.push(DisplayCall::Init { width, height });
        Ok(())
    }

    fn render(&mut self, ch: char, highlight: Highlight) -> Result<()> {
        self.calls.push(DisplayCall::Render(ch, highlight));
        Ok(())
    }

    fn render_milestone(&mut self, milestone: &Milestone) -> Result<()> {
        self.calls.push(DisplayCall::Milestone(milestone.clone()));
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.calls.push(DisplayCall::Teardown);
        Ok(())
    }
}

/// Interrupt that lets `allowed` checks pass and then requests a stop.
#[derive(Debug)]
pub struct CancelAfter {
    remaining: Cell<usize>,
}

impl CancelAfter {
    pub fn new(allowed: usize) -> Self {
        Self {
            remaining: Cell::new(allowed),
        }
    }
}

impl Interrupt for CancelAfter {
    fn is_requested(&self) -> Result<bool> {
        match self.remaining.get() {
            0 => Ok(true),
            left => {
                self.remaining.set(left - 1);
                Ok(false)
            }
        }
    }
}

/// Small, pause-free configuration for tests.
pub fn fast_config() -> StreamConfig {
    StreamConfig {
        prefix_len: 2_000,
        verify_len: 20_000,
        milestone_pause: Duration::ZERO,
        settle_delay: Duration::ZERO,
        min_width: 80,
        min_height: 20,
        live_min_chunk: 64,
        engine: EngineConfig::default(),
    }
}
