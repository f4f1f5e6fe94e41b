//! Batch-then-live streaming of golden-ratio digits to a display.

use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::config::StreamConfig;
use crate::core::engine::compute_digits;
use crate::core::highlight::{Highlight, Palette};
use crate::core::scanner::{DEFAULT_RUN_LENGTHS, FirstRunRecord, RunScanner};
use crate::core::types::{Milestone, Position};
use crate::digits::PhiDigits;
use crate::io::display::Display;
use crate::io::interrupt::Interrupt;

/// Reason why streaming stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStop {
    /// An interrupt was observed between two characters.
    Cancelled,
    /// The live source ran dry (only finite sources in tests do this).
    Exhausted,
}

/// Summary of a streaming session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Position of the last fully processed character.
    pub position: Position,
    pub record: FirstRunRecord,
    pub milestones: Vec<Milestone>,
    pub stop: StreamStop,
}

enum Flow {
    Continue,
    Cancelled,
}

/// Feeds characters through the scanner into a display.
///
/// Each character is generated, classified, and rendered before the next one
/// is pulled. The interrupt is polled only between characters.
pub struct StreamCoordinator<'a, D: Display, I: Interrupt> {
    config: &'a StreamConfig,
    palette: &'a Palette,
    display: &'a mut D,
    interrupt: &'a I,
    scanner: RunScanner,
    milestones: Vec<Milestone>,
    started: Instant,
}

impl<'a, D: Display, I: Interrupt> StreamCoordinator<'a, D, I> {
    pub fn new(
        config: &'a StreamConfig,
        palette: &'a Palette,
        display: &'a mut D,
        interrupt: &'a I,
    ) -> Self {
        Self {
            config,
            palette,
            display,
            interrupt,
            scanner: RunScanner::new(DEFAULT_RUN_LENGTHS),
            milestones: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Initialise the display, stream the precomputed prefix, then the live
    /// expansion until interrupted. The prefix is only computed once the
    /// display has accepted the terminal size. The display is torn down on
    /// every exit path once `init` succeeded.
    pub fn run(mut self, width: u16, height: u16) -> Result<StreamOutcome> {
        self.display.init(width, height)?;

        let started = Instant::now();
        let prefix = compute_digits(self.config.prefix_len, &self.config.engine);
        debug!(
            prefix_len = prefix.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "batch prefix computed"
        );

        let live = PhiDigits::starting_after(
            prefix.len(),
            self.config.engine,
            self.config.live_min_chunk,
        );
        self.finish(&prefix, live)
    }

    /// Same as [`run`](Self::run) with explicit batch and live sources.
    pub fn run_with<L: Iterator<Item = char>>(
        mut self,
        width: u16,
        height: u16,
        prefix: &str,
        live: L,
    ) -> Result<StreamOutcome> {
        self.display.init(width, height)?;
        self.finish(prefix, live)
    }

    /// Stream both phases on an initialised display, then tear it down.
    fn finish<L: Iterator<Item = char>>(mut self, prefix: &str, live: L) -> Result<StreamOutcome> {
        let streamed = self.stream(prefix, live);
        let torn_down = self.display.teardown().context("tear down display");
        let stop = streamed?;
        torn_down?;

        info!(
            position = self.scanner.position(),
            ?stop,
            missing = ?self.scanner.record().missing(),
            "streaming stopped"
        );
        Ok(StreamOutcome {
            position: self.scanner.position(),
            record: self.scanner.into_record(),
            milestones: self.milestones,
            stop,
        })
    }

    fn stream<L: Iterator<Item = char>>(&mut self, prefix: &str, live: L) -> Result<StreamStop> {
        self.started = Instant::now();

        if let Flow::Cancelled = self.batch_phase(prefix)? {
            return Ok(StreamStop::Cancelled);
        }
        info!(
            position = self.scanner.position(),
            complete = self.scanner.record().is_complete(),
            "batch phase finished, switching to live digits"
        );
        self.live_phase(live)
    }

    #[instrument(skip_all, fields(prefix_len = prefix.len()))]
    fn batch_phase(&mut self, prefix: &str) -> Result<Flow> {
        for ch in prefix.chars() {
            if self.interrupt.is_requested()? {
                return Ok(Flow::Cancelled);
            }
            self.process(ch)?;
        }
        Ok(Flow::Continue)
    }

    fn live_phase<L: Iterator<Item = char>>(&mut self, live: L) -> Result<StreamStop> {
        for ch in live {
            if self.interrupt.is_requested()? {
                return Ok(StreamStop::Cancelled);
            }
            self.process(ch)?;
        }
        // The interrupt wins over exhaustion when both apply.
        if self.interrupt.is_requested()? {
            return Ok(StreamStop::Cancelled);
        }
        Ok(StreamStop::Exhausted)
    }

    /// Scan, report a new first run if any, then render the character.
    fn process(&mut self, ch: char) -> Result<()> {
        let step = self.scanner.step(ch);
        let highlight = self.palette.classify(ch, &step.run);

        if let Some(run) = step.first_run {
            let milestone = Milestone {
                run,
                elapsed: self.started.elapsed(),
            };
            info!(
                length = milestone.run.length,
                sequence = %milestone.run.sequence,
                start = milestone.run.start,
                elapsed_ms = milestone.elapsed.as_millis(),
                "first run found"
            );
            self.display.render_milestone(&milestone)?;
            self.milestones.push(milestone);
            if !self.config.milestone_pause.is_zero() {
                thread::sleep(self.config.milestone_pause);
            }
        }

        if highlight != Highlight::Separator {
            self.display.render(ch, highlight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::highlight::RunColor;
    use crate::io::interrupt::CancelToken;
    use crate::test_support::{CancelAfter, DisplayCall, RecordingDisplay, fast_config};

    #[test]
    fn separator_advances_position_but_is_not_rendered() {
        let config = fast_config();
        let palette = Palette::default();
        let mut display = RecordingDisplay::new(80, 20);
        let token = CancelToken::new();

        let outcome = StreamCoordinator::new(&config, &palette, &mut display, &token)
            .run_with(80, 20, "1.6", std::iter::empty())
            .expect("stream");

        assert_eq!(outcome.position, 3);
        assert_eq!(outcome.stop, StreamStop::Exhausted);
        assert_eq!(display.rendered_text(), "16");
    }

    #[test]
    fn milestone_precedes_the_digit_that_completes_it() {
        let config = fast_config();
        let palette = Palette::default();
        let mut display = RecordingDisplay::new(80, 20);
        let token = CancelToken::new();

        StreamCoordinator::new(&config, &palette, &mut display, &token)
            .run_with(80, 20, "1.33", std::iter::empty())
            .expect("stream");

        let calls = display.calls();
        assert!(matches!(calls[0], DisplayCall::Init { .. }));
        assert_eq!(calls[1], DisplayCall::Render('1', Highlight::Singleton));
        assert_eq!(calls[2], DisplayCall::Render('3', Highlight::Singleton));
        assert!(matches!(&calls[3], DisplayCall::Milestone(m) if m.run.start == 3));
        assert_eq!(
            calls[4],
            DisplayCall::Render(
                '3',
                Highlight::Run {
                    color: RunColor::Green,
                    emphasis: true
                }
            )
        );
        assert_eq!(calls[5], DisplayCall::Teardown);
    }

    #[test]
    fn live_phase_still_honours_missing_lengths() {
        let config = fast_config();
        let palette = Palette::default();
        let mut display = RecordingDisplay::new(80, 20);
        let token = CancelToken::new();

        let outcome = StreamCoordinator::new(&config, &palette, &mut display, &token)
            .run_with(80, 20, "1.22", "333444".chars())
            .expect("stream");

        let found: Vec<(usize, u64)> = outcome
            .milestones
            .iter()
            .map(|m| (m.run.length, m.run.start))
            .collect();
        assert_eq!(found, vec![(2, 3), (3, 5)]);
        assert_eq!(outcome.position, 10);
    }

    #[test]
    fn cancellation_lands_on_a_character_boundary() {
        let config = fast_config();
        let palette = Palette::default();
        let mut display = RecordingDisplay::new(80, 20);
        let interrupt = CancelAfter::new(5);

        let outcome = StreamCoordinator::new(&config, &palette, &mut display, &interrupt)
            .run_with(80, 20, "1.1122", "33".chars())
            .expect("stream");

        assert_eq!(outcome.stop, StreamStop::Cancelled);
        assert_eq!(outcome.position, 5);
        assert_eq!(display.rendered_text(), "1112");
        assert_eq!(display.calls().last(), Some(&DisplayCall::Teardown));
    }

    #[test]
    fn too_small_display_stops_before_streaming() {
        let config = fast_config();
        let palette = Palette::default();
        let mut display = RecordingDisplay::new(80, 20);
        let token = CancelToken::new();

        let err = StreamCoordinator::new(&config, &palette, &mut display, &token)
            .run_with(40, 10, "1.6", std::iter::empty())
            .expect_err("too small");

        assert!(
            err.downcast_ref::<crate::io::display::DisplayTooSmall>()
                .is_some()
        );
        assert!(display.rendered_text().is_empty());
    }

    #[test]
    fn size_is_checked_before_the_prefix_is_computed() {
        // A prefix this long would never finish; the size check must come first.
        let config = StreamConfig {
            prefix_len: usize::MAX,
            ..fast_config()
        };
        let palette = Palette::default();
        let mut display = RecordingDisplay::new(80, 20);
        let token = CancelToken::new();

        let err = StreamCoordinator::new(&config, &palette, &mut display, &token)
            .run(79, 20)
            .expect_err("too small");

        assert!(
            err.downcast_ref::<crate::io::display::DisplayTooSmall>()
                .is_some()
        );
        assert!(display.calls().is_empty());
    }
}
