//! Crossterm-backed terminal display.
//!
//! Layout: a fixed header (title, per-length status slots on the left, legend
//! on the right) above a scrolling digit viewport.

use std::collections::VecDeque;
use std::io::{Stdout, Write};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::debug;

use crate::core::highlight::{Highlight, MilestoneStyle, Palette, RunColor};
use crate::core::types::Milestone;
use crate::io::display::{Display, check_size};

/// Rows reserved for the title, legend and status slots.
pub const HEADER_HEIGHT: u16 = 10;

const TITLE: &str = "★ φ run finder (fractional digits, lengths 2…9) ★";
const LEGEND_TITLE: &str = "Legend: run length → highlight";
const SLOT_LENGTHS: std::ops::RangeInclusive<usize> = 2..=9;

type Cell = (char, Highlight);

pub struct TerminalDisplay<'a, W: Write> {
    out: W,
    palette: &'a Palette,
    /// Whether init/teardown toggle raw mode and the alternate screen.
    manage_terminal: bool,
    min_width: u16,
    min_height: u16,
    width: u16,
    height: u16,
    active: bool,
    lines: VecDeque<Vec<Cell>>,
}

impl<'a> TerminalDisplay<'a, Stdout> {
    /// Display on the process's terminal, with raw mode and alternate screen.
    pub fn stdout(palette: &'a Palette, min_width: u16, min_height: u16) -> Self {
        let mut display = Self::with_writer(std::io::stdout(), palette, min_width, min_height);
        display.manage_terminal = true;
        display
    }
}

impl<'a, W: Write> TerminalDisplay<'a, W> {
    /// Display that only emits escape sequences to `out`.
    pub fn with_writer(out: W, palette: &'a Palette, min_width: u16, min_height: u16) -> Self {
        Self {
            out,
            palette,
            manage_terminal: false,
            min_width,
            min_height,
            width: 0,
            height: 0,
            active: false,
            lines: VecDeque::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn viewport_rows(&self) -> usize {
        usize::from(self.height.saturating_sub(HEADER_HEIGHT)).max(1)
    }

    fn legend_col(&self) -> u16 {
        self.width / 2
    }

    fn slot_width(&self) -> usize {
        usize::from(self.legend_col().saturating_sub(3))
    }

    fn draw_header(&mut self) -> Result<()> {
        let title_x = (self.width / 2).saturating_sub(text_width(TITLE) / 2);
        queue!(
            self.out,
            MoveTo(title_x, 0),
            SetAttribute(Attribute::Bold),
            Print(TITLE),
            SetAttribute(Attribute::Reset)
        )?;

        let legend_col = self.legend_col();
        queue!(
            self.out,
            MoveTo(legend_col, 1),
            SetAttribute(Attribute::Bold),
            Print(LEGEND_TITLE),
            SetAttribute(Attribute::Reset)
        )?;

        let slot_width = self.slot_width();
        for length in SLOT_LENGTHS {
            let row = slot_row(length);
            let sample: String = std::iter::repeat_n(digit_label(length), length).collect();
            let style = self.palette.milestone(length);
            queue!(
                self.out,
                MoveTo(2, row),
                SetForegroundColor(Color::Grey),
                Print(fit(&format!("Len {length}: N/A"), slot_width)),
                ResetColor,
                MoveTo(legend_col, row),
                SetAttribute(Attribute::Reverse),
                SetForegroundColor(milestone_color(style)),
                Print(format!("  {length} = {sample}")),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn queue_cell(&mut self, (ch, highlight): Cell) -> Result<()> {
        match highlight {
            Highlight::Separator => {}
            Highlight::Singleton => {
                queue!(
                    self.out,
                    SetForegroundColor(Color::Grey),
                    Print(ch),
                    ResetColor
                )?;
            }
            Highlight::Run { color, emphasis } => {
                if emphasis {
                    queue!(self.out, SetAttribute(Attribute::Bold))?;
                }
                queue!(
                    self.out,
                    SetForegroundColor(term_color(color, false)),
                    Print(ch),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            }
        }
        Ok(())
    }

    fn redraw_viewport(&mut self) -> Result<()> {
        let lines: Vec<Vec<Cell>> = self.lines.iter().cloned().collect();
        for (index, line) in lines.into_iter().enumerate() {
            let row = HEADER_HEIGHT.saturating_add(u16::try_from(index).unwrap_or(u16::MAX));
            queue!(self.out, MoveTo(0, row), Clear(ClearType::UntilNewLine))?;
            for cell in line {
                self.queue_cell(cell)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Display for TerminalDisplay<'_, W> {
    fn init(&mut self, width: u16, height: u16) -> Result<()> {
        check_size(width, height, self.min_width, self.min_height)?;
        self.width = width;
        self.height = height;
        self.lines.clear();

        if self.manage_terminal {
            terminal::enable_raw_mode().context("enable raw mode")?;
            execute!(self.out, EnterAlternateScreen, Hide).context("enter alternate screen")?;
        }
        self.active = true;

        queue!(self.out, Clear(ClearType::All))?;
        self.draw_header().context("draw header")?;
        self.out.flush().context("flush terminal")?;
        debug!(width, height, "terminal display ready");
        Ok(())
    }

    fn render(&mut self, ch: char, highlight: Highlight) -> Result<()> {
        if highlight == Highlight::Separator {
            return Ok(());
        }

        let width = usize::from(self.width).max(1);
        if self.lines.back().is_none_or(|line| line.len() >= width) {
            self.lines.push_back(Vec::with_capacity(width));
        }
        let mut col = 0;
        if let Some(line) = self.lines.back_mut() {
            line.push((ch, highlight));
            col = line.len() - 1;
        }

        if self.lines.len() > self.viewport_rows() {
            self.lines.pop_front();
            self.redraw_viewport()?;
        } else {
            let row = HEADER_HEIGHT.saturating_add(
                u16::try_from(self.lines.len() - 1).unwrap_or(u16::MAX),
            );
            let col = u16::try_from(col).unwrap_or(u16::MAX);
            queue!(self.out, MoveTo(col, row))?;
            self.queue_cell((ch, highlight))?;
        }
        self.out.flush().context("flush terminal")?;
        Ok(())
    }

    fn render_milestone(&mut self, milestone: &Milestone) -> Result<()> {
        let run = &milestone.run;
        if SLOT_LENGTHS.contains(&run.length) {
            let text = format!(
                "Len {}: {} @ {}   [{:7.3}s]",
                run.length,
                run.sequence,
                run.start,
                milestone.elapsed.as_secs_f64()
            );
            let style = self.palette.milestone(run.length);
            let slot_width = self.slot_width();
            queue!(
                self.out,
                MoveTo(2, slot_row(run.length)),
                SetAttribute(Attribute::Reverse),
                SetForegroundColor(milestone_color(style)),
                Print(fit(&text, slot_width)),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        queue!(self.out, Print('\u{7}'))?;
        self.out.flush().context("flush terminal")?;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        queue!(self.out, ResetColor, Show)?;
        if self.manage_terminal {
            execute!(self.out, LeaveAlternateScreen).context("leave alternate screen")?;
            terminal::disable_raw_mode().context("disable raw mode")?;
        }
        self.out.flush().context("flush terminal")?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalDisplay<'_, W> {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

fn slot_row(length: usize) -> u16 {
    u16::try_from(length).unwrap_or(u16::MAX)
}

fn digit_label(length: usize) -> char {
    u32::try_from(length)
        .ok()
        .and_then(|digit| char::from_digit(digit, 10))
        .unwrap_or('?')
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

/// Truncate or pad `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let mut fitted: String = text.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.extend(std::iter::repeat_n(' ', width - len));
    fitted
}

fn milestone_color(style: MilestoneStyle) -> Color {
    term_color(style.color, style.bright)
}

fn term_color(color: RunColor, bright: bool) -> Color {
    match (color, bright) {
        (RunColor::White, false) => Color::Grey,
        (RunColor::White, true) => Color::White,
        (RunColor::Red, false) => Color::DarkRed,
        (RunColor::Red, true) => Color::Red,
        (RunColor::Green, false) => Color::DarkGreen,
        (RunColor::Green, true) => Color::Green,
        (RunColor::Yellow, false) => Color::DarkYellow,
        (RunColor::Yellow, true) => Color::Yellow,
        (RunColor::Blue, false) => Color::DarkBlue,
        (RunColor::Blue, true) => Color::Blue,
        (RunColor::Magenta, false) => Color::DarkMagenta,
        (RunColor::Magenta, true) => Color::Magenta,
        (RunColor::Cyan, false) => Color::DarkCyan,
        (RunColor::Cyan, true) => Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FirstRun;
    use crate::io::display::DisplayTooSmall;
    use std::time::Duration;

    fn output(display: &TerminalDisplay<'_, Vec<u8>>) -> String {
        String::from_utf8_lossy(display.get_ref()).into_owned()
    }

    #[test]
    fn init_draws_header_slots_and_legend() {
        let palette = Palette::default();
        let mut display = TerminalDisplay::with_writer(Vec::new(), &palette, 80, 20);
        display.init(80, 24).expect("init");

        let out = output(&display);
        assert!(out.contains("φ run finder"));
        assert!(out.contains("Len 9: N/A"));
        assert!(out.contains("  4 = 4444"));
    }

    #[test]
    fn init_rejects_small_terminal_without_drawing() {
        let palette = Palette::default();
        let mut display = TerminalDisplay::with_writer(Vec::new(), &palette, 80, 20);
        let err = display.init(60, 10).expect_err("too small");
        assert!(err.downcast_ref::<DisplayTooSmall>().is_some());
        assert!(display.get_ref().is_empty());
    }

    #[test]
    fn milestone_updates_slot_and_rings_bell() {
        let palette = Palette::default();
        let mut display = TerminalDisplay::with_writer(Vec::new(), &palette, 80, 20);
        display.init(80, 20).expect("init");
        display
            .render_milestone(&Milestone {
                run: FirstRun::new('3', 2, 7),
                elapsed: Duration::from_millis(1500),
            })
            .expect("milestone");

        let out = output(&display);
        assert!(out.contains("Len 2: 33 @ 7   [  1.500s]"));
        assert!(out.ends_with('\u{7}'));
    }

    #[test]
    fn milestone_text_is_fitted_to_the_status_slot() {
        let palette = Palette::default();
        let mut display = TerminalDisplay::with_writer(Vec::new(), &palette, 80, 20);
        display.init(100, 20).expect("init");
        display
            .render_milestone(&Milestone {
                run: FirstRun::new('9', 5, 6401),
                elapsed: Duration::from_secs(3),
            })
            .expect("milestone");

        // Legend at column 50, so the slot is 47 columns wide.
        let text = "Len 5: 99999 @ 6401   [  3.000s]";
        let padded = format!("{text}{}", " ".repeat(47 - text.len()));
        assert!(output(&display).contains(&padded));
    }

    #[test]
    fn viewport_scrolls_instead_of_growing() {
        let palette = Palette::default();
        let mut display = TerminalDisplay::with_writer(Vec::new(), &palette, 80, 20);
        display.init(80, 20).expect("init");
        for _ in 0..(80 * 12 + 5) {
            display.render('7', Highlight::Singleton).expect("render");
        }
        assert_eq!(display.lines.len(), 10);
        assert_eq!(display.lines.back().map(Vec::len), Some(5));
    }

    #[test]
    fn separator_is_not_drawn() {
        let palette = Palette::default();
        let mut display = TerminalDisplay::with_writer(Vec::new(), &palette, 80, 20);
        display.init(80, 20).expect("init");
        display.render('.', Highlight::Separator).expect("render");
        assert!(display.lines.is_empty());
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
    }
}
