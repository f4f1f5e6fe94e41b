//! Whole-program flow: self-check, then streaming.

use std::io::Write;
use std::thread;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::StreamConfig;
use crate::core::highlight::Palette;
use crate::core::reference::ReferenceTable;
use crate::exit_codes;
use crate::io::display::{Display, DisplayTooSmall};
use crate::io::interrupt::Interrupt;
use crate::stream::{StreamCoordinator, StreamOutcome};
use crate::verify::{VerificationReport, run_verification};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The self-check failed; nothing interactive was created.
    VerificationFailed(VerificationReport),
    /// The self-check passed but the display was too small to stream.
    DisplayTooSmall(DisplayTooSmall),
    /// Streaming ran and stopped.
    Streamed(StreamOutcome),
}

impl SessionOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionOutcome::VerificationFailed(_) => exit_codes::VERIFICATION_FAILED,
            SessionOutcome::DisplayTooSmall(_) | SessionOutcome::Streamed(_) => exit_codes::OK,
        }
    }
}

/// Everything a session reads but never mutates.
pub struct SessionInputs<'a> {
    pub config: &'a StreamConfig,
    pub table: &'a ReferenceTable,
    pub palette: &'a Palette,
}

/// Run the self-check, write its report to `report_out`, then stream to
/// `display` unless the check failed or the display refused its size.
///
/// `area` is queried only after the check passes.
pub fn run_session<D, I, W, A>(
    inputs: &SessionInputs<'_>,
    display: &mut D,
    interrupt: &I,
    report_out: &mut W,
    area: A,
) -> Result<SessionOutcome>
where
    D: Display,
    I: Interrupt,
    W: Write,
    A: FnOnce() -> Result<(u16, u16)>,
{
    inputs.config.validate()?;

    let report = run_verification(inputs.config, inputs.table);
    write!(report_out, "{report}")
        .and_then(|()| report_out.flush())
        .context("write self-check report")?;
    if !report.passed() {
        return Ok(SessionOutcome::VerificationFailed(report));
    }

    if !inputs.config.settle_delay.is_zero() {
        thread::sleep(inputs.config.settle_delay);
    }

    let (width, height) = area()?;
    let coordinator = StreamCoordinator::new(inputs.config, inputs.palette, display, interrupt);
    match coordinator.run(width, height) {
        Ok(outcome) => Ok(SessionOutcome::Streamed(outcome)),
        Err(err) => match err.downcast_ref::<DisplayTooSmall>() {
            Some(too_small) => {
                warn!(width, height, "display too small");
                report_out
                    .write_all(format!("{too_small}\n").as_bytes())
                    .context("write size diagnostic")?;
                info!("exiting without streaming");
                Ok(SessionOutcome::DisplayTooSmall(*too_small))
            }
            None => Err(err),
        },
    }
}
