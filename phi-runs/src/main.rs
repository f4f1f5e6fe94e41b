//! Stream the golden ratio and report the first run of each length 2..9.
//!
//! Runs a self-check against known first runs, then streams digits to the
//! terminal until `Ctrl-C`, `q` or `Esc`.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal;

use phi_runs::config::StreamConfig;
use phi_runs::core::highlight::Palette;
use phi_runs::core::reference::ReferenceTable;
use phi_runs::exit_codes;
use phi_runs::io::interrupt::KeyboardInterrupt;
use phi_runs::io::terminal::TerminalDisplay;
use phi_runs::logging;
use phi_runs::session::{SessionInputs, run_session};

#[derive(Parser)]
#[command(
    name = "phi-runs",
    version,
    about = "Stream the golden ratio and find the first run of each length 2..9"
)]
struct Cli {}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let Cli {} = Cli::parse();
    logging::init();

    let config = StreamConfig::default();
    let table = ReferenceTable::embedded()?;
    let palette = Palette::default();
    let inputs = SessionInputs {
        config: &config,
        table: &table,
        palette: &palette,
    };

    println!(
        "Self-checking the first {} characters of phi...",
        config.verify_len
    );

    let mut display = TerminalDisplay::stdout(&palette, config.min_width, config.min_height);
    let interrupt = KeyboardInterrupt::default();
    let outcome = run_session(
        &inputs,
        &mut display,
        &interrupt,
        &mut io::stdout(),
        || terminal::size().context("read terminal size"),
    )?;
    Ok(outcome.exit_code())
}
