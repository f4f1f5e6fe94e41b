//! Startup constants for verification and streaming.

use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::core::engine::EngineConfig;

/// Immutable settings, built once at startup and passed by reference.
///
/// None of these are read from files or flags; tests construct smaller
/// values directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Characters (including `"1."`) precomputed for the batch phase.
    pub prefix_len: usize,

    /// Characters checked against the reference table at startup.
    pub verify_len: usize,

    /// Pause after each first-run milestone.
    pub milestone_pause: Duration,

    /// Pause between a passing self-check and the interactive phases.
    pub settle_delay: Duration,

    /// Smallest terminal the display accepts.
    pub min_width: u16,
    pub min_height: u16,

    /// Minimum number of new characters computed per live refill.
    pub live_min_chunk: usize,

    pub engine: EngineConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            prefix_len: 100_000,
            verify_len: 20_000,
            milestone_pause: Duration::from_secs(1),
            settle_delay: Duration::from_secs(1),
            min_width: 80,
            min_height: 20,
            live_min_chunk: 1_000,
            engine: EngineConfig::default(),
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<()> {
        if self.prefix_len < 2 {
            return Err(anyhow!("prefix_len must be >= 2 to include \"1.\""));
        }
        if self.verify_len == 0 {
            return Err(anyhow!("verify_len must be > 0"));
        }
        if self.min_width == 0 || self.min_height == 0 {
            return Err(anyhow!("minimum terminal size must be > 0"));
        }
        if self.live_min_chunk == 0 {
            return Err(anyhow!("live_min_chunk must be > 0"));
        }
        if self.engine.increment == 0 {
            return Err(anyhow!("engine.increment must be > 0"));
        }
        Ok(())
    }
}
