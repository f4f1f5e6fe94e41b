//! Cancellation checks polled between streamed characters.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::info;

/// Source of external stop requests.
pub trait Interrupt {
    /// Return `true` once a stop has been requested. Must not block.
    fn is_requested(&self) -> Result<bool>;
}

/// Keyboard interrupt for a terminal in raw mode, where Ctrl-C arrives as a
/// key event rather than a signal. `Ctrl-C`, `q` and `Esc` stop the stream.
#[derive(Debug, Default)]
pub struct KeyboardInterrupt {
    requested: AtomicBool,
}

impl Interrupt for KeyboardInterrupt {
    fn is_requested(&self) -> Result<bool> {
        if self.requested.load(Ordering::Relaxed) {
            return Ok(true);
        }
        while event::poll(Duration::ZERO).context("poll terminal events")? {
            let Event::Key(key) = event::read().context("read terminal event")? else {
                continue;
            };
            if is_stop_key(&key) {
                info!(code = ?key.code, "stop requested from keyboard");
                self.requested.store(true, Ordering::Relaxed);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn is_stop_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

/// Shareable flag; clones observe the same request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl Interrupt for CancelToken {
    fn is_requested(&self) -> Result<bool> {
        Ok(self.flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_requested().expect("poll"));
        token.cancel();
        assert!(observer.is_requested().expect("poll"));
    }

    #[test]
    fn stop_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(is_stop_key(&ctrl_c));
        assert!(!is_stop_key(&plain_c));
        assert!(is_stop_key(&quit));
        assert!(is_stop_key(&esc));
    }
}
