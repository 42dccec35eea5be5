#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII-based terminal lifecycle management: raw mode on entry, everything
//! restored in reverse order on [`Drop`]. A process-wide panic hook restores
//! the terminal before the default hook prints, so a panicking draw never
//! leaves the user's shell in raw mode.
//!
//! # Cleanup Order
//!
//! 1. Show cursor (always)
//! 2. Leave alternate screen (if entered)
//! 3. Exit raw mode
//! 4. Flush stdout
//!
//! Only one session should exist at a time; a second session would fight the
//! first over shared terminal state.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crate::event::Event;

/// Terminal session configuration options.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Enable the alternate screen buffer (`CSI ? 1049 h`).
    ///
    /// The terminal switches to a separate screen, preserving the original
    /// scrollback; on exit the original screen is restored. Full-screen
    /// applications want this; leave `false` to draw inline.
    pub alternate_screen: bool,
}

impl SessionOptions {
    /// Options for a full-screen application.
    #[must_use]
    pub const fn fullscreen() -> Self {
        Self {
            alternate_screen: true,
        }
    }
}

/// A terminal session that owns raw mode and cleanup.
///
/// Creating a session enters raw mode and hides the cursor. Dropping it
/// (normally or during panic unwinding) restores the terminal.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    cursor_hidden: bool,
}

impl TerminalSession {
    /// Enter raw mode and apply the requested options.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or a requested mode cannot be enabled.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
            cursor_hidden: false,
        };

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            tracing::info!("alternate screen enabled");
        }

        crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        session.cursor_hidden = true;

        Ok(session)
    }

    /// Create a minimal session (raw mode only, primary screen).
    pub fn minimal() -> io::Result<Self> {
        Self::new(SessionOptions::default())
    }

    /// Get the current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Poll for an event with a timeout.
    ///
    /// Returns `Ok(true)` if an event is available, `Ok(false)` on timeout.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event (blocking until available).
    ///
    /// Returns `Ok(None)` when the raw event has no canonical
    /// representation (mouse reports, key releases).
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        let event = crossterm::event::read()?;
        Ok(Event::from_crossterm(event))
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.cursor_hidden {
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            self.cursor_hidden = false;
        }

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }

        let _ = crossterm::terminal::disable_raw_mode();
        let _ = stdout.flush();
        tracing::info!("terminal restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_restore();
            previous(info);
        }));
    });
}

/// Unconditional terminal restore for the panic path. The panicking thread
/// cannot reach the live session's flags, so every mode is disabled
/// regardless of what was enabled.
fn best_effort_restore() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullscreen_options_enable_alternate_screen() {
        assert!(SessionOptions::fullscreen().alternate_screen);
        assert!(!SessionOptions::default().alternate_screen);
    }
}
