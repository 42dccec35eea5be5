#![forbid(unsafe_code)]

//! Frame presenter with line-level diffing.
//!
//! Repaints only the rows that changed since the previous frame and clears
//! the tail when a frame shrinks, so a steady view costs one flush and no
//! redraw. The cache is invalidated on resize (rows shift, everything must
//! repaint).

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

/// Writes string frames to a terminal-shaped sink, row by row.
#[derive(Debug)]
pub struct TerminalWriter<W: Write> {
    out: W,
    /// Rows of the previously presented frame.
    previous: Vec<String>,
    /// Repaint everything on the next present.
    force_full: bool,
}

impl<W: Write> TerminalWriter<W> {
    /// Create a writer over the given sink.
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: Vec::new(),
            force_full: true,
        }
    }

    /// Forget the previous frame; the next present clears the screen and
    /// repaints every row.
    pub fn invalidate(&mut self) {
        self.force_full = true;
    }

    /// Present a frame, rewriting only rows that differ from the previous
    /// one.
    ///
    /// # Errors
    ///
    /// Propagates any write failure of the underlying sink.
    pub fn present(&mut self, frame: &str) -> io::Result<()> {
        let lines: Vec<String> = frame.lines().map(str::to_owned).collect();

        if self.force_full {
            queue!(self.out, Clear(ClearType::All))?;
            self.previous.clear();
            self.force_full = false;
        }

        for (row, line) in lines.iter().enumerate() {
            if self.previous.get(row) == Some(line) {
                continue;
            }
            queue!(
                self.out,
                MoveTo(0, row as u16),
                Clear(ClearType::CurrentLine)
            )?;
            self.out.write_all(line.as_bytes())?;
        }

        if lines.len() < self.previous.len() {
            queue!(
                self.out,
                MoveTo(0, lines.len() as u16),
                Clear(ClearType::FromCursorDown)
            )?;
        }

        self.previous = lines;
        self.out.flush()
    }

    /// The underlying sink, for inspection in tests.
    pub fn sink(&self) -> &W {
        &self.out
    }
}
