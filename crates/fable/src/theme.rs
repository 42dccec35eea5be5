#![forbid(unsafe_code)]

//! Render configuration.
//!
//! An explicit immutable value the shell hands to the renderer; nothing
//! here is process-wide state.

use crate::style::Color;

/// Glyphs for the frame chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    /// Vertical divider drawn between the sidebar and the story region.
    pub vertical: char,
}

impl Default for BorderGlyphs {
    fn default() -> Self {
        Self { vertical: '│' }
    }
}

/// Visual configuration for the composed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Foreground of the selected sidebar entry.
    pub selected_fg: Color,

    /// Background of the selected sidebar entry.
    pub selected_bg: Color,

    /// Sidebar content width in columns; titles pad or truncate to fit.
    pub sidebar_width: usize,

    /// Divider glyphs.
    pub border: BorderGlyphs,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            selected_fg: Color::Ansi256(230),
            selected_bg: Color::Ansi256(62),
            sidebar_width: 20,
            border: BorderGlyphs::default(),
        }
    }
}
