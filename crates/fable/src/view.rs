#![forbid(unsafe_code)]

//! Frame composition.
//!
//! A frame is two blocks joined horizontally: a fixed-width sidebar listing
//! every catalog title (selected entry highlighted, vertical border on its
//! right edge) and the active story's view, verbatim, separated by a small
//! gutter. The sidebar block is at least as tall as the viewport; whichever
//! block is taller sets the row count and the shorter one is padded with
//! spaces so columns stay aligned.

use unicode_width::UnicodeWidthChar;

use crate::shell::Shell;
use crate::style::Style;

/// Columns between the sidebar border and the story block.
const GUTTER: &str = "   ";

/// Compose the full frame for the shell's current state.
pub(crate) fn render(shell: &Shell) -> String {
    let theme = shell.theme();
    let story_view = shell
        .active_story()
        .map(|story| story.view())
        .unwrap_or_default();
    let story_lines: Vec<&str> = story_view.lines().collect();

    let left_rows = shell.stories().len().max(shell.viewport().height as usize);
    let total_rows = left_rows.max(story_lines.len());

    let mut frame = String::new();
    for row in 0..total_rows {
        if row > 0 {
            frame.push('\n');
        }
        if row < left_rows {
            frame.push_str(&sidebar_cell(shell, row));
            frame.push(theme.border.vertical);
            frame.push_str(GUTTER);
        } else {
            // Story taller than the sidebar block; keep its columns aligned.
            frame.push_str(&" ".repeat(theme.sidebar_width + 1 + GUTTER.len()));
        }
        if let Some(line) = story_lines.get(row) {
            frame.push_str(line);
        }
    }
    frame
}

/// One sidebar row: a title fitted to the sidebar width, highlighted when
/// selected, or blank filler below the last entry.
fn sidebar_cell(shell: &Shell, row: usize) -> String {
    let theme = shell.theme();
    let Some(entry) = shell.stories().get(row) else {
        return " ".repeat(theme.sidebar_width);
    };

    let cell = fit_width(entry.title(), theme.sidebar_width);
    if row == shell.current_index() {
        Style::new()
            .fg(theme.selected_fg)
            .bg(theme.selected_bg)
            .render(&cell)
    } else {
        cell
    }
}

/// Pad or truncate `text` to exactly `width` display columns.
///
/// Wide characters never split: one that would cross the boundary is
/// dropped and the cell is space-padded instead.
fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    for _ in used..width {
        out.push(' ');
    }
    out
}
