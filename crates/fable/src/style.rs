#![forbid(unsafe_code)]

//! Minimal terminal styling: colors and SGR rendering for the sidebar.

use std::fmt::Write as _;

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Basic 16-color palette (0-7 normal, 8-15 bright).
    Ansi16(u8),

    /// Extended 256-color palette.
    Ansi256(u8),

    /// 24-bit truecolor.
    Rgb(u8, u8, u8),
}

#[derive(Clone, Copy)]
enum Layer {
    Fg,
    Bg,
}

impl Color {
    fn write_sgr(self, out: &mut String, layer: Layer) {
        let base: u16 = match layer {
            Layer::Fg => 30,
            Layer::Bg => 40,
        };
        match self {
            // Bright palette entries live at 90-97/100-107.
            Color::Ansi16(n) if n < 8 => {
                let _ = write!(out, "{}", base + u16::from(n));
            }
            Color::Ansi16(n) => {
                let _ = write!(out, "{}", base + 60 + u16::from(n & 0x07));
            }
            Color::Ansi256(n) => {
                let _ = write!(out, "{};5;{n}", base + 8);
            }
            Color::Rgb(r, g, b) => {
                let _ = write!(out, "{};2;{r};{g};{b}", base + 8);
            }
        }
    }
}

/// A style applied to one run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,

    /// Background color.
    pub bg: Option<Color>,

    /// Bold weight.
    pub bold: bool,
}

impl Style {
    /// An empty style that changes nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set bold weight.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// True when the style changes nothing.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold
    }

    /// Wrap `text` in this style's SGR sequence and a trailing reset.
    ///
    /// A plain style returns the text untouched, keeping unstyled rows free
    /// of escape noise.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        if self.is_plain() {
            return text.to_owned();
        }

        let mut out = String::with_capacity(text.len() + 24);
        out.push_str("\x1b[");
        let mut separate = false;
        if self.bold {
            out.push('1');
            separate = true;
        }
        if let Some(fg) = self.fg {
            if separate {
                out.push(';');
            }
            fg.write_sgr(&mut out, Layer::Fg);
            separate = true;
        }
        if let Some(bg) = self.bg {
            if separate {
                out.push(';');
            }
            bg.write_sgr(&mut out, Layer::Bg);
        }
        out.push('m');
        out.push_str(text);
        out.push_str("\x1b[0m");
        out
    }
}
