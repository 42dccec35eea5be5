#![forbid(unsafe_code)]

//! Core: terminal lifecycle and canonical input events.

pub mod event;
pub mod terminal_session;

pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use terminal_session::{SessionOptions, TerminalSession};
