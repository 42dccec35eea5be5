#![forbid(unsafe_code)]

//! Runtime: the event loop driving a fable session.
//!
//! [`Program`] owns the terminal, polls input, executes [`Cmd`] side effects
//! on background threads, and presents the model's string frames through a
//! diffing [`TerminalWriter`]. [`snapshot`] holds the byte stores a session
//! persists its navigation state through.

pub mod program;
pub mod snapshot;
pub mod terminal_writer;

pub use program::{
    Cmd, CrosstermEventSource, EventSource, Model, Program, ProgramConfig, ScriptedEventSource,
};
pub use snapshot::{
    FileSnapshotStore, MemorySnapshotStore, SnapshotError, SnapshotResult, SnapshotStore,
};
pub use terminal_writer::TerminalWriter;
