#![forbid(unsafe_code)]

//! A storybook shell for terminal UI components.
//!
//! A storybook registers stories, small terminal programs that each
//! demonstrate one component, in an ordered catalog. The shell renders a
//! fixed-width sidebar of titles next to the active story's own view and
//! multiplexes input: `j`/`k` or the arrow keys move the selection, `q`,
//! `esc`, or `ctrl+c` quits. Keys are never forwarded to stories; a story
//! changes only through the effect results it asked for.
//!
//! Every switch builds a fresh instance from the entry's factory, so a
//! story always demos from its initial state. Effects completing after the
//! user has moved on are dropped rather than delivered to the wrong
//! instance.
//!
//! ```no_run
//! use fable::{Story, StoryCmd, StoryEntry, StoryMsg};
//!
//! struct Greeting;
//!
//! impl Story for Greeting {
//!     fn update(&mut self, _msg: StoryMsg) -> StoryCmd {
//!         StoryCmd::none()
//!     }
//!
//!     fn view(&self) -> String {
//!         "Hello!".to_owned()
//!     }
//! }
//!
//! let stories = vec![StoryEntry::new("Greeting", || Greeting)];
//! fable::run(stories)?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io;

use tracing::warn;

pub mod shell;
pub mod snapshot;
pub mod story;
pub mod style;
pub mod theme;

mod view;

pub use shell::{Msg, Shell, Viewport};
pub use story::{Story, StoryCmd, StoryEntry, StoryMsg};
pub use style::{Color, Style};
pub use theme::{BorderGlyphs, Theme};

// Runtime re-exports so simple storybooks depend on this crate alone.
pub use fable_core::event::{Event, KeyCode, KeyEvent, Modifiers};
pub use fable_runtime::{
    Cmd, FileSnapshotStore, MemorySnapshotStore, Model, Program, ProgramConfig, SnapshotError,
    SnapshotResult, SnapshotStore,
};

pub mod prelude {
    //! Common imports for storybook binaries.

    pub use crate::{
        Cmd, Event, KeyCode, KeyEvent, Model, Modifiers, Shell, Story, StoryCmd, StoryEntry,
        StoryMsg, Theme,
    };
}

/// Run a storybook on the terminal until the user quits.
///
/// Always starts at the first catalog entry. Use [`run_with_store`] to
/// carry the selection across sessions.
///
/// # Errors
///
/// Returns an error if the terminal cannot be configured or a frame cannot
/// be written.
pub fn run(stories: Vec<StoryEntry>) -> io::Result<()> {
    let shell = Shell::new(stories);
    let mut program = Program::new(shell)?;
    program.run()
}

/// Run a storybook, restoring the selection from `store` and persisting it
/// back when the session ends.
///
/// Store failures never abort the session: a failed load starts at the
/// first entry, a failed save is logged and dropped.
///
/// # Errors
///
/// Returns an error if the terminal cannot be configured or a frame cannot
/// be written.
pub fn run_with_store(stories: Vec<StoryEntry>, store: &dyn SnapshotStore) -> io::Result<()> {
    let seed = match store.load() {
        Ok(bytes) => bytes.unwrap_or_default(),
        Err(err) => {
            warn!(store = store.name(), error = %err, "snapshot load failed, starting fresh");
            Vec::new()
        }
    };

    let shell = Shell::restored(stories, &seed);
    let mut program = Program::new(shell)?;
    program.run()?;

    if let Err(err) = store.save(&program.model().snapshot()) {
        warn!(store = store.name(), error = %err, "snapshot save failed");
    }
    Ok(())
}
