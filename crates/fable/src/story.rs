#![forbid(unsafe_code)]

//! The story contract: what a catalog entry instantiates.
//!
//! Stories are heterogeneous, so the shell holds them behind `dyn Story`
//! and their messages behind `dyn Any`. Each story downcasts incoming
//! messages to its own concrete type and ignores the rest.

use std::any::Any;
use std::fmt;

/// Type-erased message delivered to a story by one of its own effects.
pub type StoryMsg = Box<dyn Any + Send>;

/// A deferred effect requested by a story: nothing, or one unit of work
/// that yields exactly one message on completion.
#[derive(Default)]
pub enum StoryCmd {
    /// No effect.
    #[default]
    None,

    /// Deferred work producing one message.
    Task(Box<dyn FnOnce() -> StoryMsg + Send>),
}

impl StoryCmd {
    /// No effect.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// Deferred work. The closure runs off the event loop; its return value
    /// is boxed and delivered back to the story's `update`.
    pub fn task<T, F>(f: F) -> Self
    where
        T: Any + Send,
        F: FnOnce() -> T + Send + 'static,
    {
        Self::Task(Box::new(move || Box::new(f()) as StoryMsg))
    }

    /// True for [`StoryCmd::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for StoryCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Task(_) => write!(f, "Task(...)"),
        }
    }
}

/// An interactive sub-program browsable in the storybook.
///
/// The shell consumes all key input; a story's only input channel is the
/// messages produced by its own effects. `update` mutates in place, and
/// switching replaces the instance wholesale — state never survives a
/// switch.
pub trait Story {
    /// Called once right after the story is instantiated by a switch.
    fn init(&mut self) -> StoryCmd {
        StoryCmd::none()
    }

    /// Respond to a message produced by one of this story's effects.
    fn update(&mut self, msg: StoryMsg) -> StoryCmd;

    /// Render the story's current state; shown verbatim beside the sidebar.
    fn view(&self) -> String;
}

/// A named catalog entry: a title and a factory producing a fresh story
/// instance on every switch.
pub struct StoryEntry {
    title: String,
    factory: Box<dyn Fn() -> Box<dyn Story>>,
}

impl StoryEntry {
    /// Create an entry. The factory is called on every switch to this
    /// entry; instances are never reused.
    pub fn new<S, F>(title: impl Into<String>, factory: F) -> Self
    where
        S: Story + 'static,
        F: Fn() -> S + 'static,
    {
        Self {
            title: title.into(),
            factory: Box::new(move || Box::new(factory()) as Box<dyn Story>),
        }
    }

    /// The entry's display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Instantiate a fresh story.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Story> {
        (self.factory)()
    }
}

impl fmt::Debug for StoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryEntry")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
