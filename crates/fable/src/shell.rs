#![forbid(unsafe_code)]

//! The shell state machine.
//!
//! Owns all mutable session state: the catalog, the selected index, the
//! active story instance, and the last-known viewport. Every transition is
//! total; requests that would leave the state invalid (out-of-range switch,
//! effect result for a replaced instance) are no-ops, never errors.
//!
//! Effect routing across instance swaps is the one subtle part. Each switch
//! bumps a generation counter and every adapted effect carries the
//! generation that issued it, so a result completing after the user moved
//! on is recognized as stale and dropped instead of being delivered to an
//! unrelated story.

use std::fmt;

use fable_core::event::{Event, KeyCode, KeyEvent};
use fable_runtime::{Cmd, Model};
use tracing::debug;

use crate::story::{Story, StoryCmd, StoryEntry, StoryMsg};
use crate::theme::Theme;
use crate::view;

/// Last-known terminal viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

/// Messages driving the shell.
pub enum Msg {
    /// Raw key input.
    Key(KeyEvent),

    /// Terminal resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Activate the entry at the given index. Out-of-range targets are
    /// discarded unchanged; there is no wraparound.
    Switch(isize),

    /// A story effect completed. `generation` identifies the switch that
    /// issued the effect; mismatches are stale and dropped.
    Story {
        /// Generation at the time the effect was issued.
        generation: u64,
        /// The story's own message, type-erased.
        message: StoryMsg,
    },
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Msg::Key(key),
            Event::Resize { width, height } => Msg::Resize { width, height },
        }
    }
}

impl fmt::Debug for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Msg::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Msg::Resize { width, height } => f
                .debug_struct("Resize")
                .field("width", width)
                .field("height", height)
                .finish(),
            Msg::Switch(target) => f.debug_tuple("Switch").field(target).finish(),
            Msg::Story { generation, .. } => f
                .debug_struct("Story")
                .field("generation", generation)
                .finish_non_exhaustive(),
        }
    }
}

/// The storybook shell: multiplexes catalog entries and owns all
/// navigation state.
pub struct Shell {
    stories: Vec<StoryEntry>,
    current: usize,
    active: Option<Box<dyn Story>>,
    viewport: Viewport,
    generation: u64,
    theme: Theme,
}

impl Shell {
    /// Shell starting at the first entry.
    #[must_use]
    pub fn new(stories: Vec<StoryEntry>) -> Self {
        Self {
            stories,
            current: 0,
            active: None,
            viewport: Viewport::default(),
            generation: 0,
            theme: Theme::default(),
        }
    }

    /// Shell seeded from a persisted snapshot.
    ///
    /// A seed at or beyond the catalog length (stale snapshot, shrunk
    /// catalog) falls back to 0 so the bounds invariant holds from
    /// construction.
    #[must_use]
    pub fn restored(stories: Vec<StoryEntry>, snapshot: &[u8]) -> Self {
        let seed = crate::snapshot::decode(snapshot);
        let mut shell = Self::new(stories);
        if seed < shell.stories.len() {
            shell.current = seed;
        }
        shell
    }

    /// Replace the default theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Catalog entries, in order.
    #[must_use]
    pub fn stories(&self) -> &[StoryEntry] {
        &self.stories
    }

    /// Index of the selected entry.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active story, or `None` before the first successful switch.
    #[must_use]
    pub fn active_story(&self) -> Option<&dyn Story> {
        self.active.as_deref()
    }

    /// Last-known viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Render configuration.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Encode the navigation state for a snapshot store.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        crate::snapshot::encode(self.current)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        debug!(key = %key, "shell input");
        match key.code {
            KeyCode::Char('c') if key.ctrl() => Cmd::quit(),
            KeyCode::Char('q') | KeyCode::Escape if key.modifiers.is_empty() => Cmd::quit(),
            KeyCode::Char('j') | KeyCode::Down if key.modifiers.is_empty() => {
                Cmd::msg(Msg::Switch(self.current as isize + 1))
            }
            KeyCode::Char('k') | KeyCode::Up if key.modifiers.is_empty() => {
                Cmd::msg(Msg::Switch(self.current as isize - 1))
            }
            _ => Cmd::none(),
        }
    }

    fn switch_to(&mut self, target: isize) -> Cmd<Msg> {
        let in_range = usize::try_from(target).ok().filter(|i| *i < self.stories.len());
        let Some(index) = in_range else {
            debug!(requested = target, len = self.stories.len(), "switch out of range ignored");
            return Cmd::none();
        };

        let mut story = self.stories[index].instantiate();
        let cmd = story.init();
        self.current = index;
        self.active = Some(story);
        self.generation += 1;
        debug!(
            index,
            title = self.stories[index].title(),
            generation = self.generation,
            "switched story"
        );
        adapt_story_cmd(self.generation, cmd)
    }

    fn route_story(&mut self, generation: u64, message: StoryMsg) -> Cmd<Msg> {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "stale story result dropped"
            );
            return Cmd::none();
        }
        let Some(story) = self.active.as_mut() else {
            debug!("story result with no active story dropped");
            return Cmd::none();
        };
        let cmd = story.update(message);
        adapt_story_cmd(self.generation, cmd)
    }
}

impl Model for Shell {
    type Message = Msg;

    /// The first activation runs through the ordinary switch transition.
    fn init(&mut self) -> Cmd<Msg> {
        Cmd::msg(Msg::Switch(self.current as isize))
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { width, height } => {
                self.viewport = Viewport { width, height };
                Cmd::none()
            }
            Msg::Switch(target) => self.switch_to(target),
            Msg::Story {
                generation,
                message,
            } => self.route_story(generation, message),
        }
    }

    fn view(&self) -> String {
        view::render(self)
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("entries", &self.stories.len())
            .field("current", &self.current)
            .field("active", &self.active.is_some())
            .field("viewport", &self.viewport)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Wrap a story's effect so its result routes back into [`Msg::Story`].
///
/// The "no effect" case passes through untouched; a pending effect is
/// tagged with the generation that issued it.
fn adapt_story_cmd(generation: u64, cmd: StoryCmd) -> Cmd<Msg> {
    match cmd {
        StoryCmd::None => Cmd::none(),
        StoryCmd::Task(work) => Cmd::task(move || Msg::Story {
            generation,
            message: work(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_core::event::Modifiers;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Story that records every message it receives into a shared log.
    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Story for Recorder {
        fn update(&mut self, msg: StoryMsg) -> StoryCmd {
            if let Ok(text) = msg.downcast::<&'static str>() {
                self.log.borrow_mut().push(format!("{}:{}", self.label, text));
            }
            StoryCmd::none()
        }

        fn view(&self) -> String {
            self.label.to_owned()
        }
    }

    fn recorder_catalog(log: &Rc<RefCell<Vec<String>>>) -> Vec<StoryEntry> {
        let a = Rc::clone(log);
        let b = Rc::clone(log);
        vec![
            StoryEntry::new("A", move || Recorder {
                label: "a",
                log: Rc::clone(&a),
            }),
            StoryEntry::new("B", move || Recorder {
                label: "b",
                log: Rc::clone(&b),
            }),
        ]
    }

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code))
    }

    #[test]
    fn init_switches_to_the_seeded_index() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::restored(recorder_catalog(&log), &[1]);
        let cmd = shell.init();
        assert!(matches!(cmd, Cmd::Msg(Msg::Switch(1))));
    }

    #[test]
    fn out_of_range_seed_falls_back_to_zero() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let shell = Shell::restored(recorder_catalog(&log), &[9]);
        assert_eq!(shell.current_index(), 0);
    }

    #[test]
    fn quit_keys_map_to_quit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        for code in [KeyCode::Char('q'), KeyCode::Escape] {
            assert!(matches!(shell.update(key(code)), Cmd::Quit));
        }
        let ctrl_c = Msg::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert!(matches!(shell.update(ctrl_c), Cmd::Quit));
    }

    #[test]
    fn unhandled_keys_are_noops() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        assert!(shell.update(key(KeyCode::Char('x'))).is_none());
        assert!(shell.update(key(KeyCode::Enter)).is_none());
        // Modified navigation and quit keys do not fire.
        let alt_q = Msg::Key(KeyEvent::new(KeyCode::Char('q')).with_modifiers(Modifiers::ALT));
        assert!(shell.update(alt_q).is_none());
        let ctrl_j = Msg::Key(KeyEvent::new(KeyCode::Char('j')).with_modifiers(Modifiers::CTRL));
        assert!(shell.update(ctrl_j).is_none());
    }

    #[test]
    fn resize_updates_the_viewport() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        let cmd = shell.update(Msg::Resize {
            width: 100,
            height: 30,
        });
        assert!(cmd.is_none());
        assert_eq!(
            shell.viewport(),
            Viewport {
                width: 100,
                height: 30
            }
        );
    }

    #[test]
    fn switch_out_of_range_is_a_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        assert!(shell.update(Msg::Switch(5)).is_none());
        assert!(shell.update(Msg::Switch(-1)).is_none());
        assert_eq!(shell.current_index(), 0);
        assert!(shell.active_story().is_none());
    }

    #[test]
    fn switch_replaces_the_instance_and_adapts_init() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        // Recorder stories have no init effect; the adapter must preserve
        // the "no effect" signal.
        let cmd = shell.update(Msg::Switch(1));
        assert!(cmd.is_none());
        assert_eq!(shell.current_index(), 1);
        assert_eq!(shell.active_story().unwrap().view(), "b");
    }

    #[test]
    fn current_story_receives_results_for_its_own_generation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        shell.update(Msg::Switch(0));
        shell.update(Msg::Story {
            generation: 1,
            message: Box::new("ping"),
        });
        assert_eq!(log.borrow().as_slice(), ["a:ping"]);
    }

    #[test]
    fn stale_generation_results_are_dropped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        shell.update(Msg::Switch(0)); // generation 1
        shell.update(Msg::Switch(1)); // generation 2
        shell.update(Msg::Story {
            generation: 1,
            message: Box::new("late"),
        });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn results_without_an_active_story_are_dropped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut shell = Shell::new(recorder_catalog(&log));
        let cmd = shell.update(Msg::Story {
            generation: 0,
            message: Box::new("orphan"),
        });
        assert!(cmd.is_none());
        assert!(log.borrow().is_empty());
        assert_eq!(shell.current_index(), 0);
        assert!(shell.active_story().is_none());
    }

    #[test]
    fn adapter_preserves_no_effect_and_tags_tasks() {
        assert!(adapt_story_cmd(3, StoryCmd::none()).is_none());

        let adapted = adapt_story_cmd(3, StoryCmd::task(|| "done"));
        let Cmd::Task(work) = adapted else {
            panic!("expected an adapted task");
        };
        let Msg::Story {
            generation,
            message,
        } = work()
        else {
            panic!("expected a story message");
        };
        assert_eq!(generation, 3);
        assert_eq!(*message.downcast::<&'static str>().unwrap(), "done");
    }
}
