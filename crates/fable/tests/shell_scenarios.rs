//! End-to-end shell scenarios.
//!
//! Covers the session flows the shell exists for: startup activates the
//! persisted entry, navigation keys move the selection one step and stop at
//! the edges, each switch demos a fresh instance, and effect results route
//! only to the instance that requested them.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use fable::{Cmd, Msg, Program, ProgramConfig, Shell, Story, StoryCmd, StoryEntry, StoryMsg};
use fable_core::event::{Event, KeyCode, KeyEvent};
use fable_runtime::{Model, ScriptedEventSource};

/// Story with a fixed body.
struct Plaque(&'static str);

impl Story for Plaque {
    fn update(&mut self, _msg: StoryMsg) -> StoryCmd {
        StoryCmd::none()
    }

    fn view(&self) -> String {
        self.0.to_owned()
    }
}

/// Story whose startup fetches its body on a background task.
struct Fetcher {
    text: String,
    fetched: &'static str,
}

impl Fetcher {
    fn new(fetched: &'static str) -> Self {
        Self {
            text: "loading".to_owned(),
            fetched,
        }
    }
}

impl Story for Fetcher {
    fn init(&mut self) -> StoryCmd {
        let fetched = self.fetched;
        StoryCmd::task(move || fetched.to_owned())
    }

    fn update(&mut self, msg: StoryMsg) -> StoryCmd {
        if let Ok(text) = msg.downcast::<String>() {
            self.text = *text;
        }
        StoryCmd::none()
    }

    fn view(&self) -> String {
        self.text.clone()
    }
}

/// Catalog of fixed-body stories whose factories bump a shared counter on
/// every instantiation.
fn counted_catalog(builds: &Rc<RefCell<usize>>) -> Vec<StoryEntry> {
    ["Alpha", "Beta", "Gamma"]
        .into_iter()
        .map(|title| {
            let builds = Rc::clone(builds);
            StoryEntry::new(title, move || {
                *builds.borrow_mut() += 1;
                Plaque(title)
            })
        })
        .collect()
}

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c)))
}

fn headless(
    shell: Shell,
    script: Vec<Event>,
    idle_polls: u32,
) -> Program<Shell, ScriptedEventSource, Vec<u8>> {
    let source = ScriptedEventSource::new(script)
        .with_size(60, 6)
        .with_idle_polls(idle_polls);
    let config = ProgramConfig::default().with_poll_timeout(Duration::from_millis(1));
    Program::with_source(shell, source, Vec::<u8>::new(), config)
}

#[test]
fn startup_activates_the_first_entry() {
    let builds = Rc::new(RefCell::new(0));
    let shell = Shell::new(counted_catalog(&builds));
    let mut program = headless(shell, vec![key('q')], 0);
    program.run().unwrap();

    assert_eq!(program.model().current_index(), 0);
    assert_eq!(*builds.borrow(), 1);
    assert_eq!(program.model().snapshot(), vec![0]);

    let frames = String::from_utf8_lossy(program.sink()).into_owned();
    assert!(frames.contains("\x1b[38;5;230;48;5;62mAlpha"));
    assert!(frames.contains("Gamma"));
}

#[test]
fn j_moves_the_selection_one_entry_per_press() {
    let builds = Rc::new(RefCell::new(0));
    let shell = Shell::new(counted_catalog(&builds));
    let mut program = headless(shell, vec![key('j'), key('j'), key('q')], 0);
    program.run().unwrap();

    assert_eq!(program.model().current_index(), 2);
    assert_eq!(program.model().snapshot(), vec![2]);
    // Startup plus one fresh instance per move.
    assert_eq!(*builds.borrow(), 3);
}

#[test]
fn next_at_the_last_entry_stays_put() {
    let builds = Rc::new(RefCell::new(0));
    let shell = Shell::restored(counted_catalog(&builds), &[2]);
    let mut program = headless(shell, vec![key('j'), key('q')], 0);
    program.run().unwrap();

    assert_eq!(program.model().current_index(), 2);
    // The rejected move must not rebuild the active instance.
    assert_eq!(*builds.borrow(), 1);
}

#[test]
fn previous_at_the_first_entry_stays_put() {
    let builds = Rc::new(RefCell::new(0));
    let shell = Shell::new(counted_catalog(&builds));
    let mut program = headless(shell, vec![key('k'), key('q')], 0);
    program.run().unwrap();

    assert_eq!(program.model().current_index(), 0);
    assert_eq!(*builds.borrow(), 1);
}

#[test]
fn restored_session_resumes_where_it_left_off() {
    let builds = Rc::new(RefCell::new(0));
    let shell = Shell::restored(counted_catalog(&builds), &[1]);
    let mut program = headless(shell, vec![key('q')], 0);
    program.run().unwrap();

    assert_eq!(program.model().current_index(), 1);
    let frames = String::from_utf8_lossy(program.sink()).into_owned();
    assert!(frames.contains("\x1b[38;5;230;48;5;62mBeta"));
}

#[test]
fn story_effects_reach_the_frame() {
    let stories = vec![StoryEntry::new("Fetch", || Fetcher::new("done"))];
    let shell = Shell::new(stories);
    // Generous idle budget so the startup fetch lands before the quit key.
    let mut program = headless(shell, vec![key('q')], 500);
    program.run().unwrap();

    assert_eq!(program.model().active_story().unwrap().view(), "done");
    let frames = String::from_utf8_lossy(program.sink()).into_owned();
    assert!(frames.contains("loading"));
    assert!(frames.contains("done"));
}

#[test]
fn results_from_a_replaced_story_are_dropped() {
    let stories = vec![
        StoryEntry::new("Fetch", || Fetcher::new("from the old story")),
        StoryEntry::new("Still", || Plaque("untouched")),
    ];
    let mut shell = Shell::new(stories);

    // Activate the fetcher and capture its pending startup effect.
    let cmd = shell.update(Msg::Switch(0));
    let Cmd::Task(work) = cmd else {
        panic!("expected the fetch effect");
    };

    // The user moves on before the fetch completes.
    shell.update(Msg::Switch(1));
    assert_eq!(shell.active_story().unwrap().view(), "untouched");

    // The late result arrives and must not reach the new story.
    let stale = work();
    let cmd = shell.update(stale);
    assert!(cmd.is_none());
    assert_eq!(shell.current_index(), 1);
    assert_eq!(shell.active_story().unwrap().view(), "untouched");
}

#[test]
fn results_delivered_in_time_reach_their_story() {
    let stories = vec![StoryEntry::new("Fetch", || Fetcher::new("arrived"))];
    let mut shell = Shell::new(stories);

    let cmd = shell.update(Msg::Switch(0));
    let Cmd::Task(work) = cmd else {
        panic!("expected the fetch effect");
    };
    shell.update(work());
    assert_eq!(shell.active_story().unwrap().view(), "arrived");
}

#[test]
fn switching_back_rebuilds_from_initial_state() {
    let stories = vec![
        StoryEntry::new("Fetch", || Fetcher::new("done")),
        StoryEntry::new("Still", || Plaque("static")),
    ];
    let mut shell = Shell::new(stories);

    let cmd = shell.update(Msg::Switch(0));
    let Cmd::Task(work) = cmd else {
        panic!("expected the fetch effect");
    };
    shell.update(work());
    assert_eq!(shell.active_story().unwrap().view(), "done");

    // Leave and come back: the story demos from scratch again.
    shell.update(Msg::Switch(1));
    let cmd = shell.update(Msg::Switch(0));
    assert!(matches!(cmd, Cmd::Task(_)));
    assert_eq!(shell.active_story().unwrap().view(), "loading");
}
