#![forbid(unsafe_code)]

//! Self-perpetuating effects: every tick schedules the next one, animating
//! a spinner for as long as the story stays active. Switching away orphans
//! the pending tick, which the shell drops, so the chain dies with the
//! instance and a fresh visit starts the count at zero.

use std::thread;
use std::time::Duration;

use fable::{Story, StoryCmd, StoryMsg};

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Message delivered by each tick task.
struct Tick;

pub struct Spinner {
    frame: usize,
    ticks: u64,
}

impl Spinner {
    #[must_use]
    pub fn new() -> Self {
        Self { frame: 0, ticks: 0 }
    }

    fn schedule_tick() -> StoryCmd {
        StoryCmd::task(|| {
            thread::sleep(TICK_INTERVAL);
            Tick
        })
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Story for Spinner {
    fn init(&mut self) -> StoryCmd {
        Self::schedule_tick()
    }

    fn update(&mut self, msg: StoryMsg) -> StoryCmd {
        if msg.downcast::<Tick>().is_err() {
            return StoryCmd::none();
        }
        self.frame = (self.frame + 1) % FRAMES.len();
        self.ticks += 1;
        Self::schedule_tick()
    }

    fn view(&self) -> String {
        format!(
            "{} spinning for {} ticks\n\nLeave and come back: the count restarts.",
            FRAMES[self.frame], self.ticks
        )
    }
}
