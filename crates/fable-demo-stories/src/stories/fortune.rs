#![forbid(unsafe_code)]

//! One-shot deferred effect: the fortune arrives after a short delay, so
//! switching here shows the pending state first. Switching away before it
//! lands demos the shell dropping the stale result.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fable::{Story, StoryCmd, StoryMsg};

const FORTUNES: &[&str] = &[
    "A watched progress bar never completes.",
    "The bug is in the code you were most sure of.",
    "Every sufficiently old TODO becomes a feature.",
    "Cache invalidation will find you.",
    "The demo works until someone is watching.",
    "It is not a race condition until it is.",
];

const ORACLE_DELAY: Duration = Duration::from_millis(400);

/// Message delivered by the draw task.
struct Drawn(&'static str);

pub struct Fortune {
    line: Option<&'static str>,
}

impl Fortune {
    #[must_use]
    pub fn new() -> Self {
        Self { line: None }
    }
}

impl Default for Fortune {
    fn default() -> Self {
        Self::new()
    }
}

impl Story for Fortune {
    fn init(&mut self) -> StoryCmd {
        StoryCmd::task(|| {
            thread::sleep(ORACLE_DELAY);
            Drawn(draw())
        })
    }

    fn update(&mut self, msg: StoryMsg) -> StoryCmd {
        if let Ok(drawn) = msg.downcast::<Drawn>() {
            self.line = Some(drawn.0);
        }
        StoryCmd::none()
    }

    fn view(&self) -> String {
        match self.line {
            None => "Consulting the fortune file...".to_owned(),
            Some(line) => format!("The fortune file says:\n\n  {line}"),
        }
    }
}

fn draw() -> &'static str {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |since| since.subsec_nanos());
    FORTUNES[nanos as usize % FORTUNES.len()]
}
