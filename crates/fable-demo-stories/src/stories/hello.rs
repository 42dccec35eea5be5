#![forbid(unsafe_code)]

//! The smallest possible story: a static greeting.

use fable::{Story, StoryCmd, StoryMsg};

pub struct Hello {
    text: String,
}

impl Hello {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Story for Hello {
    fn update(&mut self, _msg: StoryMsg) -> StoryCmd {
        StoryCmd::none()
    }

    fn view(&self) -> String {
        format!("Hello, World!!!\n\n> {}", self.text)
    }
}
