#![forbid(unsafe_code)]

//! Demo storybook: a small catalog exercising every shell behavior.
//!
//! Two static greetings, a one-shot async fetch, and a self-perpetuating
//! spinner. Together they cover instant rendering, late effect arrival,
//! effect chains, and the fresh-instance guarantee (switch away from the
//! spinner and back: the tick count restarts).

pub mod cli;
pub mod stories;
