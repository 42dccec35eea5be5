#![forbid(unsafe_code)]

//! The demo story catalog.

use fable::StoryEntry;

pub mod fortune;
pub mod hello;
pub mod spinner;

/// Every demo story, in sidebar order.
#[must_use]
pub fn catalog() -> Vec<StoryEntry> {
    vec![
        StoryEntry::new("Hello World", || hello::Hello::new("")),
        StoryEntry::new("Hello World with text", || hello::Hello::new("oh, hi.")),
        StoryEntry::new("Fortune", fortune::Fortune::new),
        StoryEntry::new("Spinner", spinner::Spinner::new),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_and_titled() {
        let catalog = catalog();
        let titles: Vec<&str> = catalog.iter().map(fable::StoryEntry::title).collect();
        assert_eq!(
            titles,
            [
                "Hello World",
                "Hello World with text",
                "Fortune",
                "Spinner"
            ]
        );
    }

    #[test]
    fn every_entry_instantiates() {
        for entry in catalog() {
            let story = entry.instantiate();
            assert!(!story.view().is_empty(), "{} renders empty", entry.title());
        }
    }
}
