#![forbid(unsafe_code)]

//! Fable demo storybook binary entry point.

use fable::{FileSnapshotStore, MemorySnapshotStore};
use fable_demo_stories::cli;
use fable_demo_stories::stories;

fn main() {
    let opts = cli::Opts::parse();

    let result = if opts.ephemeral {
        fable::run_with_store(stories::catalog(), &MemorySnapshotStore::new())
    } else {
        fable::run_with_store(stories::catalog(), &FileSnapshotStore::new(&opts.snapshot))
    };

    if let Err(e) = result {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
