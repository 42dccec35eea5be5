#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo storybook.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `FABLE_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Fable Demo Storybook — browse the demo story catalog

USAGE:
    fable-demo-stories [OPTIONS]

OPTIONS:
    --snapshot=PATH   Persist the selection snapshot at PATH
    --ephemeral       Keep the selection in memory only (no file writes)
    --help, -h        Show this help message
    --version, -V     Show version

STORIES:
    1  Hello World              Static greeting
    2  Hello World with text    Greeting seeded with text
    3  Fortune                  One-shot deferred effect
    4  Spinner                  Self-perpetuating tick effects

KEYBINDINGS:
    j / down         Next story
    k / up           Previous story
    q / esc / Ctrl+C Quit

ENVIRONMENT VARIABLES:
    FABLE_DEMO_SNAPSHOT    Override --snapshot
    FABLE_DEMO_EPHEMERAL   Override --ephemeral (1|true|yes)";

/// Parsed command-line options.
pub struct Opts {
    /// Where the selection snapshot is stored between runs.
    pub snapshot: PathBuf,
    /// Skip file persistence entirely.
    pub ephemeral: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot_path(),
            ephemeral: false,
        }
    }
}

fn default_snapshot_path() -> PathBuf {
    env::temp_dir().join("fable-demo.snapshot")
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Ok(val) = env::var("FABLE_DEMO_SNAPSHOT")
            && !val.is_empty()
        {
            opts.snapshot = PathBuf::from(val);
        }
        if let Ok(val) = env::var("FABLE_DEMO_EPHEMERAL") {
            opts.ephemeral = matches!(val.as_str(), "1" | "true" | "yes");
        }

        // Parse command-line args (override env vars)
        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("fable-demo-stories {VERSION}");
                    process::exit(0);
                }
                "--ephemeral" => {
                    opts.ephemeral = true;
                }
                other => {
                    if let Some(val) = other.strip_prefix("--snapshot=") {
                        if val.is_empty() {
                            eprintln!("Invalid --snapshot value: empty path");
                            process::exit(1);
                        }
                        opts.snapshot = PathBuf::from(val);
                    } else {
                        eprintln!("Unknown argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert!(!opts.ephemeral);
        assert!(opts.snapshot.ends_with("fable-demo.snapshot"));
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_lists_every_story() {
        for title in ["Hello World", "Fortune", "Spinner"] {
            assert!(HELP_TEXT.contains(title), "missing story: {title}");
        }
    }

    #[test]
    fn help_text_contains_flags_and_env_vars() {
        assert!(HELP_TEXT.contains("--snapshot=PATH"));
        assert!(HELP_TEXT.contains("--ephemeral"));
        assert!(HELP_TEXT.contains("FABLE_DEMO_SNAPSHOT"));
        assert!(HELP_TEXT.contains("FABLE_DEMO_EPHEMERAL"));
    }
}
