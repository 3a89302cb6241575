//! CLI argument parsing for the story pipeline.
//!
//! The CLI is intentionally thin: it wires one deterministic run without
//! embedding policy, and invoking the binary with no arguments behaves like
//! `yarnsmith run` with an interactive requirement prompt.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "yarnsmith",
    version,
    about = "LM-driven interactive story generator for Yarn Spinner",
    after_help = "Examples:\n  yarnsmith\n  yarnsmith run --requirement \"a detective story set in a lighthouse\"\n  yarnsmith run --out-dir ./story --chapters 5 --strict"
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands. `run` is the default when none is given.
#[derive(Subcommand, Debug)]
pub enum Command {
    Run(RunArgs),
}

/// Run command inputs for a single story generation.
#[derive(Parser, Debug)]
#[command(about = "Run the full story-generation pipeline")]
pub struct RunArgs {
    /// Game requirement; prompts interactively when omitted
    #[arg(long, value_name = "TEXT")]
    pub requirement: Option<String>,

    /// Directory receiving the generated artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of chapters to generate (overrides the config file)
    #[arg(long, value_name = "N")]
    pub chapters: Option<usize>,

    /// Optional JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fail the run when the model returns an empty reply
    #[arg(long)]
    pub strict: bool,

    /// Emit a verbose transcript of the run
    #[arg(long)]
    pub verbose: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            requirement: None,
            out_dir: PathBuf::from("."),
            chapters: None,
            config: None,
            strict: false,
            verbose: false,
        }
    }
}
