use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use yarnsmith::cli::{Command, RootArgs, RunArgs};
use yarnsmith::workflow::run_story;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    let command = args
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    match command {
        Command::Run(run) => {
            init_tracing(run.verbose);
            run_story(&run)
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "yarnsmith=debug"
    } else {
        "yarnsmith=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
