//! lexprobe CLI binary.

use std::io;
use std::process;

use clap::Parser;
use lexprobe::cli::{LexprobeArgs, execute_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Parse command line arguments using clap
    let args = LexprobeArgs::parse();

    // RUST_LOG wins over the verbosity flags
    let level = match args.verbosity() {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lexprobe={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &LexprobeArgs) -> anyhow::Result<()> {
    let result = execute_command(args)?;
    tracing::debug!(?result, "exiting");
    Ok(())
}
