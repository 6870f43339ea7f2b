//! Thin CLI entry point. `Args` and `run` live in [`rv32cc::cli`] so they
//! are directly testable; this binary only parses arguments, installs the
//! tracing subscriber, and translates a fatal error into a process exit.

use clap::Parser;
use tracing::error;

use rv32cc::cli::{exit_code, run, Args};

fn install_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    let args = Args::parse();
    install_tracing(args.tracing_level());

    if let Err(err) = run(&args) {
        error!(error = %err, "translation failed");
        std::process::exit(exit_code(&err));
    }
}
