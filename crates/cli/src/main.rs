//! `migcap`: plan the monthly rate needed to finish a data migration on time.

mod args;
mod commands;
mod config;
mod render;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use args::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = commands::run(&cli.command)?;
    print!("{output}");
    Ok(())
}

/// Installs a stderr subscriber.
///
/// Without `-v` the filter comes from `RUST_LOG`, defaulting to `warn`.
/// `-v` selects `debug` and `-vv` selects `trace`.
fn init_tracing(verbosity: u8) {
    let env_filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
