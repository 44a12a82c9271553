//! cpp-readability - readability features and predictions for C++ snippets

use anyhow::Result;
use clap::Parser;
use cpp_readability::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
