#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vx_cipher_cli::{args::Cli, commands, config::Config};

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Load and validate configuration first (fail-fast)
    let config = Config::resolve(cli.config.as_deref())?;

    // Logs go to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        codec = ?config.codec.variant,
        max_encoded_len = config.limits.max_encoded_len,
        "vx-cipher starting up"
    );

    let output = commands::run(&cli.command, &config.codec(), std::io::stdin().lock())?;
    println!("{output}");

    Ok(())
}
