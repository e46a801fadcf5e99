//! hybridcrypt CLI entry point.
//!
//! Paths default to the JSON configuration named by `--config` or
//! `HYBRIDCRYPT_PATHS` (a `.env` file is honored). Individual path flags
//! override single entries.
//!
//! Usage:
//!   hybridcrypt --generate-keys [--key-length 128|192|256]
//!   hybridcrypt --encrypt       [--key-length ...]
//!   hybridcrypt --decrypt       [--key-length ...]

mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Operation};
use hybridcrypt_core::{AsymmetricCipher, DEFAULT_MODULUS_BITS, HybridSystem, SymmetricCipher};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let operation = cli.mode.operation();
    let paths = config::resolve_paths(
        cli.config.as_deref(),
        cli.overrides(),
        operation.required_paths(),
    )?;
    let system = HybridSystem::new(
        paths,
        SymmetricCipher::new(cli.key_length),
        AsymmetricCipher::new(DEFAULT_MODULUS_BITS),
    );

    match operation {
        Operation::GenerateKeys => system.generate_keys().context("key generation failed"),
        Operation::Encrypt => system.encrypt().context("encryption failed"),
        Operation::Decrypt => system.decrypt().context("decryption failed"),
    }
}
