//! spimio CLI entry point.
//!
//! Usage:
//!   spimio ls sub-01                       # List a directory
//!   spimio tree sub-01/ses-1               # Whole subtree
//!   spimio glob '*/microscopy/*.h5' --from sub-01
//!   spimio rglob '*.json'
//!   spimio stat | uri | url | s3 <path>
//!
//! The dandiset comes from `--dandiset ID [--dandiset-version V]` (DANDI
//! API) or `--manifest FILE` (asset listing on disk).

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use spimio_cli::config::CliConfig;
use spimio_cli::{Cli, execute, open_manifest, open_remote};
use spimio_dandi::{HttpTransport, Transport};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load_from(path)?,
        None => CliConfig::load()?,
    };

    // RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("invalid log filter: {}", config.log_filter))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
    let dandiset = match cli.dandiset {
        Some(id) => open_remote(
            &id,
            cli.dandiset_version.as_deref(),
            &config.api_url,
            Arc::clone(&transport),
        )?,
        None => {
            let manifest = cli.manifest.or(config.manifest).context(
                "no dandiset given: pass --dandiset or --manifest, or set `manifest` in the config file",
            )?;
            open_manifest(&manifest)?
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &dandiset, transport.as_ref(), &mut out)?;
    out.flush()?;
    Ok(())
}
