//! CLI entry point for the Heroku env setup step.
//!
//! Reads an app manifest, keeps the env entries that declare a literal
//! value, and prints them to stdout as a flat JSON object.

use anyhow::{Context, Result};
use clap::Parser;
use heroku_env_setup::{AppManifest, EnvSetupError, flatten_env, write_env};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "heroku_env_setup", version)]
#[command(
    about = "Flatten an app manifest's env definitions into a name/value JSON object",
    long_about = None
)]
struct Cli {
    /// Path to the app manifest JSON file
    #[arg(value_name = "ENV_FILE")]
    path: PathBuf,
}

fn main() -> ExitCode {
    // stdout carries the output document; logs go to stderr only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code(&e);
            debug!(code, "Env setup failed");
            eprintln!("error: {e:#}");
            ExitCode::from(code)
        }
    }
}

#[tracing::instrument(skip_all, fields(path = %cli.path.display()))]
fn run(cli: &Cli) -> Result<()> {
    let manifest = AppManifest::load(&cli.path)
        .with_context(|| format!("loading {}", cli.path.display()))?;
    debug!(entries = manifest.len(), "Manifest loaded");

    let env = flatten_env(&manifest);

    let stdout = std::io::stdout();
    write_env(&mut stdout.lock(), &env).context("printing environment")?;
    Ok(())
}

/// Exit status for the first [`EnvSetupError`] in the chain, or 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<EnvSetupError>())
        .map_or(1, EnvSetupError::exit_code)
}
