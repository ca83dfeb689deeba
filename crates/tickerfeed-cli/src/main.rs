mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "warn,tickerfeed_cli=info,tickerfeed_core=info";

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment alone may be enough.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let data = commands::run(&cli).await?;
    output::render(&data, cli.pretty)?;

    Ok(ExitCode::SUCCESS)
}
