// greenland-schema: compile structured-output schemas for LLM providers
//
// This is the main entry point for the greenland-schema command.

use anyhow::{Context, Result};
use greenland_schema::cli::commands::format_error;
use greenland_schema::cli::{handle_command, Command};
use greenland_schema::config::Settings;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = match run(&args) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    writeln!(std::io::stdout().lock(), "{output}").context("Failed to write output")?;
    Ok(ExitCode::SUCCESS)
}

fn run(args: &[String]) -> greenland_schema::Result<String> {
    let command = Command::parse(args)?;
    let settings = Settings::load();
    handle_command(&command, &settings)
}
