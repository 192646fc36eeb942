mod cli;
mod commands;
mod config;
mod connection;
mod engine;
mod error;
mod identity;
mod properties;
mod resource;
mod respond;
mod secrets;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Settings;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let settings = || -> Result<Settings> {
        Ok(Settings::load(cli.config.as_deref())?
            .with_overrides(cli.strict_kinds, cli.secrets_file.clone()))
    };

    match &cli.command {
        Command::Handle { event, respond } => {
            commands::handle::run(&ctx, &settings()?, event, *respond)
        }
        Command::Validate { event } => commands::validate::run(&ctx, &settings()?, event),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "mssql-resources", &mut io::stdout());
            Ok(())
        }
    }
}
