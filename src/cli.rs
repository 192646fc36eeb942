use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mssql-resources")]
#[command(version)]
#[command(about = "Custom resource handlers for SQL Server logins, users, databases, schemas and grants", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file
    #[arg(long, global = true, env = "MSSQL_RESOURCES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fail unknown resource types instead of handling them as logins
    #[arg(long, global = true)]
    pub strict_kinds: bool,

    /// Resolve password references from this TOML file instead of the environment
    #[arg(long, global = true)]
    pub secrets_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Handle one lifecycle event and print the response
    Handle {
        /// Event JSON file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: String,

        /// Also deliver the response to the event's ResponseURL
        #[arg(long)]
        respond: bool,
    },

    /// Check an event's properties without connecting to a server
    Validate {
        /// Event JSON file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
