// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;

use clap::Subcommand;
use cm_logging::CliLoggingArgs;

pub mod commands;
pub mod render;
pub mod settings;

pub use clap::Parser;

#[derive(clap::Parser)]
#[command(
    name = "cm",
    about = "Schema-driven configuration manager",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Settings file (default: <config dir>/config-manager/config.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
    /// Base URL of the configuration service
    #[arg(long, global = true)]
    pub server: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the working configuration, one line per key
    Show {
        /// Print machine-readable JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Edit values through their controls
    Set {
        /// Assignments of the form KEY=VALUE
        #[arg(required = true, value_parser = commands::parse_assignment)]
        assignments: Vec<(String, String)>,
        /// Persist the configuration after editing
        #[arg(long)]
        save: bool,
    },
    /// Inspect or replace the schema
    Schema {
        #[command(subcommand)]
        subcommand: SchemaCommands,
    },
    /// Reconcile and validate local files without contacting the service
    Check {
        /// Schema document
        #[arg(long)]
        schema: PathBuf,
        /// Saved configuration (default: nothing saved)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Print the active schema as the editor shows it
    Show,
    /// Send a new schema and switch the configuration over to it
    Push {
        /// Schema file, or `-` for stdin
        file: PathBuf,
    },
}
