// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use cm_cli::settings::{Settings, SettingsOverrides};
use cm_cli::{commands, Cli, Commands, Parser, SchemaCommands};
use cm_core::Session;
use cm_rest_client::RestClient;

async fn connect(
    settings_path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<Session<RestClient>> {
    let settings = Settings::load(settings_path, overrides)?;
    let client = RestClient::with_timeout(settings.base_url()?, settings.timeout())
        .context("Failed to create the REST client")?;
    Session::bootstrap(client)
        .await
        .with_context(|| format!("Failed to open a session with {}", settings.server_url))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli.logging.init("cm")?;

    let overrides = SettingsOverrides {
        server_url: cli.server.clone(),
        timeout_secs: cli.timeout,
    };
    let settings_path = cli.settings.as_deref();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Check { schema, config } => {
            let valid = commands::check(&schema, config.as_deref(), &mut stdout)?;
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Show { json } => {
            let session = connect(settings_path, &overrides).await?;
            commands::show(&session, json, &mut stdout)?;
        }
        Commands::Set { assignments, save } => {
            let mut session = connect(settings_path, &overrides).await?;
            commands::set(&mut session, &assignments, save, &mut stdout).await?;
        }
        Commands::Schema { subcommand } => {
            let mut session = connect(settings_path, &overrides).await?;
            match subcommand {
                SchemaCommands::Show => commands::schema_show(&session, &mut stdout)?,
                SchemaCommands::Push { file } => {
                    let text = commands::read_input(&file)?;
                    commands::schema_push(&mut session, text, &mut stdout).await?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
