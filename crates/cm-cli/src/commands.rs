// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Subcommand implementations. Each writes its report to `out`.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use cm_client_api::ConfigApi;
use cm_core::Session;
use config_core::{config_from_value, ConfigStore, Control, Schema};
use serde_json::Value;
use tracing::debug;

use crate::render;

/// clap value parser for `KEY=VALUE`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

/// Read a whole file, or stdin when `path` is `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn show<A: ConfigApi>(session: &Session<A>, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let doc = render::store_to_json(session.store());
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    } else {
        render::render_store(session.store(), out)?;
    }
    Ok(())
}

/// Apply each assignment through the key's control, then optionally persist.
///
/// All assignments are parsed before the first edit is applied.
pub async fn set<A: ConfigApi>(
    session: &mut Session<A>,
    assignments: &[(String, String)],
    save: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut edits = Vec::with_capacity(assignments.len());
    for (key, text) in assignments {
        let Some(def) = session.store().schema().property(key) else {
            bail!("The active schema does not declare `{key}`");
        };
        let value = Control::for_property(def).parse_input(def, text)?;
        edits.push((key, value));
    }

    for (key, value) in edits {
        debug!(key, "Applying edit");
        session.set_field(key, value);
    }
    render::render_validation(session.store().validation(), out)?;

    if save {
        session
            .save_config()
            .await
            .context("Failed to save the configuration")?;
        writeln!(out, "saved")?;
    }
    Ok(())
}

pub fn schema_show<A: ConfigApi>(session: &Session<A>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", session.store().schema_text())?;
    Ok(())
}

/// Send `text` as the new schema and report how the configuration changed
pub async fn schema_push<A: ConfigApi>(
    session: &mut Session<A>,
    text: String,
    out: &mut impl Write,
) -> Result<()> {
    session.set_schema_text(text);
    let switch = session
        .save_schema()
        .await
        .context("Failed to replace the schema")?;

    render::render_switch(&switch, out)?;
    render::render_validation(session.store().validation(), out)?;
    Ok(())
}

/// Offline reconciliation of local files. Returns whether the reconciled
/// configuration is valid.
pub fn check(schema_path: &Path, config_path: Option<&Path>, out: &mut impl Write) -> Result<bool> {
    let schema = Schema::parse(&read_input(schema_path)?)
        .with_context(|| format!("Invalid schema in {}", schema_path.display()))?;

    let saved = match config_path {
        Some(path) => serde_json::from_str(&read_input(path)?)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
        None => Value::Null,
    };
    let saved = config_from_value(saved)?;
    let store = ConfigStore::initialize(schema, &saved)?;

    let dropped = &store.provenance().dropped;
    if !dropped.is_empty() {
        writeln!(out, "dropped: {}", dropped.join(", "))?;
    }
    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&Value::Object(store.config().clone()))?
    )?;
    render::render_validation(store.validation(), out)?;

    Ok(store.validation().is_valid())
}
