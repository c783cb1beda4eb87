// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Text and JSON views of a config store

use std::io::{self, Write};

use config_core::{ConfigStore, Control, SchemaSwitch, ValidationResult};
use serde_json::{json, Value};

/// One line per declared key: key, value, control kind, origin, and an
/// `invalid` marker when a violation concerns the key
pub fn render_store(store: &ConfigStore, out: &mut impl Write) -> io::Result<()> {
    let schema = store.schema();
    if let Some(title) = schema.window_title() {
        writeln!(out, "{title}")?;
    }
    if let Some(description) = schema.description() {
        writeln!(out, "{description}")?;
    }

    let width = schema.keys().map(str::len).max().unwrap_or(0);
    for def in schema.properties() {
        let key = def.key();
        let value = store.get(key).cloned().unwrap_or(Value::Null);
        let origin = store
            .provenance()
            .origin_of(key)
            .map(|o| o.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = match store.validation().for_key(key).count() {
            0 => "",
            _ => ", invalid",
        };
        write!(
            out,
            "{key:<width$}  {value}  [{}, {origin}{marker}]",
            Control::for_property(def).kind()
        )?;
        match def.title() {
            Some(title) if title != key => writeln!(out, "  # {title}")?,
            _ => writeln!(out)?,
        }
    }

    render_validation(store.validation(), out)
}

pub fn render_validation(validation: &ValidationResult, out: &mut impl Write) -> io::Result<()> {
    if validation.is_valid() {
        return writeln!(out, "valid");
    }
    writeln!(out, "{} violation(s):", validation.len())?;
    for violation in validation.violations() {
        writeln!(out, "  {violation}")?;
    }
    Ok(())
}

pub fn render_switch(switch: &SchemaSwitch, out: &mut impl Write) -> io::Result<()> {
    for (label, keys) in [
        ("added", &switch.added),
        ("dropped", &switch.dropped),
        ("carried", &switch.carried),
    ] {
        if !keys.is_empty() {
            writeln!(out, "{label}: {}", keys.join(", "))?;
        }
    }
    Ok(())
}

pub fn store_to_json(store: &ConfigStore) -> Value {
    let schema = store.schema();
    let controls: serde_json::Map<String, Value> = schema
        .properties()
        .iter()
        .map(|def| (def.key().to_string(), json!(Control::for_property(def).kind())))
        .collect();

    json!({
        "title": schema.title(),
        "description": schema.description(),
        "config": store.config(),
        "origins": store.provenance().origin,
        "controls": controls,
        "validation": store.validation(),
    })
}
