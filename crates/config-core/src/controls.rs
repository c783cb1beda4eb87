// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Editing controls offered for each schema property.
//!
//! Front ends render one control per top-level key and feed every change
//! back through [`crate::ConfigStore::set_field`]. `parse_input` converts
//! operator text the way the matching widget would; it does not check enum
//! membership, since validation only reports.

use serde_json::Value as J;

use crate::error::{ConfigError, Result};
use crate::schema::{PropertyDefinition, PropertyType};

#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    /// On/off switch for booleans
    Toggle,
    /// Single choice among the listed values
    Select { options: Vec<J> },
    /// Numeric input with increment/decrement
    Stepper,
    /// Free text
    TextInput,
    /// No widget applies; raw JSON is accepted
    Unsupported,
}

impl Control {
    pub fn for_property(def: &PropertyDefinition) -> Self {
        let ty = def.property_type();
        if ty == Some(&PropertyType::Boolean) {
            return Self::Toggle;
        }
        if let Some(options) = def.enum_values() {
            return Self::Select {
                options: options.to_vec(),
            };
        }

        match ty {
            Some(PropertyType::Array) => match def.items_enum() {
                Some(options) => Self::Select {
                    options: options.to_vec(),
                },
                None => Self::Unsupported,
            },
            Some(t) if t.is_numeric() => Self::Stepper,
            Some(PropertyType::String) => Self::TextInput,
            _ => Self::Unsupported,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Select { .. } => "select",
            Self::Stepper => "stepper",
            Self::TextInput => "text",
            Self::Unsupported => "unsupported",
        }
    }

    /// Turn operator text into the value this control would produce.
    pub fn parse_input(&self, def: &PropertyDefinition, text: &str) -> Result<J> {
        let key = def.key();
        match self {
            Self::Toggle => parse_bool(key, text),
            Self::Select { .. } => {
                if def.property_type().is_some_and(PropertyType::is_numeric) {
                    parse_number(key, text)
                } else {
                    Ok(J::String(text.to_string()))
                }
            }
            Self::Stepper => parse_number(key, text),
            Self::TextInput => Ok(J::String(text.to_string())),
            Self::Unsupported => serde_json::from_str(text)
                .map_err(|e| ConfigError::invalid_input(key, format!("expected JSON: {e}"))),
        }
    }
}

fn parse_bool(key: &str, text: &str) -> Result<J> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(J::Bool(true)),
        "false" | "off" | "no" | "0" => Ok(J::Bool(false)),
        other => Err(ConfigError::invalid_input(
            key,
            format!("`{other}` is not a boolean"),
        )),
    }
}

fn parse_number(key: &str, text: &str) -> Result<J> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(J::from(i));
    }
    let f = trimmed
        .parse::<f64>()
        .map_err(|_| ConfigError::invalid_input(key, format!("`{trimmed}` is not a number")))?;
    serde_json::Number::from_f64(f)
        .map(J::Number)
        .ok_or_else(|| ConfigError::invalid_input(key, "number must be finite"))
}
