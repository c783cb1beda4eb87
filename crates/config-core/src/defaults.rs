// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Default resolution for properties missing from a saved configuration

use serde_json::Value as J;

use crate::error::{ConfigError, Result};
use crate::schema::{PropertyDefinition, PropertyType};

/// Produce the value a missing key starts with.
///
/// A declared `default` wins verbatim, whatever its type. Otherwise the type
/// decides: numbers start at `0`, strings empty, booleans `false`, and arrays
/// take the first entry of `items.enum`.
///
/// # Errors
/// `UnresolvableDefault` when none of the above applies.
pub fn resolve_default(def: &PropertyDefinition) -> Result<J> {
    if let Some(default) = def.default() {
        return Ok(default.clone());
    }

    match def.property_type() {
        Some(PropertyType::Number | PropertyType::Integer) => Ok(J::from(0)),
        Some(PropertyType::String) => Ok(J::String(String::new())),
        Some(PropertyType::Boolean) => Ok(J::Bool(false)),
        Some(PropertyType::Array) => def
            .items_enum()
            .and_then(<[J]>::first)
            .cloned()
            .ok_or_else(|| {
                ConfigError::unresolvable(
                    def.key(),
                    "array property has no default and no non-empty `items.enum`",
                )
            }),
        Some(other) => Err(ConfigError::unresolvable(
            def.key(),
            format!("type `{other}` has no fallback and no default is declared"),
        )),
        None => Err(ConfigError::unresolvable(
            def.key(),
            "property declares neither a `type` nor a `default`",
        )),
    }
}
