// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Schema documents and their property definitions.
//!
//! A [`Schema`] wraps a draft-07 JSON-Schema object whose top-level
//! `properties` mapping declares the flat set of configuration keys. The
//! document is kept verbatim for validation and re-serialization; the
//! property definitions are decoded once into [`PropertyDefinition`] so the
//! resolver and the controls can dispatch on a closed [`PropertyType`]
//! instead of re-reading raw JSON.

use std::fmt;
use std::sync::Arc;

use jsonschema::{Draft, JSONSchema};
use serde::Serialize;
use serde_json::Value as J;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// The `type` keyword of a property definition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyType {
    Boolean,
    Number,
    Integer,
    String,
    Array,
    Object,
    Null,
    /// A type name draft-07 does not define
    Other(String),
}

impl PropertyType {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "string" => Self::String,
            "array" => Self::Array,
            "object" => Self::Object,
            "null" => Self::Null,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
            Self::Other(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the schema's `properties` mapping
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDefinition {
    key: String,
    property_type: Option<PropertyType>,
    title: Option<String>,
    description: Option<String>,
    enum_values: Option<Vec<J>>,
    default: Option<J>,
    items_enum: Option<Vec<J>>,
    raw: J,
}

impl PropertyDefinition {
    /// Decode a property definition. Only non-object definitions are rejected;
    /// unknown keywords are kept in the raw value and ignored here.
    pub fn from_value(key: &str, raw: &J) -> Result<Self> {
        let obj = raw.as_object().ok_or_else(|| {
            ConfigError::malformed_schema(format!(
                "property '{key}' must be an object, found {}",
                value_kind(raw)
            ))
        })?;

        let property_type = obj.get("type").and_then(J::as_str).map(PropertyType::from_keyword);
        let text = |name: &str| obj.get(name).and_then(J::as_str).map(str::to_string);
        let items_enum = obj
            .get("items")
            .and_then(|items| items.get("enum"))
            .and_then(J::as_array)
            .cloned();

        Ok(Self {
            key: key.to_string(),
            property_type,
            title: text("title"),
            description: text("description"),
            enum_values: obj.get("enum").and_then(J::as_array).cloned(),
            // `"default": null` is a declared default and is kept as such
            default: obj.get("default").cloned(),
            items_enum,
            raw: raw.clone(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The declared `type`, or `None` when absent or not a single type name
    pub fn property_type(&self) -> Option<&PropertyType> {
        self.property_type.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn enum_values(&self) -> Option<&[J]> {
        self.enum_values.as_deref()
    }

    pub fn default(&self) -> Option<&J> {
        self.default.as_ref()
    }

    /// `items.enum` of an array property
    pub fn items_enum(&self) -> Option<&[J]> {
        self.items_enum.as_deref()
    }

    pub fn as_value(&self) -> &J {
        &self.raw
    }
}

/// A parsed, compiled schema document
#[derive(Clone)]
pub struct Schema {
    raw: J,
    properties: Vec<PropertyDefinition>,
    validator: Arc<JSONSchema>,
}

impl Schema {
    /// Parse schema text as transmitted by the remote service or typed into
    /// the schema editor.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: J = serde_json::from_str(text)
            .map_err(|e| ConfigError::malformed_schema(format!("invalid JSON: {e}")))?;
        Self::from_value(raw)
    }

    /// Accept an already decoded schema document.
    ///
    /// # Errors
    /// `MalformedSchema` when the document is not an object, has no
    /// `properties` object, declares a non-object property, or does not
    /// compile as a draft-07 schema.
    pub fn from_value(raw: J) -> Result<Self> {
        let root = raw
            .as_object()
            .ok_or_else(|| ConfigError::malformed_schema("schema must be a JSON object"))?;

        let declared = match root.get("properties") {
            Some(J::Object(map)) => map,
            None | Some(J::Null) => {
                return Err(ConfigError::malformed_schema(
                    "schema has no `properties` mapping",
                ));
            }
            Some(other) => {
                return Err(ConfigError::malformed_schema(format!(
                    "`properties` must be an object, found {}",
                    value_kind(other)
                )));
            }
        };

        let properties = declared
            .iter()
            .map(|(key, def)| PropertyDefinition::from_value(key, def))
            .collect::<Result<Vec<_>>>()?;

        let compiled = validation_document(&raw, &properties);
        let validator = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&compiled)
            .map_err(|e| ConfigError::malformed_schema(format!("schema does not compile: {e}")))?;

        Ok(Self {
            raw,
            properties,
            validator: Arc::new(validator),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.raw.get("title").and_then(J::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.raw.get("description").and_then(J::as_str)
    }

    /// Title shown in the window/terminal header
    pub fn window_title(&self) -> Option<String> {
        self.title().map(|title| format!("ConfigManager: {title}"))
    }

    /// Property definitions in document order
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.key == key)
    }

    pub fn declares(&self, key: &str) -> bool {
        self.property(key).is_some()
    }

    /// Declared keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.key.as_str())
    }

    pub fn as_value(&self) -> &J {
        &self.raw
    }

    pub(crate) fn validator(&self) -> &JSONSchema {
        &self.validator
    }

    /// Serialize with four-space indentation, the form the schema editor
    /// is seeded with.
    pub fn to_pretty_text(&self) -> String {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        if self.raw.serialize(&mut ser).is_err() {
            return self.raw.to_string();
        }
        String::from_utf8(buf).unwrap_or_else(|_| self.raw.to_string())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("title", &self.title())
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// The document handed to the validator: `raw` without the `type` keyword of
/// properties whose type name draft-07 does not define. Those properties are
/// left to default resolution instead of failing compilation.
fn validation_document(raw: &J, properties: &[PropertyDefinition]) -> J {
    let mut doc = raw.clone();
    let unknown = properties
        .iter()
        .filter(|p| matches!(p.property_type(), Some(PropertyType::Other(_))));
    for def in unknown {
        debug!(key = def.key(), "Not validating unknown property type");
        if let Some(J::Object(prop)) = doc
            .get_mut("properties")
            .and_then(|props| props.get_mut(def.key()))
        {
            prop.remove("type");
        }
    }
    doc
}

/// Human name of a JSON value's kind, for error messages
pub(crate) fn value_kind(v: &J) -> &'static str {
    match v {
        J::Null => "null",
        J::Bool(_) => "a boolean",
        J::Number(_) => "a number",
        J::String(_) => "a string",
        J::Array(_) => "an array",
        J::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device_schema() -> J {
        json!({
            "title": "Device",
            "description": "Device settings",
            "properties": {
                "volume": {"type": "number", "default": 50, "description": "Output volume"},
                "mode": {"type": "string", "enum": ["auto", "manual"]},
                "muted": {"type": "boolean"},
                "channels": {"type": "array", "items": {"enum": ["left", "right"]}}
            }
        })
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let schema = Schema::from_value(device_schema()).unwrap();
        let keys: Vec<_> = schema.keys().collect();
        assert_eq!(keys, vec!["volume", "mode", "muted", "channels"]);
        assert_eq!(schema.title(), Some("Device"));
        assert_eq!(schema.description(), Some("Device settings"));
        assert_eq!(schema.window_title().as_deref(), Some("ConfigManager: Device"));
    }

    #[test]
    fn test_property_definition_fields() {
        let schema = Schema::from_value(device_schema()).unwrap();

        let volume = schema.property("volume").unwrap();
        assert_eq!(volume.property_type(), Some(&PropertyType::Number));
        assert_eq!(volume.default(), Some(&json!(50)));
        assert_eq!(volume.description(), Some("Output volume"));

        let mode = schema.property("mode").unwrap();
        assert_eq!(mode.enum_values(), Some(&[json!("auto"), json!("manual")][..]));

        let channels = schema.property("channels").unwrap();
        assert_eq!(channels.items_enum(), Some(&[json!("left"), json!("right")][..]));
        assert!(schema.property("missing").is_none());
    }

    #[test]
    fn test_parse_text() {
        let schema = Schema::parse(r#"{"properties": {"a": {"type": "string"}}}"#).unwrap();
        assert!(schema.declares("a"));
        assert_eq!(schema.title(), None);
    }

    #[test]
    fn test_missing_properties_is_malformed() {
        let err = Schema::parse(r#"{"title": "x"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSchema(_)));

        let err = Schema::parse(r#"{"properties": null}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSchema(_)));

        let err = Schema::parse(r#"{"properties": [1, 2]}"#).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = Schema::parse("{ not json").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));

        let err = Schema::parse("[]").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSchema(_)));
    }

    #[test]
    fn test_non_object_property_is_malformed() {
        let err = Schema::parse(r#"{"properties": {"a": 5}}"#).unwrap_err();
        assert!(err.to_string().contains("property 'a'"));
    }

    #[test]
    fn test_uncompilable_schema_is_malformed() {
        let err = Schema::parse(r#"{"properties": {"a": {"type": 5}}}"#).unwrap_err();
        assert!(err.to_string().contains("does not compile"));
    }

    #[test]
    fn test_unknown_type_name_is_accepted() {
        let schema = Schema::parse(r#"{"properties": {"a": {"type": "color"}}}"#).unwrap();
        assert_eq!(
            schema.property("a").unwrap().property_type(),
            Some(&PropertyType::Other("color".into()))
        );
        // the raw document keeps the keyword
        assert_eq!(schema.as_value()["properties"]["a"]["type"], json!("color"));
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let def = PropertyDefinition::from_value("a", &json!({"type": "color"})).unwrap();
        assert_eq!(def.property_type(), Some(&PropertyType::Other("color".into())));
    }

    #[test]
    fn test_pretty_text_uses_four_spaces() {
        let schema = Schema::parse(r#"{"properties":{"a":{"type":"string"}}}"#).unwrap();
        let text = schema.to_pretty_text();
        assert!(text.contains("\n    \"properties\""));
        assert_eq!(Schema::parse(&text).unwrap(), schema);
    }
}
