// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! API contract types for the config-manager REST service

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Every response body is wrapped as `{"data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Payload of `GET /api/config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Saved configuration; `null` or absent before the first save
    #[serde(default)]
    pub config: Value,
}

/// Payload of `GET /api/schema` and of the `POST /api/schema` echo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Serialized JSON-Schema document
    pub schema: String,
}

/// Body of `POST /api/schema`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SchemaUpdateRequest {
    #[validate(length(min = 1, message = "Schema text cannot be empty"))]
    pub schema: String,
}

impl SchemaUpdateRequest {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_envelope_decoding() {
        let body = json!({"data": {"config": {"volume": 50}}});
        let doc: Envelope<ConfigDocument> = serde_json::from_value(body).unwrap();
        assert_eq!(doc.into_inner().config, json!({"volume": 50}));
    }

    #[test]
    fn test_config_envelope_without_config() {
        let doc: Envelope<ConfigDocument> = serde_json::from_value(json!({"data": {}})).unwrap();
        assert_eq!(doc.data.config, Value::Null);
    }

    #[test]
    fn test_schema_envelope_decoding() {
        let body = json!({"data": {"schema": "{\"properties\": {}}"}});
        let doc: Envelope<SchemaDocument> = serde_json::from_value(body).unwrap();
        assert_eq!(doc.data.schema, "{\"properties\": {}}");
    }

    #[test]
    fn test_schema_update_request_serialization() {
        let req = SchemaUpdateRequest::new("{}");
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"schema": "{}"}));
    }
}
