// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate a schema update before it is sent: non-empty text holding a
/// JSON object. Deeper checks belong to the schema engine and the service.
pub fn validate_schema_update(request: &SchemaUpdateRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    let value: serde_json::Value = serde_json::from_str(&request.schema)?;
    if !value.is_object() {
        return Err(ApiContractError::NotAnObject(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_object_text() {
        let req = SchemaUpdateRequest::new(r#"{"properties": {}}"#);
        assert!(validate_schema_update(&req).is_ok());
    }

    #[test]
    fn test_rejects_empty_text() {
        let err = validate_schema_update(&SchemaUpdateRequest::new("")).unwrap_err();
        assert!(matches!(err, ApiContractError::Validation(_)));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = validate_schema_update(&SchemaUpdateRequest::new("{")).unwrap_err();
        assert!(matches!(err, ApiContractError::Json(_)));
    }

    #[test]
    fn test_rejects_non_object() {
        let err = validate_schema_update(&SchemaUpdateRequest::new("[1]")).unwrap_err();
        assert!(matches!(err, ApiContractError::NotAnObject(_)));
    }
}
