// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Reconciliation of a saved configuration against a schema

use serde_json::{Map, Value as J};

use crate::defaults::resolve_default;
use crate::error::{ConfigError, Result};
use crate::provenance::{FieldOrigin, Provenance};
use crate::schema::{value_kind, Schema};

/// A flat mapping from declared key to value, in schema order
pub type Configuration = Map<String, J>;

/// Complete `saved` so that it holds exactly the keys `schema` declares.
///
/// Saved values are copied without coercion; missing keys get their
/// resolved default; undeclared keys are dropped. Idempotent.
pub fn reconcile(schema: &Schema, saved: &Configuration) -> Result<Configuration> {
    reconcile_with_provenance(schema, saved).map(|(config, _)| config)
}

/// Same as [`reconcile`], also reporting where each value came from and
/// which saved keys were dropped.
pub fn reconcile_with_provenance(
    schema: &Schema,
    saved: &Configuration,
) -> Result<(Configuration, Provenance)> {
    let mut config = Configuration::new();
    let mut prov = Provenance::default();

    for def in schema.properties() {
        let key = def.key();
        match saved.get(key) {
            Some(value) => {
                config.insert(key.to_string(), value.clone());
                prov.record(key, FieldOrigin::Saved);
            }
            None => {
                config.insert(key.to_string(), resolve_default(def)?);
                prov.record(key, FieldOrigin::Default);
            }
        }
    }

    prov.dropped = saved.keys().filter(|k| !schema.declares(k)).cloned().collect();

    Ok((config, prov))
}

/// Interpret a decoded saved configuration. `null` means nothing was saved yet.
pub fn config_from_value(value: J) -> Result<Configuration> {
    match value {
        J::Object(map) => Ok(map),
        J::Null => Ok(Configuration::new()),
        other => Err(ConfigError::MalformedConfig(format!(
            "expected an object, found {}",
            value_kind(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(raw: J) -> Schema {
        Schema::from_value(raw).unwrap()
    }

    fn config(raw: J) -> Configuration {
        config_from_value(raw).unwrap()
    }

    fn device_schema() -> Schema {
        schema(json!({
            "properties": {
                "volume": {"type": "number", "default": 50},
                "mode": {"type": "string", "enum": ["auto", "manual"]}
            }
        }))
    }

    #[test]
    fn test_fills_defaults_and_keeps_saved() {
        let out = reconcile(&device_schema(), &config(json!({"mode": "manual"}))).unwrap();
        assert_eq!(J::Object(out), json!({"volume": 50, "mode": "manual"}));
    }

    #[test]
    fn test_drops_undeclared_keys() {
        let narrowed = schema(json!({"properties": {"volume": {"type": "number", "default": 50}}}));
        let (out, prov) =
            reconcile_with_provenance(&narrowed, &config(json!({"volume": 50, "mode": "manual"})))
                .unwrap();
        assert_eq!(J::Object(out), json!({"volume": 50}));
        assert_eq!(prov.dropped, vec!["mode".to_string()]);
    }

    #[test]
    fn test_saved_values_are_not_coerced() {
        let out = reconcile(&device_schema(), &config(json!({"volume": "loud", "mode": null})))
            .unwrap();
        assert_eq!(out["volume"], json!("loud"));
        assert_eq!(out["mode"], J::Null);
    }

    #[test]
    fn test_output_follows_schema_order() {
        let out = reconcile(&device_schema(), &config(json!({"mode": "auto", "volume": 3})))
            .unwrap();
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["volume", "mode"]);
    }

    #[test]
    fn test_provenance_origins() {
        let (_, prov) =
            reconcile_with_provenance(&device_schema(), &config(json!({"mode": "auto"}))).unwrap();
        assert_eq!(prov.origin_of("volume"), Some(FieldOrigin::Default));
        assert_eq!(prov.origin_of("mode"), Some(FieldOrigin::Saved));
        assert!(prov.dropped.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let s = device_schema();
        let once = reconcile(&s, &config(json!({"extra": true}))).unwrap();
        let twice = reconcile(&s, &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unresolvable_default_aborts() {
        let s = schema(json!({"properties": {"tags": {"type": "array", "items": {"enum": []}}}}));
        let err = reconcile(&s, &Configuration::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvableDefault { ref key, .. } if key == "tags"));

        // a saved value means no default is needed
        assert!(reconcile(&s, &config(json!({"tags": ["x"]}))).is_ok());
    }

    #[test]
    fn test_unknown_type_fails_at_reconcile_time() {
        let s = Schema::parse(r#"{"properties": {"a": {"type": "color"}}}"#).unwrap();
        let err = reconcile(&s, &Configuration::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvableDefault { ref key, .. } if key == "a"));
    }

    #[test]
    fn test_unknown_type_with_default_resolves() {
        let s = Schema::parse(r#"{"properties": {"a": {"type": "color", "default": "red"}}}"#)
            .unwrap();
        let out = reconcile(&s, &Configuration::new()).unwrap();
        assert_eq!(out["a"], json!("red"));
        assert!(crate::validate(&s, &out).is_valid());
    }

    #[test]
    fn test_config_from_value() {
        assert!(config_from_value(J::Null).unwrap().is_empty());
        assert_eq!(config_from_value(json!({"a": 1})).unwrap()["a"], json!(1));
        assert!(matches!(
            config_from_value(json!([1])),
            Err(ConfigError::MalformedConfig(_))
        ));
    }
}
