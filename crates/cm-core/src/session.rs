// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use cm_client_api::{ClientApiError, ConfigApi};
use config_core::{
    config_from_value, switch_schema, ConfigError, ConfigStore, Schema, SchemaSwitch,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to load from the config service: {0}")]
    Load(#[source] ClientApiError),

    #[error("Failed to persist to the config service: {0}")]
    Persist(#[source] ClientApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// One editing session against a remote configuration service
pub struct Session<A: ConfigApi> {
    api: A,
    store: ConfigStore,
}

impl<A: ConfigApi> Session<A> {
    /// Fetch the saved configuration and schema, then reconcile them.
    ///
    /// Both fetches run concurrently; the session only exists once both
    /// succeeded and the schema was accepted.
    pub async fn bootstrap(api: A) -> SessionResult<Self> {
        let (saved, schema_text) = tokio::try_join!(api.fetch_config(), api.fetch_schema_text())
            .map_err(SessionError::Load)?;

        let schema = Schema::parse(&schema_text)?;
        let saved = config_from_value(saved)?;
        let store = ConfigStore::initialize(schema, &saved)?;

        info!(
            keys = store.config().len(),
            valid = store.validation().is_valid(),
            "Session loaded"
        );
        Ok(Self { api, store })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Edit one value; see [`ConfigStore::set_field`].
    pub fn set_field(&mut self, key: &str, value: Value) -> bool {
        self.store.set_field(key, value)
    }

    pub fn set_schema_text(&mut self, text: impl Into<String>) {
        self.store.set_schema_text(text);
    }

    /// Send the working configuration as is. Violations are logged, not
    /// enforced.
    pub async fn save_config(&self) -> SessionResult<()> {
        let (_, config) = self.store.snapshot();
        let validation = self.store.validation();
        if !validation.is_valid() {
            warn!(
                violations = validation.len(),
                summary = %validation.summary(),
                "Saving a configuration that does not satisfy its schema"
            );
        }

        self.api
            .save_config(&config)
            .await
            .map_err(SessionError::Persist)?;
        info!(keys = config.len(), "Configuration saved");
        Ok(())
    }

    /// Send the schema draft and switch to the schema the service kept.
    /// A draft that does not parse is rejected without contacting the service.
    pub async fn save_schema(&mut self) -> SessionResult<SchemaSwitch> {
        let draft = self.store.schema_text().to_owned();
        Schema::parse(&draft)?;
        let canonical = self
            .api
            .save_schema_text(&draft)
            .await
            .map_err(SessionError::Persist)?;
        info!("Schema saved");

        Ok(switch_schema(&mut self.store, &canonical)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_client_api::MockConfigApi;
    use config_core::FieldOrigin;
    use mockall::predicate::eq;
    use serde_json::json;

    const SCHEMA: &str = r#"{
        "title": "Audio",
        "properties": {
            "volume": {"type": "number", "default": 50},
            "mode": {"type": "string", "enum": ["auto", "manual"]}
        }
    }"#;

    fn api_with(saved: Value, schema: &'static str) -> MockConfigApi {
        let mut api = MockConfigApi::new();
        api.expect_fetch_config().returning(move || Ok(saved.clone()));
        api.expect_fetch_schema_text()
            .returning(move || Ok(schema.to_string()));
        api
    }

    #[tokio::test]
    async fn test_bootstrap_reconciles_saved_config() {
        let session = Session::bootstrap(api_with(json!({"mode": "manual"}), SCHEMA))
            .await
            .unwrap();

        let store = session.store();
        assert_eq!(
            Value::Object(store.config().clone()),
            json!({"volume": 50, "mode": "manual"})
        );
        assert_eq!(store.provenance().origin_of("volume"), Some(FieldOrigin::Default));
        assert_eq!(store.provenance().origin_of("mode"), Some(FieldOrigin::Saved));
        assert!(store.validation().is_valid());
    }

    #[tokio::test]
    async fn test_bootstrap_with_nothing_saved() {
        let session = Session::bootstrap(api_with(Value::Null, SCHEMA)).await;
        // "mode" has neither a saved value nor a default, but is a string
        let session = session.unwrap();
        assert_eq!(session.store().get("mode"), Some(&json!("")));
        assert!(!session.store().validation().is_valid());
    }

    #[tokio::test]
    async fn test_bootstrap_transport_failure_is_fatal() {
        let mut api = MockConfigApi::new();
        api.expect_fetch_config()
            .returning(|| Err(ClientApiError::Transport("connection refused".into())));
        api.expect_fetch_schema_text()
            .returning(|| Ok(SCHEMA.to_string()));

        let err = Session::bootstrap(api).await.err().unwrap();
        assert!(matches!(err, SessionError::Load(ClientApiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_malformed_schema() {
        let err = Session::bootstrap(api_with(Value::Null, r#"{"title": "x"}"#))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Config(ConfigError::MalformedSchema(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_non_object_config() {
        let err = Session::bootstrap(api_with(json!([1, 2]), SCHEMA))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Config(ConfigError::MalformedConfig(_))));
    }

    #[tokio::test]
    async fn test_save_config_sends_invalid_config_verbatim() {
        let mut api = api_with(json!({"mode": "manual"}), SCHEMA);
        let mut expected = serde_json::Map::new();
        expected.insert("volume".into(), json!(50));
        expected.insert("mode".into(), json!("turbo"));
        api.expect_save_config()
            .with(eq(expected))
            .times(1)
            .returning(|_| Ok(()));

        let mut session = Session::bootstrap(api).await.unwrap();
        assert!(session.set_field("mode", json!("turbo")));
        assert!(!session.store().validation().is_valid());

        session.save_config().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_config_failure_keeps_edits() {
        let mut api = api_with(Value::Null, SCHEMA);
        api.expect_save_config().returning(|_| {
            Err(ClientApiError::Server {
                status: 500,
                detail: "disk full".into(),
            })
        });

        let mut session = Session::bootstrap(api).await.unwrap();
        session.set_field("volume", json!(80));

        let err = session.save_config().await.unwrap_err();
        assert!(matches!(err, SessionError::Persist(ClientApiError::Server { status: 500, .. })));
        assert_eq!(session.store().get("volume"), Some(&json!(80)));
    }

    #[tokio::test]
    async fn test_save_schema_switches_to_echo() {
        let mut api = api_with(json!({"mode": "manual", "volume": 10}), SCHEMA);
        let draft = r#"{"properties": {"mode": {"type": "string"}, "muted": {"type": "boolean"}}}"#;
        api.expect_save_schema_text()
            .with(eq(draft))
            .times(1)
            .returning(|text| Ok(text.to_string()));

        let mut session = Session::bootstrap(api).await.unwrap();
        session.set_schema_text(draft);
        let switch = session.save_schema().await.unwrap();

        assert_eq!(switch.dropped, vec!["volume".to_string()]);
        assert_eq!(switch.added, vec!["muted".to_string()]);
        assert_eq!(
            Value::Object(session.store().config().clone()),
            json!({"mode": "manual", "muted": false})
        );
    }

    #[tokio::test]
    async fn test_save_schema_failure_leaves_store_unchanged() {
        let mut api = api_with(Value::Null, SCHEMA);
        api.expect_save_schema_text()
            .returning(|_| Err(ClientApiError::Transport("timeout".into())));

        let mut session = Session::bootstrap(api).await.unwrap();
        let before = session.store().config().clone();
        session.set_schema_text(r#"{"properties": {}}"#);

        let err = session.save_schema().await.unwrap_err();
        assert!(matches!(err, SessionError::Persist(_)));
        assert_eq!(session.store().config(), &before);
        assert!(session.store().schema().declares("volume"));
    }

    #[tokio::test]
    async fn test_malformed_draft_is_not_sent() {
        let mut api = api_with(Value::Null, SCHEMA);
        api.expect_save_schema_text().times(0);

        let mut session = Session::bootstrap(api).await.unwrap();
        for draft in ["", "[1, 2]", r#"{"title": "no properties"}"#] {
            session.set_schema_text(draft);
            let err = session.save_schema().await.unwrap_err();
            assert!(matches!(err, SessionError::Config(ConfigError::MalformedSchema(_))));
        }
        assert!(session.store().schema().declares("volume"));
    }

    #[tokio::test]
    async fn test_malformed_echo_is_a_config_error() {
        let mut api = api_with(Value::Null, SCHEMA);
        api.expect_save_schema_text()
            .returning(|_| Ok("not json".to_string()));

        let mut session = Session::bootstrap(api).await.unwrap();
        let err = session.save_schema().await.unwrap_err();
        assert!(matches!(err, SessionError::Config(ConfigError::MalformedSchema(_))));
        assert!(session.store().schema().declares("mode"));
    }
}
