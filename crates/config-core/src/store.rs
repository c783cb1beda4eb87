// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The per-session configuration store.
//!
//! [`ConfigStore`] exclusively owns the active schema and the working
//! configuration of one editing session. Every mutating method recomputes
//! the validation result before returning, so [`ConfigStore::validation`]
//! always describes the current pair.

use serde_json::Value as J;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::provenance::{FieldOrigin, Provenance};
use crate::reconcile::{reconcile_with_provenance, Configuration};
use crate::schema::Schema;
use crate::switcher::SchemaSwitch;
use crate::validation::{validate, ValidationResult};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    schema: Schema,
    config: Configuration,
    schema_text: String,
    provenance: Provenance,
    validation: ValidationResult,
}

impl ConfigStore {
    /// Bootstrap a session: reconcile the saved configuration against `schema`.
    ///
    /// # Errors
    /// `UnresolvableDefault` when a missing key has no default.
    pub fn initialize(schema: Schema, saved: &Configuration) -> Result<Self> {
        let (config, provenance) = reconcile_with_provenance(&schema, saved)?;
        let validation = validate(&schema, &config);
        debug!(
            keys = config.len(),
            defaulted = provenance.defaulted().count(),
            dropped = ?provenance.dropped,
            valid = validation.is_valid(),
            "Initialized config store"
        );

        Ok(Self {
            schema_text: schema.to_pretty_text(),
            schema,
            config,
            provenance,
            validation,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn get(&self, key: &str) -> Option<&J> {
        self.config.get(key)
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Draft text of the schema editor
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    /// Edit the schema draft. The active schema only changes through
    /// [`crate::switch_schema`].
    pub fn set_schema_text(&mut self, text: impl Into<String>) {
        self.schema_text = text.into();
    }

    /// Replace one value verbatim. Keys the active schema does not declare
    /// are ignored and `false` is returned.
    pub fn set_field(&mut self, key: &str, value: J) -> bool {
        if !self.schema.declares(key) {
            warn!(key, "Ignoring edit of a key the active schema does not declare");
            return false;
        }

        debug!(key, value = %value, "Setting field");
        self.config.insert(key.to_string(), value);
        self.provenance.record(key, FieldOrigin::Edited);
        self.revalidate();
        true
    }

    /// Make `new_schema` active and carry the current working configuration
    /// over to it. On error the store is left untouched.
    pub fn replace_schema(&mut self, new_schema: Schema) -> Result<SchemaSwitch> {
        let (config, mut provenance) = reconcile_with_provenance(&new_schema, &self.config)?;

        let mut switch = SchemaSwitch::default();
        for key in new_schema.keys() {
            if self.config.contains_key(key) {
                if let Some(origin) = self.provenance.origin_of(key) {
                    provenance.record(key, origin);
                }
                switch.carried.push(key.to_string());
            } else {
                switch.added.push(key.to_string());
            }
        }
        switch.dropped = provenance.dropped.clone();

        self.schema_text = new_schema.to_pretty_text();
        self.schema = new_schema;
        self.config = config;
        self.provenance = provenance;
        self.revalidate();

        info!(
            added = ?switch.added,
            dropped = ?switch.dropped,
            carried = switch.carried.len(),
            valid = self.validation.is_valid(),
            "Replaced active schema"
        );
        Ok(switch)
    }

    /// Owned copy of the current pair, for persisting without holding the store
    pub fn snapshot(&self) -> (Schema, Configuration) {
        (self.schema.clone(), self.config.clone())
    }

    fn revalidate(&mut self) {
        self.validation = validate(&self.schema, &self.config);
    }
}
