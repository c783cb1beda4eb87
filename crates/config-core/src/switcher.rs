// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Replacing the active schema from schema text

use tracing::warn;

use crate::error::Result;
use crate::schema::Schema;
use crate::store::ConfigStore;

/// How a schema replacement affected the working configuration's keys
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaSwitch {
    /// Declared by the new schema and filled with defaults
    pub added: Vec<String>,
    /// No longer declared; their values are gone
    pub dropped: Vec<String>,
    /// Declared by both schemas; values kept as they were
    pub carried: Vec<String>,
}

/// Parse `text` and make it the store's active schema.
///
/// # Errors
/// `MalformedSchema` or `UnresolvableDefault`; the store keeps its previous
/// schema and configuration in both cases.
pub fn switch_schema(store: &mut ConfigStore, text: &str) -> Result<SchemaSwitch> {
    let schema = Schema::parse(text).inspect_err(|e| warn!(error = %e, "Rejected schema text"))?;
    store.replace_schema(schema)
}

/// Apply the store's own schema draft.
pub fn apply_schema_draft(store: &mut ConfigStore) -> Result<SchemaSwitch> {
    let text = store.schema_text().to_owned();
    switch_schema(store, &text)
}
