// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Schema-driven configuration engine.
//!
//! This crate turns a JSON-Schema document and a possibly incomplete saved
//! configuration into a complete working configuration, keeps it validated
//! while it is edited, and carries it across schema replacements. All
//! operations are synchronous and work on `serde_json::Value`; transport and
//! rendering live in other crates.
//!
//! Data flow for one editing session:
//!
//! ```text
//! schema text ──Schema::parse──┐
//! saved config ────────────────┴─ConfigStore::initialize─► reconcile + validate
//! edits ─────────ConfigStore::set_field──────────────────► validate
//! new schema text ──switch_schema──ConfigStore::replace_schema──► reconcile + validate
//! ```

pub mod controls;
pub mod defaults;
pub mod error;
pub mod provenance;
pub mod reconcile;
pub mod schema;
pub mod store;
pub mod switcher;
pub mod validation;

pub use controls::Control;
pub use defaults::resolve_default;
pub use error::{ConfigError, Result};
pub use provenance::{FieldOrigin, Provenance};
pub use reconcile::{config_from_value, reconcile, reconcile_with_provenance, Configuration};
pub use schema::{PropertyDefinition, PropertyType, Schema};
pub use store::ConfigStore;
pub use switcher::{apply_schema_draft, switch_schema, SchemaSwitch};
pub use validation::{validate, ValidationResult, Violation};
