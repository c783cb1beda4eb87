// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! config-manager REST API contract types and validation
//!
//! The service exposes two resources, each wrapped in a `{"data": ...}`
//! envelope:
//!
//! | Method | Path          | Request body              | Response `data`              |
//! |--------|---------------|---------------------------|------------------------------|
//! | GET    | `/api/config` |                           | `{"config": <object/null>}`  |
//! | POST   | `/api/config` | configuration object      | ignored                      |
//! | GET    | `/api/schema` |                           | `{"schema": "<json text>"}`  |
//! | POST   | `/api/schema` | `{"schema": "<json text>"}` | `{"schema": "<canonical>"}` |
//!
//! The schema travels as serialized text and must be parsed by the caller.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;

/// Path of the configuration resource
pub const CONFIG_PATH: &str = "/api/config";
/// Path of the schema resource
pub const SCHEMA_PATH: &str = "/api/schema";
