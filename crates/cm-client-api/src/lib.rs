// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client API abstraction for the remote configuration service.
//!
//! Editing sessions talk to the service only through [`ConfigApi`], so the
//! HTTP client can be swapped for an in-memory double in tests. Enable the
//! `mock` feature to get `MockConfigApi`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors surfaced by any [`ConfigApi`] implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// Remote persistence for one configuration and its schema
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ConfigApi: Send + Sync {
    /// Saved configuration as stored remotely; `null` when nothing was saved
    async fn fetch_config(&self) -> ClientApiResult<Value>;

    /// Schema document as serialized text
    async fn fetch_schema_text(&self) -> ClientApiResult<String>;

    /// Store a full configuration, replacing the previous one
    async fn save_config(&self, config: &Map<String, Value>) -> ClientApiResult<()>;

    /// Store schema text; returns the canonical text the service kept
    async fn save_schema_text(&self, schema: &str) -> ClientApiResult<String>;
}
