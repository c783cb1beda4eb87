// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST API client for the config-manager service
//!
//! Provides the HTTP implementation of [`cm_client_api::ConfigApi`]. The
//! client owns no session state: every call is a single request whose
//! failure is reported to the caller unchanged, with no retries.

pub mod client;
pub mod error;

pub use client::*;
pub use error::*;

use async_trait::async_trait;
use cm_client_api::{ClientApiResult, ConfigApi};
use serde_json::{Map, Value};

#[async_trait]
impl ConfigApi for client::RestClient {
    async fn fetch_config(&self) -> ClientApiResult<Value> {
        self.get_config().await.map_err(Into::into)
    }

    async fn fetch_schema_text(&self) -> ClientApiResult<String> {
        self.get_schema().await.map_err(Into::into)
    }

    async fn save_config(&self, config: &Map<String, Value>) -> ClientApiResult<()> {
        self.post_config(config).await.map_err(Into::into)
    }

    async fn save_schema_text(&self, schema: &str) -> ClientApiResult<String> {
        self.post_schema(schema).await.map_err(Into::into)
    }
}
