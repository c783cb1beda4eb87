// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main REST API client implementation

use std::time::Duration;

use cm_rest_api_contract::validation::validate_schema_update;
use cm_rest_api_contract::*;
use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::{RestClientError, RestClientResult};

/// REST API client for the config-manager service
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(base_url: Url) -> RestClientResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(base_url: Url, timeout: Option<Duration>) -> RestClientResult<Self> {
        let mut builder =
            HttpClient::builder().user_agent(concat!("config-manager/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
        })
    }

    /// Create a client from a base URL string
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Self::new(Url::parse(base_url)?)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the saved configuration
    pub async fn get_config(&self) -> RestClientResult<Value> {
        let envelope: Envelope<ConfigDocument> = self.get(CONFIG_PATH).await?;
        Ok(envelope.into_inner().config)
    }

    /// Fetch the schema text
    pub async fn get_schema(&self) -> RestClientResult<String> {
        let envelope: Envelope<SchemaDocument> = self.get(SCHEMA_PATH).await?;
        Ok(envelope.into_inner().schema)
    }

    /// Store the full configuration object
    pub async fn post_config(&self, config: &Map<String, Value>) -> RestClientResult<()> {
        self.send(Method::POST, CONFIG_PATH, Some(config)).await?;
        Ok(())
    }

    /// Store schema text and return the service's canonical copy
    pub async fn post_schema(&self, schema: &str) -> RestClientResult<String> {
        let request = SchemaUpdateRequest::new(schema);
        validate_schema_update(&request)?;
        let envelope: Envelope<SchemaDocument> = self.post(SCHEMA_PATH, &request).await?;
        Ok(envelope.into_inner().schema)
    }

    // Private helper methods

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// Send a request and turn non-2xx statuses into errors
    async fn send<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<Response> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "Sending request");

        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        match serde_json::from_str::<ProblemDetails>(&text) {
            Ok(details) => Err(RestClientError::ServerError { status, details }),
            Err(_) => Err(RestClientError::UnexpectedResponse { status, body: text }),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> RestClientResult<T> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(RestClientError::from)
    }
}
