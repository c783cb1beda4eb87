// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the REST client

use cm_client_api::ClientApiError;
use cm_rest_api_contract::{ApiContractError, ProblemDetails};
use reqwest::StatusCode;
use thiserror::Error;

pub type RestClientResult<T> = Result<T, RestClientError>;

#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Contract(#[from] ApiContractError),

    #[error("Server error {status}: {details}")]
    ServerError {
        status: StatusCode,
        details: ProblemDetails,
    },

    #[error("Unexpected response ({status}): {body}")]
    UnexpectedResponse { status: StatusCode, body: String },
}

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::Http(e) => ClientApiError::Transport(e.to_string()),
            RestClientError::Url(e) => ClientApiError::InvalidRequest(e.to_string()),
            RestClientError::Contract(e) => ClientApiError::InvalidRequest(e.to_string()),
            RestClientError::Json(e) => ClientApiError::UnexpectedResponse(e.to_string()),
            RestClientError::ServerError { status, details } => ClientApiError::Server {
                status: status.as_u16(),
                detail: details.to_string(),
            },
            RestClientError::UnexpectedResponse { status, body } if !status.is_success() => {
                ClientApiError::Server {
                    status: status.as_u16(),
                    detail: body,
                }
            }
            RestClientError::UnexpectedResponse { body, .. } => {
                ClientApiError::UnexpectedResponse(body)
            }
        }
    }
}
