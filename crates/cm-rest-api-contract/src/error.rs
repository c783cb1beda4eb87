// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for API contract validation and parsing

use thiserror::Error;

/// Errors that can occur during API contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object, found: {0}")]
    NotAnObject(String),
}

/// Problem+JSON error response format as per RFC 7807
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default = "default_problem_type")]
    pub problem_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: String,
}

fn default_problem_type() -> String {
    "about:blank".to_string()
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.detail)
        }
    }
}
