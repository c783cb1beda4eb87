// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation of a working configuration against its schema

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::ValidationError;
use serde::Serialize;
use serde_json::Value as J;

use crate::reconcile::Configuration;
use crate::schema::Schema;

/// A single mismatch between a configuration value and a schema constraint
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Violation {
    /// JSON pointer of the offending value, `""` for the whole configuration
    pub path: String,
    /// Top-level key the violation concerns, when there is one
    pub key: Option<String>,
    /// Keyword that failed (`type`, `enum`, `required`, ...)
    pub rule: String,
    /// Schema value of the failed keyword
    pub expected: Option<J>,
    pub actual: J,
    pub message: String,
}

impl Violation {
    fn from_error(schema: &J, error: &ValidationError<'_>) -> Self {
        let path = error.instance_path.to_string();
        let schema_path = error.schema_path.to_string();
        let rule = schema_path
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("schema")
            .to_string();
        let key = match &error.kind {
            ValidationErrorKind::Required { property } => property.as_str().map(str::to_string),
            _ => first_segment(&path),
        };

        Self {
            key,
            rule,
            expected: schema.pointer(&schema_path).cloned(),
            actual: error.instance.clone().into_owned(),
            message: error.to_string(),
            path,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{location}: {} ({})", self.message, self.rule)
    }
}

/// Outcome of validating one (schema, configuration) pair.
/// Always derived fresh; never patched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations concerning one top-level key
    pub fn for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.key.as_deref() == Some(key))
    }

    /// One line suitable for a status bar or log message
    pub fn summary(&self) -> String {
        match self.violations.as_slice() {
            [] => "configuration is valid".to_string(),
            [only] => format!("1 violation: {only}"),
            [first, rest @ ..] => format!("{} violations, first: {first}", rest.len() + 1),
        }
    }
}

/// Check `config` against `schema` with draft-07 semantics.
pub fn validate(schema: &Schema, config: &Configuration) -> ValidationResult {
    let instance = J::Object(config.clone());
    let violations = match schema.validator().validate(&instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| Violation::from_error(schema.as_value(), &e)).collect(),
    };
    ValidationResult::from_violations(violations)
}

/// First reference token of a JSON pointer, unescaped
fn first_segment(pointer: &str) -> Option<String> {
    pointer
        .strip_prefix('/')
        .and_then(|rest| rest.split('/').next())
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
}
