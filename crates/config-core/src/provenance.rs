// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Provenance tracking for working configuration values

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Where the current value of a key came from
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrigin {
    /// Copied from the saved configuration
    Saved,
    /// Filled in by default resolution
    Default,
    /// Set by an edit during this session
    Edited,
}

impl fmt::Display for FieldOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOrigin::Saved => write!(f, "saved"),
            FieldOrigin::Default => write!(f, "default"),
            FieldOrigin::Edited => write!(f, "edited"),
        }
    }
}

/// Provenance information for a reconciled configuration
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Provenance {
    /// Maps each declared key to the origin of its value
    pub origin: BTreeMap<String, FieldOrigin>,
    /// Keys of the input that the schema does not declare, in input order
    pub dropped: Vec<String>,
}

impl Provenance {
    pub fn record(&mut self, key: &str, origin: FieldOrigin) {
        self.origin.insert(key.to_string(), origin);
    }

    pub fn origin_of(&self, key: &str) -> Option<FieldOrigin> {
        self.origin.get(key).copied()
    }

    /// Keys whose value currently comes from default resolution
    pub fn defaulted(&self) -> impl Iterator<Item = &str> {
        self.origin
            .iter()
            .filter(|(_, origin)| **origin == FieldOrigin::Default)
            .map(|(key, _)| key.as_str())
    }
}
