// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Settings of the `cm` tool itself.
//!
//! Layers, lowest first: built-in defaults, the TOML settings file,
//! `CM_*` environment variables, command line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line; `None` leaves lower layers in effect
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub server_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load settings from `path`, or from the standard location when no
    /// path is given. An explicit path must exist.
    pub fn load(path: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix("CM"), overrides)
    }

    pub(crate) fn load_with_env(
        path: Option<&Path>,
        env: Environment,
        overrides: &SettingsOverrides,
    ) -> Result<Self> {
        let file = match path {
            Some(p) => Some(File::from(p).format(FileFormat::Toml).required(true)),
            None => standard_settings_path()
                .map(|p| File::from(p).format(FileFormat::Toml).required(false)),
        };

        let mut builder = Config::builder().set_default("server_url", DEFAULT_SERVER_URL)?;
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        let built = builder
            .add_source(env.try_parsing(true))
            .set_override_option("server_url", overrides.server_url.clone())?
            .set_override_option("timeout_secs", overrides.timeout_secs)?
            .build()
            .context("Failed to read settings")?;

        built
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.server_url)
            .with_context(|| format!("Invalid server URL `{}`", self.server_url))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// `<config dir>/config-manager/config.toml`
pub fn standard_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("config-manager").join("config.toml"))
}
