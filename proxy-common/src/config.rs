// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Configuration management for the proxy core

use crate::constants::{DEFAULT_DATABASE, UTF8MB4_GENERAL_CI};
use crate::error::{ProxyError, Result};
use crate::types::{EngineFlavor, EngineProfile, EngineVersion};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vendor of the backing engine
    pub engine_flavor: EngineFlavor,

    /// Backing engine version, e.g. "5.7.31" or "10.3.8-MariaDB"
    pub engine_version: String,

    /// Collation id assigned to text columns without an explicit collation
    pub default_collation: u16,

    /// Database (schema) name reported on table columns
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_flavor: EngineFlavor::Mysql,
            engine_version: "5.7.31".to_string(),
            default_collation: UTF8MB4_GENERAL_CI,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ProxyError::Config(e.to_string()))
    }

    /// Override fields from `PROXY_*` environment variables when present.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(flavor) = std::env::var("PROXY_ENGINE_FLAVOR") {
            match flavor.parse::<EngineFlavor>() {
                Ok(f) => self.engine_flavor = f,
                Err(e) => tracing::warn!("Ignoring PROXY_ENGINE_FLAVOR: {}", e),
            }
        }

        if let Ok(version) = std::env::var("PROXY_ENGINE_VERSION") {
            self.engine_version = version;
        }

        if let Ok(collation) = std::env::var("PROXY_DEFAULT_COLLATION") {
            match collation.parse::<u16>() {
                Ok(id) => self.default_collation = id,
                Err(e) => tracing::warn!("Ignoring PROXY_DEFAULT_COLLATION={}: {}", collation, e),
            }
        }

        if let Ok(database) = std::env::var("PROXY_DATABASE") {
            self.database = database;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_collation == 0 {
            return Err(ProxyError::Config(
                "default_collation cannot be 0".to_string(),
            ));
        }
        EngineVersion::parse(&self.engine_version)?;
        Ok(())
    }

    /// The engine profile described by this configuration. A `MariaDB`
    /// marker in the version string wins over the configured flavor.
    pub fn engine_profile(&self) -> Result<EngineProfile> {
        let mut profile = EngineProfile::from_server_version(&self.engine_version)?;
        if !profile.is_mariadb() {
            profile.flavor = self.engine_flavor;
        }
        Ok(profile)
    }
}
