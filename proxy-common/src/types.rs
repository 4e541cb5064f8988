// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Identification of the backing database engine

use crate::error::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vendor of the backing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineFlavor {
    /// Oracle MySQL and Percona builds
    Mysql,
    /// MariaDB server
    #[serde(alias = "maria")]
    MariaDb,
}

impl fmt::Display for EngineFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineFlavor::Mysql => write!(f, "mysql"),
            EngineFlavor::MariaDb => write!(f, "mariadb"),
        }
    }
}

impl std::str::FromStr for EngineFlavor {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "percona" => Ok(EngineFlavor::Mysql),
            "mariadb" | "maria" => Ok(EngineFlavor::MariaDb),
            other => Err(ProxyError::Config(format!("unknown engine flavor: {}", other))),
        }
    }
}

/// Server version as reported in the handshake, e.g. `5.7.31-log` or `10.3.8-MariaDB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EngineVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl EngineVersion {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// Parse `major.minor.patch[-suffix]`. A missing patch component reads as 0.
    pub fn parse(version: &str) -> Result<Self> {
        let numeric = version
            .trim()
            .split(|c: char| c == '-' || c == '+' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        let mut parts = numeric.split('.');
        let mut next = |label: &str, required: bool| -> Result<u16> {
            match parts.next() {
                Some(p) if !p.is_empty() => p.parse::<u16>().map_err(|e| {
                    ProxyError::Config(format!("invalid {} version in {:?}: {}", label, version, e))
                }),
                _ if required => Err(ProxyError::Config(format!(
                    "missing {} version in {:?}",
                    label, version
                ))),
                _ => Ok(0),
            }
        };

        let major = next("major", true)?;
        let minor = next("minor", true)?;
        let patch = next("patch", false)?;
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The engine a proxy instance is fronting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineProfile {
    pub flavor: EngineFlavor,
    pub version: EngineVersion,
}

impl EngineProfile {
    pub const fn new(flavor: EngineFlavor, version: EngineVersion) -> Self {
        Self { flavor, version }
    }

    /// Build a profile from a raw server version string. MariaDB advertises
    /// itself through a `MariaDB` suffix, everything else is treated as MySQL.
    pub fn from_server_version(server_version: &str) -> Result<Self> {
        let version = EngineVersion::parse(server_version)?;
        let flavor = if server_version.to_ascii_lowercase().contains("mariadb") {
            EngineFlavor::MariaDb
        } else {
            EngineFlavor::Mysql
        };
        Ok(Self { flavor, version })
    }

    pub fn is_mariadb(&self) -> bool {
        self.flavor == EngineFlavor::MariaDb
    }

    pub fn at_least(&self, major: u16, minor: u16, patch: u16) -> bool {
        self.version >= EngineVersion::new(major, minor, patch)
    }

    /// JSON column declarations parse from MySQL 5.7.8 and MariaDB 10.2.7.
    pub fn supports_json_columns(&self) -> bool {
        match self.flavor {
            EngineFlavor::Mysql => self.at_least(5, 7, 8),
            EngineFlavor::MariaDb => self.at_least(10, 2, 7),
        }
    }

    /// MariaDB accepts JSON as an alias for LONGTEXT and reports such
    /// columns as blobs in a utf8 collation.
    pub fn json_is_blob_alias(&self) -> bool {
        self.is_mariadb()
    }
}

impl fmt::Display for EngineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.flavor, self.version)
    }
}

/// An error reported by the backing engine (ERR packet contents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineError {
    pub code: u16,
    pub sql_state: String,
    pub message: String,
}

impl EngineError {
    pub fn new(code: u16, sql_state: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            sql_state: sql_state.into(),
            message: message.into(),
        }
    }

    /// ER_PARSE_ERROR, or any error whose text names a syntax problem.
    pub fn is_syntax_error(&self) -> bool {
        self.code == crate::constants::ER_PARSE_ERROR
            || self.message.to_ascii_lowercase().contains("syntax")
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.message, self.sql_state, self.code)
    }
}
