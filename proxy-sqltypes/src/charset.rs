// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Charset Resolver
//!
//! The collation reported in a column definition is informational for text
//! columns, but `binary` (63) is never transcoded, so every non-text type
//! must report it.

use crate::types::Type;
use proxy_common::constants::*;
use proxy_common::Config;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Collation(pub u16);

impl Collation {
    pub const LATIN1_SWEDISH_CI: Self = Collation(LATIN1_SWEDISH_CI);
    pub const UTF8_GENERAL_CI: Self = Collation(UTF8_GENERAL_CI);
    pub const UTF8MB4_GENERAL_CI: Self = Collation(UTF8MB4_GENERAL_CI);
    pub const UTF8MB4_BIN: Self = Collation(UTF8MB4_BIN);
    /// Collation used for all non-string data.
    pub const BINARY: Self = Collation(BINARY_COLLATION);
    pub const UTF8_BIN: Self = Collation(UTF8_BIN);
    pub const UTF8MB4_0900_AI_CI: Self = Collation(UTF8MB4_0900_AI_CI);

    pub fn id(&self) -> u16 {
        self.0
    }

    pub fn is_binary(&self) -> bool {
        *self == Collation::BINARY
    }

    fn info(&self) -> Option<&'static CollationInfo> {
        COLLATIONS.iter().find(|c| c.id == self.0)
    }

    pub fn charset_name(&self) -> &'static str {
        self.info().map(|c| c.charset).unwrap_or("unknown")
    }

    pub fn name(&self) -> &'static str {
        self.info().map(|c| c.name).unwrap_or("unknown")
    }

    /// Maximum bytes per character. Unknown collations count as single-byte.
    pub fn max_bytes_per_char(&self) -> u32 {
        self.info().map(|c| c.max_len).unwrap_or(1)
    }
}

impl Default for Collation {
    fn default() -> Self {
        Collation::UTF8MB4_GENERAL_CI
    }
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

impl From<u16> for Collation {
    fn from(id: u16) -> Self {
        Collation(id)
    }
}

struct CollationInfo {
    id: u16,
    name: &'static str,
    charset: &'static str,
    max_len: u32,
}

static COLLATIONS: &[CollationInfo] = &[
    CollationInfo { id: LATIN1_SWEDISH_CI, name: "latin1_swedish_ci", charset: "latin1", max_len: 1 },
    CollationInfo { id: UTF8_GENERAL_CI, name: "utf8_general_ci", charset: "utf8", max_len: 3 },
    CollationInfo { id: UTF8MB4_GENERAL_CI, name: "utf8mb4_general_ci", charset: "utf8mb4", max_len: 4 },
    CollationInfo { id: UTF8MB4_BIN, name: "utf8mb4_bin", charset: "utf8mb4", max_len: 4 },
    CollationInfo { id: 47, name: "latin1_bin", charset: "latin1", max_len: 1 },
    CollationInfo { id: BINARY_COLLATION, name: "binary", charset: "binary", max_len: 1 },
    CollationInfo { id: UTF8_BIN, name: "utf8_bin", charset: "utf8", max_len: 3 },
    CollationInfo { id: 192, name: "utf8_unicode_ci", charset: "utf8", max_len: 3 },
    CollationInfo { id: 224, name: "utf8mb4_unicode_ci", charset: "utf8mb4", max_len: 4 },
    CollationInfo { id: UTF8MB4_0900_AI_CI, name: "utf8mb4_0900_ai_ci", charset: "utf8mb4", max_len: 4 },
];

/// Assigns the charset/collation id reported for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharsetResolver {
    default_collation: Collation,
}

impl CharsetResolver {
    pub fn new(default_collation: Collation) -> Self {
        Self { default_collation }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Collation(config.default_collation))
    }

    pub fn default_collation(&self) -> Collation {
        self.default_collation
    }

    /// Text types (including ENUM and SET) take the declared collation or the
    /// default; every other type is binary regardless of what was declared.
    pub fn resolve(&self, ty: Type, declared: Option<Collation>) -> Collation {
        if ty.is_text() {
            declared.unwrap_or(self.default_collation)
        } else {
            Collation::BINARY
        }
    }
}

impl Default for CharsetResolver {
    fn default() -> Self {
        Self::new(Collation::default())
    }
}
