// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Common foundations for the SQL proxy crates
//!
//! This crate provides:
//! - Error types and result handling
//! - Configuration management
//! - Engine identification (flavor, version, reported errors)
//! - MySQL wire-protocol constants

pub mod error;
pub mod config;
pub mod types;
pub mod constants;

pub use error::{ProxyError, Result};
pub use config::Config;
pub use types::{EngineError, EngineFlavor, EngineProfile, EngineVersion};
