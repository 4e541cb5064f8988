// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Error types for the proxy core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    /// A wire type / flag combination with no canonical type.
    #[error("Classification error: {0}")]
    Classification(String),

    /// Raw bytes that do not match the encoding of their type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A native scalar outside the range of the requested width.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Engine-reported shape that matches neither the primary nor a known fallback.
    #[error("Compatibility mismatch: {0}")]
    Compatibility(String),

    #[error("Invalid packet: {0}")]
    InvalidPacket(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxyError {
    pub fn decode(msg: impl Into<String>) -> Self {
        ProxyError::Decode(msg.into())
    }

    pub fn classification(msg: impl Into<String>) -> Self {
        ProxyError::Classification(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        ProxyError::OutOfRange(msg.into())
    }

    pub fn invalid_packet(msg: impl Into<String>) -> Self {
        ProxyError::InvalidPacket(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
