// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Typed values
//!
//! A value pairs a canonical type with the bytes of its textual (or, for
//! binary and spatial types, raw) wire form. Values are immutable; helpers
//! that change the type return a new value.

use crate::types::Type;
use bytes::Bytes;
use proxy_common::{ProxyError, Result};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Value {
    ty: Type,
    content: Bytes,
}

impl Value {
    /// Build a value without validating the content against the type.
    /// Use `codec::decode` for untrusted bytes.
    pub fn new_trusted(ty: Type, content: impl Into<Bytes>) -> Value {
        if ty == Type::NullType {
            return Value::null();
        }
        Value {
            ty,
            content: content.into(),
        }
    }

    pub fn null() -> Value {
        Value {
            ty: Type::NullType,
            content: Bytes::new(),
        }
    }

    pub fn from_i64(v: i64) -> Value {
        Value::new_trusted(Type::Int64, v.to_string())
    }

    pub fn from_u64(v: u64) -> Value {
        Value::new_trusted(Type::Uint64, v.to_string())
    }

    pub fn from_f32(v: f32) -> Result<Value> {
        if !v.is_finite() {
            return Err(ProxyError::decode(format!("FLOAT32 value {} is not finite", v)));
        }
        Ok(Value::new_trusted(Type::Float32, v.to_string()))
    }

    pub fn from_f64(v: f64) -> Result<Value> {
        if !v.is_finite() {
            return Err(ProxyError::decode(format!("FLOAT64 value {} is not finite", v)));
        }
        Ok(Value::new_trusted(Type::Float64, v.to_string()))
    }

    pub fn varchar(s: impl Into<String>) -> Value {
        let s: String = s.into();
        Value::new_trusted(Type::VarChar, s)
    }

    pub fn varbinary(b: impl Into<Bytes>) -> Value {
        Value::new_trusted(Type::VarBinary, b)
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    pub fn raw(&self) -> &[u8] {
        &self.content
    }

    pub fn to_bytes(&self) -> Bytes {
        self.content.clone()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_null(&self) -> bool {
        self.ty == Type::NullType
    }

    /// Same content under another type.
    pub fn with_type(&self, ty: Type) -> Value {
        Value::new_trusted(ty, self.content.clone())
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    fn numeric_text(&self) -> Result<&str> {
        if !self.ty.is_number() {
            return Err(ProxyError::decode(format!(
                "{} value is not numeric",
                self.ty
            )));
        }
        self.as_str()
            .ok_or_else(|| ProxyError::decode(format!("{} value is not valid UTF-8", self.ty)))
    }

    pub fn to_i64(&self) -> Result<i64> {
        let text = self.numeric_text()?;
        text.parse::<i64>()
            .map_err(|e| ProxyError::decode(format!("cannot read {:?} as i64: {}", text, e)))
    }

    pub fn to_u64(&self) -> Result<u64> {
        let text = self.numeric_text()?;
        text.parse::<u64>()
            .map_err(|e| ProxyError::decode(format!("cannot read {:?} as u64: {}", text, e)))
    }

    pub fn to_f64(&self) -> Result<f64> {
        let text = self.numeric_text()?;
        text.parse::<f64>()
            .map_err(|e| ProxyError::decode(format!("cannot read {:?} as f64: {}", text, e)))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        write!(f, "{}({})", self.ty, String::from_utf8_lossy(&self.content))
    }
}
