// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Bind Variable Builder
//!
//! Typed parameters for outbound queries. The Type tag is authoritative:
//! an `Int64` and a `Uint64` bind variable never compare equal even when
//! their payloads do.

use crate::codec::check_integer;
use crate::types::Type;
use crate::value::Value;
use bytes::Bytes;
use proxy_common::{ProxyError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindVariable {
    pub ty: Type,
    pub value: Bytes,
}

impl BindVariable {
    pub fn int64(v: i64) -> Self {
        Self {
            ty: Type::Int64,
            value: Bytes::from(v.to_string()),
        }
    }

    pub fn uint64(v: u64) -> Self {
        Self {
            ty: Type::Uint64,
            value: Bytes::from(v.to_string()),
        }
    }

    /// NaN and the infinities have no SQL literal and are rejected.
    pub fn float64(v: f64) -> Result<Self> {
        if !v.is_finite() {
            return Err(ProxyError::decode(format!("FLOAT64 bind value {} is not finite", v)));
        }
        Ok(Self {
            ty: Type::Float64,
            value: Bytes::from(v.to_string()),
        })
    }

    pub fn string(v: impl Into<String>) -> Self {
        Self {
            ty: Type::VarChar,
            value: Bytes::from(v.into()),
        }
    }

    pub fn bytes(v: impl Into<Bytes>) -> Self {
        Self {
            ty: Type::VarBinary,
            value: v.into(),
        }
    }

    /// Signed integer of an explicit width. Values outside the width are
    /// rejected, never truncated.
    pub fn int_of(ty: Type, v: i64) -> Result<Self> {
        if !ty.is_signed() {
            return Err(ProxyError::classification(format!(
                "{} is not a signed integer type",
                ty
            )));
        }
        let text = v.to_string();
        check_integer(ty, &text)?;
        Ok(Self {
            ty,
            value: Bytes::from(text),
        })
    }

    /// Unsigned integer of an explicit width, Year included.
    pub fn uint_of(ty: Type, v: u64) -> Result<Self> {
        if !ty.is_unsigned() {
            return Err(ProxyError::classification(format!(
                "{} is not an unsigned integer type",
                ty
            )));
        }
        let text = v.to_string();
        check_integer(ty, &text)?;
        Ok(Self {
            ty,
            value: Bytes::from(text),
        })
    }

    /// Bind an already-decoded value. NULL has no bind representation.
    pub fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Err(ProxyError::classification(
                "NULL values cannot be bound; render NULL in the query text".to_string(),
            ));
        }
        Ok(Self {
            ty: value.ty(),
            value: value.to_bytes(),
        })
    }

    pub fn is_numeric(&self) -> bool {
        self.ty.is_number()
    }

    /// Render as a literal for direct substitution into query text.
    /// Payloads that are not valid UTF-8 are emitted as hex literals.
    pub fn encode_sql(&self) -> String {
        if !self.ty.is_quoted() {
            return String::from_utf8_lossy(&self.value).into_owned();
        }
        match std::str::from_utf8(&self.value) {
            Ok(text) => {
                let mut out = String::with_capacity(text.len() + 2);
                out.push('\'');
                escape_into(text, &mut out);
                out.push('\'');
                out
            }
            Err(_) => {
                let mut out = String::with_capacity(self.value.len() * 2 + 3);
                out.push_str("X'");
                for b in self.value.iter() {
                    out.push_str(&format!("{:02x}", b));
                }
                out.push('\'');
                out
            }
        }
    }
}

impl fmt::Display for BindVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_sql())
    }
}

/// MySQL string-literal escaping.
fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            other => out.push(other),
        }
    }
}
