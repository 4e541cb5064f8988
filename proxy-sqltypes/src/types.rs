// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Type Registry
//!
//! Canonical value kinds and their mapping to and from MySQL wire type codes.

use proxy_common::constants::*;
use proxy_common::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical semantic kind of a value or column.
///
/// Variant order is the total order used for deterministic comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Type {
    /// SQL NULL / unassigned
    #[default]
    NullType,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int24,
    Uint24,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Timestamp,
    Date,
    Time,
    Datetime,
    Year,
    /// Exact decimal, carried as text
    Decimal,
    Text,
    Blob,
    VarChar,
    VarBinary,
    Char,
    Binary,
    Bit,
    Enum,
    Set,
    Geometry,
    Json,
}

impl Type {
    pub const ALL: [Type; 30] = [
        Type::NullType,
        Type::Int8,
        Type::Uint8,
        Type::Int16,
        Type::Uint16,
        Type::Int24,
        Type::Uint24,
        Type::Int32,
        Type::Uint32,
        Type::Int64,
        Type::Uint64,
        Type::Float32,
        Type::Float64,
        Type::Timestamp,
        Type::Date,
        Type::Time,
        Type::Datetime,
        Type::Year,
        Type::Decimal,
        Type::Text,
        Type::Blob,
        Type::VarChar,
        Type::VarBinary,
        Type::Char,
        Type::Binary,
        Type::Bit,
        Type::Enum,
        Type::Set,
        Type::Geometry,
        Type::Json,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Type::NullType => "NULL_TYPE",
            Type::Int8 => "INT8",
            Type::Uint8 => "UINT8",
            Type::Int16 => "INT16",
            Type::Uint16 => "UINT16",
            Type::Int24 => "INT24",
            Type::Uint24 => "UINT24",
            Type::Int32 => "INT32",
            Type::Uint32 => "UINT32",
            Type::Int64 => "INT64",
            Type::Uint64 => "UINT64",
            Type::Float32 => "FLOAT32",
            Type::Float64 => "FLOAT64",
            Type::Timestamp => "TIMESTAMP",
            Type::Date => "DATE",
            Type::Time => "TIME",
            Type::Datetime => "DATETIME",
            Type::Year => "YEAR",
            Type::Decimal => "DECIMAL",
            Type::Text => "TEXT",
            Type::Blob => "BLOB",
            Type::VarChar => "VARCHAR",
            Type::VarBinary => "VARBINARY",
            Type::Char => "CHAR",
            Type::Binary => "BINARY",
            Type::Bit => "BIT",
            Type::Enum => "ENUM",
            Type::Set => "SET",
            Type::Geometry => "GEOMETRY",
            Type::Json => "JSON",
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Type::Int8 | Type::Int16 | Type::Int24 | Type::Int32 | Type::Int64
        )
    }

    /// Year is stored unsigned by the engine and counts as unsigned here.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Type::Uint8 | Type::Uint16 | Type::Uint24 | Type::Uint32 | Type::Uint64 | Type::Year
        )
    }

    pub fn is_integral(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float32 | Type::Float64)
    }

    pub fn is_number(&self) -> bool {
        self.is_integral() || self.is_float() || *self == Type::Decimal
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Type::Timestamp | Type::Date | Type::Time | Type::Datetime | Type::Year
        )
    }

    /// Character data interpreted through a collation.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Type::Text | Type::VarChar | Type::Char | Type::Enum | Type::Set
        )
    }

    /// Byte strings compared byte-wise.
    pub fn is_binary(&self) -> bool {
        matches!(self, Type::Blob | Type::VarBinary | Type::Binary)
    }

    /// Values that must be quoted when rendered as SQL literals.
    pub fn is_quoted(&self) -> bool {
        !self.is_number() && *self != Type::NullType
    }

    /// Types whose column definition carries BLOB_FLAG.
    pub fn is_blob_like(&self) -> bool {
        matches!(self, Type::Text | Type::Blob | Type::Geometry | Type::Json)
    }

    /// Inclusive bounds for integral types, widened to i128 so signed and
    /// unsigned widths share one comparison path.
    pub fn integer_bounds(&self) -> Option<(i128, i128)> {
        let bounds = match self {
            Type::Int8 => (i8::MIN as i128, i8::MAX as i128),
            Type::Uint8 => (0, u8::MAX as i128),
            Type::Int16 => (i16::MIN as i128, i16::MAX as i128),
            Type::Uint16 => (0, u16::MAX as i128),
            Type::Int24 => (-(1 << 23), (1 << 23) - 1),
            Type::Uint24 => (0, (1 << 24) - 1),
            Type::Int32 => (i32::MIN as i128, i32::MAX as i128),
            Type::Uint32 => (0, u32::MAX as i128),
            Type::Int64 => (i64::MIN as i128, i64::MAX as i128),
            Type::Uint64 => (0, u64::MAX as i128),
            Type::Year => (0, 2155),
            _ => return None,
        };
        Some(bounds)
    }

    /// Classify a wire type code plus column flags.
    ///
    /// Numeric codes consult only the unsigned bit. Engines report
    /// BINARY_FLAG alongside UNSIGNED_FLAG for aggregate expressions over
    /// unsigned columns (observed for `max(bigint unsigned)` on MySQL 5.7);
    /// the binary bit is therefore ignored for numeric codes and only changes
    /// the classification of character codes.
    pub fn from_mysql(code: u8, flags: u16) -> Result<Type> {
        let base = match code {
            MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => Type::Decimal,
            MYSQL_TYPE_TINY => Type::Int8,
            MYSQL_TYPE_SHORT => Type::Int16,
            MYSQL_TYPE_LONG => Type::Int32,
            MYSQL_TYPE_FLOAT => Type::Float32,
            MYSQL_TYPE_DOUBLE => Type::Float64,
            MYSQL_TYPE_NULL => Type::NullType,
            MYSQL_TYPE_TIMESTAMP | MYSQL_TYPE_TIMESTAMP2 => Type::Timestamp,
            MYSQL_TYPE_LONGLONG => Type::Int64,
            MYSQL_TYPE_INT24 => Type::Int24,
            MYSQL_TYPE_DATE => Type::Date,
            MYSQL_TYPE_TIME | MYSQL_TYPE_TIME2 => Type::Time,
            MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 => Type::Datetime,
            MYSQL_TYPE_YEAR => Type::Year,
            MYSQL_TYPE_VARCHAR | MYSQL_TYPE_VAR_STRING => Type::VarChar,
            MYSQL_TYPE_BIT => Type::Bit,
            MYSQL_TYPE_JSON => Type::Json,
            MYSQL_TYPE_ENUM => Type::Enum,
            MYSQL_TYPE_SET => Type::Set,
            MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB
            | MYSQL_TYPE_BLOB => Type::Text,
            MYSQL_TYPE_STRING => Type::Char,
            MYSQL_TYPE_GEOMETRY => Type::Geometry,
            other => {
                tracing::debug!(code = other, flags, "unsupported wire type code");
                return Err(ProxyError::classification(format!(
                    "unsupported wire type code {} (flags {:#06x})",
                    other, flags
                )));
            }
        };

        let unsigned = flags & UNSIGNED_FLAG != 0;
        let binary = flags & BINARY_FLAG != 0;

        let ty = match base {
            Type::Int8 if unsigned => Type::Uint8,
            Type::Int16 if unsigned => Type::Uint16,
            Type::Int24 if unsigned => Type::Uint24,
            Type::Int32 if unsigned => Type::Uint32,
            Type::Int64 if unsigned => Type::Uint64,
            Type::Text if binary => Type::Blob,
            Type::VarChar if binary => Type::VarBinary,
            Type::Char if binary => Type::Binary,
            Type::Char if flags & ENUM_FLAG != 0 => Type::Enum,
            Type::Char if flags & SET_FLAG != 0 => Type::Set,
            other => other,
        };

        if base.is_integral() && unsigned && binary {
            tracing::debug!(code, flags, ty = %ty, "ignoring binary flag on unsigned numeric column");
        }

        Ok(ty)
    }

    /// Wire type code and the flags implied by the type itself.
    pub fn to_mysql(&self) -> (u8, u16) {
        match self {
            Type::NullType => (MYSQL_TYPE_NULL, 0),
            Type::Int8 => (MYSQL_TYPE_TINY, 0),
            Type::Uint8 => (MYSQL_TYPE_TINY, UNSIGNED_FLAG),
            Type::Int16 => (MYSQL_TYPE_SHORT, 0),
            Type::Uint16 => (MYSQL_TYPE_SHORT, UNSIGNED_FLAG),
            Type::Int24 => (MYSQL_TYPE_INT24, 0),
            Type::Uint24 => (MYSQL_TYPE_INT24, UNSIGNED_FLAG),
            Type::Int32 => (MYSQL_TYPE_LONG, 0),
            Type::Uint32 => (MYSQL_TYPE_LONG, UNSIGNED_FLAG),
            Type::Int64 => (MYSQL_TYPE_LONGLONG, 0),
            Type::Uint64 => (MYSQL_TYPE_LONGLONG, UNSIGNED_FLAG),
            Type::Float32 => (MYSQL_TYPE_FLOAT, 0),
            Type::Float64 => (MYSQL_TYPE_DOUBLE, 0),
            Type::Timestamp => (MYSQL_TYPE_TIMESTAMP, 0),
            Type::Date => (MYSQL_TYPE_DATE, 0),
            Type::Time => (MYSQL_TYPE_TIME, 0),
            Type::Datetime => (MYSQL_TYPE_DATETIME, 0),
            Type::Year => (MYSQL_TYPE_YEAR, UNSIGNED_FLAG),
            Type::Decimal => (MYSQL_TYPE_NEWDECIMAL, 0),
            Type::Text => (MYSQL_TYPE_BLOB, 0),
            Type::Blob => (MYSQL_TYPE_BLOB, BINARY_FLAG),
            Type::VarChar => (MYSQL_TYPE_VAR_STRING, 0),
            Type::VarBinary => (MYSQL_TYPE_VAR_STRING, BINARY_FLAG),
            Type::Char => (MYSQL_TYPE_STRING, 0),
            Type::Binary => (MYSQL_TYPE_STRING, BINARY_FLAG),
            Type::Bit => (MYSQL_TYPE_BIT, 0),
            Type::Enum => (MYSQL_TYPE_STRING, ENUM_FLAG),
            Type::Set => (MYSQL_TYPE_STRING, SET_FLAG),
            Type::Geometry => (MYSQL_TYPE_GEOMETRY, 0),
            Type::Json => (MYSQL_TYPE_JSON, 0),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Type {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Type> {
        Type::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProxyError::classification(format!("unknown type name: {}", s)))
    }
}

/// Storage size class of TEXT/BLOB columns, derived from the declared byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LobSize {
    Tiny,
    Regular,
    Medium,
    Long,
}

impl LobSize {
    /// Classify by maximum byte length.
    pub fn from_byte_length(len: u32) -> LobSize {
        match len {
            0..=0xFF => LobSize::Tiny,
            0x100..=0xFFFF => LobSize::Regular,
            0x1_0000..=0xFF_FFFF => LobSize::Medium,
            _ => LobSize::Long,
        }
    }

    /// Classify a column length reported in bytes for a collation that uses
    /// up to `bytes_per_char` bytes per character.
    pub fn from_column_length(column_length: u32, bytes_per_char: u32) -> LobSize {
        LobSize::from_byte_length(column_length / bytes_per_char.max(1))
    }

    pub fn max_bytes(&self) -> u32 {
        match self {
            LobSize::Tiny => 0xFF,
            LobSize::Regular => 0xFFFF,
            LobSize::Medium => 0xFF_FFFF,
            LobSize::Long => u32::MAX,
        }
    }

    /// The precise wire code for this size class.
    pub fn type_code(&self) -> u8 {
        match self {
            LobSize::Tiny => MYSQL_TYPE_TINY_BLOB,
            LobSize::Regular => MYSQL_TYPE_BLOB,
            LobSize::Medium => MYSQL_TYPE_MEDIUM_BLOB,
            LobSize::Long => MYSQL_TYPE_LONG_BLOB,
        }
    }

    pub fn sql_name(&self, text: bool) -> &'static str {
        match (self, text) {
            (LobSize::Tiny, true) => "tinytext",
            (LobSize::Regular, true) => "text",
            (LobSize::Medium, true) => "mediumtext",
            (LobSize::Long, true) => "longtext",
            (LobSize::Tiny, false) => "tinyblob",
            (LobSize::Regular, false) => "blob",
            (LobSize::Medium, false) => "mediumblob",
            (LobSize::Long, false) => "longblob",
        }
    }
}
