// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Declared column types
//!
//! A declared SQL column type determines the canonical Type together with the
//! display length and decimals the engine reports for it.

use crate::charset::Collation;
use crate::types::{LobSize, Type};
use proxy_common::constants::NOT_FIXED_DEC;
use proxy_common::{ProxyError, Result};
use serde::{Deserialize, Serialize};

/// Integer storage width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntWidth {
    Tiny,
    Small,
    Medium,
    Int,
    Big,
}

/// SQL type as written in a column declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer { width: IntWidth, unsigned: bool },
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Char(u32),
    VarChar(u32),
    Binary(u32),
    VarBinary(u32),
    Text(LobSize),
    Blob(LobSize),
    Enum(Vec<String>),
    Set(Vec<String>),
    Bit(u8),
    Date,
    Datetime(u8),
    Time(u8),
    Timestamp(u8),
    Year,
    Geometry,
    Json,
    Null,
}

impl ColumnType {
    pub fn int(unsigned: bool) -> Self {
        ColumnType::Integer { width: IntWidth::Int, unsigned }
    }

    pub fn bigint(unsigned: bool) -> Self {
        ColumnType::Integer { width: IntWidth::Big, unsigned }
    }

    pub fn canonical_type(&self) -> Type {
        match self {
            ColumnType::Integer { width, unsigned } => match (width, unsigned) {
                (IntWidth::Tiny, false) => Type::Int8,
                (IntWidth::Tiny, true) => Type::Uint8,
                (IntWidth::Small, false) => Type::Int16,
                (IntWidth::Small, true) => Type::Uint16,
                (IntWidth::Medium, false) => Type::Int24,
                (IntWidth::Medium, true) => Type::Uint24,
                (IntWidth::Int, false) => Type::Int32,
                (IntWidth::Int, true) => Type::Uint32,
                (IntWidth::Big, false) => Type::Int64,
                (IntWidth::Big, true) => Type::Uint64,
            },
            ColumnType::Float => Type::Float32,
            ColumnType::Double => Type::Float64,
            ColumnType::Decimal { .. } => Type::Decimal,
            ColumnType::Char(_) => Type::Char,
            ColumnType::VarChar(_) => Type::VarChar,
            ColumnType::Binary(_) => Type::Binary,
            ColumnType::VarBinary(_) => Type::VarBinary,
            ColumnType::Text(_) => Type::Text,
            ColumnType::Blob(_) => Type::Blob,
            ColumnType::Enum(_) => Type::Enum,
            ColumnType::Set(_) => Type::Set,
            ColumnType::Bit(_) => Type::Bit,
            ColumnType::Date => Type::Date,
            ColumnType::Datetime(_) => Type::Datetime,
            ColumnType::Time(_) => Type::Time,
            ColumnType::Timestamp(_) => Type::Timestamp,
            ColumnType::Year => Type::Year,
            ColumnType::Geometry => Type::Geometry,
            ColumnType::Json => Type::Json,
            ColumnType::Null => Type::NullType,
        }
    }

    /// Reject declarations the engine itself would refuse.
    pub fn validate(&self) -> Result<()> {
        match self {
            ColumnType::Decimal { precision, scale } => {
                if *precision == 0 || *precision > 65 || scale > precision || *scale > 30 {
                    return Err(ProxyError::classification(format!(
                        "invalid DECIMAL({}, {})",
                        precision, scale
                    )));
                }
            }
            ColumnType::Char(n) | ColumnType::Binary(n) if *n > 255 => {
                return Err(ProxyError::classification(format!(
                    "fixed-length column of {} exceeds 255",
                    n
                )));
            }
            ColumnType::Bit(n) if *n == 0 || *n > 64 => {
                return Err(ProxyError::classification(format!("invalid BIT({})", n)));
            }
            ColumnType::Datetime(fsp) | ColumnType::Time(fsp) | ColumnType::Timestamp(fsp)
                if *fsp > 6 =>
            {
                return Err(ProxyError::classification(format!(
                    "fractional seconds precision {} exceeds 6",
                    fsp
                )));
            }
            ColumnType::Enum(members) | ColumnType::Set(members) if members.is_empty() => {
                return Err(ProxyError::classification(
                    "ENUM/SET declared without members".to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    /// Display length reported in the column definition, in bytes.
    pub fn column_length(&self, collation: Collation) -> u32 {
        let per_char = collation.max_bytes_per_char();
        let chars = |n: u32| n.saturating_mul(per_char);
        let with_fsp = |base: u32, fsp: u8| if fsp > 0 { base + 1 + fsp as u32 } else { base };

        match self {
            ColumnType::Integer { width, unsigned } => match (width, unsigned) {
                (IntWidth::Tiny, false) => 4,
                (IntWidth::Tiny, true) => 3,
                (IntWidth::Small, false) => 6,
                (IntWidth::Small, true) => 5,
                (IntWidth::Medium, false) => 9,
                (IntWidth::Medium, true) => 8,
                (IntWidth::Int, false) => 11,
                (IntWidth::Int, true) => 10,
                (IntWidth::Big, _) => 20,
            },
            ColumnType::Float => 12,
            ColumnType::Double => 22,
            ColumnType::Decimal { precision, scale } => {
                // digits, decimal point when scaled, sign
                *precision as u32 + u32::from(*scale > 0) + 1
            }
            ColumnType::Char(n) | ColumnType::VarChar(n) => chars(*n),
            ColumnType::Binary(n) | ColumnType::VarBinary(n) => *n,
            ColumnType::Text(size) => chars(size.max_bytes()),
            ColumnType::Blob(size) => size.max_bytes(),
            ColumnType::Enum(members) => {
                let longest = members.iter().map(|m| m.chars().count() as u32).max().unwrap_or(0);
                chars(longest)
            }
            ColumnType::Set(members) => {
                let total: u32 = members.iter().map(|m| m.chars().count() as u32).sum();
                let separators = members.len().saturating_sub(1) as u32;
                chars(total + separators)
            }
            ColumnType::Bit(n) => *n as u32,
            ColumnType::Date => 10,
            ColumnType::Datetime(fsp) | ColumnType::Timestamp(fsp) => with_fsp(19, *fsp),
            ColumnType::Time(fsp) => with_fsp(10, *fsp),
            ColumnType::Year => 4,
            ColumnType::Geometry | ColumnType::Json => u32::MAX,
            ColumnType::Null => 0,
        }
    }

    /// Decimals reported in the column definition.
    pub fn decimals(&self) -> u8 {
        match self {
            ColumnType::Float | ColumnType::Double => NOT_FIXED_DEC,
            ColumnType::Decimal { scale, .. } => *scale,
            ColumnType::Datetime(fsp) | ColumnType::Time(fsp) | ColumnType::Timestamp(fsp) => *fsp,
            _ => 0,
        }
    }

    /// SQL spelling of the declaration, e.g. `varchar(10)` or `mediumblob`.
    pub fn sql_name(&self) -> String {
        let int_name = |width: &IntWidth| match width {
            IntWidth::Tiny => "tinyint",
            IntWidth::Small => "smallint",
            IntWidth::Medium => "mediumint",
            IntWidth::Int => "int",
            IntWidth::Big => "bigint",
        };
        let quoted = |members: &[String]| {
            members
                .iter()
                .map(|m| format!("'{}'", m.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(",")
        };

        match self {
            ColumnType::Integer { width, unsigned: false } => int_name(width).to_string(),
            ColumnType::Integer { width, unsigned: true } => format!("{} unsigned", int_name(width)),
            ColumnType::Float => "float".to_string(),
            ColumnType::Double => "double".to_string(),
            ColumnType::Decimal { precision, scale } => format!("decimal({},{})", precision, scale),
            ColumnType::Char(n) => format!("char({})", n),
            ColumnType::VarChar(n) => format!("varchar({})", n),
            ColumnType::Binary(n) => format!("binary({})", n),
            ColumnType::VarBinary(n) => format!("varbinary({})", n),
            ColumnType::Text(size) => size.sql_name(true).to_string(),
            ColumnType::Blob(size) => size.sql_name(false).to_string(),
            ColumnType::Enum(members) => format!("enum({})", quoted(members)),
            ColumnType::Set(members) => format!("set({})", quoted(members)),
            ColumnType::Bit(n) => format!("bit({})", n),
            ColumnType::Date => "date".to_string(),
            ColumnType::Datetime(0) => "datetime".to_string(),
            ColumnType::Datetime(fsp) => format!("datetime({})", fsp),
            ColumnType::Time(0) => "time".to_string(),
            ColumnType::Time(fsp) => format!("time({})", fsp),
            ColumnType::Timestamp(0) => "timestamp".to_string(),
            ColumnType::Timestamp(fsp) => format!("timestamp({})", fsp),
            ColumnType::Year => "year".to_string(),
            ColumnType::Geometry => "geometry".to_string(),
            ColumnType::Json => "json".to_string(),
            ColumnType::Null => "null".to_string(),
        }
    }
}
