// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Flag Resolver
//!
//! Computes the column-definition flag word the engine would report for a
//! column of a given type and declaration.

use crate::types::Type;
use proxy_common::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Column definition flags, bit positions as documented by the protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnFlags(pub u16);

impl ColumnFlags {
    pub const NONE: Self = ColumnFlags(0);
    pub const NOT_NULL: Self = ColumnFlags(NOT_NULL_FLAG);
    pub const PRI_KEY: Self = ColumnFlags(PRI_KEY_FLAG);
    pub const UNIQUE_KEY: Self = ColumnFlags(UNIQUE_KEY_FLAG);
    pub const MULTIPLE_KEY: Self = ColumnFlags(MULTIPLE_KEY_FLAG);
    pub const BLOB: Self = ColumnFlags(BLOB_FLAG);
    pub const UNSIGNED: Self = ColumnFlags(UNSIGNED_FLAG);
    pub const ZEROFILL: Self = ColumnFlags(ZEROFILL_FLAG);
    pub const BINARY: Self = ColumnFlags(BINARY_FLAG);
    pub const ENUM: Self = ColumnFlags(ENUM_FLAG);
    pub const AUTO_INCREMENT: Self = ColumnFlags(AUTO_INCREMENT_FLAG);
    pub const TIMESTAMP: Self = ColumnFlags(TIMESTAMP_FLAG);
    pub const SET: Self = ColumnFlags(SET_FLAG);
    pub const NO_DEFAULT_VALUE: Self = ColumnFlags(NO_DEFAULT_VALUE_FLAG);
    pub const ON_UPDATE_NOW: Self = ColumnFlags(ON_UPDATE_NOW_FLAG);
    pub const PART_KEY: Self = ColumnFlags(PART_KEY_FLAG);
    pub const NUM: Self = ColumnFlags(NUM_FLAG);

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn contains(&self, other: ColumnFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ColumnFlags) {
        self.0 |= other.0;
    }

    pub fn set(&mut self, other: ColumnFlags, on: bool) {
        if on {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    /// Flags are consistent when ENUM and SET are not both present.
    pub fn is_consistent(&self) -> bool {
        !self.contains(ColumnFlags::ENUM | ColumnFlags::SET)
    }
}

impl BitOr for ColumnFlags {
    type Output = ColumnFlags;

    fn bitor(self, rhs: ColumnFlags) -> ColumnFlags {
        ColumnFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ColumnFlags {
    fn bitor_assign(&mut self, rhs: ColumnFlags) {
        self.0 |= rhs.0;
    }
}

impl From<u16> for ColumnFlags {
    fn from(bits: u16) -> Self {
        ColumnFlags(bits)
    }
}

impl fmt::Display for ColumnFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index participation of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyRole {
    #[default]
    None,
    Primary,
    Unique,
    /// Non-unique index
    Multiple,
}

/// Whether a result column reads a stored column or a computed expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnOrigin {
    #[default]
    Table,
    Expression,
}

/// Declaration attributes that drive the flag word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnAttributes {
    pub nullable: bool,
    pub key: KeyRole,
    pub zerofill: bool,
    pub auto_increment: bool,
    pub origin: ColumnOrigin,
}

impl ColumnAttributes {
    pub fn nullable() -> Self {
        Self {
            nullable: true,
            ..Self::default()
        }
    }

    pub fn primary_key() -> Self {
        Self {
            nullable: false,
            key: KeyRole::Primary,
            ..Self::default()
        }
    }

    pub fn expression() -> Self {
        Self {
            nullable: true,
            origin: ColumnOrigin::Expression,
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: KeyRole) -> Self {
        self.key = key;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_zerofill(mut self, zerofill: bool) -> Self {
        self.zerofill = zerofill;
        self
    }

    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }
}

/// Resolve the flag word for a column of `ty`.
///
/// Expression columns over numeric values carry BINARY_FLAG next to
/// UNSIGNED_FLAG, mirroring what MySQL 5.7 reports for aggregates such as
/// `max(bigint unsigned)`. Classification ignores that bit for numeric
/// types (see `Type::from_mysql`).
pub fn resolve_flags(ty: Type, attrs: &ColumnAttributes) -> ColumnFlags {
    let mut flags = ColumnFlags::NONE;

    flags.set(ColumnFlags::NOT_NULL, !attrs.nullable && ty != Type::NullType);

    match attrs.key {
        KeyRole::None => {}
        KeyRole::Primary => flags |= ColumnFlags::PRI_KEY | ColumnFlags::PART_KEY,
        KeyRole::Unique => flags |= ColumnFlags::UNIQUE_KEY | ColumnFlags::PART_KEY,
        KeyRole::Multiple => flags |= ColumnFlags::MULTIPLE_KEY | ColumnFlags::PART_KEY,
    }

    flags.set(ColumnFlags::BLOB, ty.is_blob_like());
    flags.set(ColumnFlags::UNSIGNED, ty.is_unsigned() || ty == Type::Bit);
    flags.set(ColumnFlags::ZEROFILL, attrs.zerofill || ty == Type::Year);

    let binary = ty.is_binary()
        || matches!(
            ty,
            Type::Date
                | Type::Time
                | Type::Datetime
                | Type::Timestamp
                | Type::Geometry
                | Type::Json
                | Type::NullType
        )
        || (attrs.origin == ColumnOrigin::Expression && ty.is_number());
    flags.set(ColumnFlags::BINARY, binary);

    flags.set(ColumnFlags::ENUM, ty == Type::Enum);
    flags.set(ColumnFlags::SET, ty == Type::Set);
    flags.set(ColumnFlags::AUTO_INCREMENT, attrs.auto_increment);
    flags.set(ColumnFlags::TIMESTAMP, ty == Type::Timestamp);
    flags.set(ColumnFlags::NUM, ty.is_number() || ty == Type::NullType);

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_primary_key() {
        let flags = resolve_flags(Type::Int32, &ColumnAttributes::primary_key());
        assert_eq!(flags.bits(), 49155);
    }

    #[test]
    fn test_unsigned_integers() {
        for ty in [Type::Uint8, Type::Uint16, Type::Uint24, Type::Uint32, Type::Uint64] {
            assert_eq!(resolve_flags(ty, &ColumnAttributes::nullable()).bits(), 32800, "{}", ty);
        }
        for ty in [Type::Int8, Type::Int16, Type::Int24, Type::Int32, Type::Int64] {
            assert_eq!(resolve_flags(ty, &ColumnAttributes::nullable()).bits(), 32768, "{}", ty);
        }
    }

    #[test]
    fn test_year_is_unsigned_zerofill() {
        assert_eq!(resolve_flags(Type::Year, &ColumnAttributes::nullable()).bits(), 32864);
    }

    #[test]
    fn test_aggregate_over_unsigned() {
        let flags = resolve_flags(Type::Uint64, &ColumnAttributes::expression());
        assert_eq!(flags.bits(), 32928);
        assert!(flags.contains(ColumnFlags::UNSIGNED | ColumnFlags::BINARY));
    }

    #[test]
    fn test_string_family() {
        let n = ColumnAttributes::nullable();
        assert_eq!(resolve_flags(Type::VarChar, &n).bits(), 0);
        assert_eq!(resolve_flags(Type::Char, &n).bits(), 0);
        assert_eq!(resolve_flags(Type::VarBinary, &n).bits(), 128);
        assert_eq!(resolve_flags(Type::Binary, &n).bits(), 128);
        assert_eq!(resolve_flags(Type::Blob, &n).bits(), 144);
        assert_eq!(resolve_flags(Type::Text, &n).bits(), 16);
        assert_eq!(resolve_flags(Type::Enum, &n).bits(), 256);
        assert_eq!(resolve_flags(Type::Set, &n).bits(), 2048);
    }

    #[test]
    fn test_varbinary_primary_key() {
        assert_eq!(resolve_flags(Type::VarBinary, &ColumnAttributes::primary_key()).bits(), 16515);
    }

    #[test]
    fn test_misc_types() {
        let n = ColumnAttributes::nullable();
        assert_eq!(resolve_flags(Type::Bit, &n).bits(), 32);
        assert_eq!(resolve_flags(Type::Date, &n).bits(), 128);
        assert_eq!(resolve_flags(Type::Datetime, &n).bits(), 128);
        assert_eq!(resolve_flags(Type::Time, &n).bits(), 128);
        assert_eq!(resolve_flags(Type::Geometry, &n).bits(), 144);
        assert_eq!(resolve_flags(Type::Json, &n).bits(), 144);
        assert_eq!(resolve_flags(Type::Float32, &n).bits(), 32768);
        assert_eq!(resolve_flags(Type::Decimal, &n).bits(), 32768);
    }

    #[test]
    fn test_null_literal() {
        let flags = resolve_flags(Type::NullType, &ColumnAttributes::expression());
        assert_eq!(flags.bits(), 32896);
    }

    #[test]
    fn test_key_roles_and_attributes() {
        let unique = ColumnAttributes::nullable().with_key(KeyRole::Unique);
        assert_eq!(
            resolve_flags(Type::Int32, &unique),
            ColumnFlags::UNIQUE_KEY | ColumnFlags::PART_KEY | ColumnFlags::NUM
        );

        let multiple = ColumnAttributes::nullable()
            .with_key(KeyRole::Multiple)
            .with_nullable(false)
            .with_auto_increment(true)
            .with_zerofill(true);
        let flags = resolve_flags(Type::Uint32, &multiple);
        assert!(flags.contains(ColumnFlags::MULTIPLE_KEY));
        assert!(flags.contains(ColumnFlags::NOT_NULL));
        assert!(flags.contains(ColumnFlags::AUTO_INCREMENT));
        assert!(flags.contains(ColumnFlags::ZEROFILL));
    }

    #[test]
    fn test_timestamp_flag() {
        let flags = resolve_flags(Type::Timestamp, &ColumnAttributes::default());
        assert!(flags.contains(ColumnFlags::TIMESTAMP | ColumnFlags::BINARY | ColumnFlags::NOT_NULL));
    }

    #[test]
    fn test_resolved_flags_are_consistent() {
        for ty in Type::ALL {
            assert!(resolve_flags(ty, &ColumnAttributes::nullable()).is_consistent(), "{}", ty);
        }
        assert!(!(ColumnFlags::ENUM | ColumnFlags::SET).is_consistent());
    }
}
