// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Result column descriptors

use crate::charset::{CharsetResolver, Collation};
use crate::column::ColumnType;
use crate::flags::{resolve_flags, ColumnAttributes, ColumnFlags};
use crate::types::{LobSize, Type};
use proxy_common::constants::BINARY_COLLATION;
use proxy_common::{Config, ProxyError, Result};
use serde::{Deserialize, Serialize};

/// Column descriptor as reported on the wire, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub table: String,
    pub org_table: String,
    pub database: String,
    pub org_name: String,
    pub type_code: u8,
    pub column_length: u32,
    pub charset: u16,
    pub decimals: u8,
    pub flags: u16,
}

/// One result column in canonical form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub table: String,
    pub org_table: String,
    pub database: String,
    pub org_name: String,
    pub ty: Type,
    pub column_length: u32,
    pub charset: u16,
    pub decimals: u8,
    pub flags: u16,
}

/// A table column declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDecl {
    pub name: String,
    pub column_type: ColumnType,
    pub attrs: ColumnAttributes,
    pub collation: Option<Collation>,
}

impl ColumnDecl {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            attrs: ColumnAttributes::nullable(),
            collation: None,
        }
    }

    pub fn with_attrs(mut self, attrs: ColumnAttributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = Some(collation);
        self
    }
}

impl Field {
    /// Bare field of `ty`, carrying only the flags the type itself implies.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        let (_, implied) = ty.to_mysql();
        Self {
            name: name.into(),
            ty,
            charset: BINARY_COLLATION,
            flags: implied,
            ..Default::default()
        }
    }

    /// Field for a stored table column.
    pub fn from_declaration(
        database: &str,
        table: &str,
        decl: &ColumnDecl,
        charsets: &CharsetResolver,
    ) -> Result<Field> {
        decl.column_type.validate()?;

        let ty = decl.column_type.canonical_type();
        let collation = charsets.resolve(ty, decl.collation);

        Ok(Field {
            name: decl.name.clone(),
            table: table.to_string(),
            org_table: table.to_string(),
            database: database.to_string(),
            org_name: decl.name.clone(),
            ty,
            column_length: decl.column_type.column_length(collation),
            charset: collation.id(),
            decimals: decl.column_type.decimals(),
            flags: resolve_flags(ty, &decl.attrs).bits(),
        })
    }

    /// Field for a column of `table` in the configured database, resolving
    /// text collations against the configured default.
    pub fn from_config_declaration(config: &Config, table: &str, decl: &ColumnDecl) -> Result<Field> {
        Self::from_declaration(&config.database, table, decl, &CharsetResolver::from_config(config))
    }

    /// Field for a computed expression (aggregates, literals).
    pub fn from_expression(
        name: impl Into<String>,
        column_type: &ColumnType,
        charsets: &CharsetResolver,
    ) -> Field {
        let ty = column_type.canonical_type();
        let collation = charsets.resolve(ty, None);
        Field {
            name: name.into(),
            ty,
            column_length: column_type.column_length(collation),
            charset: collation.id(),
            decimals: column_type.decimals(),
            flags: resolve_flags(ty, &ColumnAttributes::expression()).bits(),
            ..Default::default()
        }
    }

    /// Classify a wire descriptor.
    pub fn from_raw(raw: &RawColumn) -> Result<Field> {
        let ty = Type::from_mysql(raw.type_code, raw.flags).map_err(|e| {
            tracing::warn!(column = %raw.name, type_code = raw.type_code, "cannot classify column");
            e
        })?;

        Ok(Field {
            name: raw.name.clone(),
            table: raw.table.clone(),
            org_table: raw.org_table.clone(),
            database: raw.database.clone(),
            org_name: raw.org_name.clone(),
            ty,
            column_length: raw.column_length,
            charset: raw.charset,
            decimals: raw.decimals,
            flags: raw.flags,
        })
    }

    /// Wire descriptor for this field. Flags implied by the type (UNSIGNED,
    /// BINARY, ENUM, SET) are always present so the descriptor reclassifies
    /// to the same type.
    pub fn to_raw(&self) -> RawColumn {
        let (type_code, implied) = self.ty.to_mysql();
        RawColumn {
            name: self.name.clone(),
            table: self.table.clone(),
            org_table: self.org_table.clone(),
            database: self.database.clone(),
            org_name: self.org_name.clone(),
            type_code,
            column_length: self.column_length,
            charset: self.charset,
            decimals: self.decimals,
            flags: self.flags | implied,
        }
    }

    pub fn column_flags(&self) -> ColumnFlags {
        ColumnFlags(self.flags)
    }

    pub fn collation(&self) -> Collation {
        Collation(self.charset)
    }

    pub fn is_nullable(&self) -> bool {
        !self.column_flags().contains(ColumnFlags::NOT_NULL)
    }

    /// Size class of TEXT/BLOB columns, from the reported length.
    pub fn lob_size(&self) -> Option<LobSize> {
        match self.ty {
            Type::Text => Some(LobSize::from_column_length(
                self.column_length,
                self.collation().max_bytes_per_char(),
            )),
            Type::Blob => Some(LobSize::from_byte_length(self.column_length)),
            _ => None,
        }
    }

    /// Check the invariants tying charset and flags to the type.
    pub fn validate(&self) -> Result<()> {
        let binary_charset = self.charset == BINARY_COLLATION;
        if !self.ty.is_text() && !binary_charset {
            return Err(ProxyError::classification(format!(
                "column {} of type {} reports non-binary charset {}",
                self.name, self.ty, self.charset
            )));
        }
        if !self.column_flags().is_consistent() {
            return Err(ProxyError::classification(format!(
                "column {} reports both ENUM and SET flags",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LobSize;

    fn charsets() -> CharsetResolver {
        CharsetResolver::new(Collation::UTF8MB4_GENERAL_CI)
    }

    #[test]
    fn test_primary_key_int() {
        let decl = ColumnDecl::new("intval", ColumnType::int(false))
            .with_attrs(ColumnAttributes::primary_key());
        let field = Field::from_declaration("vttest", "vitess_test", &decl, &charsets()).unwrap();

        assert_eq!(field.ty, Type::Int32);
        assert_eq!(field.column_length, 11);
        assert_eq!(field.charset, 63);
        assert_eq!(field.flags, 49155);
        assert_eq!(field.org_table, "vitess_test");
        assert!(!field.is_nullable());
    }

    #[test]
    fn test_declaration_from_config() {
        let config = Config {
            database: "commerce".to_string(),
            default_collation: 33,
            ..Config::default()
        };
        let decl = ColumnDecl::new("name", ColumnType::VarChar(10));
        let field = Field::from_config_declaration(&config, "customer", &decl).unwrap();
        assert_eq!(field.database, "commerce");
        assert_eq!(field.table, "customer");
        assert_eq!(field.charset, 33);
        assert_eq!(field.column_length, 30);

        let defaults = Field::from_config_declaration(&Config::default(), "t", &decl).unwrap();
        assert_eq!(defaults.database, "vttest");
        assert_eq!(defaults.charset, 45);
    }

    #[test]
    fn test_varchar_takes_default_collation() {
        let decl = ColumnDecl::new("charval", ColumnType::VarChar(10));
        let field = Field::from_declaration("vttest", "vitess_test", &decl, &charsets()).unwrap();
        assert_eq!(field.charset, 45);
        assert_eq!(field.column_length, 40);
        assert_eq!(field.flags, 0);
    }

    #[test]
    fn test_declared_collation_ignored_for_binary() {
        let decl = ColumnDecl::new("binval", ColumnType::VarBinary(256))
            .with_collation(Collation::UTF8MB4_GENERAL_CI);
        let field = Field::from_declaration("vttest", "vitess_test", &decl, &charsets()).unwrap();
        assert_eq!(field.charset, 63);
        assert_eq!(field.flags, 128);
    }

    #[test]
    fn test_expression_fields() {
        let max = Field::from_expression("max(bigu)", &ColumnType::bigint(true), &charsets());
        assert_eq!(max.ty, Type::Uint64);
        assert_eq!(max.flags, 32928);
        assert_eq!(max.column_length, 20);
        assert!(max.table.is_empty());

        let null = Field::from_expression("NULL", &ColumnType::Null, &charsets());
        assert_eq!(null.ty, Type::NullType);
        assert_eq!(null.charset, 63);
        assert_eq!(null.flags, 32896);
        assert_eq!(null.column_length, 0);
    }

    #[test]
    fn test_raw_round_trip() {
        let decl = ColumnDecl::new("s", ColumnType::Set(vec!["a".into(), "b".into()]));
        let field = Field::from_declaration("vttest", "vitess_strings", &decl, &charsets()).unwrap();
        let raw = field.to_raw();
        assert_eq!(raw.type_code, proxy_common::constants::MYSQL_TYPE_STRING);
        assert_eq!(Field::from_raw(&raw).unwrap(), field);
    }

    #[test]
    fn test_bare_field_round_trips() {
        for ty in [Type::Uint64, Type::Year, Type::VarBinary, Type::Enum, Type::Set, Type::Int32] {
            let field = Field::new("c", ty);
            assert_eq!(field.flags, ty.to_mysql().1);
            assert_eq!(Field::from_raw(&field.to_raw()).unwrap(), field, "{}", ty);
        }
        assert_eq!(Field::new("u", Type::Uint64).flags, 32);
    }

    #[test]
    fn test_from_raw_unknown_code() {
        let raw = RawColumn {
            name: "weird".to_string(),
            type_code: 0x20,
            ..Default::default()
        };
        assert!(matches!(Field::from_raw(&raw), Err(ProxyError::Classification(_))));
    }

    #[test]
    fn test_invalid_declaration_rejected() {
        let decl = ColumnDecl::new("d", ColumnType::Decimal { precision: 1, scale: 4 });
        assert!(Field::from_declaration("vttest", "t", &decl, &charsets()).is_err());
    }

    #[test]
    fn test_lob_size_from_field() {
        let ttx = Field::from_declaration(
            "vttest",
            "vitess_strings",
            &ColumnDecl::new("ttx", ColumnType::Text(LobSize::Tiny)),
            &charsets(),
        )
        .unwrap();
        assert_eq!(ttx.lob_size(), Some(LobSize::Tiny));

        let bl = Field::from_declaration(
            "vttest",
            "vitess_strings",
            &ColumnDecl::new("bl", ColumnType::Blob(LobSize::Regular)),
            &charsets(),
        )
        .unwrap();
        assert_eq!(bl.lob_size(), Some(LobSize::Regular));
        assert_eq!(Field::new("x", Type::Int32).lob_size(), None);
    }

    #[test]
    fn test_validate_charset_invariant() {
        let mut field = Field::new("n", Type::Int64);
        assert!(field.validate().is_ok());
        field.charset = 45;
        assert!(field.validate().is_err());

        let mut text = Field::new("t", Type::VarChar);
        text.charset = 45;
        text.flags = (ColumnFlags::ENUM | ColumnFlags::SET).bits();
        assert!(text.validate().is_err());
    }
}
