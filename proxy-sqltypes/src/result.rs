// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

use crate::codec;
use crate::field::Field;
use crate::types::Type;
use crate::value::Value;
use bytes::Bytes;
use proxy_common::constants::{SERVER_STATUS_AUTOCOMMIT, SERVER_STATUS_NO_INDEX_USED};
use proxy_common::{ProxyError, Result};

/// Query result: column descriptors, rows, affected/insert counters and
/// the server status flags that accompanied the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub fields: Vec<Field>,
    pub rows: Vec<Vec<Value>>,
    pub rows_affected: u64,
    pub insert_id: u64,
    pub status_flags: u16,
}

impl QueryResult {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<Value>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_status(mut self, status_flags: u16) -> Self {
        self.status_flags = status_flags;
        self
    }

    /// Status reported for a plain SELECT without an index in autocommit mode.
    pub fn unindexed_select_status() -> u16 {
        SERVER_STATUS_NO_INDEX_USED | SERVER_STATUS_AUTOCOMMIT
    }

    /// Build a result from raw row bytes. Any column that fails to decode
    /// fails the whole result.
    pub fn from_raw_rows(fields: Vec<Field>, raw_rows: &[Vec<Option<Bytes>>]) -> Result<Self> {
        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw in raw_rows {
            let row = codec::decode_row(&fields, raw)?
                .into_iter()
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }
        Ok(Self::new(fields).with_rows(rows))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.rows.is_empty()
    }

    pub fn status_contains(&self, flag: u16) -> bool {
        self.status_flags & flag == flag
    }

    /// Every row has one value per field and every non-NULL value carries
    /// its field's Type, or Blob where the field is a JSON column that the
    /// engine reported as a blob alias.
    pub fn validate(&self) -> Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.fields.len() {
                return Err(ProxyError::decode(format!(
                    "row {} has {} values for {} fields",
                    i,
                    row.len(),
                    self.fields.len()
                )));
            }
            for (field, value) in self.fields.iter().zip(row) {
                if value.is_null() || compatible(field.ty, value.ty()) {
                    continue;
                }
                return Err(ProxyError::decode(format!(
                    "row {} column {} holds a {} value for a {} field",
                    i,
                    field.name,
                    value.ty(),
                    field.ty
                )));
            }
        }
        Ok(())
    }
}

fn compatible(field: Type, value: Type) -> bool {
    field == value || (field == Type::Json && value == Type::Blob)
}
