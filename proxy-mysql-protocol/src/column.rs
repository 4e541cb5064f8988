// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! ColumnDefinition41 packets

use crate::constants::*;
use crate::packet::{read_lenenc_int, read_lenenc_string, write_lenenc_int, write_lenenc_string, Packet};
use byteorder::{LittleEndian, ReadBytesExt};
use bytes::BufMut;
use proxy_common::{ProxyError, Result};
use proxy_sqltypes::{Field, RawColumn};
use std::io::Cursor;

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub org_table: String,
    pub name: String,
    pub org_name: String,
    pub character_set: u16,
    pub column_length: u32,
    pub column_type: u8,
    pub flags: u16,
    pub decimals: u8,
}

impl ColumnDefinition {
    pub fn from_raw(raw: &RawColumn) -> Self {
        Self {
            catalog: DEFAULT_CATALOG.to_string(),
            schema: raw.database.clone(),
            table: raw.table.clone(),
            org_table: raw.org_table.clone(),
            name: raw.name.clone(),
            org_name: raw.org_name.clone(),
            character_set: raw.charset,
            column_length: raw.column_length,
            column_type: raw.type_code,
            flags: raw.flags,
            decimals: raw.decimals,
        }
    }

    pub fn from_field(field: &Field) -> Self {
        Self::from_raw(&field.to_raw())
    }

    pub fn to_raw(&self) -> RawColumn {
        RawColumn {
            name: self.name.clone(),
            table: self.table.clone(),
            org_table: self.org_table.clone(),
            database: self.schema.clone(),
            org_name: self.org_name.clone(),
            type_code: self.column_type,
            column_length: self.column_length,
            charset: self.character_set,
            decimals: self.decimals,
            flags: self.flags,
        }
    }

    /// Classify through the type registry.
    pub fn to_field(&self) -> Result<Field> {
        Field::from_raw(&self.to_raw())
    }

    /// Encode to packet payload (Protocol 4.1)
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(64);

        write_lenenc_string(&mut payload, self.catalog.as_bytes());
        write_lenenc_string(&mut payload, self.schema.as_bytes());
        write_lenenc_string(&mut payload, self.table.as_bytes());
        write_lenenc_string(&mut payload, self.org_table.as_bytes());
        write_lenenc_string(&mut payload, self.name.as_bytes());
        write_lenenc_string(&mut payload, self.org_name.as_bytes());

        write_lenenc_int(&mut payload, COLUMN_FIXED_FIELDS_LEN);
        payload.put_u16_le(self.character_set);
        payload.put_u32_le(self.column_length);
        payload.put_u8(self.column_type);
        payload.put_u16_le(self.flags);
        payload.put_u8(self.decimals);
        payload.put_u16_le(0); // filler

        payload
    }

    pub fn to_packet(&self, sequence_id: u8) -> Packet {
        Packet::new(sequence_id, self.encode())
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(payload);
        let mut text = |what: &str| -> Result<String> {
            let raw = read_lenenc_string(&mut cursor)
                .map_err(|e| ProxyError::invalid_packet(format!("column definition {}: {}", what, e)))?;
            Ok(String::from_utf8_lossy(&raw).into_owned())
        };

        let catalog = text("catalog")?;
        let schema = text("schema")?;
        let table = text("table")?;
        let org_table = text("org_table")?;
        let name = text("name")?;
        let org_name = text("org_name")?;

        let fixed = |e: std::io::Error| ProxyError::invalid_packet(format!("column definition fixed fields: {}", e));
        let fixed_len = read_lenenc_int(&mut cursor).map_err(fixed)?;
        if fixed_len != COLUMN_FIXED_FIELDS_LEN {
            return Err(ProxyError::invalid_packet(format!(
                "column definition fixed block of {} bytes",
                fixed_len
            )));
        }
        let character_set = cursor.read_u16::<LittleEndian>().map_err(fixed)?;
        let column_length = cursor.read_u32::<LittleEndian>().map_err(fixed)?;
        let column_type = cursor.read_u8().map_err(fixed)?;
        let flags = cursor.read_u16::<LittleEndian>().map_err(fixed)?;
        let decimals = cursor.read_u8().map_err(fixed)?;

        Ok(Self {
            catalog,
            schema,
            table,
            org_table,
            name,
            org_name,
            character_set,
            column_length,
            column_type,
            flags,
            decimals,
        })
    }
}
