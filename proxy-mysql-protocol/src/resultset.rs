// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Result Set Encoding
//!
//! Text-protocol result sets in both directions:
//! 1. Column count packet
//! 2. Column definition packets (one per column)
//! 3. EOF packet (if not CLIENT_DEPRECATE_EOF)
//! 4. Row data packets
//! 5. EOF, or an EOF-headed OK packet under CLIENT_DEPRECATE_EOF
//!
//! A statement without a result set is answered by a single OK packet.

use crate::column::ColumnDefinition;
use crate::constants::*;
use crate::packet::{decode_err, read_lenenc_int, read_lenenc_string, write_lenenc_int, write_lenenc_string, EofPacket, OkPacket, Packet};
use bytes::Bytes;
use proxy_common::{EngineError, ProxyError, Result};
use proxy_sqltypes::{codec, QueryResult};
use std::io::Cursor;

/// Text protocol row data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResultRow {
    pub values: Vec<Option<Bytes>>,
}

impl TextResultRow {
    pub fn new(values: Vec<Option<Bytes>>) -> Self {
        Self { values }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        for value in &self.values {
            match value {
                Some(data) => write_lenenc_string(&mut payload, data),
                None => payload.push(NULL_MARKER),
            }
        }
        payload
    }

    pub fn to_packet(&self, sequence_id: u8) -> Packet {
        Packet::new(sequence_id, self.encode())
    }

    pub fn decode(payload: &[u8], column_count: usize) -> Result<Self> {
        let mut cursor = Cursor::new(payload);
        let mut values = Vec::with_capacity(column_count);

        for i in 0..column_count {
            let pos = cursor.position() as usize;
            if payload.get(pos) == Some(&NULL_MARKER) {
                cursor.set_position(pos as u64 + 1);
                values.push(None);
                continue;
            }
            let data = read_lenenc_string(&mut cursor)
                .map_err(|e| ProxyError::invalid_packet(format!("row value {}: {}", i, e)))?;
            values.push(Some(Bytes::from(data)));
        }

        if cursor.position() as usize != payload.len() {
            return Err(ProxyError::invalid_packet(format!(
                "row carries {} trailing bytes after {} values",
                payload.len() - cursor.position() as usize,
                column_count
            )));
        }
        Ok(Self { values })
    }
}

/// Result set builder
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<ColumnDefinition>,
    rows: Vec<TextResultRow>,
    rows_affected: u64,
    insert_id: u64,
    status_flags: u16,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query_result(result: &QueryResult) -> Self {
        Self {
            columns: result.fields.iter().map(ColumnDefinition::from_field).collect(),
            rows: result
                .rows
                .iter()
                .map(|row| TextResultRow::new(row.iter().map(codec::encode).collect()))
                .collect(),
            rows_affected: result.rows_affected,
            insert_id: result.insert_id,
            status_flags: result.status_flags,
        }
    }

    pub fn add_column(&mut self, column: ColumnDefinition) {
        self.columns.push(column);
    }

    pub fn add_row(&mut self, row: TextResultRow) {
        self.rows.push(row);
    }

    pub fn set_status_flags(&mut self, status_flags: u16) {
        self.status_flags = status_flags;
    }

    /// Encode entire result set to packets for a client with the given
    /// capability flags.
    pub fn to_packets(&self, mut sequence_id: u8, capabilities: u32) -> Vec<Packet> {
        let deprecate_eof = capabilities & CLIENT_DEPRECATE_EOF != 0;
        let mut packets = Vec::with_capacity(self.columns.len() + self.rows.len() + 3);
        let mut next = |payload: Vec<u8>| {
            let packet = Packet::new(sequence_id, payload);
            sequence_id = sequence_id.wrapping_add(1);
            packet
        };

        if self.columns.is_empty() {
            let ok = OkPacket {
                header: OK_HEADER,
                affected_rows: self.rows_affected,
                last_insert_id: self.insert_id,
                status_flags: self.status_flags,
                warnings: 0,
            };
            packets.push(next(ok.encode()));
            return packets;
        }

        let mut count = Vec::new();
        write_lenenc_int(&mut count, self.columns.len() as u64);
        packets.push(next(count));

        for column in &self.columns {
            packets.push(next(column.encode()));
        }

        if !deprecate_eof {
            packets.push(next(Packet::eof(0, self.status_flags, 0).payload));
        }

        for row in &self.rows {
            packets.push(next(row.encode()));
        }

        let terminator = if deprecate_eof {
            Packet::eof_ok(self.status_flags, 0, 0)
        } else {
            Packet::eof(0, self.status_flags, 0)
        };
        packets.push(next(terminator.payload));

        packets
    }
}

/// What the engine answered to a query
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Result(QueryResult),
    Error(EngineError),
}

/// Decode a complete text-protocol response sent to a client with the given
/// capability flags. Column definitions are classified through the type
/// registry and row values through the value codec.
pub fn decode_response(packets: &[Packet], capabilities: u32) -> Result<Response> {
    if capabilities & CLIENT_PROTOCOL_41 == 0 {
        return Err(ProxyError::invalid_packet("only protocol 4.1 responses are supported"));
    }
    let deprecate_eof = capabilities & CLIENT_DEPRECATE_EOF != 0;
    let mut iter = packets.iter();
    let first = iter
        .next()
        .ok_or_else(|| ProxyError::invalid_packet("empty response"))?;

    if first.is_err() {
        let error = decode_err(&first.payload)?;
        tracing::debug!(code = error.code, sql_state = %error.sql_state, "engine returned an error");
        return Ok(Response::Error(error));
    }
    if first.is_ok() {
        let ok = OkPacket::decode(&first.payload)?;
        return Ok(Response::Result(QueryResult {
            rows_affected: ok.affected_rows,
            insert_id: ok.last_insert_id,
            status_flags: ok.status_flags,
            ..Default::default()
        }));
    }

    let column_count = read_lenenc_int(&mut Cursor::new(&first.payload[..]))
        .map_err(|e| ProxyError::invalid_packet(format!("column count: {}", e)))?;
    if column_count > MAX_COLUMNS || column_count >= packets.len() as u64 {
        return Err(ProxyError::invalid_packet(format!(
            "column count {} exceeds what {} packets can describe",
            column_count,
            packets.len()
        )));
    }
    let column_count = column_count as usize;

    let mut fields = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        let packet = iter
            .next()
            .ok_or_else(|| ProxyError::invalid_packet("missing column definition"))?;
        fields.push(ColumnDefinition::decode(&packet.payload)?.to_field()?);
    }

    if !deprecate_eof {
        let eof = iter
            .next()
            .ok_or_else(|| ProxyError::invalid_packet("missing EOF after column definitions"))?;
        if !eof.is_eof() {
            return Err(ProxyError::invalid_packet("expected EOF after column definitions"));
        }
    }

    let mut raw_rows = Vec::new();
    let status_flags = loop {
        let packet = iter
            .next()
            .ok_or_else(|| ProxyError::invalid_packet("result set is not terminated"))?;
        if packet.is_err() {
            return Ok(Response::Error(decode_err(&packet.payload)?));
        }
        if packet.is_result_terminator(deprecate_eof) {
            break if deprecate_eof {
                OkPacket::decode(&packet.payload)?.status_flags
            } else {
                EofPacket::decode(&packet.payload)?.status_flags
            };
        }
        raw_rows.push(TextResultRow::decode(&packet.payload, column_count)?.values);
    };

    if iter.next().is_some() {
        return Err(ProxyError::invalid_packet("packets after result set terminator"));
    }

    let result = QueryResult::from_raw_rows(fields, &raw_rows)?.with_status(status_flags);
    Ok(Response::Result(result))
}
