// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Protocol Packet Framing
//!
//! MySQL wire protocol uses this packet format:
//! ```text
//! [3 bytes: payload length]
//! [1 byte: sequence number]
//! [N bytes: payload]
//! ```

use crate::constants::*;
use byteorder::{LittleEndian, ReadBytesExt};
use bytes::BufMut;
use proxy_common::{EngineError, ProxyError, Result};
use std::io::{self, Cursor, Read, Write};

/// MySQL packet header (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub payload_length: u32, // 3 bytes on the wire
    pub sequence_id: u8,
}

impl PacketHeader {
    pub const SIZE: usize = 4;
    pub const MAX_PAYLOAD_LEN: u32 = 0xFFFFFF;

    pub fn new(payload_length: u32, sequence_id: u8) -> Self {
        Self {
            payload_length: payload_length.min(Self::MAX_PAYLOAD_LEN),
            sequence_id,
        }
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let payload_length = reader.read_u24::<LittleEndian>()?;
        let sequence_id = reader.read_u8()?;
        Ok(Self::new(payload_length, sequence_id))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let len_bytes = self.payload_length.to_le_bytes();
        writer.write_all(&len_bytes[0..3])?;
        writer.write_all(&[self.sequence_id])
    }
}

/// MySQL packet (header + payload)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub sequence_id: u8,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn new(sequence_id: u8, payload: Vec<u8>) -> Self {
        Self { sequence_id, payload }
    }

    /// Read a complete logical packet, joining continuation frames of a
    /// payload of 16MB or more.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let header = PacketHeader::read_from(reader)?;
        let mut payload = vec![0u8; header.payload_length as usize];
        reader.read_exact(&mut payload)?;

        let mut last_len = header.payload_length;
        while last_len == PacketHeader::MAX_PAYLOAD_LEN {
            let next = PacketHeader::read_from(reader)?;
            let start = payload.len();
            payload.resize(start + next.payload_length as usize, 0);
            reader.read_exact(&mut payload[start..])?;
            last_len = next.payload_length;
        }

        Ok(Self::new(header.sequence_id, payload))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.payload.len() >= PacketHeader::MAX_PAYLOAD_LEN as usize {
            return self.write_large_packet(writer);
        }

        let header = PacketHeader::new(self.payload.len() as u32, self.sequence_id);
        header.write_to(writer)?;
        writer.write_all(&self.payload)?;
        writer.flush()
    }

    /// Split into 16MB frames; a payload that is an exact multiple of the
    /// frame size ends with an empty frame.
    fn write_large_packet<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let max = PacketHeader::MAX_PAYLOAD_LEN as usize;
        let mut seq = self.sequence_id;

        for chunk in self.payload.chunks(max) {
            PacketHeader::new(chunk.len() as u32, seq).write_to(writer)?;
            writer.write_all(chunk)?;
            seq = seq.wrapping_add(1);
        }
        if self.payload.len() % max == 0 {
            PacketHeader::new(0, seq).write_to(writer)?;
        }

        writer.flush()
    }

    pub fn ok(affected_rows: u64, last_insert_id: u64, status_flags: u16, warnings: u16, sequence_id: u8) -> Self {
        Self::new(
            sequence_id,
            OkPacket {
                header: OK_HEADER,
                affected_rows,
                last_insert_id,
                status_flags,
                warnings,
            }
            .encode(),
        )
    }

    /// OK packet that terminates a result set under CLIENT_DEPRECATE_EOF.
    pub fn eof_ok(status_flags: u16, warnings: u16, sequence_id: u8) -> Self {
        Self::new(
            sequence_id,
            OkPacket {
                header: EOF_HEADER,
                affected_rows: 0,
                last_insert_id: 0,
                status_flags,
                warnings,
            }
            .encode(),
        )
    }

    pub fn err(error: &EngineError, sequence_id: u8) -> Self {
        let mut payload = Vec::with_capacity(9 + error.message.len());
        payload.put_u8(ERR_HEADER);
        payload.put_u16_le(error.code);
        payload.put_u8(b'#');
        let mut state = [b'0'; 5];
        for (dst, src) in state.iter_mut().zip(error.sql_state.bytes()) {
            *dst = src;
        }
        payload.put_slice(&state);
        payload.put_slice(error.message.as_bytes());
        Self::new(sequence_id, payload)
    }

    pub fn eof(warnings: u16, status_flags: u16, sequence_id: u8) -> Self {
        let mut payload = Vec::with_capacity(5);
        payload.put_u8(EOF_HEADER);
        payload.put_u16_le(warnings);
        payload.put_u16_le(status_flags);
        Self::new(sequence_id, payload)
    }

    pub fn header(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    pub fn is_ok(&self) -> bool {
        self.header() == Some(OK_HEADER)
    }

    pub fn is_err(&self) -> bool {
        self.header() == Some(ERR_HEADER)
    }

    /// Classic EOF packet.
    pub fn is_eof(&self) -> bool {
        self.header() == Some(EOF_HEADER) && self.payload.len() < MAX_EOF_PAYLOAD_LEN
    }

    /// Packet closing the rows of a result set. Under CLIENT_DEPRECATE_EOF
    /// that is an 0xFE-headed OK packet, which may carry an info string or
    /// session state; only a full-size payload can still be a row.
    pub fn is_result_terminator(&self, deprecate_eof: bool) -> bool {
        if deprecate_eof {
            self.header() == Some(EOF_HEADER)
                && self.payload.len() < PacketHeader::MAX_PAYLOAD_LEN as usize
        } else {
            self.is_eof()
        }
    }
}

/// Parsed OK packet (also the EOF-style OK when `header` is 0xFE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OkPacket {
    pub header: u8,
    pub affected_rows: u64,
    pub last_insert_id: u64,
    pub status_flags: u16,
    pub warnings: u16,
}

impl OkPacket {
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(16);
        payload.put_u8(self.header);
        write_lenenc_int(&mut payload, self.affected_rows);
        write_lenenc_int(&mut payload, self.last_insert_id);
        payload.put_u16_le(self.status_flags);
        payload.put_u16_le(self.warnings);
        payload
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(payload);
        let header = cursor.read_u8().map_err(truncated("OK"))?;
        if header != OK_HEADER && header != EOF_HEADER {
            return Err(ProxyError::invalid_packet(format!("not an OK packet: header {:#04x}", header)));
        }
        let affected_rows = read_lenenc_int(&mut cursor).map_err(truncated("OK"))?;
        let last_insert_id = read_lenenc_int(&mut cursor).map_err(truncated("OK"))?;
        let status_flags = cursor.read_u16::<LittleEndian>().map_err(truncated("OK"))?;
        let warnings = cursor.read_u16::<LittleEndian>().map_err(truncated("OK"))?;
        Ok(Self {
            header,
            affected_rows,
            last_insert_id,
            status_flags,
            warnings,
        })
    }
}

/// Parsed classic EOF packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EofPacket {
    pub warnings: u16,
    pub status_flags: u16,
}

impl EofPacket {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.first() != Some(&EOF_HEADER) {
            return Err(ProxyError::invalid_packet("not an EOF packet"));
        }
        // pre-4.1 EOF carries the header only
        if payload.len() < 5 {
            return Ok(Self {
                warnings: 0,
                status_flags: 0,
            });
        }
        let mut cursor = Cursor::new(&payload[1..]);
        let warnings = cursor.read_u16::<LittleEndian>().map_err(truncated("EOF"))?;
        let status_flags = cursor.read_u16::<LittleEndian>().map_err(truncated("EOF"))?;
        Ok(Self { warnings, status_flags })
    }
}

/// Parse an ERR packet into the engine error it reports.
pub fn decode_err(payload: &[u8]) -> Result<EngineError> {
    if payload.first() != Some(&ERR_HEADER) || payload.len() < 3 {
        return Err(ProxyError::invalid_packet("not an ERR packet"));
    }
    let code = u16::from_le_bytes([payload[1], payload[2]]);
    let rest = &payload[3..];
    let (sql_state, message) = match rest.first() {
        Some(b'#') if rest.len() >= 6 => (
            String::from_utf8_lossy(&rest[1..6]).into_owned(),
            &rest[6..],
        ),
        _ => (DEFAULT_SQL_STATE.to_string(), rest),
    };
    Ok(EngineError::new(
        code,
        sql_state,
        String::from_utf8_lossy(message).into_owned(),
    ))
}

fn truncated(what: &'static str) -> impl Fn(io::Error) -> ProxyError {
    move |e| ProxyError::invalid_packet(format!("truncated {} packet: {}", what, e))
}

/// Write length-encoded integer (MySQL protocol)
pub fn write_lenenc_int(buf: &mut Vec<u8>, value: u64) {
    if value < 251 {
        buf.put_u8(value as u8);
    } else if value < 0x10000 {
        buf.put_u8(0xFC);
        buf.put_u16_le(value as u16);
    } else if value < 0x1000000 {
        buf.put_u8(0xFD);
        buf.put_uint_le(value, 3);
    } else {
        buf.put_u8(0xFE);
        buf.put_u64_le(value);
    }
}

/// Read length-encoded integer (MySQL protocol)
pub fn read_lenenc_int<R: Read>(reader: &mut R) -> io::Result<u64> {
    let first_byte = reader.read_u8()?;
    match first_byte {
        0..=250 => Ok(first_byte as u64),
        0xFC => Ok(reader.read_u16::<LittleEndian>()? as u64),
        0xFD => Ok(reader.read_u24::<LittleEndian>()? as u64),
        0xFE => reader.read_u64::<LittleEndian>(),
        _ => Err(io::Error::new(io::ErrorKind::InvalidData, "Invalid length-encoded integer")),
    }
}

/// Read length-encoded string (MySQL protocol)
pub fn read_lenenc_string<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let len = read_lenenc_int(reader)?;
    let mut buf = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "length-encoded string runs past payload"));
    }
    Ok(buf)
}

/// Write length-encoded string (MySQL protocol)
pub fn write_lenenc_string(buf: &mut Vec<u8>, s: &[u8]) {
    write_lenenc_int(buf, s.len() as u64);
    buf.put_slice(s);
}
