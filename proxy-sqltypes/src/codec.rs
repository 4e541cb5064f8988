// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Value Codec
//!
//! Converts raw column bytes (text protocol, binary protocol numerics and the
//! spatial point form) to and from canonical values.
//!
//! Point layout (25 bytes, little-endian):
//! ```text
//! [4 bytes: SRID]
//! [1 byte:  byte order, 1 = little-endian]
//! [4 bytes: geometry type, 1 = point]
//! [8 bytes: X as IEEE-754 double]
//! [8 bytes: Y as IEEE-754 double]
//! ```

use crate::field::Field;
use crate::types::Type;
use crate::value::Value;
use byteorder::{ByteOrder, LittleEndian};
use bytes::{BufMut, Bytes, BytesMut};
use chrono::{NaiveDate, NaiveTime};
use proxy_common::{ProxyError, Result};

/// Decode the raw bytes of one non-NULL column value.
pub fn decode(ty: Type, column_length: u32, raw: &[u8]) -> Result<Value> {
    match ty {
        Type::NullType => {
            if !raw.is_empty() {
                return Err(ProxyError::decode(format!(
                    "NULL column carries {} bytes of content",
                    raw.len()
                )));
            }
            Ok(Value::null())
        }
        t if t.is_integral() => {
            check_integer(t, text(t, raw)?)?;
            Ok(Value::new_trusted(t, Bytes::copy_from_slice(raw)))
        }
        Type::Float32 | Type::Float64 => {
            check_float(ty, text(ty, raw)?)?;
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        Type::Decimal => {
            check_decimal(text(ty, raw)?)?;
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        Type::Date => {
            check_date(text(ty, raw)?)?;
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        Type::Datetime | Type::Timestamp => {
            check_datetime(text(ty, raw)?)?;
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        Type::Time => {
            check_time(text(ty, raw)?)?;
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        Type::Binary => decode_fixed_binary(raw, column_length),
        Type::Bit => {
            let max = if column_length > 0 {
                (column_length as usize).div_ceil(8)
            } else {
                8
            };
            if raw.len() > max {
                return Err(ProxyError::decode(format!(
                    "BIT({}) value of {} bytes",
                    column_length,
                    raw.len()
                )));
            }
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        Type::Geometry => {
            Point::decode(raw)?;
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        Type::Json => {
            // validated but kept verbatim; re-serializing would change spacing
            serde_json::from_slice::<serde::de::IgnoredAny>(raw)
                .map_err(|e| ProxyError::decode(format!("invalid JSON payload: {}", e)))?;
            Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw)))
        }
        _ => Ok(Value::new_trusted(ty, Bytes::copy_from_slice(raw))),
    }
}

/// Decode one column of a row. `None` is the wire NULL marker.
pub fn decode_field(field: &Field, raw: Option<&[u8]>) -> Result<Value> {
    match raw {
        None => Ok(Value::null()),
        Some(bytes) => decode(field.ty, field.column_length, bytes).map_err(|e| {
            tracing::debug!(column = %field.name, ty = %field.ty, error = %e, "value decode failed");
            e
        }),
    }
}

/// Decode a row column by column. A failing column does not abort its
/// siblings; only a width mismatch rejects the whole row.
pub fn decode_row(fields: &[Field], row: &[Option<Bytes>]) -> Result<Vec<Result<Value>>> {
    if fields.len() != row.len() {
        return Err(ProxyError::decode(format!(
            "row has {} values for {} fields",
            row.len(),
            fields.len()
        )));
    }
    Ok(fields
        .iter()
        .zip(row)
        .map(|(field, raw)| decode_field(field, raw.as_deref()))
        .collect())
}

/// Wire bytes of a value; `None` for NULL. Content is emitted as-is.
pub fn encode(value: &Value) -> Option<Bytes> {
    if value.is_null() {
        None
    } else {
        Some(value.to_bytes())
    }
}

/// Right-pad with zero bytes to the declared length, as the engine does for
/// BINARY(n) columns.
fn decode_fixed_binary(raw: &[u8], column_length: u32) -> Result<Value> {
    let declared = column_length as usize;
    if column_length == 0 || raw.len() == declared {
        return Ok(Value::new_trusted(Type::Binary, Bytes::copy_from_slice(raw)));
    }
    if raw.len() > declared {
        return Err(ProxyError::decode(format!(
            "BINARY({}) value of {} bytes",
            declared,
            raw.len()
        )));
    }
    let mut padded = BytesMut::with_capacity(declared);
    padded.put_slice(raw);
    padded.put_bytes(0, declared - raw.len());
    Ok(Value::new_trusted(Type::Binary, padded.freeze()))
}

/// Decode a binary-protocol numeric (fixed-width little-endian) into its
/// canonical textual value.
pub fn decode_binary_numeric(ty: Type, raw: &[u8]) -> Result<Value> {
    let expected = binary_width(ty)?;
    if raw.len() != expected {
        return Err(ProxyError::decode(format!(
            "{} expects {} bytes in the binary protocol, got {}",
            ty,
            expected,
            raw.len()
        )));
    }

    let text = match ty {
        Type::Int8 => (raw[0] as i8).to_string(),
        Type::Uint8 => raw[0].to_string(),
        Type::Int16 => LittleEndian::read_i16(raw).to_string(),
        Type::Uint16 | Type::Year => LittleEndian::read_u16(raw).to_string(),
        Type::Int24 | Type::Int32 => LittleEndian::read_i32(raw).to_string(),
        Type::Uint24 | Type::Uint32 => LittleEndian::read_u32(raw).to_string(),
        Type::Int64 => LittleEndian::read_i64(raw).to_string(),
        Type::Uint64 => LittleEndian::read_u64(raw).to_string(),
        Type::Float32 => LittleEndian::read_f32(raw).to_string(),
        _ => LittleEndian::read_f64(raw).to_string(),
    };

    if ty.is_integral() {
        check_integer(ty, &text)?;
    } else {
        check_float(ty, &text)?;
    }
    Ok(Value::new_trusted(ty, text))
}

/// Encode a numeric value into the binary-protocol fixed-width form.
pub fn encode_binary_numeric(value: &Value) -> Result<Vec<u8>> {
    let ty = value.ty();
    let width = binary_width(ty)?;
    let mut buf = vec![0u8; width];

    match ty {
        Type::Float32 => LittleEndian::write_f32(&mut buf, value.to_f64()? as f32),
        Type::Float64 => LittleEndian::write_f64(&mut buf, value.to_f64()?),
        t if t.is_signed() => {
            let v = value.to_i64()?;
            check_integer(t, &v.to_string())?;
            LittleEndian::write_int(&mut buf, v, width);
        }
        t => {
            let v = value.to_u64()?;
            check_integer(t, &v.to_string())?;
            LittleEndian::write_uint(&mut buf, v, width);
        }
    }
    Ok(buf)
}

fn binary_width(ty: Type) -> Result<usize> {
    let width = match ty {
        Type::Int8 | Type::Uint8 => 1,
        Type::Int16 | Type::Uint16 | Type::Year => 2,
        Type::Int24 | Type::Uint24 | Type::Int32 | Type::Uint32 | Type::Float32 => 4,
        Type::Int64 | Type::Uint64 | Type::Float64 => 8,
        other => {
            return Err(ProxyError::decode(format!(
                "{} has no fixed-width binary form",
                other
            )))
        }
    };
    Ok(width)
}

fn text(ty: Type, raw: &[u8]) -> Result<&str> {
    std::str::from_utf8(raw)
        .map_err(|_| ProxyError::decode(format!("{} value is not ASCII text", ty)))
}

/// Range-check an integer literal against the exact width of `ty`.
/// Only canonical decimal text is accepted: no `+`, no leading zeros, no
/// `-0`. YEAR additionally admits its zero value `0000`.
pub(crate) fn check_integer(ty: Type, text: &str) -> Result<()> {
    let (min, max) = ty
        .integer_bounds()
        .ok_or_else(|| ProxyError::decode(format!("{} is not an integer type", ty)))?;
    if !(is_canonical_integer(text) || (ty == Type::Year && text == "0000")) {
        return Err(ProxyError::decode(format!(
            "{} literal {:?} is not canonical decimal text",
            ty, text
        )));
    }
    let v = text
        .parse::<i128>()
        .map_err(|e| ProxyError::decode(format!("invalid {} literal {:?}: {}", ty, text, e)))?;
    if v < min || v > max {
        return Err(ProxyError::out_of_range(format!(
            "{} is outside the {} range [{}, {}]",
            v, ty, min, max
        )));
    }
    Ok(())
}

fn is_canonical_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let negative = digits.len() != text.len();
    match digits.as_bytes() {
        [] => false,
        [b'0'] => !negative,
        [b'0', ..] => false,
        bytes => bytes.iter().all(|b| b.is_ascii_digit()),
    }
}

fn check_float(ty: Type, text: &str) -> Result<()> {
    let v = text
        .parse::<f64>()
        .map_err(|e| ProxyError::decode(format!("invalid {} literal {:?}: {}", ty, text, e)))?;
    let finite = match ty {
        Type::Float32 => (v as f32).is_finite(),
        _ => v.is_finite(),
    };
    if !finite {
        return Err(ProxyError::decode(format!("{} literal {:?} is not finite", ty, text)));
    }
    Ok(())
}

/// `[+-]digits[.digits]`, at least one digit overall.
fn check_decimal(text: &str) -> Result<()> {
    let unsigned = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.len() + frac_part.len() == 0 || !digits_only(int_part) || !digits_only(frac_part) {
        return Err(ProxyError::decode(format!("invalid DECIMAL literal {:?}", text)));
    }
    Ok(())
}

fn fixed_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// `YYYY-MM-DD`; zero components are accepted the way the engine stores them.
fn check_date(text: &str) -> Result<()> {
    let invalid = || ProxyError::decode(format!("invalid DATE literal {:?}", text));
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    let year = fixed_digits(&text[0..4]).ok_or_else(invalid)?;
    let month = fixed_digits(&text[5..7]).ok_or_else(invalid)?;
    let day = fixed_digits(&text[8..10]).ok_or_else(invalid)?;

    if year == 0 || month == 0 || day == 0 {
        if month > 12 || day > 31 {
            return Err(invalid());
        }
        return Ok(());
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .map(|_| ())
        .ok_or_else(invalid)
}

/// Fractional seconds suffix of 1 to 6 digits.
fn check_fraction(frac: Option<&str>) -> bool {
    match frac {
        None => true,
        Some(f) => (1..=6).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()),
    }
}

/// `YYYY-MM-DD HH:MM:SS[.ffffff]`
fn check_datetime(text: &str) -> Result<()> {
    let invalid = || ProxyError::decode(format!("invalid DATETIME literal {:?}", text));
    let (date, time) = text.split_once(' ').ok_or_else(invalid)?;
    check_date(date).map_err(|_| invalid())?;

    let (clock, frac) = match time.split_once('.') {
        Some((c, f)) => (c, Some(f)),
        None => (time, None),
    };
    let bytes = clock.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' || !check_fraction(frac) {
        return Err(invalid());
    }
    let h = fixed_digits(&clock[0..2]).ok_or_else(invalid)?;
    let m = fixed_digits(&clock[3..5]).ok_or_else(invalid)?;
    let s = fixed_digits(&clock[6..8]).ok_or_else(invalid)?;
    NaiveTime::from_hms_opt(h, m, s).map(|_| ()).ok_or_else(invalid)
}

/// `[-]HH:MM:SS[.ffffff]` with hours up to 838.
fn check_time(text: &str) -> Result<()> {
    let invalid = || ProxyError::decode(format!("invalid TIME literal {:?}", text));
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (clock, frac) = match unsigned.split_once('.') {
        Some((c, f)) => (c, Some(f)),
        None => (unsigned, None),
    };
    if !check_fraction(frac) {
        return Err(invalid());
    }

    let mut parts = clock.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    if !(2..=3).contains(&h.len()) || m.len() != 2 || s.len() != 2 {
        return Err(invalid());
    }
    let h = fixed_digits(h).ok_or_else(invalid)?;
    let m = fixed_digits(m).ok_or_else(invalid)?;
    let s = fixed_digits(s).ok_or_else(invalid)?;
    if h > 838 || m > 59 || s > 59 {
        return Err(invalid());
    }
    Ok(())
}

/// A 2D point in the engine's internal geometry format
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub srid: u32,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ENCODED_LEN: usize = 25;
    const LITTLE_ENDIAN: u8 = 1;
    const WKB_POINT: u32 = 1;

    pub fn new(x: f64, y: f64) -> Self {
        Self { srid: 0, x, y }
    }

    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut buf = [0u8; Self::ENCODED_LEN];
        LittleEndian::write_u32(&mut buf[0..4], self.srid);
        buf[4] = Self::LITTLE_ENDIAN;
        LittleEndian::write_u32(&mut buf[5..9], Self::WKB_POINT);
        LittleEndian::write_f64(&mut buf[9..17], self.x);
        LittleEndian::write_f64(&mut buf[17..25], self.y);
        buf
    }

    pub fn decode(raw: &[u8]) -> Result<Point> {
        if raw.len() != Self::ENCODED_LEN {
            return Err(ProxyError::decode(format!(
                "point must be {} bytes, got {}",
                Self::ENCODED_LEN,
                raw.len()
            )));
        }
        if raw[4] != Self::LITTLE_ENDIAN {
            return Err(ProxyError::decode(format!(
                "unsupported geometry byte order {}",
                raw[4]
            )));
        }
        let geometry_type = LittleEndian::read_u32(&raw[5..9]);
        if geometry_type != Self::WKB_POINT {
            return Err(ProxyError::decode(format!(
                "unsupported geometry type {}",
                geometry_type
            )));
        }
        Ok(Point {
            srid: LittleEndian::read_u32(&raw[0..4]),
            x: LittleEndian::read_f64(&raw[9..17]),
            y: LittleEndian::read_f64(&raw[17..25]),
        })
    }

    pub fn to_value(&self) -> Value {
        Value::new_trusted(Type::Geometry, Bytes::copy_from_slice(&self.encode()))
    }
}
