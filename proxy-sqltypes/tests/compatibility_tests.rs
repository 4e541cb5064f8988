// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Regression scenarios: column descriptors and row bytes as reported by the
//! engine must classify to exactly the Fields and Values a declaration
//! predicts.

use bytes::Bytes;
use proxy_common::constants::*;
use proxy_common::{EngineError, EngineProfile};
use proxy_sqltypes::*;

const DB: &str = "vttest";

const POINT_1_2: &[u8] = b"\x00\x00\x00\x00\x01\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\xf0?\x00\x00\x00\x00\x00\x00\x00@";

/// A column descriptor with the values the engine put on the wire.
fn wire(table: &str, name: &str, type_code: u8, column_length: u32, charset: u16, decimals: u8, flags: u16) -> RawColumn {
    RawColumn {
        name: name.to_string(),
        table: table.to_string(),
        org_table: table.to_string(),
        database: if table.is_empty() { String::new() } else { DB.to_string() },
        org_name: if table.is_empty() { String::new() } else { name.to_string() },
        type_code,
        column_length,
        charset,
        decimals,
        flags,
    }
}

fn observe(columns: &[RawColumn], rows: &[&[Option<&'static [u8]>]]) -> QueryResult {
    let fields = columns
        .iter()
        .map(|c| Field::from_raw(c).unwrap())
        .collect::<Vec<_>>();
    let raw_rows = rows
        .iter()
        .map(|row| row.iter().map(|v| v.map(Bytes::from_static)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    QueryResult::from_raw_rows(fields, &raw_rows)
        .unwrap()
        .with_status(QueryResult::unindexed_select_status())
}

fn declare(table: &str, decls: &[ColumnDecl]) -> Vec<Field> {
    let charsets = CharsetResolver::default();
    decls
        .iter()
        .map(|d| Field::from_declaration(DB, table, d, &charsets).unwrap())
        .collect()
}

fn col(name: &str, column_type: ColumnType) -> ColumnDecl {
    ColumnDecl::new(name, column_type).with_attrs(ColumnAttributes::nullable())
}

fn pk(name: &str, column_type: ColumnType) -> ColumnDecl {
    ColumnDecl::new(name, column_type).with_attrs(ColumnAttributes::primary_key())
}

fn int(width: IntWidth, unsigned: bool) -> ColumnType {
    ColumnType::Integer { width, unsigned }
}

fn v(content: &'static [u8]) -> Option<&'static [u8]> {
    Some(content)
}

fn tv(ty: Type, content: &'static [u8]) -> Value {
    Value::new_trusted(ty, Bytes::from_static(content))
}

fn row(values: &[Value]) -> Vec<Value> {
    values.to_vec()
}

#[test]
fn test_character_set() {
    let t = "vitess_test";
    let observed = observe(
        &[
            wire(t, "intval", MYSQL_TYPE_LONG, 11, 63, 0, 49155),
            wire(t, "floatval", MYSQL_TYPE_FLOAT, 12, 63, 31, 32768),
            wire(t, "charval", MYSQL_TYPE_VAR_STRING, 40, 45, 0, 0),
            wire(t, "binval", MYSQL_TYPE_VAR_STRING, 256, 63, 0, 128),
        ],
        &[&[v(b"1"), v(b"1.12345"), v(b"\xc2\xa2"), v(b"\x00\xff")]],
    );

    let expected = QueryResult::new(declare(
        t,
        &[
            pk("intval", ColumnType::int(false)),
            col("floatval", ColumnType::Float),
            col("charval", ColumnType::VarChar(10)),
            col("binval", ColumnType::VarBinary(256)),
        ],
    ))
    .with_rows(vec![row(&[
        tv(Type::Int32, b"1"),
        tv(Type::Float32, b"1.12345"),
        tv(Type::VarChar, b"\xc2\xa2"),
        tv(Type::VarBinary, b"\x00\xff"),
    ])])
    .with_status(QueryResult::unindexed_select_status());

    assert_eq!(observed, expected);
    assert_eq!(observed.rows[0][2].as_str(), Some("\u{a2}"));
}

#[test]
fn test_ints() {
    let binds = [
        BindVariable::int64(-128),
        BindVariable::uint64(255),
        BindVariable::int64(-32768),
        BindVariable::uint64(65535),
        BindVariable::int64(-8388608),
        BindVariable::uint64(16777215),
        BindVariable::int64(-2147483648),
        BindVariable::uint64(4294967295),
        BindVariable::int64(i64::MIN),
        BindVariable::uint64(u64::MAX),
        BindVariable::int64(2012),
    ];
    let insert = binds.iter().map(|b| b.encode_sql()).collect::<Vec<_>>().join(", ");
    assert_eq!(
        insert,
        "-128, 255, -32768, 65535, -8388608, 16777215, -2147483648, 4294967295, \
         -9223372036854775808, 18446744073709551615, 2012"
    );

    let t = "vitess_ints";
    let observed = observe(
        &[
            wire(t, "tiny", MYSQL_TYPE_TINY, 4, 63, 0, 49155),
            wire(t, "tinyu", MYSQL_TYPE_TINY, 3, 63, 0, 32800),
            wire(t, "small", MYSQL_TYPE_SHORT, 6, 63, 0, 32768),
            wire(t, "smallu", MYSQL_TYPE_SHORT, 5, 63, 0, 32800),
            wire(t, "medium", MYSQL_TYPE_INT24, 9, 63, 0, 32768),
            wire(t, "mediumu", MYSQL_TYPE_INT24, 8, 63, 0, 32800),
            wire(t, "normal", MYSQL_TYPE_LONG, 11, 63, 0, 32768),
            wire(t, "normalu", MYSQL_TYPE_LONG, 10, 63, 0, 32800),
            wire(t, "big", MYSQL_TYPE_LONGLONG, 20, 63, 0, 32768),
            wire(t, "bigu", MYSQL_TYPE_LONGLONG, 20, 63, 0, 32800),
            wire(t, "y", MYSQL_TYPE_YEAR, 4, 63, 0, 32864),
        ],
        &[&[
            v(b"-128"),
            v(b"255"),
            v(b"-32768"),
            v(b"65535"),
            v(b"-8388608"),
            v(b"16777215"),
            v(b"-2147483648"),
            v(b"4294967295"),
            v(b"-9223372036854775808"),
            v(b"18446744073709551615"),
            v(b"2012"),
        ]],
    );

    let expected = QueryResult::new(declare(
        t,
        &[
            pk("tiny", int(IntWidth::Tiny, false)),
            col("tinyu", int(IntWidth::Tiny, true)),
            col("small", int(IntWidth::Small, false)),
            col("smallu", int(IntWidth::Small, true)),
            col("medium", int(IntWidth::Medium, false)),
            col("mediumu", int(IntWidth::Medium, true)),
            col("normal", int(IntWidth::Int, false)),
            col("normalu", int(IntWidth::Int, true)),
            col("big", int(IntWidth::Big, false)),
            col("bigu", int(IntWidth::Big, true)),
            col("y", ColumnType::Year),
        ],
    ))
    .with_rows(vec![row(&[
        tv(Type::Int8, b"-128"),
        tv(Type::Uint8, b"255"),
        tv(Type::Int16, b"-32768"),
        tv(Type::Uint16, b"65535"),
        tv(Type::Int24, b"-8388608"),
        tv(Type::Uint24, b"16777215"),
        tv(Type::Int32, b"-2147483648"),
        tv(Type::Uint32, b"4294967295"),
        tv(Type::Int64, b"-9223372036854775808"),
        tv(Type::Uint64, b"18446744073709551615"),
        tv(Type::Year, b"2012"),
    ])])
    .with_status(QueryResult::unindexed_select_status());

    assert_eq!(observed, expected);
}

#[test]
fn test_unsigned_aggregate_with_binary_flag() {
    let observed = observe(
        &[wire("", "max(bigu)", MYSQL_TYPE_LONGLONG, 20, 63, 0, 32928)],
        &[&[v(b"18446744073709551615")]],
    );

    let field = Field::from_expression("max(bigu)", &ColumnType::bigint(true), &CharsetResolver::default());
    assert_eq!(field.flags, 32928);
    let expected = QueryResult::new(vec![field])
        .with_rows(vec![row(&[tv(Type::Uint64, b"18446744073709551615")])])
        .with_status(QueryResult::unindexed_select_status());

    assert_eq!(observed, expected);
    assert_eq!(observed.rows[0][0].to_u64().unwrap(), u64::MAX);
}

#[test]
fn test_fractionals() {
    let binds = [
        BindVariable::int64(1),
        BindVariable::string("1.99"),
        BindVariable::string("2.99"),
        BindVariable::float64(3.99).unwrap(),
        BindVariable::float64(4.99).unwrap(),
    ];
    let insert = binds.iter().map(|b| b.encode_sql()).collect::<Vec<_>>().join(", ");
    assert_eq!(insert, "1, '1.99', '2.99', 3.99, 4.99");

    let t = "vitess_fracts";
    let observed = observe(
        &[
            wire(t, "id", MYSQL_TYPE_LONG, 11, 63, 0, 49155),
            wire(t, "deci", MYSQL_TYPE_NEWDECIMAL, 7, 63, 2, 32768),
            wire(t, "num", MYSQL_TYPE_NEWDECIMAL, 7, 63, 2, 32768),
            wire(t, "f", MYSQL_TYPE_FLOAT, 12, 63, 31, 32768),
            wire(t, "d", MYSQL_TYPE_DOUBLE, 22, 63, 31, 32768),
        ],
        &[&[v(b"1"), v(b"1.99"), v(b"2.99"), v(b"3.99"), v(b"4.99")]],
    );

    let decimal = ColumnType::Decimal { precision: 5, scale: 2 };
    let expected = QueryResult::new(declare(
        t,
        &[
            pk("id", ColumnType::int(false)),
            col("deci", decimal.clone()),
            col("num", decimal),
            col("f", ColumnType::Float),
            col("d", ColumnType::Double),
        ],
    ))
    .with_rows(vec![row(&[
        tv(Type::Int32, b"1"),
        tv(Type::Decimal, b"1.99"),
        tv(Type::Decimal, b"2.99"),
        tv(Type::Float32, b"3.99"),
        tv(Type::Float64, b"4.99"),
    ])])
    .with_status(QueryResult::unindexed_select_status());

    assert_eq!(observed, expected);
}

#[test]
fn test_strings() {
    let t = "vitess_strings";
    let observed = observe(
        &[
            wire(t, "vb", MYSQL_TYPE_VAR_STRING, 16, 63, 0, 16515),
            wire(t, "c", MYSQL_TYPE_STRING, 64, 45, 0, 0),
            wire(t, "vc", MYSQL_TYPE_VAR_STRING, 64, 45, 0, 0),
            wire(t, "b", MYSQL_TYPE_STRING, 4, 63, 0, 128),
            wire(t, "tb", MYSQL_TYPE_BLOB, 255, 63, 0, 144),
            wire(t, "bl", MYSQL_TYPE_BLOB, 65535, 63, 0, 144),
            wire(t, "ttx", MYSQL_TYPE_BLOB, 1020, 45, 0, 16),
            wire(t, "tx", MYSQL_TYPE_BLOB, 262140, 45, 0, 16),
            wire(t, "en", MYSQL_TYPE_STRING, 4, 45, 0, 256),
            wire(t, "s", MYSQL_TYPE_STRING, 12, 45, 0, 2048),
        ],
        // short BINARY content is padded to the declared length
        &[&[
            v(b"a"),
            v(b"b"),
            v(b"c"),
            v(b"d"),
            v(b"e"),
            v(b"f"),
            v(b"g"),
            v(b"h"),
            v(b"a"),
            v(b"a,b"),
        ]],
    );

    let members = || vec!["a".to_string(), "b".to_string()];
    let expected = QueryResult::new(declare(
        t,
        &[
            pk("vb", ColumnType::VarBinary(16)),
            col("c", ColumnType::Char(16)),
            col("vc", ColumnType::VarChar(16)),
            col("b", ColumnType::Binary(4)),
            col("tb", ColumnType::Blob(LobSize::Tiny)),
            col("bl", ColumnType::Blob(LobSize::Regular)),
            col("ttx", ColumnType::Text(LobSize::Tiny)),
            col("tx", ColumnType::Text(LobSize::Regular)),
            col("en", ColumnType::Enum(members())),
            col("s", ColumnType::Set(members())),
        ],
    ))
    .with_rows(vec![row(&[
        tv(Type::VarBinary, b"a"),
        tv(Type::Char, b"b"),
        tv(Type::VarChar, b"c"),
        tv(Type::Binary, b"d\x00\x00\x00"),
        tv(Type::Blob, b"e"),
        tv(Type::Blob, b"f"),
        tv(Type::Text, b"g"),
        tv(Type::Text, b"h"),
        tv(Type::Enum, b"a"),
        tv(Type::Set, b"a,b"),
    ])])
    .with_status(QueryResult::unindexed_select_status());

    assert_eq!(observed, expected);
    assert_eq!(observed.fields[4].lob_size(), Some(LobSize::Tiny));
    assert_eq!(observed.fields[7].lob_size(), Some(LobSize::Regular));
}

#[test]
fn test_misc_types() {
    let binds = [
        BindVariable::int64(1),
        BindVariable::string("\x01"),
        BindVariable::string("2012-01-01"),
        BindVariable::string("2012-01-01 15:45:45"),
        BindVariable::string("15:45:45"),
    ];
    assert_eq!(binds[2].encode_sql(), "'2012-01-01'");

    let t = "vitess_misc";
    let observed = observe(
        &[
            wire(t, "id", MYSQL_TYPE_LONG, 11, 63, 0, 49155),
            wire(t, "b", MYSQL_TYPE_BIT, 8, 63, 0, 32),
            wire(t, "d", MYSQL_TYPE_DATE, 10, 63, 0, 128),
            wire(t, "dt", MYSQL_TYPE_DATETIME, 19, 63, 0, 128),
            wire(t, "t", MYSQL_TYPE_TIME, 10, 63, 0, 128),
            wire(t, "g", MYSQL_TYPE_GEOMETRY, u32::MAX, 63, 0, 144),
        ],
        &[&[
            v(b"1"),
            v(b"\x01"),
            v(b"2012-01-01"),
            v(b"2012-01-01 15:45:45"),
            v(b"15:45:45"),
            v(POINT_1_2),
        ]],
    );

    let expected = QueryResult::new(declare(
        t,
        &[
            pk("id", ColumnType::int(false)),
            col("b", ColumnType::Bit(8)),
            col("d", ColumnType::Date),
            col("dt", ColumnType::Datetime(0)),
            col("t", ColumnType::Time(0)),
            col("g", ColumnType::Geometry),
        ],
    ))
    .with_rows(vec![vec![
        Value::new_trusted(Type::Int32, "1"),
        Value::new_trusted(Type::Bit, &b"\x01"[..]),
        Value::new_trusted(Type::Date, "2012-01-01"),
        Value::new_trusted(Type::Datetime, "2012-01-01 15:45:45"),
        Value::new_trusted(Type::Time, "15:45:45"),
        Point::new(1.0, 2.0).to_value(),
    ]])
    .with_status(QueryResult::unindexed_select_status());

    assert_eq!(observed, expected);
}

#[test]
fn test_null() {
    let observed = observe(&[wire("", "NULL", MYSQL_TYPE_NULL, 0, 63, 0, 32896)], &[&[None]]);

    let field = Field::from_expression("NULL", &ColumnType::Null, &CharsetResolver::default());
    assert_eq!(field.flags, 32896);
    assert_eq!(field.charset, 63);
    let expected = QueryResult::new(vec![field])
        .with_rows(vec![vec![Value::null()]])
        .with_status(SERVER_STATUS_NO_INDEX_USED | SERVER_STATUS_AUTOCOMMIT);

    assert_eq!(observed, expected);
    let value = &observed.rows[0][0];
    assert!(value.is_null());
    assert!(value.is_empty());
    assert!(observed.status_contains(SERVER_STATUS_NO_INDEX_USED));
}

fn json_expectation() -> QueryResult {
    QueryResult::new(declare(
        "vitess_json",
        &[pk("id", ColumnType::int(false)), col("val", ColumnType::Json)],
    ))
    .with_rows(vec![row(&[tv(Type::Int32, b"1"), tv(Type::Json, b"{\"foo\": \"bar\"}")])])
    .with_status(QueryResult::unindexed_select_status())
}

#[test]
fn test_json_primary_shape() {
    let t = "vitess_json";
    let observed = observe(
        &[
            wire(t, "id", MYSQL_TYPE_LONG, 11, 63, 0, 49155),
            wire(t, "val", MYSQL_TYPE_JSON, u32::MAX, 63, 0, 144),
        ],
        &[&[v(b"1"), v(b"{\"foo\": \"bar\"}")]],
    );

    let resolver = CompatibilityResolver::new(EngineProfile::from_server_version("5.7.31").unwrap());
    let shape = resolver.reconcile(&json_expectation(), &observed).unwrap();
    assert!(shape.is_primary());
    assert_eq!(shape.get().fields[1].ty, Type::Json);
}

#[test]
fn test_json_blob_fallback() {
    let t = "vitess_json";
    let observed = observe(
        &[
            wire(t, "id", MYSQL_TYPE_LONG, 11, 63, 0, 49155),
            wire(t, "val", MYSQL_TYPE_BLOB, u32::MAX, 33, 0, 144),
        ],
        &[&[v(b"1"), v(b"{\"foo\": \"bar\"}")]],
    );
    assert_eq!(observed.fields[1].ty, Type::Blob);

    let resolver = CompatibilityResolver::new(EngineProfile::from_server_version("10.3.8-MariaDB").unwrap());
    let shape = resolver.reconcile(&json_expectation(), &observed).unwrap();
    assert_eq!(shape.fallback(), Some(Fallback::JsonAsBlob));
    let result = shape.into_inner();
    assert_eq!(result.rows[0][1], Value::new_trusted(Type::Blob, "{\"foo\": \"bar\"}"));
    assert_eq!(result.fields[1].charset, UTF8_GENERAL_CI);

    // the substituted shape still satisfies the JSON declaration
    let mut relaxed = json_expectation();
    relaxed.rows = result.rows.clone();
    relaxed.validate().unwrap();
}

#[test]
fn test_json_skipped_on_syntax_error() {
    let resolver = CompatibilityResolver::new(EngineProfile::from_server_version("5.6.51").unwrap());
    let err = EngineError::new(
        ER_PARSE_ERROR,
        "42000",
        "You have an error in your SQL syntax; check the manual near 'json, primary key(id))'",
    );
    let resolution = resolver.on_ddl_error::<QueryResult>(&err).unwrap();
    assert!(resolution.is_skip());
    assert!(resolver.predict_json(json_expectation()).is_skip());
}
