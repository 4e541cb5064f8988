// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Protocol Constants

// Capability flags relevant to result-set framing
pub const CLIENT_PROTOCOL_41: u32 = 0x00000200;
pub const CLIENT_DEPRECATE_EOF: u32 = 0x01000000;

/// Upper bound on the column count of a result set
pub const MAX_COLUMNS: u64 = 4096;

// Packet headers
pub const OK_HEADER: u8 = 0x00;
pub const NULL_MARKER: u8 = 0xFB;
pub const EOF_HEADER: u8 = 0xFE;
pub const ERR_HEADER: u8 = 0xFF;

/// An 0xFE-headed payload shorter than this is a classic EOF packet rather
/// than a row starting with an 8-byte length prefix.
pub const MAX_EOF_PAYLOAD_LEN: usize = 9;

/// Catalog name reported in every column definition
pub const DEFAULT_CATALOG: &str = "def";

/// Length of the fixed-length fields block of a ColumnDefinition41
pub const COLUMN_FIXED_FIELDS_LEN: u64 = 0x0c;

/// SQL state sent when an ERR packet lacks the `#` marker
pub const DEFAULT_SQL_STATE: &str = "HY000";
