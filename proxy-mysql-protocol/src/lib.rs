// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Protocol Implementation
//!
//! Wire encoding of the canonical result model:
//! - Packet framing and length-encoded primitives
//! - OK / EOF / ERR status packets
//! - ColumnDefinition41 packets
//! - Text-protocol result sets

pub mod column;
pub mod constants;
pub mod packet;
pub mod resultset;

pub use column::ColumnDefinition;
pub use packet::{EofPacket, OkPacket, Packet, PacketHeader};
pub use resultset::{decode_response, Response, ResultSet, TextResultRow};
