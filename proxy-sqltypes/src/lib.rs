// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Canonical SQL types, column descriptors and values with MySQL wire
//! semantics.

pub mod bind;
pub mod charset;
pub mod codec;
pub mod column;
pub mod compat;
pub mod field;
pub mod flags;
pub mod result;
pub mod types;
pub mod value;

pub use bind::BindVariable;
pub use charset::{CharsetResolver, Collation};
pub use codec::Point;
pub use column::{ColumnType, IntWidth};
pub use compat::{CompatibilityResolver, Fallback, Resolution, Shape};
pub use field::{ColumnDecl, Field, RawColumn};
pub use flags::{resolve_flags, ColumnAttributes, ColumnFlags, ColumnOrigin, KeyRole};
pub use result::QueryResult;
pub use types::{LobSize, Type};
pub use value::Value;
