//! SQL type extraction
//!
//! Encodes values into PostgreSQL column type names, for building dynamic
//! DDL or queries that need type information. Nested values are rejected
//! because most SQL engines don't allow nested column types; a hook for the
//! nested type lifts the restriction.

pub mod encoder;
pub mod encoding;

pub use encoder::SqlEncoder;
pub use encoding::SqlEncoding;

use crate::error::Result;
use crate::hooks::HookTable;
use crate::types::{RuntimeType, Value};

/// Built-in scalar mappings, per the PostgreSQL type catalogue
pub fn builtin_hooks() -> HookTable<String> {
    HookTable::new()
        .with_literal(RuntimeType::Integer, "integer")
        .with_literal(RuntimeType::Boolean, "boolean")
        .with_literal(RuntimeType::Bytes, "bytea")
        .with_literal(RuntimeType::Float, "real")
        .with_literal(RuntimeType::Text, "text")
}

/// One-shot encode with a fresh encoder
pub fn encode(value: &Value, hooks: HookTable<String>) -> Result<SqlEncoding> {
    SqlEncoder::new(hooks).encode(value)
}
