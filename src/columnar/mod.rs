//! Columnar (Arrow-style) type inference
//!
//! Produces struct/list/primitive type trees from values, and whole tables
//! (one shared schema plus column values) from rows. Struct fields are always
//! emitted in ascending key order: columnar writers reject batches whose
//! nested struct fields differ only in order, so two rows with the same keys
//! must give byte-identical schemas.

pub mod encoder;
pub mod table;
pub mod types;

pub use encoder::ColumnarEncoder;
pub use table::{Column, Table, TableEncoder};
pub use types::{ColumnType, Field};

use crate::error::Result;
use crate::hooks::HookTable;
use crate::types::{Record, RuntimeType, Value};

/// Built-in scalar mappings
pub fn builtin_hooks() -> HookTable<ColumnType> {
    HookTable::new()
        .with_literal(RuntimeType::Integer, types::INT64)
        .with_literal(RuntimeType::Text, types::STRING)
        .with_literal(RuntimeType::Boolean, types::BOOL)
        .with_literal(RuntimeType::Bytes, types::BINARY)
        .with_literal(RuntimeType::Float, types::FLOAT64)
}

/// One-shot type inference for a single value
pub fn encode(value: &Value, hooks: HookTable<ColumnType>) -> Result<ColumnType> {
    ColumnarEncoder::new(hooks).encode(value)
}

/// One-shot table assembly from rows
pub fn encode_table(rows: &[Record], hooks: HookTable<ColumnType>) -> Result<Table> {
    TableEncoder::new(hooks).encode(rows)
}
