//! # Coerce - Type Extraction Toolkit
//!
//! Encode dynamically-typed values into the type vocabulary of other type
//! systems, without hand-writing per-field type declarations.
//!
//! ## Modules
//!
//! - **sql**: Extract PostgreSQL column types from values
//! - **columnar**: Infer Arrow-style struct/list/primitive types and tables
//! - **hooks**: Override or extend the built-in type mappings
//!
//! ## Quick Start
//!
//! ### SQL Types
//!
//! ```rust
//! use coerce::sql::SqlEncoder;
//! use coerce::Value;
//! use serde_json::json;
//!
//! # fn main() -> coerce::Result<()> {
//! let encoder = SqlEncoder::default();
//! let columns = encoder.encode(&Value::from(json!({"id": 0, "name": "foo bar"})))?;
//!
//! assert_eq!(
//!     columns.create_table_statement("example").as_deref(),
//!     Some("CREATE TABLE example(id integer, name text);")
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Columnar Tables
//!
//! ```rust
//! use coerce::columnar::TableEncoder;
//! use coerce::Record;
//!
//! # fn main() -> coerce::Result<()> {
//! let rows = vec![
//!     Record::new().with("id", 0).with("value", 1),
//!     Record::new().with("id", 1).with("value", 4),
//! ];
//!
//! let table = TableEncoder::default().encode(&rows)?;
//! assert_eq!(table.schema().to_string(), "struct<id: int64, value: int64>");
//! assert_eq!(table.num_rows(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ### Hooks
//!
//! ```rust
//! use coerce::{HookTable, RuntimeType, Value};
//! use serde_json::json;
//!
//! # fn main() -> coerce::Result<()> {
//! let hooks = HookTable::new().with_literal(RuntimeType::Text, "varchar");
//! let types = coerce::sql::encode(&Value::from(json!([1, "test", true])), hooks)?;
//!
//! assert_eq!(types.sequence().unwrap(), ["integer", "varchar", "boolean"]);
//! # Ok(())
//! # }
//! ```

pub mod columnar;
pub mod error;
pub mod hooks;
pub mod sql;
pub mod types;

// Re-export commonly used types for convenience
pub use columnar::{ColumnType, ColumnarEncoder, Field, Table, TableEncoder};
pub use error::{CoerceError, FieldPath, PathSegment, Result};
pub use hooks::{HookTable, Resolver};
pub use sql::{SqlEncoder, SqlEncoding};
pub use types::{EncoderConfig, Record, RuntimeType, Value};

/// Convert parsed JSON documents into table rows
///
/// Fails with [`CoerceError::UnencodableType`] on the first document that is
/// not an object.
pub fn rows_from_json<I>(documents: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = serde_json::Value>,
{
    documents
        .into_iter()
        .map(|doc| {
            let value = Value::from(doc);
            let ty = value.runtime_type();
            value
                .into_record()
                .ok_or(CoerceError::UnencodableType { ty })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sql_and_columnar_agree_on_shape() {
        let document = json!({"a": 1, "b": true});

        let sql = SqlEncoder::default().encode(&Value::from(document.clone())).unwrap();
        assert_eq!(sql.column_definitions().unwrap(), "a integer, b boolean");

        let columnar = ColumnarEncoder::default().encode(&Value::from(document)).unwrap();
        assert_eq!(
            columnar,
            ColumnType::Struct(vec![
                Field::new("a", ColumnType::primitive("int64")),
                Field::new("b", ColumnType::primitive("bool")),
            ])
        );
    }

    #[test]
    fn test_rows_from_json() {
        let rows = rows_from_json(vec![json!({"id": 0}), json!({"id": 1})]).unwrap();
        assert_eq!(rows.len(), 2);

        let err = rows_from_json(vec![json!({"id": 0}), json!([1])]).unwrap_err();
        assert_eq!(err, CoerceError::UnencodableType { ty: RuntimeType::List });
    }

    #[test]
    fn test_encoders_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqlEncoder>();
        assert_send_sync::<ColumnarEncoder>();
        assert_send_sync::<TableEncoder>();
    }
}
