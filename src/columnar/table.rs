use crate::columnar::encoder::ColumnarEncoder;
use crate::columnar::types::{ColumnType, Field};
use crate::error::{FieldPath, Result};
use crate::hooks::HookTable;
use crate::types::{EncoderConfig, Record, Value};

/// One named column of values, in row order
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// A shared struct schema plus the column-oriented values of every row
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: ColumnType,
    columns: Vec<Column>,
}

impl Table {
    pub fn empty() -> Self {
        Table {
            schema: ColumnType::Struct(Vec::new()),
            columns: Vec::new(),
        }
    }

    /// Always a [`ColumnType::Struct`]
    pub fn schema(&self) -> &ColumnType {
        &self.schema
    }

    pub fn fields(&self) -> &[Field] {
        self.schema.fields().unwrap_or(&[])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn into_parts(self) -> (ColumnType, Vec<Column>) {
        (self.schema, self.columns)
    }
}

/// Builds a [`Table`] from rows of uniformly-shaped records
///
/// The column set comes from the first row, after sorting its keys, and each
/// column's type is inferred from the first row's value alone. Later rows are
/// not checked against it: their values are taken by position, and a row
/// with fewer fields than the first contributes nulls for the missing ones.
#[derive(Debug, Clone, Default)]
pub struct TableEncoder {
    type_encoder: ColumnarEncoder,
}

impl TableEncoder {
    pub fn new(hooks: HookTable<ColumnType>) -> Self {
        TableEncoder {
            type_encoder: ColumnarEncoder::new(hooks),
        }
    }

    pub fn with_config(hooks: HookTable<ColumnType>, config: EncoderConfig) -> Self {
        TableEncoder {
            type_encoder: ColumnarEncoder::with_config(hooks, config),
        }
    }

    pub fn type_encoder(&self) -> &ColumnarEncoder {
        &self.type_encoder
    }

    pub fn encode(&self, rows: &[Record]) -> Result<Table> {
        if rows.is_empty() {
            tracing::debug!("no rows, returning empty table");
            return Ok(Table::empty());
        }

        let rows: Vec<Record> = rows.iter().map(Record::sorted_by_key).collect();

        let fields = rows[0]
            .iter()
            .map(|(name, value)| {
                let path = FieldPath::root().field(name);
                let data_type = self.type_encoder.encode_at(value, &path, 1)?;
                Ok(Field::new(name.clone(), data_type))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut columns: Vec<Column> = fields
            .iter()
            .map(|field| Column {
                name: field.name.clone(),
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        let num_rows = rows.len();
        for row in rows {
            let mut values = row.into_values();
            for column in columns.iter_mut() {
                column.values.push(values.next().unwrap_or(Value::Null));
            }
        }

        tracing::debug!(rows = num_rows, columns = columns.len(), "assembled table");
        Ok(Table {
            schema: ColumnType::Struct(fields),
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columnar::types::INT64;
    use crate::error::CoerceError;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Record> {
        match Value::from(value) {
            Value::List(items) => items.into_iter().filter_map(Value::into_record).collect(),
            _ => panic!("expected a list of rows"),
        }
    }

    #[test]
    fn test_encode_rows() {
        let encoder = TableEncoder::default();
        let table = encoder
            .encode(&rows(json!([{"id": 0, "value": 1}, {"id": 1, "value": 4}])))
            .unwrap();

        assert_eq!(
            table.schema(),
            &ColumnType::Struct(vec![
                Field::new("id", ColumnType::primitive(INT64)),
                Field::new("value", ColumnType::primitive(INT64)),
            ])
        );
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("id").unwrap().values, vec![Value::Int(0), Value::Int(1)]);
        assert_eq!(table.column("value").unwrap().values, vec![Value::Int(1), Value::Int(4)]);
    }

    #[test]
    fn test_empty_rows() {
        let table = TableEncoder::default().encode(&[]).unwrap();

        assert_eq!(table, Table::empty());
        assert!(table.fields().is_empty());
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_rows_normalized_independently() {
        let encoder = TableEncoder::default();
        let table = encoder
            .encode(&[
                Record::new().with("b", "x").with("a", 1),
                Record::new().with("a", 2).with("b", "y"),
            ])
            .unwrap();

        assert_eq!(table.schema().to_string(), "struct<a: int64, b: string>");
        assert_eq!(table.column("a").unwrap().values, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(table.column("b").unwrap().values, vec![Value::from("x"), Value::from("y")]);
    }

    #[test]
    fn test_nested_columns() {
        let encoder = TableEncoder::default();
        let table = encoder
            .encode(&rows(json!([{"foo": {"bar": {}, "bac": {}, "foo": 1}, "tags": ["a"]}])))
            .unwrap();

        assert_eq!(
            table.schema().to_string(),
            "struct<foo: struct<bac: struct<>, bar: struct<>, foo: int64>, tags: list<item: string>>"
        );
    }

    #[test]
    fn test_schema_from_first_row_only() {
        let encoder = TableEncoder::default();
        let table = encoder
            .encode(&rows(json!([{"id": 1}, {"id": "not a number"}])))
            .unwrap();

        assert_eq!(table.schema().to_string(), "struct<id: int64>");
        assert_eq!(table.column("id").unwrap().values[1], Value::from("not a number"));
    }

    #[test]
    fn test_short_rows_padded_with_null() {
        let encoder = TableEncoder::default();
        let table = encoder
            .encode(&rows(json!([{"a": 1, "b": 2}, {"a": 3}])))
            .unwrap();

        assert_eq!(table.column("b").unwrap().values, vec![Value::Int(2), Value::Null]);
    }

    #[test]
    fn test_first_row_errors_propagate() {
        let encoder = TableEncoder::default();
        let err = encoder.encode(&rows(json!([{"tags": []}]))).unwrap_err();

        assert_eq!(
            err,
            CoerceError::EmptyList {
                path: FieldPath::root().field("tags")
            }
        );
    }
}
