use crate::columnar::builtin_hooks;
use crate::columnar::types::{ColumnType, Field};
use crate::error::{CoerceError, FieldPath, Result};
use crate::hooks::HookTable;
use crate::types::{EncoderConfig, Record, RuntimeType, Value};

/// Converts values into Arrow-style column types
#[derive(Debug, Clone)]
pub struct ColumnarEncoder {
    hooks: HookTable<ColumnType>,
    config: EncoderConfig,
}

impl ColumnarEncoder {
    pub fn new(hooks: HookTable<ColumnType>) -> Self {
        Self::with_config(hooks, EncoderConfig::default())
    }

    pub fn with_config(hooks: HookTable<ColumnType>, config: EncoderConfig) -> Self {
        ColumnarEncoder {
            hooks: hooks.merged_over(builtin_hooks()),
            config,
        }
    }

    pub fn hooks(&self) -> &HookTable<ColumnType> {
        &self.hooks
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Infer the column type of a value
    ///
    /// Lists take the type of their first element, mappings become structs
    /// with fields in ascending key order, and everything else goes through
    /// the hook table. A hook for `list` or `map` replaces that decomposition
    /// and is returned as-is. Cyclic values are not representable in [`Value`], so
    /// only `max_depth` bounds the recursion.
    pub fn encode(&self, value: &Value) -> Result<ColumnType> {
        self.encode_at(value, &FieldPath::root(), 0)
    }

    pub(crate) fn encode_at(&self, value: &Value, path: &FieldPath, depth: usize) -> Result<ColumnType> {
        if depth > self.config.max_depth {
            return Err(CoerceError::DepthExceeded {
                max_depth: self.config.max_depth,
                path: path.clone(),
            });
        }

        let ty = RuntimeType::of(value);
        if self.hooks.contains(&ty) {
            return self.hooks.resolve(&ty, path);
        }

        match value {
            Value::List(items) => {
                let first = items
                    .first()
                    .ok_or_else(|| CoerceError::EmptyList { path: path.clone() })?;
                let item = self.encode_at(first, &path.index(0), depth + 1)?;
                Ok(ColumnType::list(item))
            }
            Value::Map(record) => self.encode_struct(record, path, depth),
            _ => self.hooks.resolve(&ty, path),
        }
    }

    // Field order must not depend on insertion order, or the same shape
    // seen in two rows yields two different schemas.
    fn encode_struct(&self, record: &Record, path: &FieldPath, depth: usize) -> Result<ColumnType> {
        let fields = record
            .sorted_entries()
            .into_iter()
            .map(|(name, value)| {
                let data_type = self.encode_at(value, &path.field(name), depth + 1)?;
                Ok(Field::new(name.clone(), data_type))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ColumnType::Struct(fields))
    }
}

impl Default for ColumnarEncoder {
    fn default() -> Self {
        ColumnarEncoder::new(HookTable::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columnar::types::{BINARY, BOOL, FLOAT64, INT64, STRING};
    use serde_json::json;

    fn prim(name: &str) -> ColumnType {
        ColumnType::primitive(name)
    }

    #[test]
    fn test_scalars() {
        let encoder = ColumnarEncoder::default();
        assert_eq!(encoder.encode(&Value::from(1)).unwrap(), prim(INT64));
        assert_eq!(encoder.encode(&Value::from("hello world")).unwrap(), prim(STRING));
        assert_eq!(encoder.encode(&Value::from(true)).unwrap(), prim(BOOL));
        assert_eq!(encoder.encode(&Value::from(vec![1u8])).unwrap(), prim(BINARY));
        assert_eq!(encoder.encode(&Value::from(0.5)).unwrap(), prim(FLOAT64));
    }

    #[test]
    fn test_large_unsigned_json_integer() {
        let encoder = ColumnarEncoder::default();
        let ty = encoder.encode(&Value::from(json!({"n": 18446744073709551615u64}))).unwrap();

        assert_eq!(ty.to_string(), "struct<n: int64>");
    }

    #[test]
    fn test_list_uses_first_element() {
        let encoder = ColumnarEncoder::default();
        let ty = encoder.encode(&Value::from(json!([1, 2]))).unwrap();

        assert_eq!(ty, ColumnType::list(prim(INT64)));
        assert_eq!(ty.to_string(), "list<item: int64>");
    }

    #[test]
    fn test_struct() {
        let encoder = ColumnarEncoder::default();
        let ty = encoder.encode(&Value::from(json!({"a": 1, "b": true}))).unwrap();

        assert_eq!(
            ty,
            ColumnType::Struct(vec![Field::new("a", prim(INT64)), Field::new("b", prim(BOOL))])
        );
        assert_eq!(ty.to_string(), "struct<a: int64, b: bool>");
    }

    #[test]
    fn test_key_order_invariance() {
        let encoder = ColumnarEncoder::default();
        let first = Record::new()
            .with("foo", Record::new().with("bar", Record::new()).with("bac", Record::new()).with("foo", 1))
            .with("alpha", "x");
        let second = Record::new()
            .with("alpha", "x")
            .with("foo", Record::new().with("foo", 1).with("bac", Record::new()).with("bar", Record::new()));

        let a = encoder.encode(&Value::Map(first)).unwrap();
        let b = encoder.encode(&Value::Map(second)).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.to_string(),
            "struct<alpha: string, foo: struct<bac: struct<>, bar: struct<>, foo: int64>>"
        );
    }

    #[test]
    fn test_empty_list_rejected() {
        let encoder = ColumnarEncoder::default();

        let err = encoder.encode(&Value::from(json!([]))).unwrap_err();
        assert_eq!(err, CoerceError::EmptyList { path: FieldPath::root() });

        let err = encoder.encode(&Value::from(json!({"a": {"tags": []}}))).unwrap_err();
        assert_eq!(
            err,
            CoerceError::EmptyList {
                path: FieldPath::root().field("a").field("tags")
            }
        );
    }

    #[test]
    fn test_unsupported_leaf() {
        let encoder = ColumnarEncoder::default();

        let err = encoder.encode(&Value::from(json!({"a": [null]}))).unwrap_err();
        assert_eq!(
            err,
            CoerceError::UnsupportedType {
                ty: RuntimeType::Null,
                path: FieldPath::root().field("a").index(0),
            }
        );
        assert!(matches!(
            encoder.encode(&Value::Tuple(vec![Value::from(1)])),
            Err(CoerceError::UnsupportedType { ty: RuntimeType::Tuple, .. })
        ));
    }

    #[test]
    fn test_hooks_extend_and_override() {
        let encoder = ColumnarEncoder::new(
            HookTable::new()
                .with_literal(RuntimeType::Integer, "int32")
                .with_function("datetime", |_: &RuntimeType| ColumnType::primitive("timestamp[us]")),
        );
        let value = Value::Map(
            Record::new()
                .with("n", 1)
                .with("at", Value::named("datetime", "2021-01-01T00:00:00")),
        );

        assert_eq!(encoder.encode(&value).unwrap().to_string(), "struct<at: timestamp[us], n: int32>");
    }

    #[test]
    fn test_hook_for_mapping_short_circuits() {
        let encoder = ColumnarEncoder::new(HookTable::new().with_literal(RuntimeType::Map, "json"));
        let value = Value::from(json!({"a": {"b": []}}));

        assert_eq!(encoder.encode(&value).unwrap(), prim("json"));
    }

    #[test]
    fn test_depth_limit() {
        let encoder = ColumnarEncoder::with_config(HookTable::new(), EncoderConfig { max_depth: 2 });

        assert!(encoder.encode(&Value::from(json!({"a": {"b": 1}}))).is_ok());
        let err = encoder.encode(&Value::from(json!({"a": {"b": [1]}}))).unwrap_err();
        assert_eq!(
            err,
            CoerceError::DepthExceeded {
                max_depth: 2,
                path: FieldPath::root().field("a").field("b").index(0),
            }
        );
    }
}
