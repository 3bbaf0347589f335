use crate::error::{CoerceError, FieldPath, Result};
use crate::hooks::HookTable;
use crate::sql::encoding::SqlEncoding;
use crate::sql::builtin_hooks;
use crate::types::{Record, RuntimeType, Value};
use once_cell::sync::Lazy;
use std::collections::HashSet;

// Most SQL engines don't allow columns with nested data types, so these are
// rejected unless a hook maps them.
static NESTED: Lazy<HashSet<RuntimeType>> = Lazy::new(|| {
    [
        RuntimeType::List,
        RuntimeType::Tuple,
        RuntimeType::Set,
        RuntimeType::Range,
        RuntimeType::Map,
    ]
    .into_iter()
    .collect()
});

// Types with no obvious default SQL counterpart.
static UNSUPPORTED: Lazy<HashSet<RuntimeType>> =
    Lazy::new(|| [RuntimeType::Complex].into_iter().collect());

/// Encodes values into PostgreSQL column type names
#[derive(Debug, Clone)]
pub struct SqlEncoder {
    hooks: HookTable<String>,
}

impl SqlEncoder {
    /// Create an encoder with caller hooks layered over the built-in table
    pub fn new(hooks: HookTable<String>) -> Self {
        SqlEncoder {
            hooks: hooks.merged_over(builtin_hooks()),
        }
    }

    pub fn hooks(&self) -> &HookTable<String> {
        &self.hooks
    }

    /// Extract the SQL types of a value
    ///
    /// A hook for the value's own type always wins. Otherwise a mapping
    /// encodes to columns and any other iterable to one type per element;
    /// elements must themselves be flat.
    pub fn encode(&self, value: &Value) -> Result<SqlEncoding> {
        let ty = RuntimeType::of(value);

        if self.hooks.contains(&ty) {
            return self.hooks.resolve(&ty, &FieldPath::root()).map(SqlEncoding::Scalar);
        }

        if let Value::Map(record) = value {
            return self.encode_columns(record);
        }

        if let Some(len) = value.range_len() {
            return self.encode_range(len);
        }

        match value.elements() {
            Some(items) => self.encode_sequence(items),
            None if UNSUPPORTED.contains(&ty) => Err(CoerceError::UnsupportedType {
                ty,
                path: FieldPath::root(),
            }),
            None => Err(CoerceError::UnencodableType { ty }),
        }
    }

    fn encode_columns(&self, record: &Record) -> Result<SqlEncoding> {
        let types = record
            .iter()
            .map(|(name, value)| (FieldPath::root().field(name), RuntimeType::of(value)))
            .collect::<Vec<_>>();
        let resolved = self.validate_then_resolve(&types)?;

        tracing::debug!(columns = resolved.len(), "encoded mapping to SQL columns");
        Ok(SqlEncoding::Columns(
            record.keys().cloned().zip(resolved).collect(),
        ))
    }

    fn encode_sequence(&self, items: &[Value]) -> Result<SqlEncoding> {
        let types = items
            .iter()
            .enumerate()
            .map(|(i, item)| (FieldPath::root().index(i), RuntimeType::of(item)))
            .collect::<Vec<_>>();
        let resolved = self.validate_then_resolve(&types)?;

        tracing::debug!(elements = resolved.len(), "encoded sequence to SQL types");
        Ok(SqlEncoding::Sequence(resolved))
    }

    // Every element of a range is an integer, so its type is resolved once.
    fn encode_range(&self, len: usize) -> Result<SqlEncoding> {
        if len == 0 {
            return Ok(SqlEncoding::Sequence(Vec::new()));
        }

        let path = FieldPath::root().index(0);
        self.validate(&RuntimeType::Integer, &path)?;
        let ty = self.hooks.resolve(&RuntimeType::Integer, &path)?;

        let mut types = Vec::new();
        types
            .try_reserve_exact(len)
            .map_err(|_| CoerceError::SequenceTooLarge {
                len,
                path: FieldPath::root(),
            })?;
        types.resize(len, ty);

        tracing::debug!(elements = len, "encoded range to SQL types");
        Ok(SqlEncoding::Sequence(types))
    }

    /// Every element is checked before any hook is invoked.
    fn validate_then_resolve(&self, types: &[(FieldPath, RuntimeType)]) -> Result<Vec<String>> {
        for (path, ty) in types {
            self.validate(ty, path)?;
        }
        types
            .iter()
            .map(|(path, ty)| self.hooks.resolve(ty, path))
            .collect()
    }

    fn validate(&self, ty: &RuntimeType, path: &FieldPath) -> Result<()> {
        if self.hooks.contains(ty) {
            return Ok(());
        }

        if NESTED.contains(ty) {
            return Err(CoerceError::NestedType {
                ty: ty.clone(),
                path: path.clone(),
            });
        }

        Err(CoerceError::UnsupportedType {
            ty: ty.clone(),
            path: path.clone(),
        })
    }
}

impl Default for SqlEncoder {
    fn default() -> Self {
        SqlEncoder::new(HookTable::new())
    }
}
