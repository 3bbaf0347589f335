//! Hook tables: the scalar type resolver shared by both encoders
//!
//! A hook maps one runtime type to one target type token, either as a
//! literal or as a function of the runtime type. Encoders merge caller hooks
//! over their built-in tables at construction and never mutate them after.

use crate::error::{CoerceError, FieldPath, Result};
use crate::types::RuntimeType;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type HookFn<T> = Arc<dyn Fn(&RuntimeType) -> T + Send + Sync>;

/// How a single runtime type is resolved to a target type
#[derive(Clone)]
pub enum Resolver<T> {
    Literal(T),
    Function(HookFn<T>),
}

impl<T: Clone> Resolver<T> {
    /// Function results are returned as-is; caller hooks are trusted.
    pub fn resolve(&self, ty: &RuntimeType) -> T {
        match self {
            Resolver::Literal(token) => token.clone(),
            Resolver::Function(f) => f(ty),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolver::Literal(token) => f.debug_tuple("Literal").field(token).finish(),
            Resolver::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Mapping from runtime type to resolver
#[derive(Clone)]
pub struct HookTable<T> {
    entries: HashMap<RuntimeType, Resolver<T>>,
}

impl<T> Default for HookTable<T> {
    fn default() -> Self {
        HookTable {
            entries: HashMap::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HookTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map().entries(entries).finish()
    }
}

impl<T: Clone> HookTable<T> {
    pub fn new() -> Self {
        HookTable::default()
    }

    pub fn with_literal(mut self, ty: impl Into<RuntimeType>, token: impl Into<T>) -> Self {
        self.insert(ty, Resolver::Literal(token.into()));
        self
    }

    pub fn with_function<F>(mut self, ty: impl Into<RuntimeType>, f: F) -> Self
    where
        F: Fn(&RuntimeType) -> T + Send + Sync + 'static,
    {
        self.insert(ty, Resolver::Function(Arc::new(f)));
        self
    }

    pub fn insert(&mut self, ty: impl Into<RuntimeType>, resolver: Resolver<T>) -> Option<Resolver<T>> {
        self.entries.insert(ty.into(), resolver)
    }

    pub fn contains(&self, ty: &RuntimeType) -> bool {
        self.entries.contains_key(ty)
    }

    pub fn get(&self, ty: &RuntimeType) -> Option<&Resolver<T>> {
        self.entries.get(ty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layer these hooks over `base`; entries in `self` win on conflict.
    pub fn merged_over(self, mut base: HookTable<T>) -> HookTable<T> {
        base.entries.extend(self.entries);
        base
    }

    /// Resolve `ty` to its target type, failing if no hook covers it
    pub fn resolve(&self, ty: &RuntimeType, path: &FieldPath) -> Result<T> {
        let resolver = self.entries.get(ty).ok_or_else(|| CoerceError::UnsupportedType {
            ty: ty.clone(),
            path: path.clone(),
        })?;
        tracing::trace!(runtime_type = %ty, at = %path, "resolving hook");
        Ok(resolver.resolve(ty))
    }

    /// Load literal hooks from a JSON object of `{"type name": "token"}`
    ///
    /// `parse` turns each token string into the target type.
    pub fn from_json(hooks: &serde_json::Value, parse: impl Fn(&str) -> T) -> Result<Self> {
        let object = hooks.as_object().ok_or_else(|| {
            CoerceError::Configuration(format!(
                "hooks must be a mapping from type names to type tokens, got {}",
                json_kind(hooks)
            ))
        })?;

        let mut table = HookTable::new();
        for (name, token) in object {
            let token = token.as_str().ok_or_else(|| {
                CoerceError::Configuration(format!(
                    "hook for `{}` must be literal or callable, got {}",
                    name,
                    json_kind(token)
                ))
            })?;
            table.insert(name.as_str(), Resolver::Literal(parse(token)));
        }
        Ok(table)
    }
}

impl<T: Clone> FromIterator<(RuntimeType, Resolver<T>)> for HookTable<T> {
    fn from_iter<I: IntoIterator<Item = (RuntimeType, Resolver<T>)>>(iter: I) -> Self {
        HookTable {
            entries: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
