use std::fmt;

/// A dynamically-typed host value
///
/// The variants form the closed set of shapes the encoders understand.
/// `Named` carries values of caller-defined types (timestamps, decimals,
/// UUIDs, ...) that only a hook can map.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    Complex { re: f64, im: f64 },
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    Range { start: i64, stop: i64, step: i64 },
    Map(Record),
    Named { type_name: String, inner: Box<Value> },
}

impl Value {
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex { re, im }
    }

    /// Half-open integer range `[start, stop)` with a step of one
    pub fn range(start: i64, stop: i64) -> Self {
        Value::Range { start, stop, step: 1 }
    }

    /// Wrap a value as an instance of a caller-defined type
    pub fn named(type_name: impl Into<String>, inner: impl Into<Value>) -> Self {
        Value::Named {
            type_name: type_name.into(),
            inner: Box::new(inner.into()),
        }
    }

    pub fn runtime_type(&self) -> RuntimeType {
        RuntimeType::of(self)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Map(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Value::Map(record) => Some(record),
            _ => None,
        }
    }

    /// Elements of a list, tuple or set, in iteration order
    ///
    /// Ranges are iterable too but hold no elements; see [`Value::range_len`].
    pub(crate) fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Number of integers a range yields, or `None` for non-ranges
    pub fn range_len(&self) -> Option<usize> {
        match self {
            Value::Range { start, stop, step } => Some(range_len(*start, *stop, *step)),
            _ => None,
        }
    }
}

fn range_len(start: i64, stop: i64, step: i64) -> usize {
    let (start, stop, step) = (start as i128, stop as i128, step as i128);
    let len = if step > 0 && start < stop {
        (stop - start + step - 1) / step
    } else if step < 0 && start > stop {
        (start - stop - step - 1) / -step
    } else {
        0
    };
    usize::try_from(len).unwrap_or(usize::MAX)
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::UInt(value),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Map(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(arr) => Value::List(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Map(obj.into_iter().collect()),
        }
    }
}

/// Identifier of a value's runtime type; the key of every hook table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuntimeType {
    Null,
    Boolean,
    Integer,
    Float,
    Complex,
    Text,
    Bytes,
    List,
    Tuple,
    Set,
    Range,
    Map,
    /// A caller-defined type, identified by name
    Named(String),
}

impl RuntimeType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => RuntimeType::Null,
            Value::Bool(_) => RuntimeType::Boolean,
            Value::Int(_) | Value::UInt(_) => RuntimeType::Integer,
            Value::Float(_) => RuntimeType::Float,
            Value::Complex { .. } => RuntimeType::Complex,
            Value::Text(_) => RuntimeType::Text,
            Value::Bytes(_) => RuntimeType::Bytes,
            Value::List(_) => RuntimeType::List,
            Value::Tuple(_) => RuntimeType::Tuple,
            Value::Set(_) => RuntimeType::Set,
            Value::Range { .. } => RuntimeType::Range,
            Value::Map(_) => RuntimeType::Map,
            Value::Named { type_name, .. } => RuntimeType::Named(type_name.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RuntimeType::Null => "null",
            RuntimeType::Boolean => "boolean",
            RuntimeType::Integer => "integer",
            RuntimeType::Float => "float",
            RuntimeType::Complex => "complex",
            RuntimeType::Text => "text",
            RuntimeType::Bytes => "bytes",
            RuntimeType::List => "list",
            RuntimeType::Tuple => "tuple",
            RuntimeType::Set => "set",
            RuntimeType::Range => "range",
            RuntimeType::Map => "map",
            RuntimeType::Named(name) => name,
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for RuntimeType {
    fn from(name: &str) -> Self {
        match name {
            "null" => RuntimeType::Null,
            "boolean" => RuntimeType::Boolean,
            "integer" => RuntimeType::Integer,
            "float" => RuntimeType::Float,
            "complex" => RuntimeType::Complex,
            "text" => RuntimeType::Text,
            "bytes" => RuntimeType::Bytes,
            "list" => RuntimeType::List,
            "tuple" => RuntimeType::Tuple,
            "set" => RuntimeType::Set,
            "range" => RuntimeType::Range,
            "map" => RuntimeType::Map,
            other => RuntimeType::Named(other.to_string()),
        }
    }
}

/// Insertion-ordered, string-keyed mapping of values; also a table row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Insert a field, replacing the value in place if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_values(self) -> impl Iterator<Item = Value> {
        self.entries.into_iter().map(|(_, v)| v)
    }

    /// Return a copy with the same fields visited in ascending key order
    ///
    /// Only this level is reordered; nested records keep their own order.
    pub fn sorted_by_key(&self) -> Record {
        Record {
            entries: self
                .sorted_entries()
                .into_iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub(crate) fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Configuration for the recursive encoders
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Maximum nesting depth below the top-level value (0 = scalars only)
    pub max_depth: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig { max_depth: 32 }
    }
}
