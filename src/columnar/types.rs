use serde::{Deserialize, Serialize};
use std::fmt;

pub const INT64: &str = "int64";
pub const STRING: &str = "string";
pub const BOOL: &str = "bool";
pub const BINARY: &str = "binary";
pub const FLOAT64: &str = "double";

/// Arrow-style column type tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Primitive(String),
    List(Box<ColumnType>),
    Struct(Vec<Field>),
}

/// A named child of a struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Field {
            name: name.into(),
            data_type,
        }
    }
}

impl ColumnType {
    pub fn primitive(name: impl Into<String>) -> Self {
        ColumnType::Primitive(name.into())
    }

    pub fn list(item: ColumnType) -> Self {
        ColumnType::List(Box::new(item))
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            ColumnType::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        !matches!(self, ColumnType::Primitive(_))
    }
}

impl From<&str> for ColumnType {
    fn from(name: &str) -> Self {
        ColumnType::primitive(name)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Primitive(name) => f.write_str(name),
            ColumnType::List(item) => write!(f, "list<item: {}>", item),
            ColumnType::Struct(fields) => {
                f.write_str("struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str(">")
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type)
    }
}
