use crate::types::RuntimeType;
use std::fmt;
use thiserror::Error;

/// One step from a container to one of its elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a value inside the top-level value being encoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        FieldPath::default()
    }

    pub fn field(&self, name: &str) -> Self {
        self.child(PathSegment::Field(name.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        FieldPath(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Errors raised while building hook tables or encoding values
///
/// Every variant aborts the encode call it came from. They are
/// deterministic: the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("invalid hook configuration: {0}")]
    Configuration(String),

    #[error("no type mapping for `{ty}` at {path}; remove the value, alias it to a supported type, or add a hook")]
    UnsupportedType { ty: RuntimeType, path: FieldPath },

    #[error("`{ty}` at {path} is a nested type and nested columns are not allowed; flatten it into its container or add a hook")]
    NestedType { ty: RuntimeType, path: FieldPath },

    #[error("cannot infer an element type from the empty list at {path}")]
    EmptyList { path: FieldPath },

    #[error("values of type `{ty}` cannot be encoded")]
    UnencodableType { ty: RuntimeType },

    #[error("value at {path} is nested deeper than the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize, path: FieldPath },

    #[error("sequence at {path} has {len} elements, too many to hold their types")]
    SequenceTooLarge { len: usize, path: FieldPath },
}

pub type Result<T> = std::result::Result<T, CoerceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        assert_eq!(FieldPath::root().to_string(), "<root>");

        let path = FieldPath::root().field("user").field("tags").index(0);
        assert_eq!(path.to_string(), "user.tags[0]");
        assert_eq!(FieldPath::root().index(2).field("id").to_string(), "[2].id");
    }

    #[test]
    fn test_error_names_type_and_location() {
        let err = CoerceError::NestedType {
            ty: RuntimeType::List,
            path: FieldPath::root().field("tags"),
        };
        let message = err.to_string();
        assert!(message.contains("`list`"));
        assert!(message.contains("tags"));
    }
}
