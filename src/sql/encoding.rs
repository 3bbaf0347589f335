use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Result of encoding a value to SQL types
///
/// The shape follows the input: a scalar (or hooked) value gives one type
/// name, a mapping gives named columns in insertion order, and any other
/// iterable gives one type name per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlEncoding {
    Scalar(String),
    Columns(Vec<(String, String)>),
    Sequence(Vec<String>),
}

impl SqlEncoding {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            SqlEncoding::Scalar(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn columns(&self) -> Option<&[(String, String)]> {
        match self {
            SqlEncoding::Columns(columns) => Some(columns),
            _ => None,
        }
    }

    pub fn sequence(&self) -> Option<&[String]> {
        match self {
            SqlEncoding::Sequence(types) => Some(types),
            _ => None,
        }
    }

    /// Column list for DDL, e.g. `id integer, name text`
    pub fn column_definitions(&self) -> Option<String> {
        let columns = self.columns()?;
        Some(
            columns
                .iter()
                .map(|(name, ty)| format!("{} {}", name, ty))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// `CREATE TABLE` statement for a column encoding
    ///
    /// Names are emitted verbatim; quoting is left to the caller.
    pub fn create_table_statement(&self, table: &str) -> Option<String> {
        self.column_definitions()
            .map(|columns| format!("CREATE TABLE {}({});", table, columns))
    }
}

impl Serialize for SqlEncoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlEncoding::Scalar(ty) => serializer.serialize_str(ty),
            SqlEncoding::Columns(columns) => {
                let mut map = serializer.serialize_map(Some(columns.len()))?;
                for (name, ty) in columns {
                    map.serialize_entry(name, ty)?;
                }
                map.end()
            }
            SqlEncoding::Sequence(types) => {
                let mut seq = serializer.serialize_seq(Some(types.len()))?;
                for ty in types {
                    seq.serialize_element(ty)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> SqlEncoding {
        SqlEncoding::Columns(vec![
            ("id".to_string(), "integer".to_string()),
            ("name".to_string(), "text".to_string()),
        ])
    }

    #[test]
    fn test_create_table_statement() {
        assert_eq!(
            columns().create_table_statement("example").unwrap(),
            "CREATE TABLE example(id integer, name text);"
        );
        assert_eq!(SqlEncoding::Scalar("text".into()).create_table_statement("t"), None);
    }

    #[test]
    fn test_serialize_keeps_column_order() {
        let encoding = SqlEncoding::Columns(vec![
            ("zeta".to_string(), "text".to_string()),
            ("alpha".to_string(), "integer".to_string()),
        ]);
        assert_eq!(
            serde_json::to_string(&encoding).unwrap(),
            r#"{"zeta":"text","alpha":"integer"}"#
        );
        assert_eq!(
            serde_json::to_string(&SqlEncoding::Sequence(vec!["integer".into()])).unwrap(),
            r#"["integer"]"#
        );
    }
}
