/// Represents the column types a [crate::Table] can hold.
/// Every type maps onto a SQLite storage class when the table is loaded into
/// the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit floating-point number.
    Float,
    /// A variable-length UTF-8 character string.
    Text,
    /// A boolean value, stored as `0`/`1` in the backing store.
    Bool,
    /// Raw bytes.
    Blob,
}

impl DataType {
    /// The column type used in the `CREATE TABLE` statement of a bulk load.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Int | Self::Bool => "INTEGER",
            Self::Float => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_type() {
        assert_eq!(DataType::Int.sql_type(), "INTEGER");
        assert_eq!(DataType::Bool.sql_type(), "INTEGER");
        assert_eq!(DataType::Float.sql_type(), "REAL");
        assert_eq!(DataType::Text.sql_type(), "TEXT");
        assert_eq!(DataType::Blob.sql_type(), "BLOB");
    }
}
