use thiserror::Error;

use crate::tokenizer::StatementKind;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [crate::TableQuery].
#[derive(Debug, Error)]
pub enum Error {
    /// The statement does not carry the verb the called operation runs.
    /// Raised before the backing store is touched.
    #[error("not a {expected} statement: {operation} only runs {expected} statements")]
    StatementKindMismatch {
        expected: StatementKind,
        operation: &'static str,
    },

    /// A table handle passed to an operation is not bound in the scope.
    #[error("table has no binding in scope, bind it by name before querying it")]
    UnboundTable,

    /// The SQL holds more than one statement. Only the first would run, so
    /// nothing runs.
    #[error("only one statement can run at a time, found more after the first `;`")]
    MultipleStatements,

    /// A table could not be built from the rows the engine returned.
    #[error("invalid table: {0}")]
    Table(String),

    /// Failure reported by the SQL engine, passed through unchanged.
    #[error(transparent)]
    Engine(#[from] rusqlite::Error),

    /// Failure removing the backing store.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
