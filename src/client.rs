use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::options::Options;
use crate::scope::Scope;
use crate::store::{Store, quote_ident};
use crate::table::Table;
use crate::tokenizer::{StatementKind, classify};

/// Runs SQL against in-memory tables.
///
/// Every operation opens the client's private SQLite file, copies the tables
/// it was given into it under their scope names, runs the statement and
/// closes the connection again before returning. The file itself lives until
/// [TableQuery::close].
///
/// # Example
/// ```
/// use dfquery::{Column, Scope, Table, TableQuery, Value};
///
/// let mut scope = Scope::new();
/// let dt = scope.bind(
///     "DT",
///     Table::from_columns(vec![
///         Column::from_values("ID", [100, 200, 300]),
///         Column::from_values("AGE", [10, 20, 30]),
///     ])
///     .unwrap(),
/// );
///
/// let client = TableQuery::new(&scope);
/// let result = client.read(&dt, "select * from DT where id = 200", &[]).unwrap();
/// assert_eq!(result.get_row(0), Some(vec![Value::Int(200), Value::Int(20)]));
///
/// client.close().unwrap();
/// ```
pub struct TableQuery<'s> {
    /// Bindings used to name the tables handed to each operation.
    scope: &'s Scope,
    /// Unique identifier of the backing store.
    id: String,
    /// Location of the backing store file, `store_dir/id`.
    path: PathBuf,
    options: Options,
}

impl<'s> TableQuery<'s> {
    /// Creates a client with default [Options]. No I/O happens here.
    pub fn new(scope: &'s Scope) -> Self {
        Self::with_options(scope, Options::default())
    }

    pub fn with_options(scope: &'s Scope, options: Options) -> Self {
        let id = Uuid::new_v4().to_string();
        let path = options.store_dir.join(&id);
        debug!("new client, backing store {}", path.display());
        Self {
            scope,
            id,
            path,
            options,
        }
    }

    /// Unique identifier of this client's backing store.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store_path(&self) -> &Path {
        &self.path
    }

    /// The scope name `table` is bound under, matched by identity.
    pub fn resolve_name(&self, table: &Arc<Table>) -> Option<&'s str> {
        self.scope.name_of(table)
    }

    /// Runs a `SELECT` statement over `table` and `resources`.
    ///
    /// # Errors
    /// - [Error::StatementKindMismatch] if `sql` has no `SELECT` keyword,
    ///   before anything is written to the store.
    /// - [Error::UnboundTable] if a table has no binding in scope.
    /// - [Error::MultipleStatements] if `sql` holds more than one statement.
    /// - [Error::Engine] for anything SQLite rejects.
    pub fn read(&self, table: &Arc<Table>, sql: &str, resources: &[&Arc<Table>]) -> Result<Table> {
        ensure_kind(sql, StatementKind::Select, "read")?;

        let mut store = self.open()?;
        self.load(&mut store, table, resources)?;
        store.query(sql)
    }

    /// Runs an `UPDATE` statement against the store copy of `table` and
    /// returns the whole relation as it reads afterwards.
    ///
    /// `table` itself is left untouched. Columns of the result keep the
    /// types `table` declares when the stored values still fit them.
    ///
    /// # Errors
    /// Same as [TableQuery::read], with `UPDATE` as the expected keyword.
    pub fn update(
        &self,
        table: &Arc<Table>,
        sql: &str,
        resources: &[&Arc<Table>],
    ) -> Result<Table> {
        ensure_kind(sql, StatementKind::Update, "update")?;

        let mut store = self.open()?;
        let target = self.load(&mut store, table, resources)?;
        store.execute_in_transaction(sql)?;

        let updated = store.query(&format!("SELECT * FROM {}", quote_ident(target)))?;
        Ok(updated.conform_to(&table.schema))
    }

    /// Runs any single statement in autocommit mode. Typically DDL, but
    /// `VACUUM` and pragmas work too.
    ///
    /// # Errors
    /// - [Error::MultipleStatements] if `sql` holds more than one statement.
    /// - [Error::Engine] for anything SQLite rejects.
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.open()?.execute(sql)
    }

    /// Removes the backing store file.
    ///
    /// A client that never ran an operation has no file, which is not an
    /// error.
    pub fn close(self) -> Result<()> {
        info!("removing backing store {}", self.path.display());
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => Ok(other?),
        }
    }

    fn open(&self) -> Result<Store> {
        Store::open(&self.path, self.options.batch_size)
    }

    /// Loads the primary table then every resource, each under its scope
    /// name. Returns the primary table's name.
    fn load(
        &self,
        store: &mut Store,
        table: &Arc<Table>,
        resources: &[&Arc<Table>],
    ) -> Result<&'s str> {
        let target = self.resolve_name(table).ok_or(Error::UnboundTable)?;
        store.load(target, table)?;

        for resource in resources {
            let name = self.resolve_name(resource).ok_or(Error::UnboundTable)?;
            store.load(name, resource)?;
        }
        Ok(target)
    }
}

fn ensure_kind(sql: &str, expected: StatementKind, operation: &'static str) -> Result<()> {
    if classify(sql, expected) {
        Ok(())
    } else {
        Err(Error::StatementKindMismatch {
            expected,
            operation,
        })
    }
}
