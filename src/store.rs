use std::path::Path;

use log::debug;
use rusqlite::{Connection, params_from_iter};

use crate::error::{Error, Result};
use crate::table::Table;
use crate::tokenizer::has_trailing_statement;
use crate::value::Value;

/// One open connection to a backing store file.
///
/// A `Store` lives for the duration of a single client operation. The
/// connection is closed when the guard is dropped, on success and error
/// paths alike.
pub(crate) struct Store {
    conn: Connection,
    batch_size: usize,
}

impl Store {
    /// Opens (creating if needed) the SQLite database at `path`.
    pub fn open(path: &Path, batch_size: usize) -> Result<Self> {
        debug!("opening backing store {}", path.display());
        Ok(Self {
            conn: Connection::open(path)?,
            batch_size: batch_size.max(1),
        })
    }

    /// Copies `table` into the store as `name`, replacing any relation of
    /// that name.
    ///
    /// Rows are inserted in transactions of `batch_size` rows. The relation
    /// is recreated with the table's column types; a table without columns
    /// is rejected by the engine.
    pub fn load(&mut self, name: &str, table: &Table) -> Result<()> {
        debug!(
            "loading {} rows x {} columns as {name:?}",
            table.row_count,
            table.columns.len()
        );
        let quoted = quote_ident(name);
        let columns = table
            .schema
            .columns
            .iter()
            .map(|col| format!("{} {}", quote_ident(&col.name), col.data_type.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {quoted}"), [])?;
        tx.execute(&format!("CREATE TABLE {quoted} ({columns})"), [])?;
        tx.commit()?;

        let placeholders = vec!["?"; table.columns.len()].join(", ");
        let insert = format!("INSERT INTO {quoted} VALUES ({placeholders})");

        let mut start = 0;
        while start < table.row_count {
            let end = (start + self.batch_size).min(table.row_count);
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(&insert)?;
                for row in (start..end).filter_map(|row_idx| table.get_row(row_idx)) {
                    stmt.execute(params_from_iter(row.iter()))?;
                }
            }
            tx.commit()?;
            start = end;
        }
        Ok(())
    }

    /// Runs a query and collects every row it returns into a [Table].
    pub fn query(&self, sql: &str) -> Result<Table> {
        debug!("query: {sql}");
        ensure_single(sql)?;
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = names.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Table::from_rows(names, rows).map_err(Error::Table)
    }

    /// Runs a single statement to completion in autocommit mode. Rows it may
    /// produce are discarded.
    ///
    /// Statements that refuse to run inside a transaction (`VACUUM`,
    /// `BEGIN`, ...) go through here.
    pub fn execute(&self, sql: &str) -> Result<()> {
        debug!("execute: {sql}");
        ensure_single(sql)?;
        run(&self.conn, sql)
    }

    /// Runs a single statement inside a transaction and commits it. Nothing
    /// is written if the statement fails.
    pub fn execute_in_transaction(&mut self, sql: &str) -> Result<()> {
        debug!("execute in transaction: {sql}");
        ensure_single(sql)?;
        let tx = self.conn.transaction()?;
        run(&tx, sql)?;
        tx.commit()?;
        Ok(())
    }
}

fn ensure_single(sql: &str) -> Result<()> {
    if has_trailing_statement(sql) {
        return Err(Error::MultipleStatements);
    }
    Ok(())
}

fn run(conn: &Connection, sql: &str) -> Result<()> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    while rows.next()?.is_some() {}
    Ok(())
}

impl Drop for Store {
    fn drop(&mut self) {
        debug!("closing backing store connection");
    }
}

/// Quotes an identifier for SQLite, doubling embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
