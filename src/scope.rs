use std::sync::Arc;

use crate::table::Table;

/// Named table bindings a [crate::TableQuery] resolves table names from.
///
/// Bindings are matched by identity: a handle resolves to the name it was
/// bound under, never to another binding whose table merely holds the same
/// data. The same handle may be bound under several names, the first binding
/// wins.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    bindings: Vec<(String, Arc<Table>)>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `table` under `name` and returns the handle to query it with.
    ///
    /// # Example
    /// ```
    /// # use dfquery::{Column, Scope, Table};
    /// let mut scope = Scope::new();
    /// let dt = scope.bind("DT", Table::from_columns(vec![Column::from_values("ID", [1])]).unwrap());
    ///
    /// assert_eq!(scope.name_of(&dt), Some("DT"));
    /// ```
    pub fn bind(&mut self, name: impl Into<String>, table: Table) -> Arc<Table> {
        let handle = Arc::new(table);
        self.bind_handle(name, Arc::clone(&handle));
        handle
    }

    /// Binds an existing handle under another name.
    pub fn bind_handle(&mut self, name: impl Into<String>, handle: Arc<Table>) {
        self.bindings.push((name.into(), handle));
    }

    /// The name `table` is bound under, by pointer identity.
    pub fn name_of(&self, table: &Arc<Table>) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, bound)| Arc::ptr_eq(bound, table))
            .map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Table>> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, table)| table)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
