use crate::column::Column;
use crate::data_type::DataType;
use crate::value::Value;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    fn describe(columns: &[Column]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|col| ColumnDef {
                    name: col.name.clone(),
                    data_type: col.data_type,
                })
                .collect(),
        }
    }
}

/// An in-memory table: ordered, typed columns sharing one row count.
///
/// A table carries no name of its own. The name it is queried under comes
/// from the [crate::Scope] binding that holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub schema: Schema,
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        let columns = schema
            .columns
            .iter()
            .map(|column| Column::new(column.name.clone(), column.data_type))
            .collect();
        Self {
            schema,
            columns,
            row_count: 0,
        }
    }

    /// Assembles a table from already built columns.
    ///
    /// # Errors
    /// Returns an error if the columns do not all have the same length.
    ///
    /// # Example
    /// ```
    /// # use dfquery::{Column, Table, Value};
    /// let table = Table::from_columns(vec![
    ///     Column::from_values("ID", [100, 200, 300]),
    ///     Column::from_values("AGE", [10, 20, 30]),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(table.row_count, 3);
    /// assert_eq!(table.get_row(1), Some(vec![Value::Int(200), Value::Int(20)]));
    /// ```
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, String> {
        let row_count = columns.first().map_or(0, Column::len);
        if let Some(col) = columns.iter().find(|col| col.len() != row_count) {
            return Err(format!(
                "column {:?} has {} rows while the table has {row_count}",
                col.name,
                col.len()
            ));
        }
        Ok(Self {
            schema: Schema::describe(&columns),
            columns,
            row_count,
        })
    }

    /// Bulk load from row-oriented data, inferring every column's type
    /// with [Column::from_values].
    ///
    /// # Errors
    /// Returns an error if a row does not have one value per column name.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, String> {
        let mut cells: Vec<Vec<Value>> = names
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(format!(
                    "row {row_idx} has {} values while the table has {} columns",
                    row.len(),
                    names.len()
                ));
            }
            for (col, value) in cells.iter_mut().zip(row) {
                col.push(value);
            }
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::from_values(name, values))
            .collect();
        Self::from_columns(columns)
    }

    /// insert a new row
    pub fn insert(&mut self, values: Vec<Value>) -> Result<(), String> {
        // different sizes
        if values.len() != self.schema.columns.len() {
            return Err(format!(
                "size of the row mismatched with the size of a table row, {:?} vs {:?}",
                values.len(),
                self.schema.columns.len()
            ));
        }
        // check every value before touching a column so a failed insert leaves no partial row
        for (value, def) in values.iter().zip(&self.schema.columns) {
            if value.data_type().is_some_and(|t| t != def.data_type) {
                return Err(format!(
                    "type of value {:?} mismatch with schema column type: {:?} vs {:?}",
                    value,
                    value.data_type(),
                    def.data_type
                ));
            }
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value)?;
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn get_row(&self, row_idx: usize) -> Option<Vec<Value>> {
        if self.row_count <= row_idx {
            return None;
        }
        self.columns
            .iter()
            .map(|col| col.get(row_idx)) // -> Option<Value>
            .collect()
    }

    /// Bulk dump to row-oriented data, in row order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.row_count).filter_map(|row_idx| self.get_row(row_idx))
    }

    pub fn get_col(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// Casts columns back to the types a template schema declares for them.
    ///
    /// Columns are matched by name, ignoring ASCII case like SQLite does.
    /// A column whose values cannot be represented in the template type keeps
    /// its current type, so a REAL written into an INTEGER column stays Float.
    pub fn conform_to(self, template: &Schema) -> Self {
        let row_count = self.row_count;
        let columns: Vec<Column> = self
            .columns
            .into_iter()
            .map(|col| {
                template
                    .columns
                    .iter()
                    .find(|def| def.name.eq_ignore_ascii_case(&col.name))
                    .and_then(|def| col.cast(def.data_type).ok())
                    .unwrap_or(col)
            })
            .collect();
        Self {
            schema: Schema::describe(&columns),
            columns,
            row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people_schema() -> Schema {
        Schema {
            columns: vec![
                ColumnDef {
                    name: "id".into(),
                    data_type: DataType::Int,
                },
                ColumnDef {
                    name: "active".into(),
                    data_type: DataType::Bool,
                },
            ],
        }
    }

    #[test]
    fn test_table_insert_and_get() {
        let mut table = Table::new(people_schema());

        table.insert(vec![Value::Int(1), Value::Bool(true)]).unwrap();
        table.insert(vec![Value::Int(2), Value::Null]).unwrap();

        assert_eq!(table.row_count, 2);
        assert_eq!(table.get_row(0), Some(vec![Value::Int(1), Value::Bool(true)]));
        assert_eq!(table.get_row(1), Some(vec![Value::Int(2), Value::Null]));
        assert_eq!(table.get_row(2), None);
    }

    #[test]
    fn test_insert_rejects_bad_rows() {
        let mut table = Table::new(people_schema());

        assert!(table.insert(vec![Value::Int(1)]).is_err());
        assert!(table
            .insert(vec![Value::Int(1), Value::Text("yes".into())])
            .is_err());

        assert_eq!(table.row_count, 0);
        assert!(table.columns.iter().all(Column::is_empty));
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = Table::from_columns(vec![
            Column::from_values("ID", [1, 2]),
            Column::from_values("AGE", [10]),
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_from_rows_and_rows() {
        let rows = vec![
            vec![Value::Int(100), Value::Text("foo".into())],
            vec![Value::Int(200), Value::Null],
        ];
        let table = Table::from_rows(vec!["ID".into(), "NAME".into()], rows.clone()).unwrap();

        assert_eq!(table.column_names(), vec!["ID", "NAME"]);
        assert_eq!(table.get_col("NAME").unwrap().data_type, DataType::Text);
        assert_eq!(table.rows().collect::<Vec<_>>(), rows);

        let ragged = Table::from_rows(vec!["ID".into()], vec![vec![]]);
        assert!(ragged.is_err());
    }

    #[test]
    fn test_from_rows_empty() {
        let table = Table::from_rows(vec!["ID".into()], vec![]).unwrap();

        assert_eq!(table.row_count, 0);
        assert_eq!(table.column_names(), vec!["ID"]);
    }

    #[test]
    fn test_conform_to() {
        let stored = Table::from_columns(vec![
            Column::from_values("ID", [1, 2]),
            Column::from_values("ACTIVE", [1, 0]),
            Column::from_values("extra", ["x", "y"]),
        ])
        .unwrap();

        let table = stored.conform_to(&people_schema());

        assert_eq!(table.get_col("ACTIVE").unwrap().data_type, DataType::Bool);
        assert_eq!(table.get_col("ID").unwrap().data_type, DataType::Int);
        assert_eq!(table.get_col("extra").unwrap().data_type, DataType::Text);
        assert_eq!(
            table.get_row(0),
            Some(vec![Value::Int(1), Value::Bool(true), Value::Text("x".into())])
        );
    }

    #[test]
    fn test_conform_to_keeps_uncastable_columns() {
        let stored = Table::from_columns(vec![Column::from_values("active", [7])]).unwrap();

        let table = stored.conform_to(&people_schema());

        assert_eq!(table.get_col("active").unwrap().data_type, DataType::Int);
    }
}
