use std::sync::Arc;

use crate::data_type::DataType;
use crate::value::Value;
use bitvec::prelude::*;

/// Physical storage for column data.
/// Each variant wraps a collection of a specific type to ensure contiguous memory
/// allocation (columnar storage).
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Vector of 64-bit integers.
    Int(Vec<i64>),
    /// Vector of 64-bit floats.
    Float(Vec<f64>),
    /// Vector of thread-safe atomic reference-counted strings.
    Text(Vec<Arc<str>>),
    /// Compact bit-vector for boolean values.
    Bool(BitVec),
    /// Vector of shared byte strings.
    Blob(Vec<Arc<[u8]>>),
}

/// Represents a column within a table.
/// It combines metadata (name, type) with actual data and a nullability tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column.
    pub name: String,
    /// The logical data type of the column.
    pub data_type: DataType,
    /// The actual values stored in the column.
    pub data: ColumnData,
    /// A bitmap where a `true` bit indicates that the value at that index is `NULL`.
    pub null_bitmap: BitVec,
}

impl Column {
    /// Creates a new, empty column with the specified name and data type.
    /// The underlying data storage is initialized according to the data type.
    pub fn new(name: String, data_type: DataType) -> Self {
        let data = match data_type {
            DataType::Int => ColumnData::Int(vec![]),
            DataType::Float => ColumnData::Float(vec![]),
            DataType::Bool => ColumnData::Bool(bitvec!()),
            DataType::Text => ColumnData::Text(vec![]),
            DataType::Blob => ColumnData::Blob(vec![]),
        };
        Self {
            name,
            data_type,
            data,
            null_bitmap: bitvec!(),
        }
    }

    /// Appends a new value to the end of the column.
    ///
    /// A `Null` pushes a placeholder into the data vector so that it stays
    /// aligned with `null_bitmap`.
    ///
    /// # Errors
    /// Returns an error if the value's type does not match the column's data type.
    ///
    /// # Example
    /// ```
    /// # use dfquery::{Column, DataType, Value};
    /// let mut col = Column::new("age".into(), DataType::Int);
    /// col.push(Value::Int(30)).unwrap();
    /// col.push(Value::Null).unwrap();
    ///
    /// assert_eq!(col.len(), 2);
    /// assert!(col.get(1).unwrap().is_null());
    /// ```
    pub fn push(&mut self, value: Value) -> Result<(), String> {
        if value.data_type().is_some_and(|t| t != self.data_type) {
            return Err(format!(
                "Value {value:?} has type {:?} while column {:?} has type {:?}",
                value.data_type(),
                self.name,
                self.data_type
            ));
        }

        self.null_bitmap.push(value.is_null());
        self.push_raw(value);
        Ok(())
    }

    /// Returns the number of rows currently stored in the column.
    pub fn len(&self) -> usize {
        self.null_bitmap.len()
    }

    /// Returns true if there is no row in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the value at the specified row index.
    ///
    /// Returns `Some(Value)` if the index is valid, or `None` if it is out of bounds.
    /// If the `null_bitmap` indicates a null at the index, `Some(Value::Null)` is returned.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        if row_idx >= self.len() {
            return None;
        }
        if self.null_bitmap[row_idx] {
            return Some(Value::Null);
        }
        match &self.data {
            ColumnData::Int(col) => Some(Value::Int(col[row_idx])),
            ColumnData::Text(col) => Some(Value::Text(col[row_idx].clone())),
            ColumnData::Float(col) => Some(Value::Float(col[row_idx])),
            ColumnData::Bool(col) => Some(Value::Bool(col[row_idx])),
            ColumnData::Blob(col) => Some(Value::Blob(Arc::clone(&col[row_idx]))),
        }
    }

    /// Builds a column from a sequence of values, inferring its data type.
    ///
    /// The type is taken from the first non-null value. A mix of [Value::Int]
    /// and [Value::Float] promotes the column to [DataType::Float]. A column
    /// holding nothing but nulls becomes [DataType::Text]. Any other mix of
    /// types is rendered as text.
    ///
    /// # Example
    /// ```
    /// # use dfquery::{Column, DataType, Value};
    /// let col = Column::from_values("score", [Value::Int(1), Value::Float(2.5)]);
    ///
    /// assert_eq!(col.data_type, DataType::Float);
    /// assert_eq!(col.get(0), Some(Value::Float(1.0)));
    /// ```
    pub fn from_values<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let data_type = infer_type(&values);

        let mut column = Self::new(name.into(), data_type);
        for value in values {
            // infer_type guarantees every value casts to the inferred type
            let value = cast_value(value, data_type).unwrap_or(Value::Null);
            column.null_bitmap.push(value.is_null());
            column.push_raw(value);
        }
        column
    }

    /// Converts the column to another data type.
    ///
    /// # Errors
    /// Returns an error for a value with no representation in the target type,
    /// e.g. an integer other than `0`/`1` cast to [DataType::Bool].
    pub fn cast(&self, data_type: DataType) -> Result<Column, String> {
        if data_type == self.data_type {
            return Ok(self.clone());
        }
        let mut column = Self::new(self.name.clone(), data_type);
        for row_idx in 0..self.len() {
            let value = self.get(row_idx).unwrap_or(Value::Null);
            let cast = cast_value(value.clone(), data_type).ok_or_else(|| {
                format!(
                    "value {value:?} of column {:?} cannot be cast to {data_type:?}",
                    self.name
                )
            })?;
            column.push(cast)?;
        }
        Ok(column)
    }

    /// Appends a value without type checking. The caller pushes the null bit.
    fn push_raw(&mut self, value: Value) {
        match (&mut self.data, value) {
            (ColumnData::Int(col), Value::Int(v)) => col.push(v),
            (ColumnData::Float(col), Value::Float(v)) => col.push(v),
            (ColumnData::Text(col), Value::Text(v)) => col.push(v),
            (ColumnData::Bool(col), Value::Bool(v)) => col.push(v),
            (ColumnData::Blob(col), Value::Blob(v)) => col.push(v),
            (ColumnData::Int(col), _) => col.push(0),
            (ColumnData::Float(col), _) => col.push(0.0),
            (ColumnData::Text(col), _) => col.push(Arc::from("")),
            (ColumnData::Bool(col), _) => col.push(false),
            (ColumnData::Blob(col), _) => col.push(Arc::from(&[][..])),
        }
    }
}

/// Picks the narrowest [DataType] able to hold every non-null value.
fn infer_type(values: &[Value]) -> DataType {
    let mut inferred: Option<DataType> = None;
    for data_type in values.iter().filter_map(Value::data_type) {
        inferred = match (inferred, data_type) {
            (None, t) => Some(t),
            (Some(a), b) if a == b => Some(a),
            (Some(DataType::Int), DataType::Float) | (Some(DataType::Float), DataType::Int) => {
                Some(DataType::Float)
            }
            _ => return DataType::Text,
        };
    }
    inferred.unwrap_or(DataType::Text)
}

/// Converts a single value to `data_type`, `None` when no conversion exists.
fn cast_value(value: Value, data_type: DataType) -> Option<Value> {
    match (value, data_type) {
        (Value::Null, _) => Some(Value::Null),
        (v, t) if v.data_type() == Some(t) => Some(v),
        (Value::Int(i), DataType::Float) => Some(Value::Float(i as f64)),
        (Value::Int(0), DataType::Bool) => Some(Value::Bool(false)),
        (Value::Int(1), DataType::Bool) => Some(Value::Bool(true)),
        (Value::Bool(b), DataType::Int) => Some(Value::Int(i64::from(b))),
        (v, DataType::Text) => Some(Value::Text(Arc::from(v.to_string()))),
        _ => None,
    }
}
