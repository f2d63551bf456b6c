//! Run SQL statements over in-memory tables.
//!
//! Tables are bound by name in a [Scope]. A [TableQuery] copies the tables an
//! operation needs into a private SQLite file under those names, runs the
//! statement and hands the result back as a [Table].

pub mod client;
pub mod column;
pub mod data_type;
pub mod error;
pub mod options;
pub mod scope;
mod store;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use client::TableQuery;
pub use column::Column;
pub use data_type::DataType;
pub use error::{Error, Result};
pub use options::Options;
pub use scope::Scope;
pub use table::{ColumnDef, Schema, Table};
pub use tokenizer::{StatementKind, classify};
pub use value::Value;
