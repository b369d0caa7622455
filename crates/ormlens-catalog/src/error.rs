//! Catalog error types.

use thiserror::Error;

/// Errors raised while building a [`Schema`](crate::Schema).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two tables share the same qualified name.
    #[error("duplicate table: {0}")]
    DuplicateTable(String),

    /// Two indexes of one table (own or mixin) share a name.
    #[error("duplicate index {index} on table {table}")]
    DuplicateIndex { table: String, index: String },

    /// An enum declaration points at a table that was never registered.
    #[error("unknown table for enum declaration: {0}")]
    UnknownEnumTable(String),
}
