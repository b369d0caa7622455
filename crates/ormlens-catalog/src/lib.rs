//! ormlens catalog - the schema registry.
//!
//! The catalog describes how domain types are stored: which table backs each
//! type, which columns each domain property occupies and which indexes the
//! table carries (including indexes contributed by mixins). A [`Schema`] is
//! built once and is read-only afterwards; the translator in `ormlens-core`
//! only ever consumes it through the [`SchemaRegistry`] trait.

mod error;
mod field;
mod index;
mod registry;
mod schema;
mod table;
mod types;

pub use error::CatalogError;
pub use field::{FieldDescriptor, PropertyDescriptor};
pub use index::IndexDescriptor;
pub use registry::SchemaRegistry;
pub use schema::{Schema, SchemaBuilder};
pub use table::{MixinDescriptor, TableDescriptor, TableName};
pub use types::{DomainType, Gender};
