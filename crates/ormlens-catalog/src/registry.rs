//! The read-only interface the translator consumes.

use std::sync::Arc;

use super::schema::Schema;
use super::table::TableDescriptor;
use super::types::DomainType;

/// Read-only view of a built schema.
///
/// Lookups never fail; "not found" is `None`.
pub trait SchemaRegistry: Send + Sync {
    /// Every table, including the tables of enum types.
    fn tables(&self) -> &[Arc<TableDescriptor>];

    /// Declaring enumeration type of an enum table's domain type.
    fn enum_declaring_type(&self, ty: &DomainType) -> Option<Arc<DomainType>>;

    /// Find a table by its qualified name as rendered by `TableName`'s `Display`.
    fn table_by_qualified_name(&self, name: &str) -> Option<Arc<TableDescriptor>> {
        self.tables()
            .iter()
            .find(|t| t.name.to_string() == name)
            .cloned()
    }

    /// Find a table by its bare name.
    ///
    /// Returns `None` when no table or more than one table carries the name.
    fn table_by_bare_name(&self, name: &str) -> Option<Arc<TableDescriptor>> {
        let mut matches = self.tables().iter().filter(|t| t.name.name() == name);
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first.clone()),
        }
    }
}

impl SchemaRegistry for Schema {
    fn tables(&self) -> &[Arc<TableDescriptor>] {
        Schema::tables(self)
    }

    fn enum_declaring_type(&self, ty: &DomainType) -> Option<Arc<DomainType>> {
        Schema::enum_declaring_type(self, ty)
    }
}

impl<R: SchemaRegistry + ?Sized> SchemaRegistry for Arc<R> {
    fn tables(&self) -> &[Arc<TableDescriptor>] {
        (**self).tables()
    }

    fn enum_declaring_type(&self, ty: &DomainType) -> Option<Arc<DomainType>> {
        (**self).enum_declaring_type(ty)
    }

    fn table_by_qualified_name(&self, name: &str) -> Option<Arc<TableDescriptor>> {
        (**self).table_by_qualified_name(name)
    }

    fn table_by_bare_name(&self, name: &str) -> Option<Arc<TableDescriptor>> {
        (**self).table_by_bare_name(name)
    }
}
