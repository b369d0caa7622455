//! In-memory schema registry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::error::CatalogError;
use super::table::{TableDescriptor, TableName};
use super::types::DomainType;

/// A fully built, read-only schema.
///
/// Tables keep their registration order, which is also the scan order used
/// by name lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    tables: Vec<Arc<TableDescriptor>>,
    /// Enum table domain type name -> declaring type.
    enum_declarations: HashMap<String, Arc<DomainType>>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// All tables in registration order.
    pub fn tables(&self) -> &[Arc<TableDescriptor>] {
        &self.tables
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True if no table is registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Declaring type of an enum table's domain type.
    pub fn enum_declaring_type(&self, ty: &DomainType) -> Option<Arc<DomainType>> {
        self.enum_declarations.get(&ty.name).cloned()
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: Vec<TableDescriptor>,
    enums: Vec<(TableName, DomainType)>,
}

impl SchemaBuilder {
    /// Register a table.
    pub fn table(mut self, table: TableDescriptor) -> Self {
        self.tables.push(table);
        self
    }

    /// Register a table whose domain type stands for the enumeration `declaring_type`.
    pub fn enum_table(mut self, table: TableDescriptor, declaring_type: DomainType) -> Self {
        self.enums.push((table.name.clone(), declaring_type));
        self.tables.push(table);
        self
    }

    /// Validate and freeze the schema.
    pub fn build(self) -> Result<Schema, CatalogError> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            let qualified = table.name.to_string();
            if !seen.insert(qualified.clone()) {
                return Err(CatalogError::DuplicateTable(qualified));
            }

            let mut index_names = HashSet::new();
            for index in table.indexes() {
                if !index_names.insert(index.name.as_str()) {
                    return Err(CatalogError::DuplicateIndex {
                        table: qualified,
                        index: index.name.clone(),
                    });
                }
            }
        }

        let mut enum_declarations = HashMap::new();
        for (table_name, declaring) in self.enums {
            let table = self
                .tables
                .iter()
                .find(|t| t.name == table_name)
                .ok_or_else(|| CatalogError::UnknownEnumTable(table_name.to_string()))?;
            enum_declarations.insert(table.domain_type.name.clone(), Arc::new(declaring));
        }

        let tables: Vec<_> = self.tables.into_iter().map(Arc::new).collect();
        debug!(
            tables = tables.len(),
            enums = enum_declarations.len(),
            "Schema built"
        );

        Ok(Schema {
            tables,
            enum_declarations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDescriptor, IndexDescriptor, MixinDescriptor};

    fn order() -> TableDescriptor {
        TableDescriptor::new(TableName::qualified("dbo", "Order"), DomainType::new("Order"))
            .with_field(FieldDescriptor::technical("Id"))
            .with_field(FieldDescriptor::new("Number"))
            .with_index(IndexDescriptor::unique("UIX_Order_Number", ["Number"]))
    }

    #[test]
    fn test_build_schema() {
        let schema = Schema::builder().table(order()).build().unwrap();

        assert_eq!(schema.len(), 1);
        assert!(!schema.is_empty());
        assert_eq!(schema.tables()[0].name.to_string(), "dbo.Order");
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let err = Schema::builder().table(order()).table(order()).build().unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTable("dbo.Order".into()));
    }

    #[test]
    fn test_same_bare_name_in_different_schemas_allowed() {
        let archived =
            TableDescriptor::new(TableName::qualified("archive", "Order"), DomainType::new("ArchivedOrder"));
        let schema = Schema::builder().table(order()).table(archived).build().unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_duplicate_index_across_mixin_rejected() {
        let table = order().with_mixin(
            MixinDescriptor::new("Numbered")
                .with_index(IndexDescriptor::unique("UIX_Order_Number", ["Number"])),
        );
        let err = Schema::builder().table(table).build().unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateIndex { .. }));
    }

    #[test]
    fn test_enum_declaring_type() {
        let status = TableDescriptor::new(
            TableName::qualified("dbo", "OrderStatus"),
            DomainType::new("OrderStatusEntity"),
        );
        let schema = Schema::builder()
            .table(order())
            .enum_table(status, DomainType::new("OrderStatus"))
            .build()
            .unwrap();

        let entity_type = schema.tables()[1].domain_type.clone();
        let declaring = schema.enum_declaring_type(&entity_type).unwrap();
        assert_eq!(declaring.name, "OrderStatus");
        assert!(schema
            .enum_declaring_type(&schema.tables()[0].domain_type)
            .is_none());
    }
}
