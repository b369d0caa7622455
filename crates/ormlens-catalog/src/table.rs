//! Table descriptors.

use std::fmt;
use std::sync::Arc;

use super::field::FieldDescriptor;
use super::index::IndexDescriptor;
use super::types::DomainType;

/// Storage name of a table, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName {
    /// Storage schema (e.g. `dbo`).
    pub schema: Option<String>,
    /// Bare table name.
    pub name: String,
}

impl TableName {
    /// Unqualified table name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Schema-qualified table name.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Bare table name, without the schema.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// An owned sub-structure stored inline in its host table.
///
/// Mixins add columns and indexes to the host without being tables of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixinDescriptor {
    /// Mixin name.
    pub name: String,
    /// Fields contributed to the host table.
    pub fields: Vec<FieldDescriptor>,
    /// Indexes contributed to the host table.
    pub indexes: Vec<Arc<IndexDescriptor>>,
}

impl MixinDescriptor {
    /// Create an empty mixin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an index.
    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push(Arc::new(index));
        self
    }
}

/// Storage description of one domain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Storage name; identity of the table within a schema.
    pub name: TableName,
    /// Domain type stored in this table.
    pub domain_type: Arc<DomainType>,
    /// Own fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Indexes declared directly on the table.
    pub indexes: Vec<Arc<IndexDescriptor>>,
    /// Owned sub-structures.
    pub mixins: Vec<MixinDescriptor>,
}

impl TableDescriptor {
    /// Create a table for `domain_type` with no fields or indexes.
    pub fn new(name: TableName, domain_type: DomainType) -> Self {
        Self {
            name,
            domain_type: Arc::new(domain_type),
            fields: Vec::new(),
            indexes: Vec::new(),
            mixins: Vec::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Add an index.
    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push(Arc::new(index));
        self
    }

    /// Add a mixin.
    pub fn with_mixin(mut self, mixin: MixinDescriptor) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// All generated indexes: own indexes first, then those of every mixin.
    pub fn indexes(&self) -> impl Iterator<Item = &Arc<IndexDescriptor>> {
        self.indexes
            .iter()
            .chain(self.mixins.iter().flat_map(|m| m.indexes.iter()))
    }

    /// All fields: own fields first, then those of every mixin.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .chain(self.mixins.iter().flat_map(|m| m.fields.iter()))
    }

    /// Find a unique index by name, mixin indexes included.
    pub fn unique_index(&self, name: &str) -> Option<&Arc<IndexDescriptor>> {
        self.indexes().find(|ix| ix.unique && ix.name == name)
    }
}
