//! Field and property descriptors.

use crate::types::spaced;

/// A domain-level property backed by one or more storage columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    /// Property name as written in code.
    pub name: String,
    /// Human-readable name used in messages.
    pub nice_name: String,
}

impl PropertyDescriptor {
    /// Create a property whose display name is derived from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let nice_name = spaced(&name);
        Self { name, nice_name }
    }

    /// Override the display name.
    pub fn with_nice_name(mut self, nice_name: impl Into<String>) -> Self {
        self.nice_name = nice_name.into();
        self
    }
}

/// A field of a table: the columns it occupies and the property it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Storage columns, in declaration order.
    pub columns: Vec<String>,
    /// Associated domain property. `None` for purely technical columns
    /// (tickets, partition ids, ...).
    pub property: Option<PropertyDescriptor>,
}

impl FieldDescriptor {
    /// Field stored in a single column of the same name as its property.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            columns: vec![name.clone()],
            property: Some(PropertyDescriptor::new(name)),
        }
    }

    /// Field stored in a single column with a differently named property.
    pub fn column(column: impl Into<String>, property: PropertyDescriptor) -> Self {
        Self {
            columns: vec![column.into()],
            property: Some(property),
        }
    }

    /// Field spanning several columns (embedded values, polymorphic references).
    pub fn composite(
        columns: impl IntoIterator<Item = impl Into<String>>,
        property: PropertyDescriptor,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            property: Some(property),
        }
    }

    /// Column with no domain-level property.
    pub fn technical(column: impl Into<String>) -> Self {
        Self {
            columns: vec![column.into()],
            property: None,
        }
    }

    /// True if every column of this field is contained in `columns`.
    ///
    /// A field with no columns is never covered.
    pub fn is_covered_by(&self, columns: &[String]) -> bool {
        !self.columns.is_empty() && self.columns.iter().all(|c| columns.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builders() {
        let field = FieldDescriptor::new("Email");
        assert_eq!(field.columns, vec!["Email".to_string()]);
        assert_eq!(field.property.as_ref().unwrap().name, "Email");

        let field = FieldDescriptor::technical("Ticks");
        assert!(field.property.is_none());
    }

    #[test]
    fn test_covered_by() {
        let index_columns = vec!["CustomerId".to_string(), "Number".to_string()];

        assert!(FieldDescriptor::new("Number").is_covered_by(&index_columns));
        assert!(!FieldDescriptor::new("Date").is_covered_by(&index_columns));

        let composite = FieldDescriptor::composite(
            ["CustomerId", "CustomerType"],
            PropertyDescriptor::new("Customer"),
        );
        assert!(!composite.is_covered_by(&index_columns));

        let empty = FieldDescriptor {
            columns: vec![],
            property: Some(PropertyDescriptor::new("Nothing")),
        };
        assert!(!empty.is_covered_by(&index_columns));
    }

    #[test]
    fn test_property_nice_name() {
        assert_eq!(PropertyDescriptor::new("OrderNumber").nice_name, "Order Number");
        assert_eq!(
            PropertyDescriptor::new("Sku").with_nice_name("SKU").nice_name,
            "SKU"
        );
    }
}
