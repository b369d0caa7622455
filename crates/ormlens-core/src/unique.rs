//! Unique-violation classifier.

use std::sync::Arc;

use ormlens_catalog::{
    IndexDescriptor, PropertyDescriptor, SchemaRegistry, TableDescriptor,
};
use tracing::debug;

use crate::cache::{IndexEntry, IndexResolution, ResolutionCache};
use crate::pattern::PatternTable;

/// Structured content recovered from a unique-violation message.
///
/// Every slot is either resolved or absent. When no rule matched, all slots
/// are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniqueResolution {
    /// Table identifier as quoted by the engine.
    pub table_name: Option<String>,
    /// Index identifier as quoted by the engine.
    pub index_name: Option<String>,
    /// Duplicated values, raw.
    pub values: Option<String>,
    /// Locale of the rule that matched.
    pub locale: Option<String>,
    /// Resolved table.
    pub table: Option<Arc<TableDescriptor>>,
    /// Resolved index and covered properties.
    pub index: Option<Arc<IndexResolution>>,
}

impl UniqueResolution {
    /// True if a rule matched the message.
    pub fn is_matched(&self) -> bool {
        self.table_name.is_some()
    }
}

/// Applies the pattern table and resolves captures against the registry.
pub struct UniqueClassifier<'a> {
    registry: &'a dyn SchemaRegistry,
    cache: &'a ResolutionCache,
    patterns: &'a PatternTable,
}

impl<'a> UniqueClassifier<'a> {
    /// Create a classifier over borrowed translator state.
    pub fn new(
        registry: &'a dyn SchemaRegistry,
        cache: &'a ResolutionCache,
        patterns: &'a PatternTable,
    ) -> Self {
        Self {
            registry,
            cache,
            patterns,
        }
    }

    /// Classify a raw message.
    pub fn classify(&self, message: &str) -> UniqueResolution {
        let Some(capture) = self.patterns.capture(message) else {
            debug!(raw = message, "No unique violation pattern matched");
            return UniqueResolution::default();
        };

        let table = self.cache.table(&capture.table, || {
            self.registry.table_by_qualified_name(&capture.table)
        });

        let index = match &table {
            Some(table) => self.resolve_index(table, &capture.index),
            None => {
                debug!(table = %capture.table, "Unique violation on unknown table");
                None
            }
        };

        if table.is_some() && index.is_none() {
            debug!(
                table = %capture.table,
                index = %capture.index,
                "Unique violation on unknown index"
            );
        }

        UniqueResolution {
            table_name: Some(capture.table),
            index_name: Some(capture.index),
            values: Some(capture.values),
            locale: Some(capture.locale),
            table,
            index,
        }
    }

    fn resolve_index(&self, table: &TableDescriptor, index_name: &str) -> IndexEntry {
        self.cache.index(table, index_name, || {
            let index = table.unique_index(index_name)?;
            Some(Arc::new(IndexResolution {
                index: index.clone(),
                properties: covered_properties(table, index),
            }))
        })
    }
}

/// Properties of `table` whose columns all belong to `index`.
///
/// Fields without a domain property are skipped. Returns `None` rather than an
/// empty list when nothing is covered.
pub fn covered_properties(
    table: &TableDescriptor,
    index: &IndexDescriptor,
) -> Option<Vec<PropertyDescriptor>> {
    let properties: Vec<_> = table
        .fields()
        .filter(|f| f.is_covered_by(&index.columns))
        .filter_map(|f| f.property.clone())
        .collect();

    if properties.is_empty() {
        None
    } else {
        Some(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormlens_catalog::{DomainType, FieldDescriptor, Schema, TableName};
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        let customer = TableDescriptor::new(
            TableName::qualified("dbo", "Customer"),
            DomainType::new("Customer"),
        )
        .with_field(FieldDescriptor::technical("Id"))
        .with_field(FieldDescriptor::new("Email"))
        .with_field(FieldDescriptor::technical("Ticks"))
        .with_index(IndexDescriptor::unique("UIX_Customer_Email", ["Email"]))
        .with_index(IndexDescriptor::unique("UIX_Customer_Ticks", ["Ticks"]));

        Schema::builder().table(customer).build().unwrap()
    }

    fn message(table: &str, index: &str, values: &str) -> String {
        format!(
            "Cannot insert duplicate key row in object '{table}' with unique index '{index}'. The duplicate key value is ({values})."
        )
    }

    #[test]
    fn test_resolves_table_index_and_properties() {
        let schema = schema();
        let cache = ResolutionCache::new();
        let patterns = PatternTable::builtin().unwrap();
        let classifier = UniqueClassifier::new(&schema, &cache, &patterns);

        let resolution =
            classifier.classify(&message("dbo.Customer", "UIX_Customer_Email", "a@b.c"));

        assert_eq!(resolution.values.as_deref(), Some("a@b.c"));
        assert_eq!(resolution.locale.as_deref(), Some("en"));
        assert_eq!(resolution.table.as_ref().unwrap().domain_type.name, "Customer");
        let index = resolution.index.unwrap();
        assert_eq!(index.index.name, "UIX_Customer_Email");
        assert_eq!(
            index.properties,
            Some(vec![PropertyDescriptor::new("Email")])
        );
    }

    #[test]
    fn test_technical_columns_leave_properties_absent() {
        let schema = schema();
        let cache = ResolutionCache::new();
        let patterns = PatternTable::builtin().unwrap();
        let classifier = UniqueClassifier::new(&schema, &cache, &patterns);

        let resolution =
            classifier.classify(&message("dbo.Customer", "UIX_Customer_Ticks", "1"));

        let index = resolution.index.unwrap();
        assert_eq!(index.index.columns, vec!["Ticks".to_string()]);
        assert_eq!(index.properties, None);
    }

    #[test]
    fn test_unknown_table_and_index() {
        let schema = schema();
        let cache = ResolutionCache::new();
        let patterns = PatternTable::builtin().unwrap();
        let classifier = UniqueClassifier::new(&schema, &cache, &patterns);

        let unknown_table = classifier.classify(&message("dbo.Nope", "UIX_X", "1"));
        assert!(unknown_table.is_matched());
        assert!(unknown_table.table.is_none());
        assert!(unknown_table.index.is_none());
        assert_eq!(unknown_table.table_name.as_deref(), Some("dbo.Nope"));

        let unknown_index = classifier.classify(&message("dbo.Customer", "UIX_X", "1"));
        assert!(unknown_index.table.is_some());
        assert!(unknown_index.index.is_none());
        assert_eq!(cache.index_len(), 1);
    }

    #[test]
    fn test_unmatched_message() {
        let schema = schema();
        let cache = ResolutionCache::new();
        let patterns = PatternTable::builtin().unwrap();
        let classifier = UniqueClassifier::new(&schema, &cache, &patterns);

        let resolution = classifier.classify("Arithmetic overflow error");
        assert_eq!(resolution, UniqueResolution::default());
        assert!(!resolution.is_matched());
        assert_eq!(cache.table_len(), 0);
    }

    #[test]
    fn test_repeated_classification_reuses_instances() {
        let schema = schema();
        let cache = ResolutionCache::new();
        let patterns = PatternTable::builtin().unwrap();
        let classifier = UniqueClassifier::new(&schema, &cache, &patterns);
        let text = message("dbo.Customer", "UIX_Customer_Email", "a@b.c");

        let first = classifier.classify(&text);
        let second = classifier.classify(&text);

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(
            first.index.as_ref().unwrap(),
            second.index.as_ref().unwrap()
        ));
        assert!(Arc::ptr_eq(
            first.table.as_ref().unwrap(),
            second.table.as_ref().unwrap()
        ));
    }
}
