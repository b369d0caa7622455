//! Foreign-key violation classifier.
//!
//! Constraint names follow `FK_<table>_<column>`, but both halves may contain
//! the delimiter themselves. The split is recovered by trying prefixes from
//! shortest to longest and keeping the first one that names a known table.
//! When a schema has two tables where one name is a delimiter-prefix of the
//! other (`Order` and `Order_Line`), the shorter table wins even if the longer
//! was meant; that ambiguity is accepted.

use std::sync::Arc;

use ormlens_catalog::{DomainType, SchemaRegistry};
use regex::Regex;
use tracing::debug;

use crate::config::ForeignKeyConfig;
use crate::error::Error;
use crate::pattern::require_groups;

const PARTS_GROUP: &str = "parts";
const TABLE_GROUP: &str = "table";

/// Structured content recovered from a foreign-key violation message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKeyResolution {
    /// Owning table name from the constraint name, resolved or last tentative split.
    pub table_name: Option<String>,
    /// Column name from the constraint name.
    pub column_name: Option<String>,
    /// Domain type of the owning table.
    pub table_type: Option<Arc<DomainType>>,
    /// Bare name of the referenced table (insert side only).
    pub referenced_table_name: Option<String>,
    /// Domain type of the referenced table, normalized to the declaring enum type.
    pub referenced_table_type: Option<Arc<DomainType>>,
    /// True for insert/update-side violations, false for delete-side.
    pub is_insert: bool,
}

/// Compiled foreign-key message layout.
#[derive(Debug, Clone)]
pub struct ForeignKeyClassifier {
    constraint: Regex,
    referenced_table: Regex,
    delimiter: String,
    insert_keyword: String,
}

impl ForeignKeyClassifier {
    /// Compile a configuration.
    pub fn compile(config: &ForeignKeyConfig) -> Result<Self, Error> {
        if config.delimiter.is_empty() {
            return Err(Error::EmptyDelimiter);
        }

        let constraint = compile(&config.constraint_pattern, "foreign key constraint")?;
        require_groups(&constraint, "foreign key constraint", &[PARTS_GROUP])?;
        let referenced_table = compile(&config.referenced_table_pattern, "foreign key table")?;
        require_groups(&referenced_table, "foreign key table", &[TABLE_GROUP])?;

        Ok(Self {
            constraint,
            referenced_table,
            delimiter: config.delimiter.clone(),
            insert_keyword: config.insert_keyword.clone(),
        })
    }

    /// Classify a raw message against `registry`.
    pub fn classify(&self, registry: &dyn SchemaRegistry, message: &str) -> ForeignKeyResolution {
        let mut resolution = ForeignKeyResolution::default();

        if let Some(parts) = self
            .constraint
            .captures(message)
            .and_then(|caps| caps.name(PARTS_GROUP))
        {
            let split = split_constraint(parts.as_str(), &self.delimiter, |name| {
                registry.table_by_bare_name(name).map(|t| t.domain_type.clone())
            });
            if let Some(split) = split {
                if split.table_type.is_none() {
                    debug!(
                        constraint = parts.as_str(),
                        "No table matches any split of the foreign key name"
                    );
                }
                resolution.table_name = Some(split.table_name);
                resolution.column_name = Some(split.column_name);
                resolution.table_type = split.table_type;
            }
        } else {
            debug!(raw = message, "No foreign key constraint name found");
        }

        if message.contains(&self.insert_keyword) {
            resolution.is_insert = true;

            if let Some(table) = self
                .referenced_table
                .captures(message)
                .and_then(|caps| caps.name(TABLE_GROUP))
            {
                let name = last_segment(table.as_str()).to_string();
                resolution.referenced_table_type = registry.table_by_bare_name(&name).map(|t| {
                    registry
                        .enum_declaring_type(&t.domain_type)
                        .unwrap_or_else(|| t.domain_type.clone())
                });
                resolution.referenced_table_name = Some(name);
            }
        }

        resolution
    }
}

/// Outcome of segmenting a constraint name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSplit {
    /// Tentative or resolved table name.
    pub table_name: String,
    /// Remaining segments.
    pub column_name: String,
    /// Set when `table_name` resolved.
    pub table_type: Option<Arc<DomainType>>,
}

/// Split `parts` into table and column at the shortest prefix `lookup` resolves.
///
/// With fewer than two segments there is nothing to split and `None` is
/// returned. When no prefix resolves, the last attempted split is returned
/// unresolved.
pub fn split_constraint(
    parts: &str,
    delimiter: &str,
    lookup: impl Fn(&str) -> Option<Arc<DomainType>>,
) -> Option<ConstraintSplit> {
    let segments: Vec<&str> = parts.split(delimiter).collect();
    let mut last = None;

    for i in 1..segments.len() {
        let table_name = segments[..i].join(delimiter);
        let column_name = segments[i..].join(delimiter);
        let table_type = lookup(&table_name);
        let resolved = table_type.is_some();

        last = Some(ConstraintSplit {
            table_name,
            column_name,
            table_type,
        });
        if resolved {
            break;
        }
    }

    last
}

fn compile(pattern: &str, label: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        locale: label.to_string(),
        source,
    })
}

fn last_segment(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
