//! Structured errors produced by the translator.
//!
//! Every type stores resolved identifiers and renders its message only when
//! `Display` is used, through the [`Localizer`] it was created with.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use ormlens_catalog::{DomainType, IndexDescriptor, PropertyDescriptor, TableDescriptor};
use thiserror::Error;

use crate::foreign_key::ForeignKeyResolution;
use crate::message::{GrammaticalForm, Localizer, MessageCatalog, MessageKey, Number};
use crate::raw::RawFailure;
use crate::unique::UniqueResolution;

/// Identifier of a stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimaryKey {
    /// Integer key.
    Int(i64),
    /// UUID key, rendered as hex.
    Uuid([u8; 16]),
    /// Text key.
    Text(String),
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryKey::Int(id) => write!(f, "{id}"),
            PrimaryKey::Uuid(id) => f.write_str(&hex::encode(id)),
            PrimaryKey::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(id: i64) -> Self {
        PrimaryKey::Int(id)
    }
}

impl From<i32> for PrimaryKey {
    fn from(id: i32) -> Self {
        PrimaryKey::Int(id.into())
    }
}

impl From<[u8; 16]> for PrimaryKey {
    fn from(id: [u8; 16]) -> Self {
        PrimaryKey::Uuid(id)
    }
}

impl From<String> for PrimaryKey {
    fn from(id: String) -> Self {
        PrimaryKey::Text(id)
    }
}

impl From<&str> for PrimaryKey {
    fn from(id: &str) -> Self {
        PrimaryKey::Text(id.to_string())
    }
}

fn join_ids(ids: &[PrimaryKey]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A write rejected because it duplicates a unique index.
#[derive(Debug)]
pub struct UniqueViolation {
    raw: RawFailure,
    resolution: UniqueResolution,
    localizer: Arc<dyn Localizer>,
}

impl UniqueViolation {
    pub(crate) fn new(
        raw: RawFailure,
        resolution: UniqueResolution,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            raw,
            resolution,
            localizer,
        }
    }

    /// The engine failure this was derived from.
    pub fn raw(&self) -> &RawFailure {
        &self.raw
    }

    /// Everything recovered from the message.
    pub fn resolution(&self) -> &UniqueResolution {
        &self.resolution
    }

    /// Table identifier as quoted by the engine.
    pub fn table_name(&self) -> Option<&str> {
        self.resolution.table_name.as_deref()
    }

    /// Resolved table.
    pub fn table(&self) -> Option<&Arc<TableDescriptor>> {
        self.resolution.table.as_ref()
    }

    /// Index identifier as quoted by the engine.
    pub fn index_name(&self) -> Option<&str> {
        self.resolution.index_name.as_deref()
    }

    /// Resolved index.
    pub fn index(&self) -> Option<&Arc<IndexDescriptor>> {
        self.resolution.index.as_ref().map(|r| &r.index)
    }

    /// Domain properties covered by the index; never empty when present.
    pub fn properties(&self) -> Option<&[PropertyDescriptor]> {
        self.resolution
            .index
            .as_ref()
            .and_then(|r| r.properties.as_deref())
    }

    /// Duplicated values, raw.
    pub fn values(&self) -> Option<&str> {
        self.resolution.values.as_deref()
    }

    /// Render the message. Falls back to the engine text when the table is unknown.
    pub fn message(&self) -> String {
        let Some(table) = &self.resolution.table else {
            return self.raw.message().to_string();
        };

        let fields = match &self.resolution.index {
            None => self.resolution.index_name.clone().unwrap_or_default(),
            Some(resolved) => match &resolved.properties {
                Some(properties) => {
                    let names: Vec<&str> =
                        properties.iter().map(|p| p.nice_name.as_str()).collect();
                    self.localizer.join_list(&names)
                }
                None => {
                    let columns: Vec<&str> =
                        resolved.index.columns.iter().map(String::as_str).collect();
                    self.localizer.join_list(&columns)
                }
            },
        };

        self.localizer.render(
            MessageKey::AlreadyExists,
            GrammaticalForm::gender(table.domain_type.gender),
            &[
                &table.domain_type.nice_name,
                &fields,
                self.resolution.values.as_deref().unwrap_or_default(),
            ],
        )
    }
}

impl fmt::Display for UniqueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl StdError for UniqueViolation {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.raw)
    }
}

/// A write rejected because it breaks referential integrity.
#[derive(Debug)]
pub struct ForeignKeyViolation {
    raw: RawFailure,
    resolution: ForeignKeyResolution,
    localizer: Arc<dyn Localizer>,
}

impl ForeignKeyViolation {
    pub(crate) fn new(
        raw: RawFailure,
        resolution: ForeignKeyResolution,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            raw,
            resolution,
            localizer,
        }
    }

    /// The engine failure this was derived from.
    pub fn raw(&self) -> &RawFailure {
        &self.raw
    }

    /// Everything recovered from the message.
    pub fn resolution(&self) -> &ForeignKeyResolution {
        &self.resolution
    }

    /// Owning table name taken from the constraint name.
    pub fn table_name(&self) -> Option<&str> {
        self.resolution.table_name.as_deref()
    }

    /// Column name taken from the constraint name.
    pub fn column_name(&self) -> Option<&str> {
        self.resolution.column_name.as_deref()
    }

    /// Domain type of the owning table.
    pub fn table_type(&self) -> Option<&Arc<DomainType>> {
        self.resolution.table_type.as_ref()
    }

    /// Referenced table name (insert side).
    pub fn referenced_table_name(&self) -> Option<&str> {
        self.resolution.referenced_table_name.as_deref()
    }

    /// Referenced domain type (insert side).
    pub fn referenced_table_type(&self) -> Option<&Arc<DomainType>> {
        self.resolution.referenced_table_type.as_ref()
    }

    /// True when the write tried to create a dangling reference.
    pub fn is_insert(&self) -> bool {
        self.resolution.is_insert
    }

    /// Render the message. Falls back to the engine text when no constraint name was found.
    pub fn message(&self) -> String {
        let resolution = &self.resolution;
        let Some(table_name) = resolution.table_name.as_deref() else {
            return self.raw.message().to_string();
        };
        let column = resolution.column_name.as_deref().unwrap_or_default();

        if resolution.is_insert {
            match (&resolution.table_type, &resolution.referenced_table_type) {
                (Some(owner), Some(referenced)) => self.localizer.render(
                    MessageKey::InvalidReference,
                    GrammaticalForm::gender(owner.gender),
                    &[column, &owner.nice_name, &referenced.nice_name],
                ),
                _ => self.localizer.render(
                    MessageKey::InvalidReferenceRaw,
                    GrammaticalForm::default(),
                    &[
                        column,
                        table_name,
                        resolution.referenced_table_name.as_deref().unwrap_or_default(),
                    ],
                ),
            }
        } else {
            match &resolution.table_type {
                Some(owner) => self.localizer.render(
                    MessageKey::ReferencedByEntities,
                    GrammaticalForm {
                        gender: owner.gender,
                        number: Some(Number::Plural),
                    },
                    &[&owner.plural_name],
                ),
                None => self.localizer.render(
                    MessageKey::ReferencedByRecords,
                    GrammaticalForm::default(),
                    &[table_name, column],
                ),
            }
        }
    }
}

impl fmt::Display for ForeignKeyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl StdError for ForeignKeyViolation {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.raw)
    }
}

/// Entities looked up by id that do not exist.
#[derive(Debug)]
pub struct EntityNotFound {
    domain_type: Arc<DomainType>,
    ids: Vec<PrimaryKey>,
    localizer: Arc<dyn Localizer>,
}

impl EntityNotFound {
    /// Create with the English catalog.
    pub fn new(
        domain_type: Arc<DomainType>,
        ids: impl IntoIterator<Item = impl Into<PrimaryKey>>,
    ) -> Self {
        Self {
            domain_type,
            ids: ids.into_iter().map(Into::into).collect(),
            localizer: MessageCatalog::shared_english(),
        }
    }

    /// Render through another localizer.
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// Domain type looked up.
    pub fn domain_type(&self) -> &Arc<DomainType> {
        &self.domain_type
    }

    /// Missing ids.
    pub fn ids(&self) -> &[PrimaryKey] {
        &self.ids
    }

    /// Render the message.
    pub fn message(&self) -> String {
        self.localizer.render(
            MessageKey::EntityNotFound,
            GrammaticalForm::gender(self.domain_type.gender),
            &[&self.domain_type.name, &join_ids(&self.ids)],
        )
    }
}

impl fmt::Display for EntityNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl StdError for EntityNotFound {}

/// Optimistic-concurrency check failed: the rows changed since they were read.
#[derive(Debug)]
pub struct ConcurrencyConflict {
    domain_type: Arc<DomainType>,
    ids: Vec<PrimaryKey>,
    localizer: Arc<dyn Localizer>,
}

impl ConcurrencyConflict {
    /// Create with the English catalog.
    pub fn new(
        domain_type: Arc<DomainType>,
        ids: impl IntoIterator<Item = impl Into<PrimaryKey>>,
    ) -> Self {
        Self {
            domain_type,
            ids: ids.into_iter().map(Into::into).collect(),
            localizer: MessageCatalog::shared_english(),
        }
    }

    /// Render through another localizer.
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// Domain type written.
    pub fn domain_type(&self) -> &Arc<DomainType> {
        &self.domain_type
    }

    /// Conflicting ids.
    pub fn ids(&self) -> &[PrimaryKey] {
        &self.ids
    }

    /// Render the message.
    pub fn message(&self) -> String {
        self.localizer.render(
            MessageKey::ConcurrencyConflict,
            GrammaticalForm::gender(self.domain_type.gender),
            &[&self.domain_type.nice_name, &join_ids(&self.ids)],
        )
    }
}

impl fmt::Display for ConcurrencyConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl StdError for ConcurrencyConflict {}

/// Any structured error the translator produces.
#[derive(Debug, Error)]
pub enum ConstraintViolation {
    /// Duplicate key.
    #[error(transparent)]
    Unique(#[from] UniqueViolation),

    /// Broken reference.
    #[error(transparent)]
    ForeignKey(#[from] ForeignKeyViolation),

    /// Missing entity.
    #[error(transparent)]
    NotFound(#[from] EntityNotFound),

    /// Concurrent modification.
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyConflict),
}
