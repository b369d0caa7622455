//! The translator facade.

use std::fmt;
use std::sync::Arc;

use ormlens_catalog::{DomainType, SchemaRegistry};
use tracing::debug;

use crate::cache::ResolutionCache;
use crate::config::TranslatorConfig;
use crate::error::Error;
use crate::foreign_key::ForeignKeyClassifier;
use crate::message::{Localizer, MessageCatalog};
use crate::pattern::PatternTable;
use crate::raw::RawFailure;
use crate::unique::UniqueClassifier;
use crate::violation::{
    ConcurrencyConflict, EntityNotFound, ForeignKeyViolation, PrimaryKey, UniqueViolation,
};

/// Turns engine failures into structured errors for one schema.
///
/// The translator owns the resolution cache, so cached descriptors live exactly
/// as long as the registry they came from. It is `Send + Sync`; share it behind
/// an `Arc` across writers.
pub struct Translator {
    registry: Arc<dyn SchemaRegistry>,
    cache: ResolutionCache,
    patterns: PatternTable,
    foreign_keys: ForeignKeyClassifier,
    localizer: Arc<dyn Localizer>,
}

impl Translator {
    /// Translator with the built-in rules and the English catalog.
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Result<Self, Error> {
        Self::with_config(
            registry,
            &TranslatorConfig::default(),
            MessageCatalog::shared_english(),
        )
    }

    /// Translator with explicit configuration and localizer.
    pub fn with_config(
        registry: Arc<dyn SchemaRegistry>,
        config: &TranslatorConfig,
        localizer: Arc<dyn Localizer>,
    ) -> Result<Self, Error> {
        let patterns = PatternTable::from_specs(&config.effective_unique_patterns())?;
        let foreign_keys = ForeignKeyClassifier::compile(&config.foreign_key)?;

        debug!(
            tables = registry.tables().len(),
            unique_rules = patterns.rules().len(),
            "Translator ready"
        );

        Ok(Self {
            registry,
            cache: ResolutionCache::new(),
            patterns,
            foreign_keys,
            localizer,
        })
    }

    /// Translate a unique-constraint failure.
    pub fn unique_violation(&self, raw: RawFailure) -> UniqueViolation {
        let resolution =
            UniqueClassifier::new(self.registry.as_ref(), &self.cache, &self.patterns)
                .classify(raw.message());
        UniqueViolation::new(raw, resolution, self.localizer.clone())
    }

    /// Translate a foreign-key failure.
    pub fn foreign_key_violation(&self, raw: RawFailure) -> ForeignKeyViolation {
        let resolution = self
            .foreign_keys
            .classify(self.registry.as_ref(), raw.message());
        ForeignKeyViolation::new(raw, resolution, self.localizer.clone())
    }

    /// Build a not-found error rendered with this translator's localizer.
    pub fn not_found(
        &self,
        domain_type: Arc<DomainType>,
        ids: impl IntoIterator<Item = impl Into<PrimaryKey>>,
    ) -> EntityNotFound {
        EntityNotFound::new(domain_type, ids).with_localizer(self.localizer.clone())
    }

    /// Build a concurrency-conflict error rendered with this translator's localizer.
    pub fn concurrency_conflict(
        &self,
        domain_type: Arc<DomainType>,
        ids: impl IntoIterator<Item = impl Into<PrimaryKey>>,
    ) -> ConcurrencyConflict {
        ConcurrencyConflict::new(domain_type, ids).with_localizer(self.localizer.clone())
    }

    /// The registry this translator resolves against.
    pub fn registry(&self) -> &Arc<dyn SchemaRegistry> {
        &self.registry
    }

    /// The resolution cache.
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("tables", &self.registry.tables().len())
            .field("cache", &self.cache)
            .field("patterns", &self.patterns)
            .field("foreign_keys", &self.foreign_keys)
            .field("localizer", &self.localizer)
            .finish()
    }
}
