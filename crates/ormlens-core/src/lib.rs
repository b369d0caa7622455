//! ormlens core - storage-engine constraint failure translation.
//!
//! When a write fails on a unique index or a foreign key, the engine returns
//! vendor- and locale-specific text. The [`Translator`] classifies that text,
//! extracts the table, index or constraint it names and resolves those names
//! against a [`SchemaRegistry`](ormlens_catalog::SchemaRegistry), yielding a
//! structured error that renders a localized, domain-level message on demand.
//!
//! Translation never fails. Whatever cannot be recovered is left absent, and
//! in the worst case the message is the engine's own text.
//!
//! ```ignore
//! let translator = Translator::new(Arc::new(schema))?;
//!
//! match driver.insert(&row) {
//!     Err(e) if e.is_unique_violation() => {
//!         return Err(translator.unique_violation(RawFailure::from_error(e)).into());
//!     }
//!     other => other?,
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod foreign_key;
pub mod message;
pub mod pattern;
pub mod raw;
pub mod translator;
pub mod unique;
pub mod violation;

pub use cache::{CacheStats, IndexResolution, ResolutionCache};
pub use config::{ForeignKeyConfig, PatternSpec, TranslatorConfig};
pub use error::Error;
pub use foreign_key::{ForeignKeyClassifier, ForeignKeyResolution};
pub use message::{GrammaticalForm, Localizer, MessageCatalog, MessageKey, Number, Template};
pub use pattern::{PatternRule, PatternTable, UniqueCapture};
pub use raw::RawFailure;
pub use translator::Translator;
pub use unique::{UniqueClassifier, UniqueResolution};
pub use violation::{
    ConcurrencyConflict, ConstraintViolation, EntityNotFound, ForeignKeyViolation, PrimaryKey,
    UniqueViolation,
};

/// Re-export catalog types.
pub use ormlens_catalog as catalog;
