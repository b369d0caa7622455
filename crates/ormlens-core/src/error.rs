//! Configuration error types.
//!
//! Only building a [`Translator`](crate::Translator) can fail. Classification
//! and message rendering never return errors.

use thiserror::Error;

/// Errors raised while configuring a translator or loading a message catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// A classification pattern is not a valid regular expression.
    #[error("invalid pattern for {locale}: {source}")]
    InvalidPattern {
        locale: String,
        #[source]
        source: regex::Error,
    },

    /// A classification pattern lacks a required named capture group.
    #[error("pattern for {locale} is missing capture group `{group}`")]
    MissingCaptureGroup { locale: String, group: &'static str },

    /// The foreign-key constraint delimiter is empty.
    #[error("foreign key constraint delimiter must not be empty")]
    EmptyDelimiter,

    /// Configuration or message catalog JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
