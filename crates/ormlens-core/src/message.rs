//! Localized message rendering.
//!
//! Structured errors keep resolved identifiers, not text. Their message is
//! produced on demand through a [`Localizer`], which picks a template by key
//! and by the grammatical form of the domain type involved.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

use ormlens_catalog::Gender;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Every message template the translator renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    /// `{0}` type, `{1}` fields, `{2}` values.
    AlreadyExists,
    /// `{0}` column, `{1}` owning type, `{2}` referenced type.
    InvalidReference,
    /// `{0}` column, `{1}` raw table, `{2}` raw referenced table.
    InvalidReferenceRaw,
    /// `{0}` plural owning type.
    ReferencedByEntities,
    /// `{0}` raw table, `{1}` column.
    ReferencedByRecords,
    /// `{0}` type name, `{1}` ids.
    EntityNotFound,
    /// `{0}` type, `{1}` ids.
    ConcurrencyConflict,
}

/// Grammatical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Number {
    /// One.
    Singular,
    /// Many.
    Plural,
}

/// Gender and number a template should agree with, when known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrammaticalForm {
    /// Gender of the subject.
    pub gender: Option<Gender>,
    /// Number of the subject.
    pub number: Option<Number>,
}

impl GrammaticalForm {
    /// Form carrying a gender only.
    pub fn gender(gender: Option<Gender>) -> Self {
        Self {
            gender,
            number: None,
        }
    }
}

/// Renders message templates.
///
/// Implementations must not fail: a missing template or argument renders as
/// best it can.
pub trait Localizer: Send + Sync + Debug {
    /// Render `key` with positional `args`.
    fn render(&self, key: MessageKey, form: GrammaticalForm, args: &[&str]) -> String;

    /// Join items into a list (`a, b and c`).
    fn join_list(&self, items: &[&str]) -> String;
}

/// A template variant used when the requested form matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariant {
    /// Required gender; `None` matches any.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Required number; `None` matches any.
    #[serde(default)]
    pub number: Option<Number>,
    /// Template text.
    pub text: String,
}

/// A template with optional inflected variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Text used when no variant matches.
    pub text: String,
    /// Variants, first match wins.
    #[serde(default)]
    pub variants: Vec<TemplateVariant>,
}

impl Template {
    /// Template without variants.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            variants: Vec::new(),
        }
    }

    /// Add a variant.
    pub fn with_variant(
        mut self,
        gender: Option<Gender>,
        number: Option<Number>,
        text: impl Into<String>,
    ) -> Self {
        self.variants.push(TemplateVariant {
            gender,
            number,
            text: text.into(),
        });
        self
    }

    /// Pick the text for `form`.
    pub fn select(&self, form: GrammaticalForm) -> &str {
        self.variants
            .iter()
            .find(|v| {
                v.gender.map_or(true, |g| form.gender == Some(g))
                    && v.number.map_or(true, |n| form.number == Some(n))
            })
            .map_or(self.text.as_str(), |v| v.text.as_str())
    }
}

/// Table-driven [`Localizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCatalog {
    /// Word joining the last two list items.
    pub conjunction: String,
    /// Templates by key.
    pub templates: HashMap<MessageKey, Template>,
}

#[derive(Deserialize)]
struct CatalogFile {
    conjunction: Option<String>,
    #[serde(default)]
    templates: HashMap<MessageKey, Template>,
}

impl MessageCatalog {
    /// The built-in English catalog.
    pub fn english() -> Self {
        let templates = [
            (
                MessageKey::AlreadyExists,
                "There is already a {0} with {1} equal to {2}",
            ),
            (
                MessageKey::InvalidReference,
                "The column {0} of the {1} does not refer to a valid {2}",
            ),
            (
                MessageKey::InvalidReferenceRaw,
                "The column {0} on table {1} does not reference {2}",
            ),
            (
                MessageKey::ReferencedByEntities,
                "There are {0} that refer to this entity",
            ),
            (
                MessageKey::ReferencedByRecords,
                "There are records in {0} pointing to this table by column {1}",
            ),
            (
                MessageKey::EntityNotFound,
                "Entity with type {0} and Id {1} not found",
            ),
            (
                MessageKey::ConcurrencyConflict,
                "Concurrency error on database table {0}, id {1}",
            ),
        ]
        .into_iter()
        .map(|(key, text)| (key, Template::new(text)))
        .collect();

        Self {
            conjunction: "and".to_string(),
            templates,
        }
    }

    /// Shared instance of the English catalog.
    pub fn shared_english() -> Arc<dyn Localizer> {
        static ENGLISH: OnceLock<Arc<MessageCatalog>> = OnceLock::new();
        ENGLISH.get_or_init(|| Arc::new(Self::english())).clone()
    }

    /// Load a catalog from JSON. Keys the file omits keep their English text.
    ///
    /// ```json
    /// {
    ///   "conjunction": "y",
    ///   "templates": {
    ///     "already_exists": {
    ///       "text": "Ya existe un {0} con {1} igual a {2}",
    ///       "variants": [{ "gender": "feminine", "text": "Ya existe una {0} con {1} igual a {2}" }]
    ///     }
    ///   }
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::english();
        if let Some(conjunction) = file.conjunction {
            catalog.conjunction = conjunction;
        }
        catalog.templates.extend(file.templates);
        Ok(catalog)
    }

    /// Replace one template.
    pub fn with_template(mut self, key: MessageKey, template: Template) -> Self {
        self.templates.insert(key, template);
        self
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer for MessageCatalog {
    fn render(&self, key: MessageKey, form: GrammaticalForm, args: &[&str]) -> String {
        match self.templates.get(&key) {
            Some(template) => format_positional(template.select(form), args),
            // Only reachable for catalogs assembled by hand without a key.
            None => args.join(" "),
        }
    }

    fn join_list(&self, items: &[&str]) -> String {
        match items {
            [] => String::new(),
            [only] => (*only).to_string(),
            [init @ .., last] => format!("{} {} {}", init.join(", "), self.conjunction, last),
        }
    }
}

/// Substitute `{n}` placeholders. Out-of-range placeholders render empty.
pub fn format_positional(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|n| (n, close)));

        match placeholder {
            Some((n, close)) => {
                if let Some(arg) = args.get(n) {
                    out.push_str(arg);
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
