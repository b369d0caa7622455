//! Translator configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pattern;

/// One unique-violation extraction rule, as data.
///
/// The pattern must define the named groups `table`, `index` and `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Locale or vendor label, used in logs and errors.
    pub locale: String,
    /// Regular expression.
    pub pattern: String,
}

impl PatternSpec {
    /// Create a rule.
    pub fn new(locale: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            pattern: pattern.into(),
        }
    }
}

/// How foreign-key violation messages are taken apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKeyConfig {
    /// Extracts the constraint name; must define the group `parts`.
    pub constraint_pattern: String,
    /// Separator between table and column segments of the constraint name.
    pub delimiter: String,
    /// Substring marking an insert-side violation.
    pub insert_keyword: String,
    /// Extracts the referenced table on the insert side; must define the group `table`.
    pub referenced_table_pattern: String,
}

impl Default for ForeignKeyConfig {
    fn default() -> Self {
        Self {
            constraint_pattern: r#"['"]FK_(?P<parts>.+?)['"]"#.to_string(),
            delimiter: "_".to_string(),
            insert_keyword: "INSERT".to_string(),
            referenced_table_pattern: r#"table "(?P<table>.+?)""#.to_string(),
        }
    }
}

/// Configuration for a [`Translator`](crate::Translator).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Extra unique-violation rules, tried after the built-in ones.
    pub unique_patterns: Vec<PatternSpec>,
    /// Use only `unique_patterns`, dropping the built-in rules.
    pub replace_builtin_patterns: bool,
    /// Foreign-key message layout.
    pub foreign_key: ForeignKeyConfig,
}

impl TranslatorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a unique-violation rule.
    pub fn with_unique_pattern(mut self, spec: PatternSpec) -> Self {
        self.unique_patterns.push(spec);
        self
    }

    /// Drop the built-in rules and use only the configured ones.
    pub fn replace_builtin_patterns(mut self) -> Self {
        self.replace_builtin_patterns = true;
        self
    }

    /// Set the foreign-key configuration.
    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyConfig) -> Self {
        self.foreign_key = foreign_key;
        self
    }

    /// Unique rules in the order they are tried.
    pub fn effective_unique_patterns(&self) -> Vec<PatternSpec> {
        let mut specs = if self.replace_builtin_patterns {
            Vec::new()
        } else {
            pattern::builtin_specs()
        };
        specs.extend(self.unique_patterns.iter().cloned());
        specs
    }
}
