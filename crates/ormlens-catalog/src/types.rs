//! Domain type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grammatical gender of a domain type's display name.
///
/// Only meaningful for locales that inflect on gender; English templates
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Masculine.
    Masculine,
    /// Feminine.
    Feminine,
    /// Neuter.
    Neuter,
}

/// An application-level type mapped to a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainType {
    /// Type name as written in code (e.g. `OrderLine`).
    pub name: String,
    /// Human-readable singular name (e.g. `order line`).
    pub nice_name: String,
    /// Human-readable plural name (e.g. `order lines`).
    pub plural_name: String,
    /// Grammatical gender, when the catalog knows it.
    pub gender: Option<Gender>,
}

impl DomainType {
    /// Create a domain type whose display names are derived from `name`.
    ///
    /// `OrderLine` becomes `Order Line` / `Order Lines`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let nice_name = spaced(&name);
        let plural_name = pluralize(&nice_name);
        Self {
            name,
            nice_name,
            plural_name,
            gender: None,
        }
    }

    /// Override the singular display name.
    pub fn with_nice_name(mut self, nice_name: impl Into<String>) -> Self {
        self.nice_name = nice_name.into();
        self
    }

    /// Override the plural display name.
    pub fn with_plural_name(mut self, plural_name: impl Into<String>) -> Self {
        self.plural_name = plural_name.into();
        self
    }

    /// Set the grammatical gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Insert a space before every inner uppercase letter that follows a lowercase one.
pub(crate) fn spaced(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch == '_' {
            out.push(' ');
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        out.push(ch);
    }
    out
}

fn pluralize(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{word}es")
    } else if let Some(stem) = word.strip_suffix('y') {
        match stem.chars().last() {
            Some(c) if !"aeiou".contains(c) => format!("{stem}ies"),
            _ => format!("{word}s"),
        }
    } else {
        format!("{word}s")
    }
}
