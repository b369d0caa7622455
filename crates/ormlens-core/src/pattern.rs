//! Ordered extraction rules for unique-constraint violations.
//!
//! Rules are tried in order and the first match wins, so the most likely
//! locale goes first. Each rule captures the quoted table identifier, the
//! index identifier and the duplicated value list.

use regex::Regex;

use crate::config::PatternSpec;
use crate::error::Error;

const TABLE_GROUP: &str = "table";
const INDEX_GROUP: &str = "index";
const VALUE_GROUP: &str = "value";

/// Built-in rules: the SQL Server duplicate-key message in the locales it ships.
pub fn builtin_specs() -> Vec<PatternSpec> {
    vec![
        PatternSpec::new(
            "en",
            r"Cannot insert duplicate key row in object '(?P<table>.*)' with unique index '(?P<index>.*)'\. The duplicate key value is \((?P<value>.*)\)",
        ),
        PatternSpec::new(
            "de",
            r#"Eine Zeile mit doppeltem Schlüssel kann in das Objekt "(?P<table>.*)" mit dem eindeutigen Index "(?P<index>.*)" nicht eingefügt werden\. Der doppelte Schlüsselwert ist \((?P<value>.*)\)"#,
        ),
        PatternSpec::new(
            "es",
            r"No se puede insertar una fila de clave duplicada en el objeto '(?P<table>.*)' con índice único '(?P<index>.*)'\. El valor de la clave duplicada es \((?P<value>.*)\)",
        ),
        PatternSpec::new(
            "fr",
            r"Impossible d'insérer une ligne de clé en double dans l'objet '(?P<table>.*)' avec un index unique '(?P<index>.*)'\. La valeur de clé dupliquée est \((?P<value>.*)\)",
        ),
    ]
}

/// Fragments captured from a matching message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueCapture {
    /// Locale label of the rule that matched.
    pub locale: String,
    /// Table identifier exactly as quoted by the engine.
    pub table: String,
    /// Index identifier.
    pub index: String,
    /// Duplicated value list, without the surrounding parentheses.
    pub values: String,
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    locale: String,
    regex: Regex,
}

impl PatternRule {
    /// Compile a rule, checking that it defines every required group.
    pub fn compile(spec: &PatternSpec) -> Result<Self, Error> {
        let regex = Regex::new(&spec.pattern).map_err(|source| Error::InvalidPattern {
            locale: spec.locale.clone(),
            source,
        })?;
        require_groups(&regex, &spec.locale, &[TABLE_GROUP, INDEX_GROUP, VALUE_GROUP])?;

        Ok(Self {
            locale: spec.locale.clone(),
            regex,
        })
    }

    /// Locale label.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Apply the rule to a message.
    pub fn capture(&self, message: &str) -> Option<UniqueCapture> {
        let caps = self.regex.captures(message)?;
        Some(UniqueCapture {
            locale: self.locale.clone(),
            table: caps.name(TABLE_GROUP)?.as_str().to_string(),
            index: caps.name(INDEX_GROUP)?.as_str().to_string(),
            values: caps.name(VALUE_GROUP)?.as_str().to_string(),
        })
    }
}

/// Ordered set of rules.
#[derive(Debug, Clone)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Compile the built-in rules.
    pub fn builtin() -> Result<Self, Error> {
        Self::from_specs(&builtin_specs())
    }

    /// Compile rules in the given order.
    pub fn from_specs(specs: &[PatternSpec]) -> Result<Self, Error> {
        let rules = specs
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Rules in match order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// First rule that matches wins.
    pub fn capture(&self, message: &str) -> Option<UniqueCapture> {
        self.rules.iter().find_map(|rule| rule.capture(message))
    }
}

/// Fail unless every group in `groups` is defined by `regex`.
pub(crate) fn require_groups(
    regex: &Regex,
    locale: &str,
    groups: &[&'static str],
) -> Result<(), Error> {
    for &group in groups {
        if !regex.capture_names().flatten().any(|name| name == group) {
            return Err(Error::MissingCaptureGroup {
                locale: locale.to_string(),
                group,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> PatternTable {
        PatternTable::builtin().unwrap()
    }

    fn assert_captures(message: &str, locale: &str) {
        let capture = table().capture(message).unwrap();
        assert_eq!(
            capture,
            UniqueCapture {
                locale: locale.to_string(),
                table: "dbo.Customer".to_string(),
                index: "UIX_Customer_Email".to_string(),
                values: "ann@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_english() {
        assert_captures(
            "Cannot insert duplicate key row in object 'dbo.Customer' with unique index 'UIX_Customer_Email'. The duplicate key value is (ann@example.com).",
            "en",
        );
    }

    #[test]
    fn test_german() {
        assert_captures(
            "Eine Zeile mit doppeltem Schlüssel kann in das Objekt \"dbo.Customer\" mit dem eindeutigen Index \"UIX_Customer_Email\" nicht eingefügt werden. Der doppelte Schlüsselwert ist (ann@example.com).",
            "de",
        );
    }

    #[test]
    fn test_spanish() {
        assert_captures(
            "No se puede insertar una fila de clave duplicada en el objeto 'dbo.Customer' con índice único 'UIX_Customer_Email'. El valor de la clave duplicada es (ann@example.com).",
            "es",
        );
    }

    #[test]
    fn test_french() {
        assert_captures(
            "Impossible d'insérer une ligne de clé en double dans l'objet 'dbo.Customer' avec un index unique 'UIX_Customer_Email'. La valeur de clé dupliquée est (ann@example.com).",
            "fr",
        );
    }

    #[test]
    fn test_composite_values_keep_inner_parentheses() {
        let capture = table()
            .capture("Cannot insert duplicate key row in object 'dbo.Order' with unique index 'UIX_Order_Customer_Number'. The duplicate key value is (7, (A)).\r\nThe statement has been terminated.")
            .unwrap();
        assert_eq!(capture.values, "7, (A)");
        assert_eq!(capture.index, "UIX_Order_Customer_Number");
    }

    #[test]
    fn test_no_match() {
        assert!(table().capture("Deadlock detected").is_none());
    }

    #[test]
    fn test_missing_group_rejected() {
        let err = PatternTable::from_specs(&[PatternSpec::new("bad", "(?P<table>.*) (?P<index>.*)")])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCaptureGroup { group: "value", .. }
        ));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = PatternTable::from_specs(&[PatternSpec::new("bad", "(?P<table>")]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_first_match_wins() {
        let specs = vec![
            PatternSpec::new("first", r"dup (?P<table>\w+)\.(?P<index>\w+) (?P<value>.*)"),
            PatternSpec::new("second", r"dup (?P<table>.*) (?P<index>.*) (?P<value>.*)"),
        ];
        let capture = PatternTable::from_specs(&specs)
            .unwrap()
            .capture("dup Order.UIX 1")
            .unwrap();
        assert_eq!(capture.locale, "first");
        assert_eq!(capture.table, "Order");
    }
}
