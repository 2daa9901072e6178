//! The field-grammar catalog.
//!
//! External tooling (the editor-grammar renderer and the source-template
//! code generator) consumes the same field definitions this crate parses
//! with. [`field_catalog`] exposes those definitions as plain serializable
//! data: the field name, its match pattern or closed value set, and the
//! bracket characters for sequence fields. The catalog is a read-only
//! contract; this crate has no dependency on its consumers.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::fields::field_catalog;
//!
//! let catalog = field_catalog();
//! let id = catalog.iter().find(|field| field.name == "id").unwrap();
//! assert_eq!(id.match_pattern, "[a-z][a-z0-9-]+");
//! ```

use serde::{Deserialize, Serialize};

use crate::model::ColorName;
use crate::persistence::patterns;

/// One field definition of the row grammar.
///
/// Serializes to the JSON shape the grammar tooling reads (`match`,
/// `keywords`, `counter-examples`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldData {
    pub name: String,
    pub description: String,
    /// Editor scope name assigned to the field.
    pub scope: String,
    /// Match pattern for pattern-constrained fields, empty otherwise.
    #[serde(rename = "match")]
    pub match_pattern: String,
    /// Closed vocabulary for enum fields, empty otherwise.
    pub keywords: Vec<String>,
    /// Opening bracket for sequence fields, empty otherwise.
    pub start: String,
    /// Closing bracket for sequence fields, empty otherwise.
    pub finish: String,
    pub examples: Vec<String>,
    #[serde(rename = "counter-examples")]
    pub counter_examples: Vec<String>,
}

impl FieldData {
    fn pattern(name: &str, description: &str, pattern: &str) -> Self {
        FieldData {
            name: name.to_string(),
            description: description.to_string(),
            scope: format!("entity.name.{name}"),
            match_pattern: pattern.to_string(),
            keywords: Vec::new(),
            start: String::new(),
            finish: String::new(),
            examples: Vec::new(),
            counter_examples: Vec::new(),
        }
    }

    fn keywords(name: &str, description: &str, keywords: &[&str]) -> Self {
        FieldData {
            name: name.to_string(),
            description: description.to_string(),
            scope: format!("keyword.other.{name}"),
            match_pattern: String::new(),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
            start: String::new(),
            finish: String::new(),
            examples: Vec::new(),
            counter_examples: Vec::new(),
        }
    }

    fn sequence(name: &str, description: &str, start: char, finish: char) -> Self {
        FieldData {
            name: name.to_string(),
            description: description.to_string(),
            scope: format!("punctuation.definition.{name}"),
            match_pattern: String::new(),
            keywords: Vec::new(),
            start: start.to_string(),
            finish: finish.to_string(),
            examples: Vec::new(),
            counter_examples: Vec::new(),
        }
    }

    #[must_use]
    fn with_examples(mut self, examples: &[&str], counter_examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|example| example.to_string()).collect();
        self.counter_examples = counter_examples
            .iter()
            .map(|example| example.to_string())
            .collect();
        self
    }
}

/// Every field of the Spare row grammar, in declaration order.
#[must_use]
pub fn field_catalog() -> Vec<FieldData> {
    vec![
        FieldData::pattern("id", "row identifier", patterns::ID)
            .with_examples(&["alpha-one", "beta-2"], &["7seven", "Upper"]),
        FieldData::pattern("v_int", "signed integer value", patterns::INTEGER)
            .with_examples(&["15", "-101", "0"], &["fifteen", "1.5"]),
        FieldData::pattern("url", "absolute http(s) url", patterns::URL)
            .with_examples(&["http://cc.org"], &["ftp://cc.org", "cc.org"]),
        FieldData::pattern("tag", "lower-dash tag name", patterns::TAG)
            .with_examples(&["monday"], &["Monday", "9bad"]),
        FieldData::pattern("email", "plain email address", patterns::EMAIL)
            .with_examples(&["a@email.com"], &["a@email", "email.com"]),
        FieldData::keywords("color_name", "closed color vocabulary", ColorName::all_values())
            .with_examples(&["red", "green"], &["orange"]),
        FieldData::sequence("tags", "space-separated tag sequence", '[', ']'),
        FieldData::sequence("emails", "space-separated email sequence", '[', ']'),
        FieldData::sequence("items", "comma-separated item sequence", '[', ']'),
        FieldData::pattern("v_float", "signed decimal value", patterns::FLOAT)
            .with_examples(&["1.3", "-2.5", "0.0"], &["7", "1.3.5"]),
        FieldData::pattern("v_fraction", "rational value", patterns::FRACTION)
            .with_examples(&["1/4", "-3/8", "3"], &["1/0", "1/"]),
        FieldData::pattern("description", "free text to end of line", patterns::END_STRING),
    ]
}
