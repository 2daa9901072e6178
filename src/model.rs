//! The parsed document model.
//!
//! These types are pure data: they hold what a parse produced and nothing
//! else. Canonical text rendering lives in [`crate::format`] and is passed in
//! explicitly wherever serialization is needed; no record carries its own
//! formatter.
//!
//! Equality is structural: tags compare as sets (order-insensitive, via
//! [`IndexSet`]), emails, items and rows compare in order.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::{ColorName, SpareItem, SpareRow};
//! use num_rational::Rational64;
//!
//! let row = SpareRow::new("alpha-one", 15, "http://cc.org", ColorName::Green)
//!     .with_tag("monday")
//!     .with_email("a@email.com")
//!     .with_item(SpareItem::new(1.3, Rational64::new(1, 4)))
//!     .with_description("first of the batch");
//! assert_eq!(row.tags.len(), 1);
//! ```

use indexmap::IndexSet;
use num_rational::Rational64;
use serde::{Deserialize, Serialize};

/// The closed color vocabulary of the `color_name` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Red,
    Green,
}

impl ColorName {
    /// The literal used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorName::Red => "red",
            ColorName::Green => "green",
        }
    }

    /// Maps a wire literal back to the variant, `None` when out of
    /// vocabulary.
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "red" => Some(ColorName::Red),
            "green" => Some(ColorName::Green),
            _ => None,
        }
    }

    /// Every allowed literal, in declaration order.
    #[must_use]
    pub const fn all_values() -> &'static [&'static str] {
        &["red", "green"]
    }
}

/// The leaf record of a row's `items` sequence: a float plus a fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpareItem {
    pub v_float: f64,
    pub v_fraction: Rational64,
}

impl SpareItem {
    #[must_use]
    pub fn new(v_float: f64, v_fraction: Rational64) -> Self {
        SpareItem { v_float, v_fraction }
    }
}

/// One structured record, parsed from a single `row` line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpareRow {
    pub id: String,
    pub v_int: i64,
    pub url: String,
    /// Compared as a set; serialized in insertion order.
    pub tags: IndexSet<String>,
    pub emails: Vec<String>,
    pub color_name: ColorName,
    pub items: Vec<SpareItem>,
    /// Free text running to the end of the line.
    pub description: String,
}

impl SpareRow {
    #[must_use]
    pub fn new(id: &str, v_int: i64, url: &str, color_name: ColorName) -> Self {
        SpareRow {
            id: id.to_string(),
            v_int,
            url: url.to_string(),
            tags: IndexSet::new(),
            emails: Vec::new(),
            color_name,
            items: Vec::new(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        self.emails.push(email.to_string());
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: SpareItem) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// The fixed set of section kinds a document is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Fragments,
    Chunks,
    Accessors,
}

impl SectionKind {
    /// The scope/keyword name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SectionKind::Fragments => "fragments",
            SectionKind::Chunks => "chunks",
            SectionKind::Accessors => "accessors",
        }
    }

    /// Maps a scope name back to the kind, `None` when unknown.
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "fragments" => Some(SectionKind::Fragments),
            "chunks" => Some(SectionKind::Chunks),
            "accessors" => Some(SectionKind::Accessors),
            _ => None,
        }
    }

    /// Every section kind, in document order.
    #[must_use]
    pub const fn all() -> &'static [SectionKind] {
        &[
            SectionKind::Fragments,
            SectionKind::Chunks,
            SectionKind::Accessors,
        ]
    }
}

/// The header record of a section, parsed from a `section <kind>` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub kind: SectionKind,
}

impl SectionHeader {
    #[must_use]
    pub fn new(kind: SectionKind) -> Self {
        SectionHeader { kind }
    }
}

/// A named section: an (at most once) header plus rows in encounter order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub header: Option<SectionHeader>,
    pub rows: Vec<SpareRow>,
}

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Section::default()
    }

    /// A section that was never entered during parsing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.rows.is_empty()
    }
}

/// A whole parsed document: the fixed set of sections in fixed order.
///
/// Never partially constructed: the document parser either completes a
/// `Document` or reports a located error and produces nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub fragments: Section,
    pub chunks: Section,
    pub accessors: Section,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Document::default()
    }

    /// Read access to a section by kind.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Fragments => &self.fragments,
            SectionKind::Chunks => &self.chunks,
            SectionKind::Accessors => &self.accessors,
        }
    }

    /// Write access to a section by kind.
    pub fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Fragments => &mut self.fragments,
            SectionKind::Chunks => &mut self.chunks,
            SectionKind::Accessors => &mut self.accessors,
        }
    }
}
