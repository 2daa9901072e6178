//! Canonical text rendering.
//!
//! The [`DocumentFormatter`] is the serialization counterpart of the document
//! parser: it renders items, rows, section headers and whole documents back
//! to the exact text shape the parser consumes, using the same brackets and
//! separators. The formatter is passed explicitly wherever rendering is
//! needed; the model types themselves stay pure data.
//!
//! Round trip: for any well-formed [`Document`] `d`,
//! `parse(format_document(d)) == d`.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::format::DocumentFormatter;
//! use spare_dsl::{ColorName, SpareRow};
//!
//! let row = SpareRow::new("alpha-one", 15, "http://cc.org", ColorName::Green)
//!     .with_tag("monday")
//!     .with_description("first of the batch");
//! let formatter = DocumentFormatter::new();
//! let line = formatter.format_row(&row);
//! assert!(line.starts_with("row id alpha-one v_int 15 url http://cc.org tags [ monday ]"));
//! ```

use crate::model::{Document, Section, SectionHeader, SpareItem, SpareRow};
use crate::parser::SECTION_SEPARATOR;
use crate::persistence::{SequencePersistence, TokenPersistence};

/// Renders model values to canonical document text.
///
/// Owns the sequence persistences for the bracketed fields, mirroring the
/// declarations the row parser uses for the same fields.
#[derive(Debug, Clone)]
pub struct DocumentFormatter {
    tags: SequencePersistence,
    emails: SequencePersistence,
    items: SequencePersistence,
}

impl Default for DocumentFormatter {
    fn default() -> Self {
        DocumentFormatter {
            tags: SequencePersistence::new("tags", '[', ']', ' '),
            emails: SequencePersistence::new("emails", '[', ']', ' '),
            items: SequencePersistence::new("items", '[', ']', ','),
        }
    }
}

impl DocumentFormatter {
    #[must_use]
    pub fn new() -> Self {
        DocumentFormatter::default()
    }

    /// One `items` fragment: `v_float <float> v_fraction <fraction>`.
    #[must_use]
    pub fn format_item(&self, item: &SpareItem) -> String {
        format!(
            "v_float {} v_fraction {}",
            format_float(item.v_float),
            item.v_fraction
        )
    }

    /// One full `row` line.
    #[must_use]
    pub fn format_row(&self, row: &SpareRow) -> String {
        let tags: Vec<String> = row.tags.iter().cloned().collect();
        let items: Vec<String> = row.items.iter().map(|item| self.format_item(item)).collect();
        format!(
            "row id {} v_int {} url {} tags {} emails {} color_name {} items {} -> {}",
            row.id,
            row.v_int,
            row.url,
            self.tags.to_csv_string(&tags),
            self.emails.to_csv_string(&row.emails),
            row.color_name.as_str(),
            self.items.to_csv_string(&items),
            row.description,
        )
    }

    /// One `section <kind>` line.
    #[must_use]
    pub fn format_header(&self, header: &SectionHeader) -> String {
        format!("section {}", header.kind.as_str())
    }

    fn format_section(&self, section: &Section) -> Vec<String> {
        let mut lines = Vec::with_capacity(section.rows.len() + 1);
        if let Some(header) = &section.header {
            lines.push(self.format_header(header));
        }
        for row in &section.rows {
            lines.push(self.format_row(row));
        }
        lines
    }

    /// The whole document: non-empty section blocks in fixed order, joined by
    /// the section separator line, with a trailing newline.
    #[must_use]
    pub fn format_document(&self, document: &Document) -> String {
        let blocks: Vec<String> = [&document.fragments, &document.chunks, &document.accessors]
            .into_iter()
            .filter(|section| !section.is_empty())
            .map(|section| self.format_section(section).join("\n"))
            .collect();
        let mut text = blocks.join(&format!("\n{SECTION_SEPARATOR}\n"));
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// The float grammar requires a fractional part; integral values display
/// without one, so it is appended.
fn format_float(value: f64) -> String {
    let mut rendered = value.to_string();
    if !rendered.contains('.') {
        rendered.push_str(".0");
    }
    rendered
}
