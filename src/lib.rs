//! # spare_dsl
//!
//! A parser and canonical serializer for the NMO/Spare line-oriented
//! document format.
//!
//! ## What is the Spare format?
//!
//! A Spare document is plain text made of typed records concatenated left to
//! right on a line, grouped into named sections. Each non-blank,
//! non-comment line is either a section header, a row, or the literal
//! section separator `--------`:
//!
//! ```text
//! # a comment
//! section fragments
//! row id alpha-one v_int 15 url http://cc.org tags [ monday tuesday ] emails [ a@email.com ] color_name green items [ v_float 1.3 v_fraction 1/4 ] -> first of the batch
//! --------
//! section chunks
//! ```
//!
//! ## Key pieces
//!
//! - **Token persistences** ([`persistence`]): composable recognizers and
//!   serializers for one field kind each (bracketed sequences,
//!   pattern-constrained strings, signed integers/floats/fractions, closed
//!   vocabularies).
//! - **Row detector** ([`detector`]): classifies raw lines into row kinds by
//!   ordered positional prefix matching, most specific option first.
//! - **Line parsers and the document state machine** ([`parser`]): chain the
//!   persistences per field, track the current section scope, and assemble a
//!   [`Document`], or stop with an error locating the exact line and field.
//! - **Formatter** ([`format`]): renders a document back to canonical text;
//!   parsing that text yields an equal document.
//! - **Headers** ([`headers`]): the `key: value` headers block describing a
//!   document as a whole, with its own line grammar and round trip.
//! - **Field catalog** ([`fields`]): the field-grammar definitions as plain
//!   serializable data, for editor-grammar and code-generation tooling.
//!
//! ## Quick Start
//!
//! ```rust
//! use spare_dsl::{from_str, to_string};
//!
//! let text = "\
//! section fragments
//! row id alpha-one v_int 15 url http://cc.org tags [ monday ] emails [ a@email.com ] color_name green items [ v_float 1.3 v_fraction 1/4 ] -> first of the batch
//! ";
//!
//! let document = from_str("doc-1", text).unwrap();
//! assert_eq!(document.fragments.rows[0].id, "alpha-one");
//!
//! // Canonical text round-trips to an equal document.
//! let rendered = to_string(&document);
//! assert_eq!(from_str("doc-1", &rendered).unwrap(), document);
//! ```
//!
//! ## Error reporting
//!
//! Every failure is an [`Error::Parse`] carrying the document id, the line
//! number, the name of the field that was expected and the unconsumed text
//! at the failure point. Parsing is fatal on the first malformed line; there
//! is no recovery or partial result.
//!
//! ## Concurrency
//!
//! Parsers, formatters and detectors are immutable after construction and
//! may be shared read-only across threads; every parse call produces its own
//! private [`Document`].

pub mod detector;
pub mod error;
pub mod fields;
pub mod format;
pub mod headers;
pub mod model;
pub mod parser;
pub mod persistence;

pub use error::{Error, ParsingContext, Result};
pub use fields::{field_catalog, FieldData};
pub use format::DocumentFormatter;
pub use headers::{DocumentHeaders, TextRef, UrlRef};
pub use model::{
    ColorName, Document, Section, SectionHeader, SectionKind, SpareItem, SpareRow,
};
pub use parser::DocumentParser;

/// Parses a full Spare document from a string.
///
/// The `document_id` appears in error locations only.
///
/// # Examples
///
/// ```rust
/// use spare_dsl::from_str;
///
/// let document = from_str("doc-1", "section chunks\n").unwrap();
/// assert!(document.chunks.header.is_some());
/// ```
///
/// # Errors
///
/// Returns a located [`Error::Parse`] for the first malformed line.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(document_id: &str, text: &str) -> Result<Document> {
    DocumentParser::new().parse(document_id, text)
}

/// Renders a document to its canonical text form.
///
/// # Examples
///
/// ```rust
/// use spare_dsl::{to_string, Document};
///
/// assert_eq!(to_string(&Document::new()), "");
/// ```
#[must_use]
pub fn to_string(document: &Document) -> String {
    DocumentFormatter::new().format_document(document)
}

/// Renders a document with an explicitly provided formatter.
///
/// # Examples
///
/// ```rust
/// use spare_dsl::{to_string_with_formatter, Document, DocumentFormatter};
///
/// let formatter = DocumentFormatter::new();
/// assert_eq!(to_string_with_formatter(&Document::new(), &formatter), "");
/// ```
#[must_use]
pub fn to_string_with_formatter(document: &Document, formatter: &DocumentFormatter) -> String {
    formatter.format_document(document)
}
