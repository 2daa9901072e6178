//! Line parsers, the parser registry, and the document state machine.
//!
//! Each line parser owns one token persistence per grammatical field, in
//! declaration order, and threads the remainder string through a strict
//! left-to-right chain: consume a literal marker, then a typed value, then
//! the next marker. A failure anywhere in the chain reports the current
//! [`ParsingContext`], the name of the failing field, and the unconsumed
//! text at that point.
//!
//! Sequence-valued fields (tags, emails, items) are parsed in two passes:
//! the bracketed list is split first, then every fragment is re-validated
//! and converted by the scalar sub-grammar for that field. A second-pass
//! failure still reports the outer line's context plus the sub-field name.
//!
//! The [`DocumentParser`] runs the per-line state machine over a whole
//! document: blank lines and comments are skipped, the separator line resets
//! scope, every other line is classified by the [`RowDetector`], parsed by
//! the registered line parser, and routed into the document by the current
//! scope. Parsing is single-pass with no backtracking; the first error
//! aborts.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::parser::DocumentParser;
//!
//! let text = "\
//! section fragments
//! row id alpha-one v_int 15 url http://cc.org tags [ monday ] emails [ a@email.com ] color_name green items [ v_float 1.3 v_fraction 1/4 ] -> first row
//! ";
//! let parser = DocumentParser::new();
//! let document = parser.parse("doc-1", text).unwrap();
//! assert_eq!(document.fragments.rows.len(), 1);
//! ```

use indexmap::IndexMap;

use crate::detector::{RowDetector, RowDetectorOption};
use crate::error::{Error, ParsingContext, Result};
use crate::model::{
    ColorName, Document, SectionHeader, SectionKind, SpareItem, SpareRow,
};
use crate::persistence::{
    patterns, EnumPersistence, FloatPersistence, FractionPersistence, IntegerPersistence,
    RegexPersistence, SequencePersistence, SignPolicy, TokenPersistence,
};

/// The literal line separating major sections.
pub const SECTION_SEPARATOR: &str = "--------";

/// Prefix of comment lines.
pub const COMMENT_PREFIX: &str = "#";

/// Parses one `v_float <float> v_fraction <fraction>` fragment of a row's
/// `items` sequence.
#[derive(Debug, Clone)]
pub struct ItemParser {
    marker_v_float: EnumPersistence,
    v_float: FloatPersistence,
    marker_v_fraction: EnumPersistence,
    v_fraction: FractionPersistence,
}

impl Default for ItemParser {
    fn default() -> Self {
        ItemParser {
            marker_v_float: EnumPersistence::marker("v_float"),
            v_float: FloatPersistence::new("v_float", SignPolicy::Either, " "),
            marker_v_fraction: EnumPersistence::marker("v_fraction"),
            v_fraction: FractionPersistence::new("v_fraction", SignPolicy::Either, " "),
        }
    }
}

impl ItemParser {
    #[must_use]
    pub fn new() -> Self {
        ItemParser::default()
    }

    /// Parses one item fragment; the fragment must be fully consumed.
    pub fn parse(&self, ctx: &ParsingContext, fragment: &str) -> Result<SpareItem> {
        let rest = self.marker_v_float.consume_marker(ctx, fragment)?;
        let (v_float, rest) = self.v_float.parse_ctx_f64(ctx, rest)?;
        let rest = self.marker_v_fraction.consume_marker(ctx, rest)?;
        let (v_fraction, rest) = self.v_fraction.parse_ctx_ratio(ctx, rest)?;
        if !rest.trim().is_empty() {
            return Err(Error::parse(ctx, "item", rest));
        }
        Ok(SpareItem::new(v_float, v_fraction))
    }
}

/// Parses one `row ...` line into a [`SpareRow`].
#[derive(Debug, Clone)]
pub struct RowParser {
    marker_row: EnumPersistence,
    marker_id: EnumPersistence,
    id: RegexPersistence,
    marker_v_int: EnumPersistence,
    v_int: IntegerPersistence,
    marker_url: EnumPersistence,
    url: RegexPersistence,
    marker_tags: EnumPersistence,
    tags: SequencePersistence,
    tag: RegexPersistence,
    marker_emails: EnumPersistence,
    emails: SequencePersistence,
    email: RegexPersistence,
    marker_color_name: EnumPersistence,
    color_name: EnumPersistence,
    marker_items: EnumPersistence,
    items: SequencePersistence,
    item: ItemParser,
    marker_description: EnumPersistence,
    description: RegexPersistence,
}

impl Default for RowParser {
    fn default() -> Self {
        RowParser {
            marker_row: EnumPersistence::marker("row"),
            marker_id: EnumPersistence::marker("id"),
            id: RegexPersistence::new("id", &patterns::ID_RE, " "),
            marker_v_int: EnumPersistence::marker("v_int"),
            v_int: IntegerPersistence::new("v_int", SignPolicy::Either, " "),
            marker_url: EnumPersistence::marker("url"),
            url: RegexPersistence::new("url", &patterns::URL_RE, " "),
            marker_tags: EnumPersistence::marker("tags"),
            tags: SequencePersistence::new("tags", '[', ']', ' '),
            tag: RegexPersistence::new("tag", &patterns::TAG_RE, " "),
            marker_emails: EnumPersistence::marker("emails"),
            emails: SequencePersistence::new("emails", '[', ']', ' '),
            email: RegexPersistence::new("email", &patterns::EMAIL_RE, " "),
            marker_color_name: EnumPersistence::marker("color_name"),
            color_name: EnumPersistence::new("color_name", ColorName::all_values(), " "),
            marker_items: EnumPersistence::marker("items"),
            items: SequencePersistence::new("items", '[', ']', ','),
            item: ItemParser::new(),
            marker_description: EnumPersistence::marker("->"),
            description: RegexPersistence::new("description", &patterns::END_STRING_RE, "\n"),
        }
    }
}

impl RowParser {
    #[must_use]
    pub fn new() -> Self {
        RowParser::default()
    }

    pub fn parse(&self, ctx: &ParsingContext, line: &str) -> Result<SpareRow> {
        let rest = self.marker_row.consume_marker(ctx, line)?;

        let rest = self.marker_id.consume_marker(ctx, rest)?;
        let (id, rest) = self.id.parse_ctx_string(ctx, rest)?;

        let rest = self.marker_v_int.consume_marker(ctx, rest)?;
        let (v_int, rest) = self.v_int.parse_ctx_i64(ctx, rest)?;

        let rest = self.marker_url.consume_marker(ctx, rest)?;
        let (url, rest) = self.url.parse_ctx_string(ctx, rest)?;

        let rest = self.marker_tags.consume_marker(ctx, rest)?;
        let (raw_tags, rest) = self.tags.parse_ctx_list(ctx, rest)?;
        let tags = self.tag.list_parse_ctx(ctx, &raw_tags)?;

        let rest = self.marker_emails.consume_marker(ctx, rest)?;
        let (raw_emails, rest) = self.emails.parse_ctx_list(ctx, rest)?;
        let emails = self.email.list_parse_ctx(ctx, &raw_emails)?;

        let rest = self.marker_color_name.consume_marker(ctx, rest)?;
        let (color_token, rest) = self.color_name.parse_ctx_string(ctx, rest)?;
        let color_name = ColorName::from_str_opt(color_token)
            .ok_or_else(|| Error::parse(ctx, "color_name", color_token))?;

        let rest = self.marker_items.consume_marker(ctx, rest)?;
        let (raw_items, rest) = self.items.parse_ctx_list(ctx, rest)?;
        let items = raw_items
            .iter()
            .map(|fragment| self.item.parse(ctx, fragment))
            .collect::<Result<Vec<_>>>()?;

        let rest = self.marker_description.consume_marker(ctx, rest)?;
        let (description, _) = self.description.parse_ctx_string(ctx, rest)?;

        Ok(SpareRow {
            id: id.to_string(),
            v_int,
            url: url.to_string(),
            tags: tags.into_iter().collect(),
            emails,
            color_name,
            items,
            description: description.to_string(),
        })
    }
}

/// Parses one `section <kind>` line into a [`SectionHeader`].
#[derive(Debug, Clone)]
pub struct SectionParser {
    marker_section: EnumPersistence,
    kind: EnumPersistence,
}

impl Default for SectionParser {
    fn default() -> Self {
        SectionParser {
            marker_section: EnumPersistence::marker("section"),
            kind: EnumPersistence::new(
                "section-kind",
                &["fragments", "chunks", "accessors"],
                " ",
            ),
        }
    }
}

impl SectionParser {
    #[must_use]
    pub fn new() -> Self {
        SectionParser::default()
    }

    pub fn parse(&self, ctx: &ParsingContext, line: &str) -> Result<SectionHeader> {
        let rest = self.marker_section.consume_marker(ctx, line)?;
        let (kind_token, rest) = self.kind.parse_ctx_string(ctx, rest)?;
        let kind = SectionKind::from_str_opt(kind_token)
            .ok_or_else(|| Error::parse(ctx, "section-kind", kind_token))?;
        if !rest.trim().is_empty() {
            return Err(Error::parse(ctx, "section-kind", rest));
        }
        Ok(SectionHeader::new(kind))
    }
}

/// A record produced by one line parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Header(SectionHeader),
    Row(SpareRow),
}

/// The closed set of line parsers a row kind can dispatch to.
#[derive(Debug, Clone)]
pub enum RecordParser {
    Section(SectionParser),
    Row(RowParser),
}

impl RecordParser {
    pub fn parse(&self, ctx: &ParsingContext, line: &str) -> Result<Record> {
        match self {
            RecordParser::Section(parser) => parser.parse(ctx, line).map(Record::Header),
            RecordParser::Row(parser) => parser.parse(ctx, line).map(Record::Row),
        }
    }
}

/// How many records of a row kind a scope may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multiple,
}

/// The scope a row kind declares: a named section to enter, or the wildcard
/// (stay in whatever scope is current).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Any,
    Named(SectionKind),
}

/// Registry entry for one row kind.
#[derive(Debug, Clone)]
pub struct LineParserConfig {
    pub scope: Scope,
    pub cardinality: Cardinality,
    pub parser: RecordParser,
}

impl LineParserConfig {
    #[must_use]
    pub fn new(scope: Scope, cardinality: Cardinality, parser: RecordParser) -> Self {
        LineParserConfig {
            scope,
            cardinality,
            parser,
        }
    }
}

/// Row kind name → parser configuration, built once and read-only during
/// parsing.
pub type ScriptParser = IndexMap<String, LineParserConfig>;

fn spare_registry() -> ScriptParser {
    let mut registry = ScriptParser::new();
    for kind in SectionKind::all() {
        registry.insert(
            format!("section-{}", kind.as_str()),
            LineParserConfig::new(
                Scope::Named(*kind),
                Cardinality::Single,
                RecordParser::Section(SectionParser::new()),
            ),
        );
    }
    registry.insert(
        "row".to_string(),
        LineParserConfig::new(
            Scope::Any,
            Cardinality::Multiple,
            RecordParser::Row(RowParser::new()),
        ),
    );
    registry
}

fn spare_detector() -> RowDetector {
    let mut options: Vec<RowDetectorOption> = SectionKind::all()
        .iter()
        .map(|kind| {
            RowDetectorOption::new(
                &format!("section-{}", kind.as_str()),
                &["section", kind.as_str()],
            )
        })
        .collect();
    options.push(RowDetectorOption::new("row", &["row"]));
    RowDetector::new(options)
}

/// The whole-document state machine.
///
/// Scans a document line by line, classifies each line, dispatches it to the
/// registered line parser and routes the resulting record into the document
/// by the current scope. Immutable after construction; each call to
/// [`DocumentParser::parse`] produces a fresh [`Document`] and may run
/// concurrently with others.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    detector: RowDetector,
    registry: ScriptParser,
}

impl Default for DocumentParser {
    fn default() -> Self {
        DocumentParser {
            detector: spare_detector(),
            registry: spare_registry(),
        }
    }
}

impl DocumentParser {
    #[must_use]
    pub fn new() -> Self {
        DocumentParser::default()
    }

    /// Parses a full document, aborting at the first malformed line.
    ///
    /// # Errors
    ///
    /// Returns a located [`Error::Parse`] for any grammar mismatch, for an
    /// unrecognized row kind, for a record encountered before any scope was
    /// established, and for a section header assigned twice.
    pub fn parse(&self, document_id: &str, text: &str) -> Result<Document> {
        let mut document = Document::new();
        let mut scope: Option<SectionKind> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let ctx = ParsingContext::new(document_id, index + 1);
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            if line == SECTION_SEPARATOR {
                scope = None;
                continue;
            }

            let kind = self
                .detector
                .detect(&ctx, line)?
                .ok_or_else(|| Error::parse(&ctx, "row-kind", line))?;
            let config = self
                .registry
                .get(kind)
                .ok_or_else(|| Error::parse(&ctx, kind, line))?;

            let record = config.parser.parse(&ctx, line)?;

            if let Scope::Named(section_kind) = config.scope {
                scope = Some(section_kind);
            }
            let current = scope.ok_or_else(|| Error::parse(&ctx, "scope", line))?;

            match record {
                Record::Header(header) => {
                    let section = document.section_mut(header.kind);
                    if config.cardinality == Cardinality::Single && section.header.is_some() {
                        return Err(Error::parse(&ctx, "section-header", line));
                    }
                    section.header = Some(header);
                }
                Record::Row(row) => {
                    document.section_mut(current).rows.push(row);
                }
            }
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::Rational64;

    const ROW_LINE: &str = "row id alpha-one v_int 15 url http://cc.org \
        tags [ monday tuesday ] emails [ a@email.com b@fb.com ] color_name green \
        items [ v_float 1.3 v_fraction 1/4 , v_float -2.5 v_fraction 3/8 ] -> first of the batch";

    fn ctx() -> ParsingContext {
        ParsingContext::new("test-doc", 27)
    }

    #[test]
    fn test_row_parse_success() {
        let row = RowParser::new().parse(&ctx(), ROW_LINE).unwrap();
        assert_eq!(row.id, "alpha-one");
        assert_eq!(row.v_int, 15);
        assert_eq!(row.url, "http://cc.org");
        assert!(row.tags.contains("monday"));
        assert!(row.tags.contains("tuesday"));
        assert_eq!(row.emails, vec!["a@email.com", "b@fb.com"]);
        assert_eq!(row.color_name, ColorName::Green);
        assert_eq!(
            row.items,
            vec![
                SpareItem::new(1.3, Rational64::new(1, 4)),
                SpareItem::new(-2.5, Rational64::new(3, 8)),
            ]
        );
        assert_eq!(row.description, "first of the batch");
    }

    #[test]
    fn test_row_parse_reports_failing_field() {
        let line = ROW_LINE.replace("v_int 15", "v_int fifteen");
        let err = RowParser::new().parse(&ctx(), &line).unwrap_err();
        assert_eq!(err.expected_field(), "v_int");
        match err {
            Error::Parse { context, .. } => assert_eq!(context.line_number(), 27),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_row_parse_reports_sub_field_inside_sequence() {
        let line = ROW_LINE.replace("[ monday tuesday ]", "[ monday 9bad ]");
        let err = RowParser::new().parse(&ctx(), &line).unwrap_err();
        assert_eq!(err.expected_field(), "tag");
    }

    #[test]
    fn test_row_parse_reports_item_sub_grammar() {
        let line = ROW_LINE.replace("v_fraction 3/8", "v_fraction 3/x");
        let err = RowParser::new().parse(&ctx(), &line).unwrap_err();
        assert_eq!(err.expected_field(), "v_fraction");
    }

    #[test]
    fn test_row_parse_requires_float_decimal_part() {
        let line = ROW_LINE.replace("v_float 1.3", "v_float 7");
        let err = RowParser::new().parse(&ctx(), &line).unwrap_err();
        assert_eq!(err.expected_field(), "v_float");
    }

    #[test]
    fn test_row_parse_rejects_out_of_vocabulary_color() {
        let line = ROW_LINE.replace("color_name green", "color_name orange");
        let err = RowParser::new().parse(&ctx(), &line).unwrap_err();
        assert_eq!(err.expected_field(), "color_name");
    }

    #[test]
    fn test_row_parse_empty_sequences() {
        let line = "row id alpha-one v_int 0 url http://cc.org tags [ ] emails [ ] \
            color_name red items [ ] -> still a fine row";
        let row = RowParser::new().parse(&ctx(), line).unwrap();
        assert!(row.tags.is_empty());
        assert!(row.emails.is_empty());
        assert!(row.items.is_empty());
    }

    #[test]
    fn test_item_parser_requires_full_consumption() {
        let parser = ItemParser::new();
        let err = parser
            .parse(&ctx(), "v_float 1.3 v_fraction 1/4 leftover")
            .unwrap_err();
        assert_eq!(err.expected_field(), "item");
    }

    #[test]
    fn test_section_parse() {
        let header = SectionParser::new()
            .parse(&ctx(), "section fragments")
            .unwrap();
        assert_eq!(header.kind, SectionKind::Fragments);

        let err = SectionParser::new()
            .parse(&ctx(), "section nowhere")
            .unwrap_err();
        assert_eq!(err.expected_field(), "section-kind");
    }

    #[test]
    fn test_document_parse_routes_rows_by_scope() {
        let text = format!(
            "section fragments\n{ROW_LINE}\n{ROW_LINE}\n--------\nsection chunks\n{ROW_LINE}\n"
        );
        let document = DocumentParser::new().parse("doc-1", &text).unwrap();
        assert_eq!(document.fragments.rows.len(), 2);
        assert_eq!(document.chunks.rows.len(), 1);
        assert!(document.accessors.is_empty());
        assert_eq!(
            document.fragments.header,
            Some(SectionHeader::new(SectionKind::Fragments))
        );
    }

    #[test]
    fn test_document_parse_skips_blanks_and_comments() {
        let text = format!("# a comment\n\nsection accessors\n# another\n{ROW_LINE}\n");
        let document = DocumentParser::new().parse("doc-1", &text).unwrap();
        assert_eq!(document.accessors.rows.len(), 1);
    }

    #[test]
    fn test_row_before_any_scope_is_fatal() {
        let err = DocumentParser::new()
            .parse("doc-1", &format!("{ROW_LINE}\n"))
            .unwrap_err();
        assert_eq!(err.expected_field(), "scope");
        match err {
            Error::Parse { context, .. } => assert_eq!(context.line_number(), 1),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_separator_resets_scope() {
        let text = format!("section fragments\n--------\n{ROW_LINE}\n");
        let err = DocumentParser::new().parse("doc-1", &text).unwrap_err();
        assert_eq!(err.expected_field(), "scope");
        match err {
            Error::Parse { context, .. } => assert_eq!(context.line_number(), 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_section_header_is_fatal() {
        let text = "section fragments\nsection fragments\n";
        let err = DocumentParser::new().parse("doc-1", text).unwrap_err();
        assert_eq!(err.expected_field(), "section-header");
    }

    #[test]
    fn test_unrecognized_row_kind_is_fatal() {
        let text = "section fragments\ncolumn one two\n";
        let err = DocumentParser::new().parse("doc-1", text).unwrap_err();
        assert_eq!(err.expected_field(), "row-kind");
        match err {
            Error::Parse { context, .. } => assert_eq!(context.line_number(), 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_aborts_before_later_lines() {
        // Line 2 is malformed; the valid row on line 3 must not be reached.
        let text = format!("section fragments\nrow broken\n{ROW_LINE}\n");
        let err = DocumentParser::new().parse("doc-1", &text).unwrap_err();
        match err {
            Error::Parse { context, .. } => assert_eq!(context.line_number(), 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_document_is_accepted() {
        let document = DocumentParser::new()
            .parse("doc-1", "section chunks\n")
            .unwrap();
        assert!(document.fragments.is_empty());
        assert_eq!(document.chunks.rows.len(), 0);
        assert!(document.chunks.header.is_some());
    }
}
