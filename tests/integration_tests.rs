//! Whole-document integration tests: parsing, routing, error locations and
//! the canonical round trip.

use num_rational::Rational64;
use spare_dsl::{
    field_catalog, from_str, to_string, ColorName, DocumentFormatter, DocumentParser, Error,
    SectionKind, SpareItem, SpareRow,
};

const SAMPLE: &str = "\
# sample spare document
section fragments
row id alpha-one v_int 15 url http://cc.org tags [ monday tuesday ] emails [ a@email.com b@fb.com ] color_name green items [ v_float 1.3 v_fraction 1/4 ] -> first of the batch

row id alpha-two v_int -101 url https://define.me tags [ ] emails [ ] color_name red items [ ] -> second of the batch
--------
section chunks
row id beta-one v_int 0 url http://cc.org tags [ friday ] emails [ c@cc.org ] color_name red items [ v_float -2.5 v_fraction 3/8 , v_float 0.5 v_fraction 7 ] -> chunk row
--------
section accessors
";

#[test]
fn test_parse_sample_document() {
    let document = from_str("sample", SAMPLE).unwrap();

    assert_eq!(document.fragments.rows.len(), 2);
    assert_eq!(document.chunks.rows.len(), 1);
    assert_eq!(document.accessors.rows.len(), 0);
    assert!(document.accessors.header.is_some());

    let first = &document.fragments.rows[0];
    assert_eq!(first.id, "alpha-one");
    assert_eq!(first.v_int, 15);
    assert_eq!(first.color_name, ColorName::Green);
    assert_eq!(first.description, "first of the batch");

    let second = &document.fragments.rows[1];
    assert_eq!(second.v_int, -101);
    assert!(second.tags.is_empty());
    assert!(second.items.is_empty());

    let chunk = &document.chunks.rows[0];
    assert_eq!(
        chunk.items,
        vec![
            SpareItem::new(-2.5, Rational64::new(3, 8)),
            SpareItem::new(0.5, Rational64::new(7, 1)),
        ]
    );
}

#[test]
fn test_sample_round_trip() {
    let document = from_str("sample", SAMPLE).unwrap();
    let rendered = to_string(&document);
    let reparsed = from_str("sample", &rendered).unwrap();
    assert_eq!(document, reparsed);

    // Canonical text is a fixed point: rendering again changes nothing.
    assert_eq!(to_string(&reparsed), rendered);
}

#[test]
fn test_error_location_points_at_offending_line() {
    let text = "\
section fragments
row id alpha-one v_int 15 url http://cc.org tags [ monday ] emails [ a@email.com ] color_name green items [ v_float 1.3 v_fraction 1/4 ] -> fine row
row id alpha-two v_int nope url http://cc.org tags [ ] emails [ ] color_name red items [ ] -> broken row
";
    let err = from_str("doc-err", text).unwrap_err();
    match err {
        Error::Parse {
            context,
            expected,
            actual,
        } => {
            assert_eq!(context.document_id(), "doc-err");
            assert_eq!(context.line_number(), 3);
            assert_eq!(expected, "v_int");
            assert!(actual.starts_with("nope"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_row_without_scope_is_rejected() {
    let text = "row id alpha-one v_int 15 url http://cc.org tags [ ] emails [ ] color_name red items [ ] -> no scope yet\n";
    let err = from_str("doc-err", text).unwrap_err();
    assert_eq!(err.expected_field(), "scope");
}

#[test]
fn test_scope_must_be_reestablished_after_separator() {
    let text = "\
section fragments
--------
row id alpha-one v_int 15 url http://cc.org tags [ ] emails [ ] color_name red items [ ] -> orphaned
";
    let err = from_str("doc-err", text).unwrap_err();
    assert_eq!(err.expected_field(), "scope");
    match err {
        Error::Parse { context, .. } => assert_eq!(context.line_number(), 3),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_unknown_section_kind_is_rejected() {
    let err = from_str("doc-err", "section header\n").unwrap_err();
    // "section header" matches no detector option, so the line itself is an
    // unrecognized row kind.
    assert_eq!(err.expected_field(), "row-kind");
}

#[test]
fn test_parser_is_reusable_across_documents() {
    let parser = DocumentParser::new();
    let one = parser.parse("one", "section chunks\n").unwrap();
    let two = parser.parse("two", "section fragments\n").unwrap();
    assert!(one.chunks.header.is_some());
    assert!(one.fragments.header.is_none());
    assert!(two.fragments.header.is_some());
}

#[test]
fn test_formatter_round_trips_hand_built_document() {
    let mut document = spare_dsl::Document::new();
    document.chunks.header = Some(spare_dsl::SectionHeader::new(SectionKind::Chunks));
    document.chunks.rows.push(
        SpareRow::new("gamma-one", -7, "https://define.me", ColorName::Red)
            .with_tag("tuesday")
            .with_tag("monday")
            .with_email("x@yz.org")
            .with_item(SpareItem::new(0.5, Rational64::new(-3, 8)))
            .with_description("hand built"),
    );

    let formatter = DocumentFormatter::new();
    let text = formatter.format_document(&document);
    assert_eq!(from_str("hand", &text).unwrap(), document);
}

#[test]
fn test_document_exports_to_json() {
    let document = from_str("sample", SAMPLE).unwrap();
    let json = serde_json::to_string(&document).unwrap();
    assert!(json.contains("\"fragments\""));
    assert!(json.contains("\"alpha-one\""));
}

#[test]
fn test_field_catalog_is_consumable_as_json() {
    let json = serde_json::to_string_pretty(&field_catalog()).unwrap();
    assert!(json.contains("\"match\""));
    assert!(json.contains("\"keywords\""));
    // The catalog names every field the row grammar parses.
    for name in [
        "id",
        "v_int",
        "url",
        "tag",
        "email",
        "color_name",
        "tags",
        "emails",
        "items",
        "v_float",
        "v_fraction",
        "description",
    ] {
        assert!(
            json.contains(&format!("\"name\": \"{name}\"")),
            "missing field {name}"
        );
    }
}
