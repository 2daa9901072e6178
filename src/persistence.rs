//! Token persistence primitives.
//!
//! A *persistence* is a recognizer and serializer for one grammatical field
//! kind. Each implementation of [`TokenPersistence`] can test whether the
//! front of a chunk of text holds a valid token ([`TokenPersistence::satisfy`]),
//! consume exactly that token while returning the unconsumed remainder
//! ([`TokenPersistence::parse_as_string`]), and render values back to their
//! canonical text form ([`TokenPersistence::to_csv_string`]).
//!
//! Line parsers thread a remainder string through a chain of persistences,
//! one per field, strictly left to right. The contexted combinators
//! ([`TokenPersistence::parse_ctx_string`], [`TokenPersistence::consume_marker`],
//! ...) check `satisfy` first and raise a located [`Error::Parse`] naming the
//! failing field, so a grammar mismatch always reports exactly where the
//! input diverged.
//!
//! All configurations are immutable after construction and hold no mutable
//! state, so a persistence may be shared read-only across concurrent parses.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::persistence::{SequencePersistence, TokenPersistence};
//!
//! let tags = SequencePersistence::new("tags", '[', ']', ' ');
//! assert!(tags.satisfy("[ a b ] trailing"));
//!
//! let (values, rest) = tags.parse_as_list("[ a b ] trailing").unwrap();
//! assert_eq!(values, vec!["a", "b"]);
//! assert_eq!(rest, " trailing");
//! ```

use num_rational::Rational64;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::error::{Error, ParsingContext, Result};

/// The field patterns of the Spare grammar.
///
/// These pattern strings are part of the stable read-only contract consumed
/// by external tooling (editor grammars, code generators); the compiled,
/// front-anchored forms are used internally by `satisfy`.
pub mod patterns {
    use super::*;

    /// Lower-dash identifier, e.g. `alpha-one`.
    pub const ID: &str = "[a-z][a-z0-9-]+";
    /// Tag name, same shape as identifiers.
    pub const TAG: &str = "[a-z][a-z0-9-]+";
    /// Absolute http(s) URL.
    pub const URL: &str = r"https?://[^\s]+";
    /// Plain email address.
    pub const EMAIL: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+[.][a-z]{2,}";
    /// Signed decimal integer.
    pub const INTEGER: &str = "[+-]?[0-9]+";
    /// Signed decimal number with a mandatory fractional part.
    pub const FLOAT: &str = "[+-]?[0-9]+[.][0-9]+";
    /// Rational literal, `3` or `-1/4`; denominator never zero-led.
    pub const FRACTION: &str = "[+-]?[0-9]+(/[1-9][0-9]*)?";
    /// Free text running to end of line, at least two characters.
    pub const END_STRING: &str = ".{2,}";

    pub static ID_RE: Lazy<Regex> = Lazy::new(|| anchored(ID));
    pub static TAG_RE: Lazy<Regex> = Lazy::new(|| anchored(TAG));
    pub static URL_RE: Lazy<Regex> = Lazy::new(|| anchored(URL));
    pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| anchored(EMAIL));
    pub static INTEGER_RE: Lazy<Regex> = Lazy::new(|| anchored(INTEGER));
    pub static FLOAT_RE: Lazy<Regex> = Lazy::new(|| anchored(FLOAT));
    pub static FRACTION_RE: Lazy<Regex> = Lazy::new(|| anchored(FRACTION));
    pub static END_STRING_RE: Lazy<Regex> = Lazy::new(|| anchored(END_STRING));

    // All catalog patterns are fixed literals, checked by the tests below.
    pub(crate) fn anchored(pattern: &str) -> Regex {
        Regex::new(&format!("^(?:{pattern})")).expect("field pattern compiles")
    }
}

/// Whether a numeric token must, must not, or may carry an explicit sign.
///
/// The literal `"0"` is accepted under every policy.
///
/// # Examples
///
/// ```rust
/// use spare_dsl::persistence::{IntegerPersistence, SignPolicy, TokenPersistence};
///
/// let strict = IntegerPersistence::new("v_int", SignPolicy::Require, " ");
/// assert!(strict.satisfy("+3"));
/// assert!(!strict.satisfy("3"));
/// assert!(strict.satisfy("0"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignPolicy {
    /// A leading `+` or `-` is mandatory.
    Require,
    /// A leading sign is rejected.
    Forbid,
    /// A leading sign is accepted but not required.
    Either,
}

impl SignPolicy {
    fn allows(self, candidate: &str) -> bool {
        let signed = candidate.starts_with('+') || candidate.starts_with('-');
        match self {
            SignPolicy::Require => signed,
            SignPolicy::Forbid => !signed,
            SignPolicy::Either => true,
        }
    }
}

/// Splits one scalar token off the front of `chunk`.
///
/// Leading whitespace is trimmed, the candidate runs up to the first
/// occurrence of `separator` (or the whole remaining string if absent), and
/// the remainder excludes the separator itself.
fn split_scalar<'a>(chunk: &'a str, separator: &str) -> (&'a str, &'a str) {
    let trimmed = chunk.trim_start();
    match trimmed.find(separator) {
        Some(pos) => (trimmed[..pos].trim_end(), &trimmed[pos + separator.len()..]),
        None => (trimmed.trim_end(), ""),
    }
}

/// The capability set shared by every token persistence.
///
/// `satisfy` is a pure predicate and never raises; the plain parse operations
/// assume it holds. The `*_ctx` combinators perform that check and produce a
/// located [`Error::Parse`] naming the field when it fails.
pub trait TokenPersistence {
    /// The declared field name, used only for error messages and the
    /// field-grammar contract.
    fn name(&self) -> &str;

    /// Tests whether the front of `chunk` holds a valid token of this kind.
    fn satisfy(&self, chunk: &str) -> bool;

    /// Consumes one token, returning `(token, remainder)`.
    ///
    /// The remainder excludes the separator (or closing character) that
    /// terminated the token, and is strictly shorter than `chunk` whenever
    /// [`TokenPersistence::satisfy`] holds.
    fn parse_as_string<'a>(&self, chunk: &'a str) -> (&'a str, &'a str);

    /// Consumes one bracketed sequence, returning the trimmed non-empty
    /// fragments and the remainder. Sequence persistences only; every other
    /// kind reports [`Error::Unsupported`].
    fn parse_as_list<'a>(&self, chunk: &'a str) -> Result<(Vec<&'a str>, &'a str)> {
        let _ = chunk;
        Err(Error::unsupported(self.name(), "parse_as_list"))
    }

    /// Renders values back to the canonical text this persistence parses.
    fn to_csv_string(&self, values: &[String]) -> String;

    /// Checks `satisfy` under `ctx`, then parses one token.
    fn parse_ctx_string<'a>(
        &self,
        ctx: &ParsingContext,
        chunk: &'a str,
    ) -> Result<(&'a str, &'a str)> {
        if !self.satisfy(chunk) {
            return Err(Error::parse(ctx, self.name(), chunk));
        }
        Ok(self.parse_as_string(chunk))
    }

    /// Checks `satisfy` under `ctx`, then parses a bracketed sequence.
    fn parse_ctx_list<'a>(
        &self,
        ctx: &ParsingContext,
        chunk: &'a str,
    ) -> Result<(Vec<&'a str>, &'a str)> {
        if !self.satisfy(chunk) {
            return Err(Error::parse(ctx, self.name(), chunk));
        }
        self.parse_as_list(chunk)
    }

    /// Consumes a fixed literal marker, returning only the remainder.
    fn consume_marker<'a>(&self, ctx: &ParsingContext, chunk: &'a str) -> Result<&'a str> {
        let (_, rest) = self.parse_ctx_string(ctx, chunk)?;
        Ok(rest)
    }

    /// Applies `satisfy` to every element of an already-split list.
    fn list_satisfy(&self, values: &[&str]) -> bool {
        values.iter().all(|value| self.satisfy(value))
    }

    /// Parses every element of an already-split list, re-validating each one
    /// under `ctx`. A failing element reports this persistence's name.
    fn list_parse_ctx(&self, ctx: &ParsingContext, values: &[&str]) -> Result<Vec<String>> {
        values
            .iter()
            .map(|value| {
                self.parse_ctx_string(ctx, value)
                    .map(|(token, _)| token.to_string())
            })
            .collect()
    }
}

/// A flat bracketed sequence, e.g. `[ a b ]` or `[ x , y ]`.
///
/// Scanning is not depth-aware: parsing finds the *first* occurrence of the
/// finish character after the start, so nested same-bracket content is
/// unsupported. The grammar never nests sequences.
///
/// # Examples
///
/// ```rust
/// use spare_dsl::persistence::{SequencePersistence, TokenPersistence};
///
/// let seq = SequencePersistence::new("tags", '[', ']', ',');
/// let (values, rest) = seq.parse_as_list("[ a , b ] trailing").unwrap();
/// assert_eq!(values, vec!["a", "b"]);
/// assert_eq!(rest, " trailing");
/// assert_eq!(seq.to_csv_string(&["a".into(), "b".into()]), "[ a, b ]");
/// ```
#[derive(Debug, Clone)]
pub struct SequencePersistence {
    name: String,
    start: char,
    finish: char,
    separator: char,
}

impl SequencePersistence {
    #[must_use]
    pub fn new(name: &str, start: char, finish: char, separator: char) -> Self {
        SequencePersistence {
            name: name.to_string(),
            start,
            finish,
            separator,
        }
    }

    /// Byte range of the interior and the remainder start, if well-formed.
    fn scan(&self, trimmed: &str) -> Option<(usize, usize, usize)> {
        if !trimmed.starts_with(self.start) {
            return None;
        }
        let interior_start = self.start.len_utf8();
        let finish_offset = trimmed[interior_start..].find(self.finish)?;
        let interior_end = interior_start + finish_offset;
        let remainder_start = interior_end + self.finish.len_utf8();
        Some((interior_start, interior_end, remainder_start))
    }
}

impl TokenPersistence for SequencePersistence {
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfy(&self, chunk: &str) -> bool {
        let trimmed = chunk.trim_start();
        trimmed.chars().count() >= 2 && self.scan(trimmed).is_some()
    }

    fn parse_as_string<'a>(&self, chunk: &'a str) -> (&'a str, &'a str) {
        let trimmed = chunk.trim_start();
        match self.scan(trimmed) {
            Some((interior_start, interior_end, remainder_start)) => (
                trimmed[interior_start..interior_end].trim(),
                &trimmed[remainder_start..],
            ),
            None => ("", trimmed),
        }
    }

    fn parse_as_list<'a>(&self, chunk: &'a str) -> Result<(Vec<&'a str>, &'a str)> {
        let (interior, remainder) = self.parse_as_string(chunk);
        let values = interior
            .split(self.separator)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect();
        Ok((values, remainder))
    }

    fn to_csv_string(&self, values: &[String]) -> String {
        let joiner = if self.separator == ' ' {
            " ".to_string()
        } else {
            format!("{} ", self.separator)
        };
        format!("{} {} {}", self.start, values.join(&joiner), self.finish)
    }
}

/// A token constrained by a compiled pattern, up to a separator.
///
/// The pattern is matched against the front of the candidate; a prefix match
/// suffices. Used for identifiers, urls, emails and end-of-line text.
#[derive(Debug, Clone)]
pub struct RegexPersistence {
    name: String,
    pattern: Regex,
    separator: String,
}

impl RegexPersistence {
    #[must_use]
    pub fn new(name: &str, pattern: &Regex, separator: &str) -> Self {
        RegexPersistence {
            name: name.to_string(),
            pattern: pattern.clone(),
            separator: separator.to_string(),
        }
    }

    /// The pattern string, part of the read-only field-grammar contract.
    #[must_use]
    pub fn match_pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl TokenPersistence for RegexPersistence {
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfy(&self, chunk: &str) -> bool {
        let (candidate, _) = split_scalar(chunk, &self.separator);
        self.pattern.is_match(candidate)
    }

    fn parse_as_string<'a>(&self, chunk: &'a str) -> (&'a str, &'a str) {
        split_scalar(chunk, &self.separator)
    }

    fn to_csv_string(&self, values: &[String]) -> String {
        values.join(&self.separator)
    }
}

/// A signed decimal integer with a configurable sign policy.
#[derive(Debug, Clone)]
pub struct IntegerPersistence {
    name: String,
    sign: SignPolicy,
    separator: String,
}

impl IntegerPersistence {
    #[must_use]
    pub fn new(name: &str, sign: SignPolicy, separator: &str) -> Self {
        IntegerPersistence {
            name: name.to_string(),
            sign,
            separator: separator.to_string(),
        }
    }

    /// Checks `satisfy` under `ctx`, then parses and converts one integer.
    pub fn parse_ctx_i64<'a>(
        &self,
        ctx: &ParsingContext,
        chunk: &'a str,
    ) -> Result<(i64, &'a str)> {
        let (token, rest) = self.parse_ctx_string(ctx, chunk)?;
        let value = i64::from_str(token).map_err(|_| Error::parse(ctx, &self.name, token))?;
        Ok((value, rest))
    }
}

impl TokenPersistence for IntegerPersistence {
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfy(&self, chunk: &str) -> bool {
        let (candidate, _) = split_scalar(chunk, &self.separator);
        if candidate == "0" {
            return true;
        }
        patterns::INTEGER_RE.is_match(candidate)
            && self.sign.allows(candidate)
            && i64::from_str(candidate).is_ok()
    }

    fn parse_as_string<'a>(&self, chunk: &'a str) -> (&'a str, &'a str) {
        split_scalar(chunk, &self.separator)
    }

    fn to_csv_string(&self, values: &[String]) -> String {
        values.join(&self.separator)
    }
}

/// A signed decimal number with a configurable sign policy.
#[derive(Debug, Clone)]
pub struct FloatPersistence {
    name: String,
    sign: SignPolicy,
    separator: String,
}

impl FloatPersistence {
    #[must_use]
    pub fn new(name: &str, sign: SignPolicy, separator: &str) -> Self {
        FloatPersistence {
            name: name.to_string(),
            sign,
            separator: separator.to_string(),
        }
    }

    /// Checks `satisfy` under `ctx`, then parses and converts one float.
    pub fn parse_ctx_f64<'a>(
        &self,
        ctx: &ParsingContext,
        chunk: &'a str,
    ) -> Result<(f64, &'a str)> {
        let (token, rest) = self.parse_ctx_string(ctx, chunk)?;
        let value = f64::from_str(token).map_err(|_| Error::parse(ctx, &self.name, token))?;
        Ok((value, rest))
    }
}

impl TokenPersistence for FloatPersistence {
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfy(&self, chunk: &str) -> bool {
        let (candidate, _) = split_scalar(chunk, &self.separator);
        if candidate == "0" {
            return true;
        }
        patterns::FLOAT_RE.is_match(candidate)
            && self.sign.allows(candidate)
            && f64::from_str(candidate).is_ok()
    }

    fn parse_as_string<'a>(&self, chunk: &'a str) -> (&'a str, &'a str) {
        split_scalar(chunk, &self.separator)
    }

    fn to_csv_string(&self, values: &[String]) -> String {
        values.join(&self.separator)
    }
}

/// A rational literal (`1/4`, `-3/8`, or a plain integer) with a configurable
/// sign policy.
#[derive(Debug, Clone)]
pub struct FractionPersistence {
    name: String,
    sign: SignPolicy,
    separator: String,
}

impl FractionPersistence {
    #[must_use]
    pub fn new(name: &str, sign: SignPolicy, separator: &str) -> Self {
        FractionPersistence {
            name: name.to_string(),
            sign,
            separator: separator.to_string(),
        }
    }

    /// Checks `satisfy` under `ctx`, then parses and converts one fraction.
    pub fn parse_ctx_ratio<'a>(
        &self,
        ctx: &ParsingContext,
        chunk: &'a str,
    ) -> Result<(Rational64, &'a str)> {
        let (token, rest) = self.parse_ctx_string(ctx, chunk)?;
        let value = Rational64::from_str(token).map_err(|_| Error::parse(ctx, &self.name, token))?;
        Ok((value, rest))
    }
}

impl TokenPersistence for FractionPersistence {
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfy(&self, chunk: &str) -> bool {
        let (candidate, _) = split_scalar(chunk, &self.separator);
        if candidate == "0" {
            return true;
        }
        patterns::FRACTION_RE.is_match(candidate)
            && self.sign.allows(candidate)
            && Rational64::from_str(candidate).is_ok()
    }

    fn parse_as_string<'a>(&self, chunk: &'a str) -> (&'a str, &'a str) {
        split_scalar(chunk, &self.separator)
    }

    fn to_csv_string(&self, values: &[String]) -> String {
        values.join(&self.separator)
    }
}

/// A closed vocabulary of literal strings.
///
/// Membership is exact string equality, never pattern matching. A vocabulary
/// of one literal doubles as a fixed keyword marker (`row`, `tags`, `->`).
///
/// # Examples
///
/// ```rust
/// use spare_dsl::persistence::{EnumPersistence, TokenPersistence};
///
/// let color = EnumPersistence::new("color_name", &["red", "green"], " ");
/// assert!(color.satisfy("red extra"));
/// assert!(!color.satisfy("orange extra"));
/// assert_eq!(color.parse_as_string("red extra"), ("red", "extra"));
/// ```
#[derive(Debug, Clone)]
pub struct EnumPersistence {
    name: String,
    values: Vec<String>,
    separator: String,
}

impl EnumPersistence {
    #[must_use]
    pub fn new(name: &str, values: &[&str], separator: &str) -> Self {
        EnumPersistence {
            name: name.to_string(),
            values: values.iter().map(|value| value.to_string()).collect(),
            separator: separator.to_string(),
        }
    }

    /// A single-literal vocabulary used as a fixed keyword marker.
    #[must_use]
    pub fn marker(keyword: &str) -> Self {
        EnumPersistence::new(keyword, &[keyword], " ")
    }

    /// The allowed literals, part of the read-only field-grammar contract.
    #[must_use]
    pub fn allowed_values(&self) -> &[String] {
        &self.values
    }
}

impl TokenPersistence for EnumPersistence {
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfy(&self, chunk: &str) -> bool {
        let (candidate, _) = split_scalar(chunk, &self.separator);
        self.values.iter().any(|value| value == candidate)
    }

    fn parse_as_string<'a>(&self, chunk: &'a str) -> (&'a str, &'a str) {
        split_scalar(chunk, &self.separator)
    }

    fn to_csv_string(&self, values: &[String]) -> String {
        values.join(&self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ParsingContext {
        ParsingContext::new("test-doc", 1)
    }

    #[test]
    fn test_sequence_satisfy_and_list() {
        let seq = SequencePersistence::new("tags", '[', ']', ',');
        assert!(seq.satisfy("[ a , b ] trailing"));
        let (values, rest) = seq.parse_as_list("[ a , b ] trailing").unwrap();
        assert_eq!(values, vec!["a", "b"]);
        assert_eq!(rest, " trailing");
    }

    #[test]
    fn test_sequence_rejects_unclosed_and_short() {
        let seq = SequencePersistence::new("tags", '[', ']', ',');
        assert!(!seq.satisfy("[ a , b"));
        assert!(!seq.satisfy("a, b ]"));
        assert!(!seq.satisfy("["));
        assert!(!seq.satisfy(""));
    }

    #[test]
    fn test_sequence_discards_empty_fragments() {
        let seq = SequencePersistence::new("emails", '[', ']', ',');
        let (values, _) = seq.parse_as_list("[ a ,, b , ]").unwrap();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_sequence_alternate_brackets() {
        let seq = SequencePersistence::new("alts", '(', ')', ';');
        let (values, rest) = seq.parse_as_list(" ( one ; two ) more").unwrap();
        assert_eq!(values, vec!["one", "two"]);
        assert_eq!(rest, " more");
    }

    #[test]
    fn test_sequence_flat_scan_stops_at_first_finish() {
        // Not depth-aware: the first `]` closes the sequence.
        let seq = SequencePersistence::new("tags", '[', ']', ',');
        let (values, rest) = seq.parse_as_list("[ a , [ b ] ]").unwrap();
        assert_eq!(values, vec!["a", "[ b"]);
        assert_eq!(rest, " ]");
    }

    #[test]
    fn test_sequence_csv_round_trip() {
        let seq = SequencePersistence::new("tags", '[', ']', ' ');
        let rendered = seq.to_csv_string(&["monday".into(), "tuesday".into()]);
        assert_eq!(rendered, "[ monday tuesday ]");
        let (values, rest) = seq.parse_as_list(&rendered).unwrap();
        assert_eq!(values, vec!["monday", "tuesday"]);
        assert_eq!(rest, "");
    }

    #[test]
    fn test_scalar_parse_as_list_is_unsupported() {
        let int = IntegerPersistence::new("v_int", SignPolicy::Either, " ");
        let err = int.parse_as_list("3 4").unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[test]
    fn test_regex_prefix_match_and_remainder() {
        let id = RegexPersistence::new("id", &patterns::ID_RE, " ");
        assert!(id.satisfy("alpha-one rest"));
        assert_eq!(id.parse_as_string("alpha-one rest"), ("alpha-one", "rest"));
        assert!(!id.satisfy("7seven rest"));
    }

    #[test]
    fn test_regex_without_separator_consumes_all() {
        let text = RegexPersistence::new("description", &patterns::END_STRING_RE, "\n");
        let (value, rest) = text.parse_as_string("free text until the end");
        assert_eq!(value, "free text until the end");
        assert_eq!(rest, "");
        assert!(!text.satisfy("x"));
    }

    #[test]
    fn test_integer_sign_policies() {
        let require = IntegerPersistence::new("n", SignPolicy::Require, " ");
        let forbid = IntegerPersistence::new("n", SignPolicy::Forbid, " ");
        let either = IntegerPersistence::new("n", SignPolicy::Either, " ");

        assert!(!require.satisfy("3"));
        assert!(require.satisfy("+3"));
        assert!(require.satisfy("-3"));

        assert!(forbid.satisfy("3"));
        assert!(!forbid.satisfy("+3"));

        assert!(either.satisfy("3"));
        assert!(either.satisfy("-3"));
    }

    #[test]
    fn test_zero_always_accepted() {
        for sign in [SignPolicy::Require, SignPolicy::Forbid, SignPolicy::Either] {
            let int = IntegerPersistence::new("n", sign, " ");
            let float = FloatPersistence::new("f", sign, " ");
            let fraction = FractionPersistence::new("q", sign, " ");
            assert!(int.satisfy("0"), "{:?}", sign);
            assert!(float.satisfy("0"), "{:?}", sign);
            assert!(fraction.satisfy("0"), "{:?}", sign);
        }
    }

    #[test]
    fn test_integer_rejects_overflow() {
        let int = IntegerPersistence::new("n", SignPolicy::Either, " ");
        assert!(!int.satisfy("99999999999999999999999999"));
    }

    #[test]
    fn test_float_conversion() {
        let float = FloatPersistence::new("v_float", SignPolicy::Either, " ");
        let (value, rest) = float.parse_ctx_f64(&ctx(), "1.3 more").unwrap();
        assert_eq!(value, 1.3);
        assert_eq!(rest, "more");
        assert!(!float.satisfy("1.3.5"));
        assert!(!float.satisfy("abc"));
    }

    #[test]
    fn test_float_requires_decimal_part() {
        let float = FloatPersistence::new("v_float", SignPolicy::Either, " ");
        assert!(!float.satisfy("7 rest"));
        assert!(!float.satisfy("-7 rest"));
        assert!(float.satisfy("7.0 rest"));
        assert!(float.satisfy("0"));
    }

    #[test]
    fn test_fraction_conversion() {
        let fraction = FractionPersistence::new("v_fraction", SignPolicy::Either, " ");
        let (value, rest) = fraction.parse_ctx_ratio(&ctx(), "1/4 more").unwrap();
        assert_eq!(value, Rational64::new(1, 4));
        assert_eq!(rest, "more");
        assert!(fraction.satisfy("-3/8"));
        assert!(fraction.satisfy("3"));
        assert!(!fraction.satisfy("1/0"));
        assert!(!fraction.satisfy("1/"));
    }

    #[test]
    fn test_enum_membership() {
        let color = EnumPersistence::new("color_name", &["red", "green"], " ");
        assert!(color.satisfy("red extra"));
        assert_eq!(color.parse_as_string("red extra"), ("red", "extra"));
        assert!(!color.satisfy("orange extra"));
        assert!(!color.satisfy("re extra"));
    }

    #[test]
    fn test_marker_consumption() {
        let row = EnumPersistence::marker("row");
        let rest = row.consume_marker(&ctx(), "row id alpha").unwrap();
        assert_eq!(rest, "id alpha");

        let err = row.consume_marker(&ctx(), "rows id alpha").unwrap_err();
        assert_eq!(err.expected_field(), "row");
    }

    #[test]
    fn test_parse_ctx_failure_carries_remaining_text() {
        let int = IntegerPersistence::new("v_int", SignPolicy::Either, " ");
        let err = int.parse_ctx_string(&ctx(), "abc def").unwrap_err();
        match err {
            Error::Parse {
                expected, actual, ..
            } => {
                assert_eq!(expected, "v_int");
                assert_eq!(actual, "abc def");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_helpers_revalidate_elements() {
        let tag = RegexPersistence::new("tag", &patterns::TAG_RE, " ");
        assert!(tag.list_satisfy(&["monday", "tuesday"]));
        assert!(!tag.list_satisfy(&["monday", "Tuesday"]));

        let values = tag.list_parse_ctx(&ctx(), &["monday", "tuesday"]).unwrap();
        assert_eq!(values, vec!["monday", "tuesday"]);

        let err = tag.list_parse_ctx(&ctx(), &["monday", "9bad"]).unwrap_err();
        assert_eq!(err.expected_field(), "tag");
    }

    #[test]
    fn test_forward_progress_on_satisfying_chunks() {
        let chunks: Vec<(Box<dyn TokenPersistence>, &str)> = vec![
            (
                Box::new(SequencePersistence::new("s", '[', ']', ',')),
                "[ a ] rest",
            ),
            (
                Box::new(RegexPersistence::new("id", &patterns::ID_RE, " ")),
                "alpha rest",
            ),
            (
                Box::new(IntegerPersistence::new("n", SignPolicy::Either, " ")),
                "42 rest",
            ),
            (
                Box::new(FloatPersistence::new("f", SignPolicy::Either, " ")),
                "4.2 rest",
            ),
            (
                Box::new(FractionPersistence::new("q", SignPolicy::Either, " ")),
                "1/2 rest",
            ),
            (
                Box::new(EnumPersistence::new("e", &["red"], " ")),
                "red rest",
            ),
        ];
        for (persistence, chunk) in chunks {
            assert!(persistence.satisfy(chunk), "{}", persistence.name());
            let (_, rest) = persistence.parse_as_string(chunk);
            assert!(
                rest.len() < chunk.len(),
                "{} did not make progress",
                persistence.name()
            );
        }
    }
}
