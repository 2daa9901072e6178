//! Document headers.
//!
//! Alongside the row-oriented sections, a Spare archive carries a headers
//! block of `key: value` lines describing the document as a whole: its urn,
//! prefix abbreviations, required section versions, localized text
//! attributes, typed url references and the copyright year. The headers
//! block has its own line grammar and round trip, independent of the row
//! grammar and the [`crate::parser::DocumentParser`] state machine.
//!
//! Three key shapes exist:
//!
//! - a plain key (`id-urn`, `copyright-year`, `prefixes`,
//!   `require-sections`),
//! - a localized text key, `<name> <lang>` (e.g. `license en`),
//! - a typed url key, `<name> <media> <lang>` (e.g. `license-url html en`).
//!
//! Unknown keys are a located error; a text or url name outside the closed
//! name sets is rejected the same way.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::headers::DocumentHeaders;
//!
//! let headers = DocumentHeaders::new()
//!     .with_id_urn("company/project/123")
//!     .with_text("license", "en", "Creative Commons")
//!     .with_copyright_year(2020);
//!
//! let text = headers.to_string();
//! assert_eq!(DocumentHeaders::from_str("doc-1", &text).unwrap(), headers);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ParsingContext, Result};

/// Attribute names allowed as localized text headers.
pub const TEXT_NAMES: &[&str] = &[
    "license",
    "attribution-name",
    "author",
    "name",
    "title",
    "description",
    "alternative-title",
];

/// Attribute names allowed as typed url headers.
pub const URL_NAMES: &[&str] = &[
    "license-url",
    "attribution-url",
    "author-url",
    "metadata-url",
    "homepage-url",
    "repository-url",
    "content-url",
];

/// Media types a url header may declare.
pub const MEDIA_TYPES: &[&str] = &[
    "html", "json", "rdf", "markdown", "nt", "ttl", "json-ld", "csv",
];

/// One localized text attribute: `<name> <lang>: <text>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRef {
    pub name: String,
    pub lang: String,
    pub text: String,
}

/// One typed url reference: `<name> <media> <lang>: <url>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRef {
    pub name: String,
    pub media_type: String,
    pub lang: String,
    pub url: String,
}

/// The headers block of a document.
///
/// Equality is structural; text and url refs keep insertion order but a
/// repeated key overwrites in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeaders {
    pub id_urn: String,
    /// Prefix abbreviation to expansion url, e.g. `github` to
    /// `https://github.com/`.
    pub prefixes: IndexMap<String, String>,
    /// Section name to required grammar version.
    pub require_sections: IndexMap<String, String>,
    pub text_refs: Vec<TextRef>,
    pub url_refs: Vec<UrlRef>,
    pub copyright_year: i64,
}

impl Default for DocumentHeaders {
    fn default() -> Self {
        let mut prefixes = IndexMap::new();
        prefixes.insert("github".to_string(), "https://github.com/".to_string());
        let require_sections = ["header", "fragments", "chunks", "accessors"]
            .iter()
            .map(|section| (section.to_string(), "0.5".to_string()))
            .collect();
        DocumentHeaders {
            id_urn: String::new(),
            prefixes,
            require_sections,
            text_refs: Vec::new(),
            url_refs: Vec::new(),
            copyright_year: 3000,
        }
    }
}

impl DocumentHeaders {
    #[must_use]
    pub fn new() -> Self {
        DocumentHeaders::default()
    }

    #[must_use]
    pub fn with_id_urn(mut self, id_urn: &str) -> Self {
        self.id_urn = id_urn.to_string();
        self
    }

    #[must_use]
    pub fn with_copyright_year(mut self, year: i64) -> Self {
        self.copyright_year = year;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, name: &str, url: &str) -> Self {
        self.prefixes.insert(name.to_string(), url.to_string());
        self
    }

    #[must_use]
    pub fn with_require_section(mut self, section: &str, version: &str) -> Self {
        self.require_sections
            .insert(section.to_string(), version.to_string());
        self
    }

    /// Sets a localized text attribute, overwriting an existing
    /// `(name, lang)` pair in place.
    #[must_use]
    pub fn with_text(mut self, name: &str, lang: &str, text: &str) -> Self {
        self.set_text(name, lang, text);
        self
    }

    /// Sets a typed url reference, overwriting an existing
    /// `(name, media, lang)` triple in place.
    #[must_use]
    pub fn with_url(mut self, name: &str, media_type: &str, lang: &str, url: &str) -> Self {
        self.set_url(name, media_type, lang, url);
        self
    }

    fn set_text(&mut self, name: &str, lang: &str, text: &str) {
        match self
            .text_refs
            .iter_mut()
            .find(|text_ref| text_ref.name == name && text_ref.lang == lang)
        {
            Some(text_ref) => text_ref.text = text.to_string(),
            None => self.text_refs.push(TextRef {
                name: name.to_string(),
                lang: lang.to_string(),
                text: text.to_string(),
            }),
        }
    }

    fn set_url(&mut self, name: &str, media_type: &str, lang: &str, url: &str) {
        match self.url_refs.iter_mut().find(|url_ref| {
            url_ref.name == name && url_ref.media_type == media_type && url_ref.lang == lang
        }) {
            Some(url_ref) => url_ref.url = url.to_string(),
            None => self.url_refs.push(UrlRef {
                name: name.to_string(),
                media_type: media_type.to_string(),
                lang: lang.to_string(),
                url: url.to_string(),
            }),
        }
    }

    /// The localized text for `(name, lang)`, if set.
    #[must_use]
    pub fn text(&self, name: &str, lang: &str) -> Option<&str> {
        self.text_refs
            .iter()
            .find(|text_ref| text_ref.name == name && text_ref.lang == lang)
            .map(|text_ref| text_ref.text.as_str())
    }

    /// The url for `(name, media, lang)`, if set.
    #[must_use]
    pub fn url(&self, name: &str, media_type: &str, lang: &str) -> Option<&str> {
        self.url_refs
            .iter()
            .find(|url_ref| {
                url_ref.name == name && url_ref.media_type == media_type && url_ref.lang == lang
            })
            .map(|url_ref| url_ref.url.as_str())
    }

    /// The declared prefix abbreviations, in insertion order.
    #[must_use]
    pub fn prefix_names(&self) -> Vec<&str> {
        self.prefixes.keys().map(String::as_str).collect()
    }

    /// Parses a headers block; blank lines and comments are skipped.
    ///
    /// The `document_id` appears in error locations only.
    ///
    /// # Errors
    ///
    /// Returns a located [`Error::Parse`] for a line without `:`, an
    /// unsupported key, or an unparseable year.
    pub fn from_str(document_id: &str, text: &str) -> Result<Self> {
        let mut headers = DocumentHeaders::new();
        for (index, raw_line) in text.lines().enumerate() {
            let ctx = ParsingContext::new(document_id, index + 1);
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| Error::parse(&ctx, "header-key", line))?;
            headers.apply(&ctx, key.trim(), value.trim())?;
        }
        Ok(headers)
    }

    fn apply(&mut self, ctx: &ParsingContext, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split_whitespace().collect();
        match parts.as_slice() {
            ["id-urn"] => self.id_urn = value.to_string(),
            ["copyright-year"] => {
                self.copyright_year =
                    i64::from_str(value).map_err(|_| Error::parse(ctx, "copyright-year", value))?;
            }
            ["prefixes"] => self.prefixes = parse_bracket_map(ctx, "prefixes", value)?,
            ["require-sections"] => {
                self.require_sections = parse_bracket_map(ctx, "require-sections", value)?;
            }
            [name, lang] if TEXT_NAMES.contains(name) => {
                self.set_text(name, lang, value);
            }
            [name, media_type, lang]
                if URL_NAMES.contains(name) && MEDIA_TYPES.contains(media_type) =>
            {
                self.set_url(name, media_type, lang, value);
            }
            _ => return Err(Error::parse(ctx, "header-key", key)),
        }
        Ok(())
    }

    fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("id-urn: {}", self.id_urn),
            format!(
                "require-sections: {}",
                render_bracket_map(&self.require_sections)
            ),
            format!("prefixes: {}", render_bracket_map(&self.prefixes)),
        ];
        for text_ref in &self.text_refs {
            lines.push(format!(
                "{} {}: {}",
                text_ref.name, text_ref.lang, text_ref.text
            ));
        }
        for url_ref in &self.url_refs {
            lines.push(format!(
                "{} {} {}: {}",
                url_ref.name, url_ref.media_type, url_ref.lang, url_ref.url
            ));
        }
        lines.push(format!("copyright-year: {}", self.copyright_year));
        lines
    }
}

impl fmt::Display for DocumentHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.to_lines().join("\n"))
    }
}

/// Parses `[ key value, key value ]`; empty fragments are discarded.
fn parse_bracket_map(
    ctx: &ParsingContext,
    field: &str,
    value: &str,
) -> Result<IndexMap<String, String>> {
    let interior = value
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| Error::parse(ctx, field, value))?;
    let mut map = IndexMap::new();
    for fragment in interior.split(',') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        let (key, entry) = fragment
            .split_once(' ')
            .ok_or_else(|| Error::parse(ctx, field, fragment))?;
        map.insert(key.trim().to_string(), entry.trim().to_string());
    }
    Ok(map)
}

fn render_bracket_map(map: &IndexMap<String, String>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(key, value)| format!("{key} {value}"))
        .collect();
    format!("[ {} ]", entries.join(", "))
}
