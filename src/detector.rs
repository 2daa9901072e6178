//! Row-kind detection.
//!
//! Before a line is handed to a line parser, the [`RowDetector`] classifies it
//! into a named row kind by ordered positional prefix matching: an option with
//! prefixes `["section", "fragments"]` matches any line whose first two
//! whitespace-separated fields are `section` and `fragments`. The wildcard
//! prefix `*` matches any *present* field.
//!
//! Options are stably sorted at construction, descending by prefix count, so
//! a more specific row kind always wins over a generic fallback with fewer
//! constraints.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::detector::{RowDetector, RowDetectorOption};
//! use spare_dsl::ParsingContext;
//!
//! let detector = RowDetector::new(vec![
//!     RowDetectorOption::new("row", &["row"]),
//!     RowDetectorOption::new("row-v2", &["row", "v2"]),
//! ]);
//!
//! let ctx = ParsingContext::new("doc", 1);
//! assert_eq!(detector.detect(&ctx, "row v2 x").unwrap(), Some("row-v2"));
//! assert_eq!(detector.detect(&ctx, "row x").unwrap(), Some("row"));
//! assert_eq!(detector.detect(&ctx, "column x").unwrap(), None);
//! ```

use crate::error::{Error, ParsingContext, Result};

/// The wildcard prefix, matching any single present field.
pub const WILDCARD: &str = "*";

/// One candidate row kind: a name plus the ordered literal-or-wildcard
/// prefixes its lines start with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDetectorOption {
    name: String,
    prefixes: Vec<String>,
}

impl RowDetectorOption {
    #[must_use]
    pub fn new(name: &str, prefixes: &[&str]) -> Self {
        RowDetectorOption {
            name: name.to_string(),
            prefixes: prefixes.iter().map(|prefix| prefix.to_string()).collect(),
        }
    }

    /// The row-kind name reported on a match.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of leading fields this option constrains.
    #[must_use]
    pub fn prefix_count(&self) -> usize {
        self.prefixes.len()
    }

    /// Tests this option against the leading fields of a line.
    ///
    /// A line with fewer fields than the prefix count is a located error:
    /// absent fields are never treated as wildcard-satisfied.
    fn matches(&self, ctx: &ParsingContext, fields: &[&str], line: &str) -> Result<bool> {
        if fields.len() < self.prefixes.len() {
            return Err(Error::parse(ctx, &self.name, line));
        }
        Ok(self
            .prefixes
            .iter()
            .zip(fields)
            .all(|(prefix, field)| prefix == WILDCARD || prefix == field))
    }
}

/// Classifies raw lines into row-kind names.
///
/// Immutable after construction; may be shared read-only across concurrent
/// parses.
#[derive(Debug, Clone)]
pub struct RowDetector {
    options: Vec<RowDetectorOption>,
}

impl RowDetector {
    /// Builds a detector, stably sorting options most-specific-first.
    ///
    /// Ties on prefix count keep their insertion order; that stable order is
    /// the disambiguation policy.
    #[must_use]
    pub fn new(mut options: Vec<RowDetectorOption>) -> Self {
        options.sort_by_key(|option| std::cmp::Reverse(option.prefix_count()));
        RowDetector { options }
    }

    /// Returns the name of the first matching option, or `None`.
    ///
    /// # Errors
    ///
    /// Returns a located error when a candidate option has more prefixes than
    /// the line has fields.
    pub fn detect<'d>(&'d self, ctx: &ParsingContext, line: &str) -> Result<Option<&'d str>> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        for option in &self.options {
            if option.matches(ctx, &fields, line)? {
                return Ok(Some(option.name()));
            }
        }
        Ok(None)
    }
}
