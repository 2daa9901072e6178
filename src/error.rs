//! Error types for Spare document parsing.
//!
//! Every data error raised by the parsing core is an [`Error::Parse`] carrying
//! the [`ParsingContext`] of the offending line, the name of the field that was
//! expected, and the unconsumed text at the failure point. Tests and callers
//! assert on those components rather than on message strings.
//!
//! Programming errors, such as calling a list operation on a scalar
//! persistence, are reported as [`Error::Unsupported`] and are deliberately
//! not conflated with data errors.
//!
//! ## Examples
//!
//! ```rust
//! use spare_dsl::from_str;
//!
//! let result = from_str("doc-1", "row but not a valid row");
//! assert!(result.is_err());
//!
//! if let Err(err) = result {
//!     eprintln!("Parse error: {}", err);
//!     // Error messages include the document id and line number
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Identifies where in a document a parse is currently working.
///
/// One context is created per physical line during document parsing, carrying
/// the document id forward together with the 1-based line number. It is used
/// only for error reporting and is immutable once constructed.
///
/// # Examples
///
/// ```rust
/// use spare_dsl::ParsingContext;
///
/// let ctx = ParsingContext::new("doc-7", 27);
/// assert_eq!(ctx.document_id(), "doc-7");
/// assert_eq!(ctx.line_number(), 27);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingContext {
    document_id: String,
    line_number: usize,
}

impl ParsingContext {
    /// Creates a context for the given document id and 1-based line number.
    #[must_use]
    pub fn new(document_id: &str, line_number: usize) -> Self {
        ParsingContext {
            document_id: document_id.to_string(),
            line_number,
        }
    }

    /// The id of the document being parsed.
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// The 1-based line number within the document.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl fmt::Display for ParsingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document {}, line {}", self.document_id, self.line_number)
    }
}

/// All errors the parsing core can produce.
///
/// [`Error::Parse`] is the single data-error kind used uniformly for marker
/// mismatches, pattern mismatches, sign-policy violations, out-of-vocabulary
/// enum values, malformed sequences, unrecognized row kinds and scope
/// violations. All of them are fatal to the current parse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input diverged from the grammar at a known location.
    #[error("{context}: expected {expected}, found {actual:?}")]
    Parse {
        context: ParsingContext,
        /// Name of the field (or marker, or row kind) that was required here.
        expected: String,
        /// The unconsumed text at the failure point.
        actual: String,
    },

    /// A capability was invoked on a persistence that does not provide it.
    ///
    /// This indicates a bug in the calling code, not bad input.
    #[error("operation {operation:?} is not supported by field {field:?}")]
    Unsupported { field: String, operation: String },
}

impl Error {
    /// Creates a located parse error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use spare_dsl::{Error, ParsingContext};
    ///
    /// let ctx = ParsingContext::new("doc-7", 3);
    /// let err = Error::parse(&ctx, "v_int", "abc");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn parse(context: &ParsingContext, expected: &str, actual: &str) -> Self {
        Error::Parse {
            context: context.clone(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates an unsupported-operation error for the named field.
    pub fn unsupported(field: &str, operation: &str) -> Self {
        Error::Unsupported {
            field: field.to_string(),
            operation: operation.to_string(),
        }
    }

    /// The name of the field this error was raised for.
    #[must_use]
    pub fn expected_field(&self) -> &str {
        match self {
            Error::Parse { expected, .. } => expected,
            Error::Unsupported { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
