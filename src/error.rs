//! Error types for reading and writing compressed tables.
//!
//! Every failure is reported to the caller; nothing is recovered internally.
//!
//! ## Error Categories
//!
//! - **Decoding errors**: malformed escape sequences, rows of the wrong width,
//!   lines that are not valid UTF-8
//! - **Caller errors**: records missing a field, unusable field-name lists,
//!   use after close
//! - **Conversion errors**: a field caster rejected a value
//! - **I/O errors**: failures from the compressed sink or source, kind preserved
//!
//! ## Examples
//!
//! ```rust
//! use compressed_sheets::{Error, RowCodec};
//!
//! let result = RowCodec::default().decode_row("a\\q");
//! assert!(matches!(result, Err(Error::InvalidEscape { .. })));
//! ```

use std::io;
use thiserror::Error;

/// Boxed error returned by custom field casters.
pub type CastError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents all possible errors raised while encoding, decoding, writing or reading tables.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying compressed sink or source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Escape marker not followed by a recognised code character
    #[error("Invalid escape sequence at line {line}, column {col}: {}", describe_escape(.found))]
    InvalidEscape {
        line: usize,
        col: usize,
        found: Option<char>,
    },

    /// Decoded row width differs from the field-name list
    #[error("Field count mismatch at line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Record passed to a writer lacks one of the writer's fields
    #[error("Record is missing field {field:?}")]
    MissingField { field: String },

    /// A field caster rejected a value
    #[error("Cannot convert field {field:?} value {value:?}: {source}")]
    Conversion {
        field: String,
        value: String,
        #[source]
        source: CastError,
    },

    /// Decompressed line is not valid UTF-8
    #[error("Invalid UTF-8 at line {line}")]
    InvalidUtf8 { line: usize },

    /// Reader has no header to parse and no explicit field names
    #[error("Cannot resolve field names: supply them explicitly or read them from a header row")]
    NoFieldNames,

    /// Field-name list is empty
    #[error("Field-name list must contain at least one field")]
    EmptyFieldNames,

    /// Field name appears twice in the field-name list
    #[error("Duplicate field name {field:?}")]
    DuplicateField { field: String },

    /// Stream was already closed
    #[error("Stream is closed")]
    Closed,
}

fn describe_escape(found: &Option<char>) -> String {
    match found {
        Some(ch) => format!("unknown code character {:?}", ch),
        None => "escape marker at end of line".to_string(),
    }
}

impl Error {
    /// Creates an invalid-escape error at the given column of line 1.
    ///
    /// Readers relocate it to the real line number with [`Error::at_line`].
    pub fn invalid_escape(col: usize, found: Option<char>) -> Self {
        Error::InvalidEscape {
            line: 1,
            col,
            found,
        }
    }

    /// Creates a field count mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compressed_sheets::Error;
    ///
    /// let err = Error::field_count(3, 2, 5);
    /// assert!(err.to_string().contains("expected 2 fields, found 5"));
    /// ```
    pub fn field_count(line: usize, expected: usize, found: usize) -> Self {
        Error::FieldCount {
            line,
            expected,
            found,
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: &str) -> Self {
        Error::MissingField {
            field: field.to_string(),
        }
    }

    /// Creates a conversion error wrapping the caster's own error.
    pub fn conversion(field: &str, value: &str, source: CastError) -> Self {
        Error::Conversion {
            field: field.to_string(),
            value: value.to_string(),
            source,
        }
    }

    /// Rewrites the line number of line-scoped decoding errors.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Error::InvalidEscape { col, found, .. } => Error::InvalidEscape { line, col, found },
            Error::FieldCount {
                expected, found, ..
            } => Error::FieldCount {
                line,
                expected,
                found,
            },
            Error::InvalidUtf8 { .. } => Error::InvalidUtf8 { line },
            other => other,
        }
    }

    /// Returns `true` for errors caused by malformed stream content.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            Error::InvalidEscape { .. } | Error::FieldCount { .. } | Error::InvalidUtf8 { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
