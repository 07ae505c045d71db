//! Configuration options for table writers and readers.
//!
//! - [`Delimiter`]: the reserved field separator (comma, tab, or pipe)
//! - [`WriterOptions`]: header emission, delimiter and compression level
//! - [`ReaderOptions`]: field-name resolution, header skipping, delimiter and field casting
//!
//! ## Examples
//!
//! ```rust
//! use compressed_sheets::{Delimiter, FieldType, ReaderOptions, WriterOptions};
//!
//! let writer_options = WriterOptions::new()
//!     .with_header(true)
//!     .with_delimiter(Delimiter::Tab)
//!     .with_compression_level(9);
//!
//! let reader_options = ReaderOptions::new()
//!     .with_delimiter(Delimiter::Tab)
//!     .with_field_type("age", FieldType::Integer);
//! ```

use crate::cast::{FieldType, FieldTypes};
use crate::value::Value;
use flate2::Compression;

/// Field separator reserved by the row encoding.
///
/// Writers and readers of the same stream must agree on the delimiter.
///
/// ```rust
/// use compressed_sheets::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the character written between fields.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }
}

/// Options controlling a [`TableWriter`](crate::TableWriter).
#[derive(Clone, Debug)]
pub struct WriterOptions {
    pub write_header: bool,
    pub delimiter: Delimiter,
    pub compression: Compression,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            write_header: false,
            delimiter: Delimiter::default(),
            compression: Compression::default(),
        }
    }
}

impl WriterOptions {
    /// Creates default options: no implicit header, comma delimiter, default gzip level.
    ///
    /// ```rust
    /// use compressed_sheets::WriterOptions;
    ///
    /// let options = WriterOptions::new();
    /// assert!(!options.write_header);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the header row as soon as the writer is constructed.
    #[must_use]
    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the gzip level. Values above 9 are clamped.
    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }
}

/// Options controlling a [`TableReader`](crate::TableReader).
///
/// Field names are resolved at construction:
///
/// - explicit names, no `skip_header`: every line is data
/// - explicit names and `skip_header`: the first line is discarded
/// - no names, no `skip_header`: the first line is parsed as the header
/// - no names and `skip_header`: construction fails with [`Error::NoFieldNames`](crate::Error::NoFieldNames)
///
/// Casting configuration never supplies column order.
#[derive(Debug, Default)]
pub struct ReaderOptions {
    pub fieldnames: Option<Vec<String>>,
    pub skip_header: bool,
    pub field_types: FieldTypes,
    pub delimiter: Delimiter,
}

impl ReaderOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the field-name list instead of reading it from a header row.
    #[must_use]
    pub fn with_fieldnames<I, S>(mut self, fieldnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fieldnames = Some(fieldnames.into_iter().map(Into::into).collect());
        self
    }

    /// Discards the first line without parsing it.
    #[must_use]
    pub fn skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    /// Casts `field` with a built-in conversion.
    #[must_use]
    pub fn with_field_type(mut self, field: &str, field_type: FieldType) -> Self {
        self.field_types.insert(field, field_type);
        self
    }

    /// Casts `field` with a custom conversion.
    ///
    /// ```rust
    /// use compressed_sheets::{ReaderOptions, Value};
    ///
    /// let options = ReaderOptions::new().with_cast("upper", |s: &str| {
    ///     Ok::<_, std::convert::Infallible>(Value::Text(s.to_uppercase()))
    /// });
    /// assert!(options.field_types.contains("upper"));
    /// ```
    #[must_use]
    pub fn with_cast<F, E>(mut self, field: &str, cast: F) -> Self
    where
        F: Fn(&str) -> Result<Value, E> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.field_types.insert_with(field, cast);
        self
    }

    /// Replaces the whole casting configuration.
    #[must_use]
    pub fn with_field_types(mut self, field_types: FieldTypes) -> Self {
        self.field_types = field_types;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
}
