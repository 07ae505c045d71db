//! # compressed_sheets
//!
//! Streaming, gzip-compressed, row-oriented tables.
//!
//! Records are written one at a time as delimiter-separated lines and read back
//! lazily as ordered name/value mappings, without holding the table in memory.
//!
//! ## Key Features
//!
//! - **Lossless**: any text, including delimiters, backslashes and newlines,
//!   round-trips through the row encoding
//! - **Streaming**: one line per record, compressed on the fly
//! - **Headers**: written on request, parsed or skipped on read
//! - **Typed reads**: per-field casting to integers, floats, booleans, big
//!   integers, timestamps, or custom conversions
//! - **Scoped cleanup**: streams are finalised exactly once, on `close()` or drop
//!
//! ## Quick Start
//!
//! ```rust
//! use compressed_sheets::{record, FieldType, ReaderOptions, TableReader, TableWriter, Value, WriterOptions};
//!
//! let mut writer = TableWriter::new(Vec::new(), ["id", "note"], WriterOptions::new().with_header(true))?;
//! writer.writerow(&record! { "id" => 1, "note" => "first, with a comma" })?;
//! writer.writerow(&record! { "id" => 2, "note" => "second\nspans lines" })?;
//! let bytes = writer.finish()?;
//!
//! let options = ReaderOptions::new().with_field_type("id", FieldType::Integer);
//! let records = TableReader::new(bytes.as_slice(), options)?
//!     .collect::<compressed_sheets::Result<Vec<_>>>()?;
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1]["id"], Value::Integer(2));
//! assert_eq!(records[1]["note"], "second\nspans lines");
//! # Ok::<(), compressed_sheets::Error>(())
//! ```
//!
//! ## Files
//!
//! ```rust
//! use compressed_sheets::{read_records, write_records, record};
//!
//! let dir = std::env::temp_dir().join("compressed_sheets_doc");
//! let path = dir.join("people.csv.gz");
//!
//! write_records(&path, ["name"], [record! { "name" => "Ada" }])?;
//! let records = read_records(&path)?;
//! assert_eq!(records[0]["name"], "Ada");
//! # std::fs::remove_dir_all(&dir)?;
//! # Ok::<(), compressed_sheets::Error>(())
//! ```
//!
//! See [`format`] for the on-disk layout.

pub mod cast;
pub mod error;
pub mod escape;
pub mod format;
pub mod macros;
pub mod options;
pub mod reader;
pub mod record;
pub mod row;
pub mod stream;
pub mod value;
pub mod writer;

pub use cast::{FieldType, FieldTypes};
pub use error::{CastError, Error, Result};
pub use escape::Escaper;
pub use options::{Delimiter, ReaderOptions, WriterOptions};
pub use reader::TableReader;
pub use record::{FieldLookup, Record};
pub use row::RowCodec;
pub use stream::{CompressedSink, CompressedSource};
pub use value::Value;
pub use writer::TableWriter;

use std::io;
use std::path::Path;

/// Writes `records` to a new gzip table file at `path`, header first.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns the first error from creating the file, writing a record, or closing
/// the file.
pub fn write_records<P, I, F, R>(path: P, fieldnames: I, records: R) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = F>,
    F: Into<String>,
    R: IntoIterator,
    R::Item: FieldLookup,
{
    let options = WriterOptions::new().with_header(true);
    let mut writer = TableWriter::open(path, fieldnames, options)?;
    writer.writerows(records)?;
    writer.close()
}

/// Reads every record of the gzip table file at `path`, using its header row.
///
/// # Errors
///
/// Returns the first error from opening the file or decoding a record.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    TableReader::open(path, ReaderOptions::new())?.collect()
}

/// Writes a header and `records` as a gzip table to `writer`.
///
/// # Errors
///
/// Returns the first error from writing a record or finishing the gzip stream.
///
/// # Examples
///
/// ```rust
/// use compressed_sheets::{from_reader, record, to_writer};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, ["k"], [record! { "k" => "v" }]).unwrap();
/// let records = from_reader(buffer.as_slice()).unwrap();
/// assert_eq!(records[0]["k"], "v");
/// ```
pub fn to_writer<W, I, F, R>(writer: W, fieldnames: I, records: R) -> Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = F>,
    F: Into<String>,
    R: IntoIterator,
    R::Item: FieldLookup,
{
    let options = WriterOptions::new().with_header(true);
    let mut table = TableWriter::new(writer, fieldnames, options)?;
    table.writerows(records)?;
    table.finish()?;
    Ok(())
}

/// Reads every record of a gzip table from `reader`, using its header row.
///
/// # Errors
///
/// Returns the first error from decoding the header or a record.
pub fn from_reader<R: io::Read>(reader: R) -> Result<Vec<Record>> {
    TableReader::new(reader, ReaderOptions::new())?.collect()
}
