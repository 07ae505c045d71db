//! Table reader: compressed rows to named-field records.
//!
//! A [`TableReader`] resolves its field-name list when constructed (see
//! [`ReaderOptions`] for the rules), then yields one [`Record`] per line, lazily
//! and forward-only. Reading again requires reopening the stream.
//!
//! ```rust
//! use compressed_sheets::{FieldType, ReaderOptions, TableReader, TableWriter, Value, WriterOptions};
//! use std::collections::HashMap;
//!
//! let mut writer = TableWriter::new(Vec::new(), ["name", "age"], WriterOptions::new().with_header(true)).unwrap();
//! let mut row = HashMap::new();
//! row.insert("name", "Alice");
//! row.insert("age", "30");
//! writer.writerow(&row).unwrap();
//! let bytes = writer.finish().unwrap();
//!
//! let options = ReaderOptions::new().with_field_type("age", FieldType::Integer);
//! let mut reader = TableReader::new(bytes.as_slice(), options).unwrap();
//! assert_eq!(reader.fieldnames(), ["name", "age"]);
//!
//! let record = reader.next().unwrap().unwrap();
//! assert_eq!(record["name"], "Alice");
//! assert_eq!(record["age"], Value::Integer(30));
//! assert!(reader.next().is_none());
//! ```

use crate::cast::FieldTypes;
use crate::options::ReaderOptions;
use crate::record::{check_fieldnames, Record};
use crate::row::RowCodec;
use crate::stream::{self, CompressedSource, GzSource, LineReader};
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, warn};

/// Reads records from a [`CompressedSource`].
///
/// Iterating yields `Result<Record>`. Decoding and conversion errors are
/// returned for the offending line only; the next call moves on to the
/// following line. An I/O error ends iteration: it is returned once, and
/// every later call returns `None`, as it does after end of stream.
pub struct TableReader<S: CompressedSource> {
    fieldnames: Vec<String>,
    codec: RowCodec,
    field_types: FieldTypes,
    stream: LineReader<S>,
    exhausted: bool,
}

impl<R: Read> TableReader<GzSource<R>> {
    /// Creates a reader over gzip-compressed bytes from `inner`.
    ///
    /// # Errors
    ///
    /// See [`TableReader::from_source`].
    pub fn new(inner: R, options: ReaderOptions) -> Result<Self> {
        Self::from_source(stream::gz_source(inner), options)
    }
}

impl TableReader<GzSource<File>> {
    /// Opens the gzip table file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] with kind `NotFound` when the file is absent, plus the
    /// errors of [`TableReader::from_source`].
    pub fn open<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self> {
        Self::from_source(stream::open(path)?, options)
    }
}

impl<S: CompressedSource> TableReader<S> {
    /// Creates a reader over an arbitrary source, resolving the field-name list.
    ///
    /// # Errors
    ///
    /// - [`Error::NoFieldNames`] when `skip_header` is set without explicit names,
    ///   or when a header is expected but the stream is empty
    /// - [`Error::EmptyFieldNames`] / [`Error::DuplicateField`] for an unusable list
    /// - decoding and I/O errors from reading the header line
    pub fn from_source(source: S, options: ReaderOptions) -> Result<Self> {
        let ReaderOptions {
            fieldnames,
            skip_header,
            field_types,
            delimiter,
        } = options;
        let codec = RowCodec::new(delimiter);
        let mut stream = LineReader::new(source);

        let fieldnames = match (fieldnames, skip_header) {
            (Some(fieldnames), skip_header) => {
                if skip_header {
                    let skipped = stream.skip_line()?;
                    debug!(skipped, "skipped header row");
                }
                fieldnames
            }
            (None, true) => return Err(Error::NoFieldNames),
            (None, false) => {
                let header = stream.next_line()?.ok_or(Error::NoFieldNames)?;
                codec
                    .decode_row(&header)
                    .map_err(|e| e.at_line(stream.line_number()))?
            }
        };
        check_fieldnames(&fieldnames)?;

        for field in field_types.fields() {
            if !fieldnames.iter().any(|name| name == field) {
                debug!(field, "field type configured for unknown field");
            }
        }
        debug!(fields = fieldnames.len(), "opened table reader");

        Ok(TableReader {
            fieldnames,
            codec,
            field_types,
            stream,
            exhausted: false,
        })
    }

    #[must_use]
    pub fn fieldnames(&self) -> &[String] {
        &self.fieldnames
    }

    /// 1-based number of the last line read, header included.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.stream.line_number()
    }

    /// Reads the next record, or `None` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEscape`] / [`Error::InvalidUtf8`] for a malformed line
    /// - [`Error::FieldCount`] when the row width differs from the field count
    /// - [`Error::Conversion`] when a field caster rejects a value
    /// - [`Error::Io`] for source failures
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if self.exhausted {
            return Ok(None);
        }
        let line = match self.stream.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                self.exhausted = true;
                debug!(lines = self.stream.line_number(), "table reader exhausted");
                return Ok(None);
            }
            // A failed source read is final.
            Err(err @ Error::Io(_)) => {
                self.exhausted = true;
                warn!(line = self.stream.line_number(), error = %err, "table source failed");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let line_number = self.stream.line_number();
        let values = self
            .codec
            .decode_row(&line)
            .map_err(|e| e.at_line(line_number))?;
        if values.len() != self.fieldnames.len() {
            return Err(Error::field_count(
                line_number,
                self.fieldnames.len(),
                values.len(),
            ));
        }

        let mut record = Record::with_capacity(values.len());
        for (field, text) in self.fieldnames.iter().zip(values) {
            let value = self.field_types.cast_owned(field, text)?;
            record.insert(field.as_str(), value);
        }
        Ok(Some(record))
    }

    /// Releases the source. Iteration ends afterwards.
    ///
    /// # Errors
    ///
    /// Propagates the source's close failure.
    pub fn close(&mut self) -> Result<()> {
        self.exhausted = true;
        self.stream.close()
    }
}

impl<S: CompressedSource> Iterator for TableReader<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl<S: CompressedSource> FusedIterator for TableReader<S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{gz_sink, LineWriter};
    use crate::{FieldType, Value};
    use flate2::Compression;
    use std::io::Write;

    fn compress(lines: &[&str]) -> Vec<u8> {
        let mut writer = LineWriter::new(gz_sink(Vec::new(), Compression::default()));
        for line in lines {
            writer.write_line(line).unwrap();
        }
        writer.into_sink().unwrap().finish().unwrap()
    }

    #[test]
    fn test_header_resolves_fieldnames() {
        let bytes = compress(&["a,b\\dc", "1,2"]);
        let mut reader = TableReader::new(bytes.as_slice(), ReaderOptions::new()).unwrap();
        assert_eq!(reader.fieldnames(), ["a", "b,c"]);
        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record["b,c"], "2");
        assert_eq!(reader.line_number(), 2);
    }

    #[test]
    fn test_explicit_fieldnames_treat_first_line_as_data() {
        let bytes = compress(&["1,2"]);
        let options = ReaderOptions::new().with_fieldnames(["x", "y"]);
        let records: Vec<_> = TableReader::new(bytes.as_slice(), options)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["x"], "1");
    }

    #[test]
    fn test_skip_header_requires_fieldnames() {
        let bytes = compress(&["a", "1"]);
        let options = ReaderOptions::new()
            .skip_header(true)
            .with_field_type("a", FieldType::Integer);
        assert!(matches!(
            TableReader::new(bytes.as_slice(), options),
            Err(Error::NoFieldNames)
        ));
    }

    #[test]
    fn test_field_count_mismatch() {
        let bytes = compress(&["a,b", "1,2,3", "4,5"]);
        let mut reader = TableReader::new(bytes.as_slice(), ReaderOptions::new()).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(Error::FieldCount {
                line: 2,
                expected: 2,
                found: 3
            }))
        ));
        let record = reader.next().unwrap().unwrap();
        assert_eq!(record["a"], "4");
    }

    #[test]
    fn test_invalid_escape_reports_line() {
        let bytes = compress(&["a", "ok", "bad\\z"]);
        let mut reader = TableReader::new(bytes.as_slice(), ReaderOptions::new()).unwrap();
        reader.next().unwrap().unwrap();
        match reader.next() {
            Some(Err(Error::InvalidEscape { line, col, found })) => {
                assert_eq!(line, 3);
                assert_eq!(col, 4);
                assert_eq!(found, Some('z'));
            }
            _ => panic!("expected invalid escape"),
        }
    }

    #[test]
    fn test_conversion_failure_is_reported() {
        let bytes = compress(&["n", "10", "ten"]);
        let options = ReaderOptions::new().with_field_type("n", FieldType::Integer);
        let mut reader = TableReader::new(bytes.as_slice(), options).unwrap();
        assert_eq!(reader.next().unwrap().unwrap()["n"], Value::Integer(10));
        assert!(matches!(
            reader.next(),
            Some(Err(Error::Conversion { ref field, .. })) if field == "n"
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let bytes = compress(&["a", "1"]);
        let mut reader = TableReader::new(bytes.as_slice(), ReaderOptions::new()).unwrap();
        assert_eq!(reader.by_ref().count(), 1);
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_close_ends_iteration() {
        let bytes = compress(&["a", "1", "2"]);
        let mut reader = TableReader::new(bytes.as_slice(), ReaderOptions::new()).unwrap();
        reader.close().unwrap();
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_skip_header_ignores_undecodable_header() {
        let mut sink = gz_sink(Vec::new(), Compression::default());
        sink.write_all(b"\xff\xfe\nx\n").unwrap();
        let bytes = sink.finish().unwrap();

        let options = ReaderOptions::new().with_fieldnames(["a"]).skip_header(true);
        let mut reader = TableReader::new(bytes.as_slice(), options).unwrap();
        assert_eq!(reader.line_number(), 1);
        assert_eq!(reader.next().unwrap().unwrap()["a"], "x");
        assert_eq!(reader.line_number(), 2);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_truncated_stream_ends_after_one_error() {
        let rows: Vec<String> = (0..2000).map(|i| format!("{i},row number {i}")).collect();
        let mut lines = vec!["n,text"];
        lines.extend(rows.iter().map(String::as_str));
        let bytes = compress(&lines);
        let truncated = &bytes[..bytes.len() / 2];

        let mut reader = TableReader::new(truncated, ReaderOptions::new()).unwrap();
        let results: Vec<_> = reader.by_ref().take(10_000).collect();
        let errors = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(errors, 1);
        assert!(matches!(results.last(), Some(Err(Error::Io(_)))));
        assert!(results.len() < 2000);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_duplicate_header_names() {
        let bytes = compress(&["a,a"]);
        assert!(matches!(
            TableReader::new(bytes.as_slice(), ReaderOptions::new()),
            Err(Error::DuplicateField { .. })
        ));
    }
}
