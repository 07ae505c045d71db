//! Table writer: named-field records to compressed rows.
//!
//! A [`TableWriter`] binds a fixed field-name list to one compressed sink. Each
//! record is turned into a row by looking its fields up in list order.
//!
//! ```rust
//! use compressed_sheets::{TableWriter, WriterOptions};
//! use std::collections::HashMap;
//!
//! let options = WriterOptions::new().with_header(true);
//! let mut writer = TableWriter::new(Vec::new(), ["name", "age"], options).unwrap();
//!
//! let mut row = HashMap::new();
//! row.insert("name", "Alice");
//! row.insert("age", "30");
//! writer.writerow(&row).unwrap();
//!
//! let compressed: Vec<u8> = writer.finish().unwrap();
//! assert!(!compressed.is_empty());
//! ```
//!
//! The writer is closed when dropped; call [`TableWriter::close`] to observe
//! close errors.

use crate::options::WriterOptions;
use crate::record::{check_fieldnames, FieldLookup};
use crate::row::RowCodec;
use crate::stream::{self, CompressedSink, GzSink, LineWriter};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes records with a fixed field-name list to a [`CompressedSink`].
pub struct TableWriter<S: CompressedSink> {
    fieldnames: Vec<String>,
    codec: RowCodec,
    stream: LineWriter<S>,
    header_written: bool,
    rows: usize,
}

impl<W: Write> TableWriter<GzSink<W>> {
    /// Creates a gzip-compressed writer over `inner`.
    ///
    /// # Errors
    ///
    /// See [`TableWriter::from_sink`].
    pub fn new<I, F>(inner: W, fieldnames: I, options: WriterOptions) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let sink = stream::gz_sink(inner, options.compression);
        Self::from_sink(sink, fieldnames, options)
    }

    /// Finalises the gzip stream and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the writer was already closed, or the I/O error
    /// from writing the gzip trailer.
    pub fn finish(self) -> Result<W> {
        let rows = self.rows;
        let sink = self.stream.into_sink()?;
        let inner = sink.finish()?;
        debug!(rows, "finished table writer");
        Ok(inner)
    }
}

impl TableWriter<GzSink<BufWriter<File>>> {
    /// Creates a gzip table file at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from creating the file, plus the errors of
    /// [`TableWriter::from_sink`].
    pub fn open<P, I, F>(path: P, fieldnames: I, options: WriterOptions) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let sink = stream::create(path, options.compression)?;
        Self::from_sink(sink, fieldnames, options)
    }
}

impl<S: CompressedSink> TableWriter<S> {
    /// Creates a writer over an arbitrary sink.
    ///
    /// With [`WriterOptions::write_header`] set, the header row is written immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFieldNames`] or [`Error::DuplicateField`] for an
    /// unusable field-name list, or the I/O error from writing the header.
    pub fn from_sink<I, F>(sink: S, fieldnames: I, options: WriterOptions) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let fieldnames: Vec<String> = fieldnames.into_iter().map(Into::into).collect();
        check_fieldnames(&fieldnames)?;

        let mut writer = TableWriter {
            fieldnames,
            codec: RowCodec::new(options.delimiter),
            stream: LineWriter::new(sink),
            header_written: false,
            rows: 0,
        };
        debug!(fields = writer.fieldnames.len(), "opened table writer");

        if options.write_header {
            writer.writeheader()?;
        }
        Ok(writer)
    }

    #[must_use]
    pub fn fieldnames(&self) -> &[String] {
        &self.fieldnames
    }

    /// Writes the field-name list as a row.
    ///
    /// Only meaningful as the first line; the writer does not track stream position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after close, or the sink's I/O error.
    pub fn writeheader(&mut self) -> Result<()> {
        let line = self.codec.encode_row(&self.fieldnames);
        self.stream.write_line(&line)?;
        self.header_written = true;
        debug!(fields = self.fieldnames.len(), "wrote header row");
        Ok(())
    }

    #[must_use]
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Writes one record, taking each field's value in field-name order.
    ///
    /// Keys outside the field-name list are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] before writing anything if the record lacks a
    /// field, [`Error::Closed`] after close, or the sink's I/O error.
    pub fn writerow<R>(&mut self, record: &R) -> Result<()>
    where
        R: FieldLookup + ?Sized,
    {
        let values = self
            .fieldnames
            .iter()
            .map(|field| {
                record
                    .field_text(field)
                    .ok_or_else(|| Error::missing_field(field))
            })
            .collect::<Result<Vec<_>>>()?;
        self.write_line(&values)
    }

    /// Writes every record from `records`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`TableWriter::writerow`].
    pub fn writerows<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: FieldLookup,
    {
        for record in records {
            self.writerow(&record)?;
        }
        Ok(())
    }

    /// Writes one row given positionally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldCount`] (with the row's would-be line number) when the
    /// number of values differs from the field count.
    pub fn write_values<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let values: Vec<V> = values.into_iter().collect();
        if values.len() != self.fieldnames.len() {
            return Err(Error::field_count(
                self.stream.lines_written() + 1,
                self.fieldnames.len(),
                values.len(),
            ));
        }
        self.write_line(&values)
    }

    fn write_line<V: AsRef<str>>(&mut self, values: &[V]) -> Result<()> {
        let line = self.codec.encode_row(values);
        self.stream.write_line(&line)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written, header excluded.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Finalises and releases the sink. Further calls do nothing.
    ///
    /// # Errors
    ///
    /// Propagates the sink's close failure.
    pub fn close(&mut self) -> Result<()> {
        self.stream.close()
    }

    /// Releases the sink without finalising it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the writer was already closed.
    pub fn into_inner(self) -> Result<S> {
        self.stream.into_sink()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{gz_source, LineReader};
    use crate::Record;
    use std::collections::HashMap;

    fn lines(bytes: &[u8]) -> Vec<String> {
        let mut reader = LineReader::new(gz_source(bytes));
        let mut out = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            out.push(line);
        }
        out
    }

    #[test]
    fn test_header_option_writes_first_line() {
        let writer = TableWriter::new(Vec::new(), ["a", "b,c"], WriterOptions::new().with_header(true))
            .unwrap();
        assert!(writer.header_written());
        assert_eq!(lines(&writer.finish().unwrap()), vec!["a,b\\dc"]);
    }

    #[test]
    fn test_rows_follow_field_order_and_ignore_extras() {
        let mut writer = TableWriter::new(Vec::new(), ["x", "y"], WriterOptions::new()).unwrap();
        let mut row = HashMap::new();
        row.insert("y", "2");
        row.insert("x", "1");
        row.insert("z", "ignored");
        writer.writerow(&row).unwrap();
        assert_eq!(writer.rows_written(), 1);
        assert_eq!(lines(&writer.finish().unwrap()), vec!["1,2"]);
    }

    #[test]
    fn test_missing_field_writes_nothing() {
        let mut writer = TableWriter::new(Vec::new(), ["x", "y"], WriterOptions::new()).unwrap();
        let record: Record = [("x", "1")].into_iter().collect();
        let err = writer.writerow(&record).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field } if field == "y"));
        assert_eq!(writer.rows_written(), 0);
        assert!(lines(&writer.finish().unwrap()).is_empty());
    }

    #[test]
    fn test_write_values_checks_width() {
        let mut writer = TableWriter::new(Vec::new(), ["x", "y"], WriterOptions::new()).unwrap();
        writer.write_values(["1", "2"]).unwrap();
        let err = writer.write_values(["only"]).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldCount {
                line: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_invalid_fieldnames() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            TableWriter::new(Vec::new(), empty, WriterOptions::new()),
            Err(Error::EmptyFieldNames)
        ));
        assert!(matches!(
            TableWriter::new(Vec::new(), ["a", "a"], WriterOptions::new()),
            Err(Error::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_write_after_close() {
        let mut writer = TableWriter::new(Vec::new(), ["a"], WriterOptions::new()).unwrap();
        writer.close().unwrap();
        assert!(matches!(writer.write_values(["x"]), Err(Error::Closed)));
        assert!(matches!(writer.finish(), Err(Error::Closed)));
    }
}
