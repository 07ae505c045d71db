//! On-disk table format
//!
//! This module documents the format written by [`TableWriter`](crate::TableWriter)
//! and read by [`TableReader`](crate::TableReader). It contains no code.
//!
//! # Layers
//!
//! A table file is a gzip stream (RFC 1952). Readers accept concatenated gzip
//! members as a single stream. The decompressed payload is UTF-8 text made of
//! lines terminated by a single `\n` (no `\r\n` translation; a `\r` is data).
//!
//! # Lines
//!
//! Every line is one row: the field values of one record, each escaped, joined by
//! the delimiter, with no trailing delimiter. A row always has at least one field;
//! an empty line is a row with a single empty field.
//!
//! The optional first line is the header row, encoded exactly like a data row but
//! holding the field names.
//!
//! ```text
//! name,note
//! Alice,likes commas\d really
//! Bob,line one\nline two
//! ```
//!
//! # Escaping
//!
//! The escape marker is `\`. Three characters never appear raw inside a field:
//!
//! | Character      | Written as |
//! |----------------|------------|
//! | `\`            | `\\`       |
//! | the delimiter  | `\d`       |
//! | `\n`           | `\n`       |
//!
//! Any other character after `\` is an error, as is a `\` at the end of a line.
//! The delimiter is `,` by default; `\t` and `|` are also available (see
//! [`Delimiter`](crate::Delimiter)). Only the active delimiter is escaped, so both
//! ends must agree on it.
//!
//! # Field values
//!
//! Fields are untyped text. Readers may convert individual fields with
//! [`FieldTypes`](crate::FieldTypes); the stored text of a converted value is its
//! `Display` form, so integers, floats, booleans, big integers and RFC 3339
//! timestamps written from a [`Value`](crate::Value) read back equal.
//!
//! # Rows and records
//!
//! A record maps the field-name list onto a row positionally. Every row must be
//! exactly as wide as the field-name list; a mismatch is a decoding error for that
//! line. Field names are unique within a table.
