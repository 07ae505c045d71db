//! Row encoding: one ordered sequence of field values per line.
//!
//! Values are escaped independently and joined with the delimiter, with no
//! trailing delimiter and no line terminator. Decoding splits on unescaped
//! delimiters only, then unescapes each piece.
//!
//! ```rust
//! use compressed_sheets::RowCodec;
//!
//! let codec = RowCodec::default();
//! let line = codec.encode_row(["a,b", "", "c"]);
//! assert_eq!(line, "a\\db,,c");
//! assert_eq!(codec.decode_row(&line).unwrap(), vec!["a,b", "", "c"]);
//! ```

use crate::escape::{Escaper, ESCAPE_MARKER};
use crate::options::Delimiter;
use crate::Result;

/// Stateless row encoder/decoder shared by writers and readers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowCodec {
    escaper: Escaper,
}

impl RowCodec {
    #[must_use]
    pub const fn new(delimiter: Delimiter) -> Self {
        RowCodec {
            escaper: Escaper::new(delimiter),
        }
    }

    #[must_use]
    pub const fn escaper(&self) -> &Escaper {
        &self.escaper
    }

    /// Encodes `values` as a single line.
    ///
    /// A single empty value encodes to the empty line, which decodes back to `[""]`.
    pub fn encode_row<I, S>(&self, values: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let delimiter = self.escaper.delimiter().as_char();
        let mut line = String::with_capacity(64);
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                line.push(delimiter);
            }
            self.escaper.escape_into(value.as_ref(), &mut line);
        }
        line
    }

    /// Decodes a line produced by [`RowCodec::encode_row`].
    ///
    /// Always yields at least one value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEscape`](crate::Error::InvalidEscape) for malformed
    /// escape sequences, with the column counted from the start of the line.
    pub fn decode_row(&self, line: &str) -> Result<Vec<String>> {
        let delimiter = self.escaper.delimiter().as_char();
        let mut values = Vec::new();
        let mut piece_start = 0;
        let mut piece_col = 0;
        let mut chars = line.char_indices().enumerate();

        while let Some((col, (pos, ch))) = chars.next() {
            if ch == ESCAPE_MARKER {
                // The code character belongs to this piece, never a separator.
                chars.next();
            } else if ch == delimiter {
                values.push(self.unescape_piece(&line[piece_start..pos], piece_col)?);
                piece_start = pos + ch.len_utf8();
                piece_col = col + 1;
            }
        }
        values.push(self.unescape_piece(&line[piece_start..], piece_col)?);

        Ok(values)
    }

    fn unescape_piece(&self, piece: &str, offset: usize) -> Result<String> {
        self.escaper.unescape(piece).map_err(|e| match e {
            crate::Error::InvalidEscape { col, found, .. } => {
                crate::Error::invalid_escape(col + offset, found)
            }
            other => other,
        })
    }
}
