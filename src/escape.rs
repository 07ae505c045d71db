//! Delimiter-safe escaping of field text.
//!
//! Three characters are reserved by the row encoding: the field delimiter,
//! the escape marker `\` and the line terminator `\n`. Each is written as a
//! two-character sequence, everything else passes through untouched:
//!
//! | Character | Escaped |
//! |-----------|---------|
//! | `\`       | `\\`    |
//! | delimiter | `\d`    |
//! | `\n`      | `\n`    |
//!
//! ```rust
//! use compressed_sheets::{Delimiter, Escaper};
//!
//! let escaper = Escaper::new(Delimiter::Comma);
//! let escaped = escaper.escape("a,b\nc");
//! assert_eq!(escaped, "a\\db\\nc");
//! assert_eq!(escaper.unescape(&escaped).unwrap(), "a,b\nc");
//! ```

use crate::options::Delimiter;
use crate::{Error, Result};

/// Character introducing an escape sequence.
pub const ESCAPE_MARKER: char = '\\';

/// Character terminating each encoded row.
pub const LINE_TERMINATOR: char = '\n';

const DELIMITER_CODE: char = 'd';
const TERMINATOR_CODE: char = 'n';

/// Bidirectional mapping between arbitrary text and its delimiter-safe form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Escaper {
    delimiter: Delimiter,
}

impl Escaper {
    #[must_use]
    pub const fn new(delimiter: Delimiter) -> Self {
        Escaper { delimiter }
    }

    #[must_use]
    pub const fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Appends the escaped form of `text` to `out`.
    #[inline]
    pub fn escape_into(&self, text: &str, out: &mut String) {
        let delimiter = self.delimiter.as_char();
        for ch in text.chars() {
            if ch == ESCAPE_MARKER {
                out.push(ESCAPE_MARKER);
                out.push(ESCAPE_MARKER);
            } else if ch == delimiter {
                out.push(ESCAPE_MARKER);
                out.push(DELIMITER_CODE);
            } else if ch == LINE_TERMINATOR {
                out.push(ESCAPE_MARKER);
                out.push(TERMINATOR_CODE);
            } else {
                out.push(ch);
            }
        }
    }

    /// Returns the escaped form of `text`. Total: every string is escapable.
    #[must_use]
    pub fn escape(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.escape_into(text, &mut out);
        out
    }

    /// Reverses [`Escaper::escape`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEscape`] when an escape marker is followed by an
    /// unknown code character or ends the input. Columns are 1-based and counted
    /// in characters.
    pub fn unescape(&self, text: &str) -> Result<String> {
        if !text.contains(ESCAPE_MARKER) {
            return Ok(text.to_string());
        }

        let delimiter = self.delimiter.as_char();
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().enumerate();
        while let Some((col, ch)) = chars.next() {
            if ch != ESCAPE_MARKER {
                out.push(ch);
                continue;
            }
            match chars.next() {
                Some((_, ESCAPE_MARKER)) => out.push(ESCAPE_MARKER),
                Some((_, DELIMITER_CODE)) => out.push(delimiter),
                Some((_, TERMINATOR_CODE)) => out.push(LINE_TERMINATOR),
                Some((_, other)) => return Err(Error::invalid_escape(col + 1, Some(other))),
                None => return Err(Error::invalid_escape(col + 1, None)),
            }
        }
        Ok(out)
    }
}
