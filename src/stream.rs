//! Line-oriented access to compressed byte streams.
//!
//! [`CompressedSink`] and [`CompressedSource`] describe the compressor a
//! table is stored in. Gzip implementations are provided for any
//! [`Write`]/[`Read`] through [`gz_sink`] and [`gz_source`], and for files
//! through [`create`] and [`open`].
//!
//! [`LineWriter`] and [`LineReader`] own exactly one sink or source. They are
//! closed explicitly with `close()` or implicitly when dropped, and the
//! underlying stream is finalised exactly once either way.
//!
//! ```rust
//! use compressed_sheets::stream::{gz_sink, gz_source, LineReader, LineWriter};
//! use flate2::Compression;
//!
//! let mut writer = LineWriter::new(gz_sink(Vec::new(), Compression::default()));
//! writer.write_line("first").unwrap();
//! writer.write_line("second").unwrap();
//! let bytes = writer.into_sink().unwrap().finish().unwrap();
//!
//! let mut reader = LineReader::new(gz_source(bytes.as_slice()));
//! assert_eq!(reader.next_line().unwrap().as_deref(), Some("first"));
//! assert_eq!(reader.next_line().unwrap().as_deref(), Some("second"));
//! assert_eq!(reader.next_line().unwrap(), None);
//! ```

use crate::escape::LINE_TERMINATOR;
use crate::{Error, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, trace, warn};

const TERMINATOR_BYTE: u8 = LINE_TERMINATOR as u8;

/// Append-only compressed byte sink.
pub trait CompressedSink: Write {
    /// Flushes pending compressed data and finalises the stream.
    fn close(&mut self) -> io::Result<()>;
}

/// Sequential compressed byte source.
pub trait CompressedSource {
    /// Appends the next decompressed line, terminator included, to `buf`.
    ///
    /// Returns the number of bytes read; `0` signals end of stream.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;

    /// Releases the source.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Gzip sink over any writer.
pub type GzSink<W> = GzEncoder<W>;

/// Gzip source over any reader. Concatenated gzip members are read as one stream.
pub type GzSource<R> = BufReader<MultiGzDecoder<R>>;

impl<W: Write> CompressedSink for GzEncoder<W> {
    fn close(&mut self) -> io::Result<()> {
        self.try_finish()?;
        self.get_mut().flush()
    }
}

impl<R: Read> CompressedSource for BufReader<MultiGzDecoder<R>> {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.read_until(TERMINATOR_BYTE, buf)
    }
}

/// Wraps `inner` in a gzip encoder.
pub fn gz_sink<W: Write>(inner: W, level: Compression) -> GzSink<W> {
    GzEncoder::new(inner, level)
}

/// Wraps `inner` in a buffered gzip decoder.
pub fn gz_source<R: Read>(inner: R) -> GzSource<R> {
    BufReader::new(MultiGzDecoder::new(inner))
}

/// Creates (or truncates) a gzip file at `path`, creating parent directories as needed.
///
/// # Errors
///
/// Propagates any I/O failure from creating directories or the file.
pub fn create<P: AsRef<Path>>(path: P, level: Compression) -> io::Result<GzSink<BufWriter<File>>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    debug!(path = %path.display(), level = level.level(), "created compressed table file");
    Ok(gz_sink(BufWriter::new(file), level))
}

/// Opens an existing gzip file at `path` for reading.
///
/// # Errors
///
/// Fails with [`io::ErrorKind::NotFound`] when the file does not exist.
pub fn open<P: AsRef<Path>>(path: P) -> io::Result<GzSource<File>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "opened compressed table file");
    Ok(gz_source(file))
}

/// Writes terminated lines to an exclusively owned [`CompressedSink`].
pub struct LineWriter<S: CompressedSink> {
    sink: Option<S>,
    lines: usize,
}

impl<S: CompressedSink> LineWriter<S> {
    pub fn new(sink: S) -> Self {
        LineWriter {
            sink: Some(sink),
            lines: 0,
        }
    }

    /// Appends `line` and the line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after close; sink failures propagate as [`Error::Io`].
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let sink = self.sink.as_mut().ok_or(Error::Closed)?;
        sink.write_all(line.as_bytes())?;
        sink.write_all(&[TERMINATOR_BYTE])?;
        self.lines += 1;
        trace!(line = self.lines, bytes = line.len(), "wrote line");
        Ok(())
    }

    /// Number of lines written so far.
    #[must_use]
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }

    /// Finalises and releases the sink. Further calls do nothing.
    ///
    /// # Errors
    ///
    /// Propagates the sink's close failure. The sink is released either way.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut sink) = self.sink.take() {
            sink.close()?;
            debug!(lines = self.lines, "closed line writer");
        }
        Ok(())
    }

    /// Releases the sink without finalising it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the writer was already closed.
    pub fn into_sink(mut self) -> Result<S> {
        self.sink.take().ok_or(Error::Closed)
    }
}

impl<S: CompressedSink> Drop for LineWriter<S> {
    fn drop(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.close() {
                warn!(error = %e, "failed to close line writer on drop");
            }
        }
    }
}

/// Reads terminated lines from an exclusively owned [`CompressedSource`].
pub struct LineReader<S: CompressedSource> {
    source: Option<S>,
    buf: Vec<u8>,
    line: usize,
}

impl<S: CompressedSource> LineReader<S> {
    pub fn new(source: S) -> Self {
        LineReader {
            source: Some(source),
            buf: Vec::with_capacity(256),
            line: 0,
        }
    }

    /// Returns the next line without its terminator, or `None` at end of stream.
    ///
    /// A final line missing its terminator is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after close, [`Error::InvalidUtf8`] for
    /// non-UTF-8 content, and [`Error::Io`] for source failures such as a
    /// truncated compressed stream.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let source = self.source.as_mut().ok_or(Error::Closed)?;
        self.buf.clear();
        if source.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        if self.buf.last() == Some(&TERMINATOR_BYTE) {
            self.buf.pop();
        }
        let line = std::str::from_utf8(&self.buf)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidUtf8 { line: self.line })?;
        trace!(line = self.line, bytes = line.len(), "read line");
        Ok(Some(line))
    }

    /// Discards the next line without decoding it. Returns `false` at end of
    /// stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after close and [`Error::Io`] for source failures.
    pub fn skip_line(&mut self) -> Result<bool> {
        let source = self.source.as_mut().ok_or(Error::Closed)?;
        self.buf.clear();
        if source.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        trace!(line = self.line, bytes = self.buf.len(), "skipped line");
        Ok(true)
    }

    /// 1-based number of the last line returned, `0` before the first read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Releases the source. Further calls do nothing.
    ///
    /// # Errors
    ///
    /// Propagates the source's close failure.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut source) = self.source.take() {
            source.close()?;
            debug!(lines = self.line, "closed line reader");
        }
        Ok(())
    }
}

impl<S: CompressedSource> Drop for LineReader<S> {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            if let Err(e) = source.close() {
                warn!(error = %e, "failed to close line reader on drop");
            }
        }
    }
}
