//! Quoted-Printable encoding functionality

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::consts::{
    CRLF, ESCAPE_CHAR, FOLD_THRESHOLD, TRIPLET_LEN, WHITESPACE_ESCAPE_LIMIT, escape,
    is_line_terminator, is_literal, is_whitespace,
};
use crate::error::Result;

/// Decision that depends on the next, not yet seen, input byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    None,
    /// The line reached the fold threshold. A soft break is due unless the
    /// next byte is a line terminator.
    Fold,
    /// The previous byte ended a line. Its complement (LF after CR, CR after
    /// LF) belongs to the same terminator and is dropped.
    Terminator(u8),
}

/// Streaming Quoted-Printable encoder
///
/// Bytes written to the encoder are escaped, folded into lines of at most
/// 76 characters and written to the wrapped writer one completed line at a
/// time. Line terminators (CR, LF, CRLF, LFCR) are normalized to CRLF.
///
/// The last line is only terminated by [`Encoder::finish`]; dropping the
/// encoder without calling it discards the buffered partial line.
///
/// # Example
/// ```
/// use std::io::Write;
/// use qpencoding::Encoder;
///
/// let mut encoder = Encoder::new(Vec::new());
/// encoder.write_all(b"foo bar=foo bar").unwrap();
/// let output = encoder.finish().unwrap();
///
/// assert_eq!(output, b"foo bar=3Dfoo bar=\r\n");
/// ```
#[derive(Debug)]
pub struct Encoder<W: Write> {
    writer: W,
    /// Completed lines not yet written, followed by the current line
    buf: Vec<u8>,
    /// Start of the current line in `buf`
    line_start: usize,
    lookahead: Lookahead,
    /// First error returned by the writer, replayed by every later call
    failure: Option<io::Error>,
}

impl<W: Write> Encoder<W> {
    /// Create a new encoder writing to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: Vec::with_capacity(2 * (FOLD_THRESHOLD + TRIPLET_LEN)),
            line_start: 0,
            lookahead: Lookahead::None,
            failure: None,
        }
    }

    /// Get a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer
    ///
    /// Writing to it directly interleaves with the encoded output.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Signal end of input
    ///
    /// Terminates the partial last line with a soft break, writes every
    /// pending line and returns the underlying writer. The writer itself is
    /// not flushed.
    ///
    /// Fails with the writer's error if any earlier write to it failed.
    pub fn finish(mut self) -> io::Result<W> {
        self.check_failure()?;

        self.lookahead = Lookahead::None;
        if self.column() > 0 {
            self.soft_break();
        }
        self.write_lines()?;
        Ok(self.writer)
    }

    /// Replay the recorded writer error, if any
    fn check_failure(&self) -> io::Result<()> {
        match &self.failure {
            Some(err) => Err(io::Error::new(err.kind(), err.to_string())),
            None => Ok(()),
        }
    }

    /// Record a writer error, returning a copy for the caller
    fn fail(&mut self, err: io::Error) -> io::Error {
        let copy = io::Error::new(err.kind(), err.to_string());
        self.failure = Some(err);
        copy
    }

    /// Rendered length of the current line
    #[inline]
    fn column(&self) -> usize {
        self.buf.len() - self.line_start
    }

    fn push_byte(&mut self, byte: u8) {
        match std::mem::replace(&mut self.lookahead, Lookahead::None) {
            Lookahead::Terminator(prev) if is_line_terminator(byte) && byte != prev => return,
            Lookahead::Fold if !is_line_terminator(byte) => self.soft_break(),
            _ => {}
        }

        if is_literal(byte) {
            self.buf.push(byte);
        } else if is_line_terminator(byte) {
            self.hard_break(byte);
            return;
        } else {
            // triplets are never split across lines
            if self.column() + TRIPLET_LEN > FOLD_THRESHOLD {
                self.soft_break();
            }
            self.buf.extend_from_slice(&escape(byte));
        }

        if self.column() >= FOLD_THRESHOLD {
            self.lookahead = Lookahead::Fold;
        }
    }

    fn hard_break(&mut self, terminator: u8) {
        let trailing = self.buf[self.line_start..]
            .last()
            .copied()
            .filter(|&last| is_whitespace(last));

        if let Some(space) = trailing {
            self.buf.pop();
            if self.column() > WHITESPACE_ESCAPE_LIMIT {
                self.soft_break();
            }
            self.buf.extend_from_slice(&escape(space));
        }

        self.buf.extend_from_slice(CRLF);
        self.end_line();
        self.lookahead = Lookahead::Terminator(terminator);
    }

    fn soft_break(&mut self) {
        self.buf.push(ESCAPE_CHAR);
        self.buf.extend_from_slice(CRLF);
        self.end_line();
    }

    #[inline]
    fn end_line(&mut self) {
        self.line_start = self.buf.len();
    }

    /// Write all completed lines
    ///
    /// Bytes the writer accepted are dropped from `buf` even when a later
    /// write fails. A failure is recorded and ends all further output.
    fn write_lines(&mut self) -> io::Result<()> {
        let mut written = 0;
        let result = loop {
            if written == self.line_start {
                break Ok(());
            }
            match self.writer.write(&self.buf[written..self.line_start]) {
                Ok(0) => {
                    break Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write encoded line",
                    ));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => break Err(e),
            }
        };

        self.buf.drain(..written);
        self.line_start -= written;
        result.map_err(|err| self.fail(err))
    }
}

impl<W: Write> Write for Encoder<W> {
    /// Encode `buf`, writing every line it completes
    ///
    /// When the writer fails, the count of bytes consumed so far is
    /// returned and the encoder stops: every later `write`, `flush` and
    /// `finish` fails with the writer's error without calling the writer
    /// again.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_failure()?;

        for (n, &byte) in buf.iter().enumerate() {
            self.push_byte(byte);
            if self.write_lines().is_err() {
                return Ok(n + 1);
            }
        }

        Ok(buf.len())
    }

    /// Write completed lines and flush the underlying writer
    ///
    /// The partial current line stays buffered until more input or
    /// [`Encoder::finish`] decides how it ends.
    fn flush(&mut self) -> io::Result<()> {
        self.check_failure()?;
        self.write_lines()?;
        self.writer.flush().map_err(|err| self.fail(err))
    }
}

/// Encode everything from `reader` into `writer`
///
/// # Returns
/// Number of bytes read from input
///
/// # Example
/// ```
/// let mut output = Vec::new();
/// let size = qpencoding::encode(&b"caf\xc3\xa9\n"[..], &mut output).unwrap();
///
/// assert_eq!(size, 6);
/// assert_eq!(output, b"caf=C3=A9\r\n");
/// ```
pub fn encode<R: Read, W: Write>(mut reader: R, writer: W) -> Result<u64> {
    let mut encoder = Encoder::new(writer);
    let size = io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;
    Ok(size)
}

/// Encode the file at `input` into a new file at `output`
///
/// # Returns
/// Number of bytes read from input
pub fn encode_file(input: &Path, output: &Path) -> Result<u64> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let size = encode(reader, &mut writer)?;
    writer.flush()?;

    Ok(size)
}
