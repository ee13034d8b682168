//! Quoted-Printable decoding functionality

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::consts::{ESCAPE_CHAR, hex_value};
use crate::error::{DecodeError, Result};

const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Escape sequence carried across source reads
///
/// `offset` is the source position of the `=` that opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    /// `=`
    Escape { offset: u64 },
    /// `=` and one hex digit
    Hex { offset: u64, digit: u8, high: u8 },
    /// `=` CR, the start of a soft line break
    SoftBreak { offset: u64 },
}

/// Streaming Quoted-Printable decoder
///
/// Wraps a reader of encoded text and yields the decoded bytes through
/// [`Read`]. Soft line breaks are removed, `=XX` escapes are replaced by
/// the byte they encode and everything else passes through unchanged.
///
/// A malformed or truncated escape stops decoding: bytes decoded before it
/// are returned first, then every later read fails with an
/// [`io::ErrorKind::InvalidData`] error wrapping the [`DecodeError`].
///
/// # Example
/// ```
/// use std::io::Read;
/// use qpencoding::Decoder;
///
/// let mut decoded = Vec::new();
/// Decoder::new(&b"foo bar=3Dfoo=\r\n bar"[..])
///     .read_to_end(&mut decoded)
///     .unwrap();
///
/// assert_eq!(decoded, b"foo bar=foo bar");
/// ```
#[derive(Debug)]
pub struct Decoder<R: Read> {
    reader: R,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    /// Source offset of `buf[pos]`
    offset: u64,
    pending: Pending,
    strict: bool,
    eof: bool,
    failure: Option<DecodeError>,
}

impl<R: Read> Decoder<R> {
    /// Create a new decoder with default settings
    ///
    /// Default settings:
    /// - Lenient mode (lowercase hex digits accepted)
    /// - 8 KiB source buffer
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, reader)
    }

    /// Create a new decoder reading the source `capacity` bytes at a time
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            filled: 0,
            offset: 0,
            pending: Pending::None,
            strict: false,
            eof: false,
            failure: None,
        }
    }

    /// Reject lowercase hex digits in escape sequences
    ///
    /// Encoders following RFC 2045 only emit uppercase digits.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader
    ///
    /// Reading from it directly skips input the decoder has not seen.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Unwrap the underlying reader, discarding buffered input
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill_buf(&mut self) -> io::Result<()> {
        let read = self.reader.read(&mut self.buf)?;
        self.pos = 0;
        self.filled = read;
        self.eof = read == 0;
        Ok(())
    }

    /// Decode buffered input into `out`, returning the number of bytes
    /// written. Stops early when a fault is recorded.
    fn decode_buffered(&mut self, out: &mut [u8]) -> usize {
        let mut written = 0;

        while written < out.len() && self.pos < self.filled {
            let byte = self.buf[self.pos];
            let offset = self.offset;
            self.pos += 1;
            self.offset += 1;

            match self.step(byte, offset) {
                Ok(Some(decoded)) => {
                    out[written] = decoded;
                    written += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    self.failure = Some(err);
                    break;
                }
            }
        }

        written
    }

    fn step(&mut self, byte: u8, offset: u64) -> std::result::Result<Option<u8>, DecodeError> {
        let lowercase = !self.strict;

        match self.pending {
            Pending::None if byte == ESCAPE_CHAR => {
                self.pending = Pending::Escape { offset };
                Ok(None)
            }
            Pending::None => Ok(Some(byte)),
            Pending::Escape { offset } => {
                if byte == b'\r' {
                    self.pending = Pending::SoftBreak { offset };
                    Ok(None)
                } else if let Some(high) = hex_value(byte, lowercase) {
                    self.pending = Pending::Hex {
                        offset,
                        digit: byte,
                        high,
                    };
                    Ok(None)
                } else {
                    Err(DecodeError::InvalidEscape {
                        offset,
                        sequence: vec![ESCAPE_CHAR, byte],
                    })
                }
            }
            Pending::Hex {
                offset,
                digit,
                high,
            } => match hex_value(byte, lowercase) {
                Some(low) => {
                    self.pending = Pending::None;
                    Ok(Some((high << 4) | low))
                }
                None => Err(DecodeError::InvalidEscape {
                    offset,
                    sequence: vec![ESCAPE_CHAR, digit, byte],
                }),
            },
            Pending::SoftBreak { offset } => {
                if byte == b'\n' {
                    self.pending = Pending::None;
                    Ok(None)
                } else {
                    Err(DecodeError::InvalidEscape {
                        offset,
                        sequence: vec![ESCAPE_CHAR, b'\r', byte],
                    })
                }
            }
        }
    }

    /// End of source: fine unless an escape is still open
    fn end_of_source(&mut self) -> io::Result<usize> {
        let offset = match self.pending {
            Pending::None => return Ok(0),
            Pending::Escape { offset }
            | Pending::Hex { offset, .. }
            | Pending::SoftBreak { offset } => offset,
        };

        let err = DecodeError::TruncatedEscape { offset };
        self.failure = Some(err.clone());
        Err(err.into())
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = &self.failure {
            return Err(err.clone().into());
        }
        if out.is_empty() {
            return Ok(0);
        }

        loop {
            let written = self.decode_buffered(out);
            if written > 0 {
                return Ok(written);
            }
            if let Some(err) = &self.failure {
                return Err(err.clone().into());
            }
            if self.eof {
                return self.end_of_source();
            }
            self.fill_buf()?;
        }
    }
}

/// Decode everything from `reader` into `writer`
///
/// Lowercase hex digits are accepted. Use [`Decoder`] directly for strict
/// decoding.
///
/// # Returns
/// Number of decoded bytes written
///
/// # Example
/// ```
/// let mut output = Vec::new();
/// let size = qpencoding::decode(&b"caf=C3=A9=\r\n"[..], &mut output).unwrap();
///
/// assert_eq!(size, 5);
/// assert_eq!(output, "café".as_bytes());
/// ```
pub fn decode<R: Read, W: Write>(reader: R, mut writer: W) -> Result<u64> {
    let mut decoder = Decoder::new(reader);
    let size = io::copy(&mut decoder, &mut writer)?;
    Ok(size)
}

/// Decode the file at `input` into a new file at `output`
///
/// On a decode error `output` keeps whatever was decoded before the fault.
///
/// # Returns
/// Number of decoded bytes written
pub fn decode_file(input: &Path, output: &Path) -> Result<u64> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let size = decode(reader, &mut writer)?;
    writer.flush()?;

    Ok(size)
}
