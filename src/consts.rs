//! Common constants and utilities for Quoted-Printable encoding/decoding

/// The escape character used in Quoted-Printable encoding
pub(crate) const ESCAPE_CHAR: u8 = b'=';

/// Canonical line terminator of encoded output
pub(crate) const CRLF: &[u8; 2] = b"\r\n";

/// Column count at which the current line must be folded
pub(crate) const FOLD_THRESHOLD: usize = 75;

/// Longest line (without CRLF) that takes the trailing whitespace escape of
/// a hard break without a soft break first
///
/// The soft break fires only above this limit, not at it: 73 columns plus
/// `=20` is exactly 76, the longest line RFC 2045 allows.
pub(crate) const WHITESPACE_ESCAPE_LIMIT: usize = 73;

/// Width of an `=XX` escape triplet
pub(crate) const TRIPLET_LEN: usize = 3;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Bytes that may appear unescaped in the body of a line
#[inline]
pub(crate) fn is_literal(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | 33..=126) && byte != ESCAPE_CHAR
}

#[inline]
pub(crate) fn is_line_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

#[inline]
pub(crate) fn is_whitespace(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Build the `=XX` triplet for a raw byte
#[inline]
pub(crate) fn escape(byte: u8) -> [u8; TRIPLET_LEN] {
    [
        ESCAPE_CHAR,
        HEX_UPPER[usize::from(byte >> 4)],
        HEX_UPPER[usize::from(byte & 0x0f)],
    ]
}

/// Value of a hex digit; lowercase digits only when `lowercase` is set
#[inline]
pub(crate) fn hex_value(digit: u8, lowercase: bool) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' if lowercase => Some(digit - b'a' + 10),
        _ => None,
    }
}
