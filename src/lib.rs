//! Streaming Quoted-Printable (RFC 2045) encoder and decoder
//!
//! [`Encoder`] wraps a writer and turns arbitrary bytes into
//! Quoted-Printable text folded into lines of at most 76 characters.
//! [`Decoder`] wraps a reader of Quoted-Printable text and yields the
//! original bytes. Both accept input in chunks of any size.
//!
//! Line terminators in the input of the encoder (CR, LF, CRLF and LFCR)
//! all come out as CRLF, so a round trip reproduces the input with its
//! line endings normalized.
//!
//! ```
//! let mut encoded = Vec::new();
//! qpencoding::encode(&b"x = 1\ny = 2"[..], &mut encoded).unwrap();
//! assert_eq!(encoded, b"x =3D 1\r\ny =3D 2=\r\n");
//!
//! let mut decoded = Vec::new();
//! qpencoding::decode(&encoded[..], &mut decoded).unwrap();
//! assert_eq!(decoded, b"x = 1\r\ny = 2");
//! ```

mod consts;
mod decode;
mod encode;
mod error;

pub use decode::{Decoder, decode, decode_file};
pub use encode::{Encoder, encode, encode_file};
pub use error::{DecodeError, QpError, Result};
