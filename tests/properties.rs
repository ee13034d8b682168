//! Property tests over arbitrary input

use std::io::{self, Read, Write};

use proptest::prelude::*;
use qpencoding::{Decoder, Encoder, decode, encode};

/// Bytes weighted towards the ones the encoder treats specially
fn qp_byte() -> impl Strategy<Value = u8> {
    prop_oneof![
        3 => b'a'..=b'z',
        1 => prop::sample::select(vec![b'\r', b'\n', b' ', b'\t', b'=']),
        1 => any::<u8>(),
    ]
}

fn qp_input() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(qp_byte(), 0..400)
}

/// Every terminator unit (CR, LF, CRLF, LFCR) replaced by CRLF
fn normalize_line_endings(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut iter = input.iter().copied().peekable();

    while let Some(byte) = iter.next() {
        if byte == b'\r' || byte == b'\n' {
            output.extend_from_slice(b"\r\n");
            let complement = if byte == b'\r' { b'\n' } else { b'\r' };
            iter.next_if_eq(&complement);
        } else {
            output.push(byte);
        }
    }

    output
}

fn encode_bytes(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::new();
    encode(input, &mut output).unwrap();
    output
}

struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

proptest! {
    #[test]
    fn roundtrip_normalizes_line_endings(input in qp_input()) {
        let encoded = encode_bytes(&input);

        let mut decoded = Vec::new();
        decode(&encoded[..], &mut decoded).unwrap();

        prop_assert_eq!(decoded, normalize_line_endings(&input));
    }

    #[test]
    fn encoded_lines_fit(input in qp_input()) {
        let encoded = encode_bytes(&input);

        if !encoded.is_empty() {
            prop_assert!(encoded.ends_with(b"\r\n"));
        }
        for line in encoded.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            prop_assert!(line.len() <= 76, "line too long: {:?}", line.escape_ascii().to_string());
            prop_assert!(!line.ends_with(b" ") && !line.ends_with(b"\t"));
        }
    }

    #[test]
    fn encoder_ignores_write_boundaries(
        input in qp_input(),
        splits in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let mut points: Vec<usize> = splits.iter().map(|i| i.index(input.len() + 1)).collect();
        points.sort_unstable();

        let mut encoder = Encoder::new(Vec::new());
        let mut start = 0;
        for point in points {
            encoder.write_all(&input[start..point]).unwrap();
            start = point;
        }
        encoder.write_all(&input[start..]).unwrap();
        let chunked = encoder.finish().unwrap();

        prop_assert_eq!(chunked, encode_bytes(&input));
    }

    #[test]
    fn decoder_ignores_read_boundaries(input in qp_input(), chunk in 1usize..8) {
        let encoded = encode_bytes(&input);

        let reader = ChunkedReader { data: encoded.clone(), pos: 0, chunk };
        let mut chunked = Vec::new();
        Decoder::new(reader).read_to_end(&mut chunked).unwrap();

        let mut whole = Vec::new();
        decode(&encoded[..], &mut whole).unwrap();

        prop_assert_eq!(chunked, whole);
    }

    #[test]
    fn text_without_escapes_decodes_to_itself(
        input in prop::collection::vec(any::<u8>().prop_filter("no escape char", |b| *b != b'='), 0..400),
    ) {
        let mut decoded = Vec::new();
        decode(&input[..], &mut decoded).unwrap();

        prop_assert_eq!(decoded, input);
    }
}
