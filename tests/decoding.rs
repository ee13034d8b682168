//! Integration tests for decoding

use std::io::Read;

use qpencoding::{DecodeError, Decoder, QpError, decode};

#[test]
fn test_decode_simple() {
    let input = b"foo bar=3Dfoo bar=\r\n";

    let mut output = Vec::new();
    let size = decode(&input[..], &mut output).unwrap();

    assert_eq!(size, 15);
    assert_eq!(output, b"foo bar=foo bar");
}

#[test]
fn test_decode_with_escapes() {
    let input = b"=E6=88=91=E5=8F=AA=E6=\r\n=84=BF";

    let mut output = Vec::new();
    decode(&input[..], &mut output).unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), "我只愿");
}

#[test]
fn test_decode_plain_text_unchanged() {
    let input = b"no escapes here\r\njust text\twith tabs \r\n";

    let mut output = Vec::new();
    decode(&input[..], &mut output).unwrap();

    assert_eq!(output, input);
}

#[test]
fn test_decode_invalid_escape() {
    let input = b"line one\r\nbad =XY escape\r\n";

    let mut output = Vec::new();
    let result = decode(&input[..], &mut output);

    match result {
        Err(QpError::Decode(DecodeError::InvalidEscape { offset, sequence })) => {
            assert_eq!(offset, 14);
            assert_eq!(sequence, b"=X");
        }
        other => panic!("Expected InvalidEscape, got {:?}", other),
    }
}

#[test]
fn test_decode_truncated_escape() {
    let mut output = Vec::new();
    let result = decode(&b"trailing ="[..], &mut output);

    assert!(matches!(
        result,
        Err(QpError::Decode(DecodeError::TruncatedEscape { offset: 9 }))
    ));
}

#[test]
fn test_strict_decoder_rejects_lowercase() {
    let mut lenient = Vec::new();
    Decoder::new(&b"=e9t=e9"[..])
        .read_to_end(&mut lenient)
        .unwrap();
    assert_eq!(lenient, b"\xe9t\xe9");

    let mut strict = Vec::new();
    let err = Decoder::new(&b"=e9t=e9"[..])
        .strict()
        .read_to_end(&mut strict)
        .unwrap_err();

    match QpError::from(err) {
        QpError::Decode(DecodeError::InvalidEscape { offset, sequence }) => {
            assert_eq!(offset, 0);
            assert_eq!(sequence, b"=e");
        }
        other => panic!("Expected InvalidEscape, got {:?}", other),
    }
}

#[test]
fn test_decoder_returns_reader() {
    let input = b"abc";
    let decoder = Decoder::new(&input[..]);

    assert_eq!(*decoder.get_ref(), &input[..]);
    assert_eq!(decoder.into_inner(), &input[..]);
}
