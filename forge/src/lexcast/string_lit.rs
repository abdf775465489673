//! String literals: sequences of character fragments (`spec.md` §4.B).

use super::char_lit::{parse_char_fragment, print_char_literal, utf8_sequence_len};
use super::{CastError, CastResult};
use crate::diagnostics::codes::is;
use crate::source::TokenReader;

/// Parses a string literal bracketed by `"`. Non-UTF-8 bytes are
/// consumed as a single byte value each (the "decoding" path in
/// `spec.md` §4.B).
pub fn parse_string_literal(reader: &mut TokenReader<'_>) -> CastResult<Vec<u8>> {
    if reader.peek() != b'"' {
        return Err(CastError::new(
            is::UNEXPECTED_TOKEN,
            "expected opening '\"'",
        ));
    }
    reader.step();

    let mut bytes = Vec::new();
    loop {
        if reader.is_at_end() {
            return Err(CastError::new(
                is::MISSING_CLOSING_QUOTE,
                "unterminated string literal",
            ));
        }
        if reader.peek() == b'"' {
            reader.step();
            break;
        }

        let codepoint = parse_char_fragment(reader)?;
        match char::from_u32(codepoint) {
            Some(c) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push((codepoint & 0xFF) as u8),
        }
    }

    Ok(bytes)
}

/// Emits text that re-parses to the same byte sequence (`spec.md` §8
/// "Lexical round-trip"). `ValueString` holds arbitrary bytes, not
/// necessarily valid UTF-8, so this walks `bytes` directly rather than
/// decoding through `String::from_utf8_lossy` — a lossy decode would
/// substitute U+FFFD for any byte that doesn't form a valid sequence
/// and destroy the original bytes. Bytes that don't decode as part of
/// a valid UTF-8 sequence are emitted one at a time as `\xNN` escapes.
pub fn print_string_literal(bytes: &[u8], out: &mut String) {
    out.push('"');
    let mut i = 0;
    while i < bytes.len() {
        let len = utf8_sequence_len(bytes[i]).min(bytes.len() - i);
        match std::str::from_utf8(&bytes[i..i + len]) {
            Ok(s) => {
                let c = s.chars().next().expect("non-empty utf-8 slice");
                let mut fragment = String::new();
                print_char_literal(c as u32, '"', &mut fragment);
                out.push_str(&fragment[1..fragment.len() - 1]);
                i += len;
            }
            Err(_) => {
                out.push_str(&format!("\\x{:02x}", bytes[i]));
                i += 1;
            }
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn reader(text: &'static str) -> TokenReader<'static> {
        let bytes: &'static [u8] =
            Box::leak(format!("{text}\0\0").into_bytes().into_boxed_str()).as_bytes();
        TokenReader::new(Arc::from("t.forge"), bytes)
    }

    #[test]
    fn parses_plain_string() {
        let mut r = reader("\"hello\"");
        assert_eq!(parse_string_literal(&mut r).unwrap(), b"hello");
    }

    #[test]
    fn parses_escapes_inside_string() {
        let mut r = reader("\"a\\nb\"");
        assert_eq!(parse_string_literal(&mut r).unwrap(), b"a\nb");
    }

    #[test]
    fn rejects_unterminated_string() {
        let mut r = reader("\"abc");
        assert!(parse_string_literal(&mut r).is_err());
    }

    #[test]
    fn round_trips_arbitrary_bytes() {
        let original = b"hi \"there\"\nfolks".to_vec();
        let mut printed = String::new();
        print_string_literal(&original, &mut printed);
        let mut r = reader(Box::leak(printed.into_boxed_str()));
        assert_eq!(parse_string_literal(&mut r).unwrap(), original);
    }

    #[test]
    fn invalid_utf8_bytes_are_escaped_rather_than_lossily_substituted() {
        let original = vec![b'h', b'i', 0xFF, 0x80];
        let mut printed = String::new();
        print_string_literal(&original, &mut printed);
        assert!(!printed.contains('\u{FFFD}'));
        assert!(printed.contains("\\xff"));
        assert!(printed.contains("\\x80"));
    }
}
