//! Character fragments and character literals (`spec.md` §4.B).

use super::{CastError, CastResult};
use crate::diagnostics::codes::{es, is};
use crate::source::TokenReader;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Classifies a code point by Unicode general category: `C*` categories
/// (`Cc`, `Cf`, `Cn`, `Co`, `Cs`) are non-printable (`spec.md` §8
/// "Character printability").
pub fn is_char_printable(codepoint: u32) -> bool {
    let Some(c) = char::from_u32(codepoint) else {
        return false;
    };

    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Unassigned
            | GeneralCategory::PrivateUse
            | GeneralCategory::Surrogate
    )
}

fn hex_digits(reader: &mut TokenReader<'_>, count: usize) -> CastResult<u32> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let c = reader.peek();
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => {
                return Err(CastError::new(
                    es::MALFORMED_ESCAPE,
                    "expected hexadecimal digit in numeric escape",
                ))
            }
        };
        value = value * 16 + digit as u32;
        reader.step();
    }
    Ok(value)
}

/// Parses one logical character (ASCII or UTF-8 sequence) from the
/// reader, honoring escapes `\n \r \t \0 \\ \" \'` and numeric escapes
/// `\xNN`, `\uNNNN`, `\UNNNNNNNN`.
pub fn parse_char_fragment(reader: &mut TokenReader<'_>) -> CastResult<u32> {
    let first = reader.peek();

    if first == b'\\' {
        reader.step();
        let escape = reader.peek();
        let codepoint = match escape {
            b'n' => {
                reader.step();
                b'\n' as u32
            }
            b'r' => {
                reader.step();
                b'\r' as u32
            }
            b't' => {
                reader.step();
                b'\t' as u32
            }
            b'0' => {
                reader.step();
                0
            }
            b'\\' => {
                reader.step();
                b'\\' as u32
            }
            b'"' => {
                reader.step();
                b'"' as u32
            }
            b'\'' => {
                reader.step();
                b'\'' as u32
            }
            b'x' => {
                reader.step();
                hex_digits(reader, 2)?
            }
            b'u' => {
                reader.step();
                hex_digits(reader, 4)?
            }
            b'U' => {
                reader.step();
                hex_digits(reader, 8)?
            }
            _ => {
                return Err(CastError::new(
                    es::MALFORMED_ESCAPE,
                    format!("unrecognized escape sequence '\\{}'", escape as char),
                ))
            }
        };
        return Ok(codepoint);
    }

    // Decode one UTF-8 sequence starting at the cursor.
    let len = utf8_sequence_len(first);
    let mut bytes = [0u8; 4];
    for slot in bytes.iter_mut().take(len) {
        *slot = reader.peek();
        reader.step();
    }

    match std::str::from_utf8(&bytes[..len]) {
        Ok(s) => Ok(s.chars().next().map(|c| c as u32).unwrap_or(0xFFFD)),
        Err(_) => Ok(bytes[0] as u32),
    }
}

pub(super) fn utf8_sequence_len(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else if first_byte & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Parses a character fragment bracketed by `quote`. Errors on empty
/// (`is-2`), missing opening quote (`is-3`), missing closing quote
/// (`es-8`).
pub fn parse_char_literal(reader: &mut TokenReader<'_>, quote: u8) -> CastResult<u32> {
    if reader.peek() != quote {
        return Err(CastError::new(
            is::MISSING_OPENING_QUOTE,
            format!("expected opening '{}'", quote as char),
        ));
    }
    reader.step();

    if reader.peek() == quote {
        return Err(CastError::new(
            is::EMPTY_CHARACTER_LITERAL,
            "character literal may not be empty",
        ));
    }

    let codepoint = parse_char_fragment(reader)?;

    if reader.peek() != quote {
        return Err(CastError::new(
            es::MALFORMED_ESCAPE,
            format!("expected closing '{}'", quote as char),
        ));
    }
    reader.step();

    Ok(codepoint)
}

/// Prints a character literal such that it re-parses to the same value.
pub fn print_char_literal(codepoint: u32, quote: char, out: &mut String) {
    out.push(quote);
    match char::from_u32(codepoint) {
        Some('\n') => out.push_str("\\n"),
        Some('\r') => out.push_str("\\r"),
        Some('\t') => out.push_str("\\t"),
        Some('\\') => out.push_str("\\\\"),
        Some(c) if c == quote => {
            out.push('\\');
            out.push(c);
        }
        Some(c) if is_char_printable(codepoint) => out.push(c),
        _ => out.push_str(&format!("\\U{codepoint:08x}")),
    }
    out.push(quote);
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
    fn parses_simple_literal() {
        let mut r = reader("'a'");
        assert_eq!(parse_char_literal(&mut r, b'\'').unwrap(), b'a' as u32);
    }

    #[test]
    fn parses_escapes() {
        let mut r = reader("'\\n'");
        assert_eq!(parse_char_literal(&mut r, b'\'').unwrap(), b'\n' as u32);
    }

    #[test]
    fn parses_numeric_escape() {
        let mut r = reader("'\\x41'");
        assert_eq!(parse_char_literal(&mut r, b'\'').unwrap(), b'A' as u32);
    }

    #[test]
    fn rejects_empty_literal() {
        let mut r = reader("''");
        assert_eq!(
            parse_char_literal(&mut r, b'\'').unwrap_err().code,
            is::EMPTY_CHARACTER_LITERAL
        );
    }

    #[test]
    fn rejects_missing_opening_quote() {
        let mut r = reader("a'");
        assert_eq!(
            parse_char_literal(&mut r, b'\'').unwrap_err().code,
            is::MISSING_OPENING_QUOTE
        );
    }

    #[test]
    fn rejects_missing_closing_quote() {
        let mut r = reader("'a");
        assert_eq!(
            parse_char_literal(&mut r, b'\'').unwrap_err().code,
            es::MALFORMED_ESCAPE
        );
    }

    #[test]
    fn printability_matches_control_categories() {
        assert!(!is_char_printable(0)); // Cc
        assert!(!is_char_printable(0xAD)); // Cf (soft hyphen)
        assert!(is_char_printable(b'A' as u32));
    }

    #[test]
    fn round_trips_through_print_and_parse() {
        let mut printed = String::new();
        print_char_literal(b'\n' as u32, '\'', &mut printed);
        let mut r = reader(Box::leak(printed.into_boxed_str()));
        assert_eq!(parse_char_literal(&mut r, b'\'').unwrap(), b'\n' as u32);
    }
}
