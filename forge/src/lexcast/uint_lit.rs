//! Unsigned integer literals (`spec.md` §4.B).

use super::{Base, CastError, CastResult};
use crate::diagnostics::codes::is;
use crate::source::TokenReader;

/// Bit width and signedness suffix, parsed alongside the digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedUint {
    pub value: u64,
    pub bit_width: u8,
    pub unsigned: bool,
}

fn peek_base(reader: &TokenReader<'_>) -> Base {
    if reader.peek() == b'0' {
        match reader.peek_at(1) {
            b'b' | b'B' => return Base::Binary,
            b'o' | b'O' => return Base::Octal,
            b'x' | b'X' => return Base::Hex,
            _ => {}
        }
    }
    Base::Decimal
}

/// Parses an optional base prefix (`0b`, `0o`, `0x`), digits with
/// optional `_` separators, and an optional signedness/bit-width suffix
/// (`u8`,…`i64`).
pub fn parse_uint(reader: &mut TokenReader<'_>) -> CastResult<ParsedUint> {
    let base = peek_base(reader);
    if base != Base::Decimal {
        reader.step_n(2);
    }

    let mut value: u64 = 0;
    let mut any_digits = false;

    loop {
        let c = reader.peek();
        if c == b'_' {
            reader.step();
            continue;
        }
        let Some(digit) = base.digit_value(c) else {
            break;
        };
        value = value
            .checked_mul(base.radix() as u64)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or_else(|| CastError::new(is::MALFORMED_NUMBER, "integer literal overflows u64"))?;
        any_digits = true;
        reader.step();
    }

    if !any_digits {
        return Err(CastError::new(
            is::MALFORMED_NUMBER,
            "expected at least one digit in integer literal",
        ));
    }

    let (bit_width, unsigned) = parse_suffix(reader)?;

    Ok(ParsedUint {
        value,
        bit_width,
        unsigned,
    })
}

fn parse_suffix(reader: &mut TokenReader<'_>) -> CastResult<(u8, bool)> {
    let unsigned = match reader.peek() {
        b'u' => true,
        b'i' => false,
        _ => return Ok((32, true)),
    };
    reader.step();

    let mut digits = String::new();
    while reader.peek().is_ascii_digit() {
        digits.push(reader.peek() as char);
        reader.step();
    }

    let bit_width: u8 = digits
        .parse()
        .map_err(|_| CastError::new(is::MALFORMED_NUMBER, "expected bit width after 'u'/'i'"))?;

    if !matches!(bit_width, 8 | 16 | 32 | 64) {
        return Err(CastError::new(
            is::MALFORMED_NUMBER,
            format!("unsupported integer bit width '{bit_width}'"),
        ));
    }

    Ok((bit_width, unsigned))
}

/// Emits `value` in `base` with an underscore inserted every
/// `group_size` digits (counted from the least significant digit),
/// matching the "configurable thousands-like separator position" in
/// `spec.md` §4.B. `group_size = 0` disables grouping.
pub fn print_uint(value: u64, base: Base, group_size: usize, out: &mut String) {
    out.push_str(base.prefix());

    let digits = if value == 0 {
        "0".to_string()
    } else {
        let mut v = value;
        let mut rev = Vec::new();
        while v > 0 {
            let digit = (v % base.radix() as u64) as u32;
            rev.push(std::char::from_digit(digit, base.radix()).unwrap());
            v /= base.radix() as u64;
        }
        rev.reverse();
        rev.into_iter().collect::<String>()
    };

    if group_size == 0 {
        out.push_str(&digits);
        return;
    }

    let bytes = digits.as_bytes();
    let mut grouped = String::new();
    for (i, b) in bytes.iter().enumerate() {
        let remaining = bytes.len() - i;
        if i != 0 && remaining % group_size == 0 {
            grouped.push('_');
        }
        grouped.push(*b as char);
    }
    out.push_str(&grouped);
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
    fn parses_decimal() {
        let mut r = reader("1234");
        assert_eq!(parse_uint(&mut r).unwrap().value, 1234);
    }

    #[test]
    fn parses_hex_with_suffix() {
        let mut r = reader("0xFFu8");
        let parsed = parse_uint(&mut r).unwrap();
        assert_eq!(parsed.value, 255);
        assert_eq!(parsed.bit_width, 8);
        assert!(parsed.unsigned);
    }

    #[test]
    fn parses_with_underscores() {
        let mut r = reader("1_000_000");
        assert_eq!(parse_uint(&mut r).unwrap().value, 1_000_000);
    }

    #[test]
    fn round_trips_for_all_bases() {
        for base in [Base::Binary, Base::Octal, Base::Decimal, Base::Hex] {
            for value in [0u64, 1, 42, 1337, u32::MAX as u64] {
                let mut printed = String::new();
                print_uint(value, base, 0, &mut printed);
                let mut r = reader(Box::leak(printed.into_boxed_str()));
                assert_eq!(parse_uint(&mut r).unwrap().value, value, "base {base:?}");
            }
        }
    }
}
