//! Float literals (`spec.md` §4.B).

use super::{Base, CastError, CastResult};
use crate::diagnostics::codes::is;
use crate::source::TokenReader;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedFloat {
    pub value: f64,
    pub bit_width: u8,
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

/// Parses a mantissa with optional fractional part, optional exponent,
/// and optional `f32`/`f64` suffix. An optional base prefix (`0b`,
/// `0o`, `0x`) is recognized consistently with [`super::parse_uint`]
/// (`spec.md` §4.B); prefixed mantissas are read digit-by-digit in
/// that base rather than through the decimal fast path, since the
/// standard library has no notion of a hex/octal/binary float literal.
pub fn parse_float(reader: &mut TokenReader<'_>) -> CastResult<ParsedFloat> {
    if peek_base(reader) != Base::Decimal {
        return parse_prefixed_float(reader);
    }
    parse_decimal_float(reader)
}

fn parse_prefixed_float(reader: &mut TokenReader<'_>) -> CastResult<ParsedFloat> {
    let start = reader.save();
    let base = peek_base(reader);
    reader.step_n(2);

    let mut mantissa: f64 = 0.0;
    let mut saw_digit = false;
    while let Some(digit) = base.digit_value(reader.peek()) {
        mantissa = mantissa * base.radix() as f64 + digit as f64;
        reader.step();
        saw_digit = true;
    }

    if reader.peek() == b'.' {
        reader.step();
        let mut scale = 1.0 / base.radix() as f64;
        while let Some(digit) = base.digit_value(reader.peek()) {
            mantissa += digit as f64 * scale;
            scale /= base.radix() as f64;
            reader.step();
            saw_digit = true;
        }
    }

    if !saw_digit {
        reader.restore(start);
        return Err(CastError::new(
            is::MALFORMED_NUMBER,
            "expected at least one digit in float literal",
        ));
    }

    // A hex float's binary exponent marker is 'p'/'P' ('e' is itself a
    // valid hex digit, so it can't double as the marker here).
    let mut exponent: i32 = 0;
    if matches!(reader.peek(), b'p' | b'P') {
        reader.step();
        let exp_negative = reader.peek() == b'-';
        if matches!(reader.peek(), b'+' | b'-') {
            reader.step();
        }
        let mut exp_value: i32 = 0;
        let mut saw_exp_digit = false;
        while reader.peek().is_ascii_digit() {
            exp_value = exp_value * 10 + (reader.peek() - b'0') as i32;
            reader.step();
            saw_exp_digit = true;
        }
        if !saw_exp_digit {
            return Err(CastError::new(
                is::MALFORMED_NUMBER,
                "expected digits after exponent marker",
            ));
        }
        exponent = if exp_negative { -exp_value } else { exp_value };
    }

    let value = mantissa * 2f64.powi(exponent);

    let bit_width = match (reader.peek(), reader.peek_at(1), reader.peek_at(2)) {
        (b'f', b'3', b'2') => {
            reader.step_n(3);
            32
        }
        (b'f', b'6', b'4') => {
            reader.step_n(3);
            64
        }
        _ => 64,
    };

    Ok(ParsedFloat { value, bit_width })
}

fn parse_decimal_float(reader: &mut TokenReader<'_>) -> CastResult<ParsedFloat> {
    let start = reader.save();
    let mut text = String::new();

    if reader.peek() == b'-' {
        text.push('-');
        reader.step();
    }

    let mut saw_digit = false;
    while reader.peek().is_ascii_digit() {
        text.push(reader.peek() as char);
        reader.step();
        saw_digit = true;
    }

    if reader.peek() == b'.' {
        text.push('.');
        reader.step();
        while reader.peek().is_ascii_digit() {
            text.push(reader.peek() as char);
            reader.step();
            saw_digit = true;
        }
    }

    if !saw_digit {
        reader.restore(start);
        return Err(CastError::new(
            is::MALFORMED_NUMBER,
            "expected at least one digit in float literal",
        ));
    }

    if matches!(reader.peek(), b'e' | b'E') {
        text.push('e');
        reader.step();
        if matches!(reader.peek(), b'+' | b'-') {
            text.push(reader.peek() as char);
            reader.step();
        }
        let mut saw_exp_digit = false;
        while reader.peek().is_ascii_digit() {
            text.push(reader.peek() as char);
            reader.step();
            saw_exp_digit = true;
        }
        if !saw_exp_digit {
            return Err(CastError::new(
                is::MALFORMED_NUMBER,
                "expected digits after exponent marker",
            ));
        }
    }

    let bit_width = match (reader.peek(), reader.peek_at(1), reader.peek_at(2)) {
        (b'f', b'3', b'2') => {
            reader.step_n(3);
            32
        }
        (b'f', b'6', b'4') => {
            reader.step_n(3);
            64
        }
        _ => 64,
    };

    let value: f64 = text
        .parse()
        .map_err(|_| CastError::new(is::MALFORMED_NUMBER, "malformed float literal"))?;

    Ok(ParsedFloat { value, bit_width })
}

pub fn print_float(value: f64, bit_width: u8, out: &mut String) {
    if value.fract() == 0.0 && value.is_finite() {
        out.push_str(&format!("{value:.1}"));
    } else {
        out.push_str(&format!("{value}"));
    }
    match bit_width {
        32 => out.push_str("f32"),
        64 => {}
        _ => unreachable!("float bit width must be 32 or 64"),
    }
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
    fn parses_plain_float() {
        let mut r = reader("3.14");
        let parsed = parse_float(&mut r).unwrap();
        assert_eq!(parsed.value, 3.14);
        assert_eq!(parsed.bit_width, 64);
    }

    #[test]
    fn parses_exponent_and_suffix() {
        let mut r = reader("1.5e2f32");
        let parsed = parse_float(&mut r).unwrap();
        assert_eq!(parsed.value, 150.0);
        assert_eq!(parsed.bit_width, 32);
    }

    #[test]
    fn round_trips_normal_finite_values() {
        for value in [0.0f64, 1.0, -2.5, 1234.5] {
            let mut printed = String::new();
            print_float(value, 64, &mut printed);
            let mut r = reader(Box::leak(printed.into_boxed_str()));
            assert_eq!(parse_float(&mut r).unwrap().value, value);
        }
    }

    #[test]
    fn parses_hex_prefixed_mantissa() {
        let mut r = reader("0x1.8");
        assert_eq!(parse_float(&mut r).unwrap().value, 1.5);
    }

    #[test]
    fn parses_hex_prefixed_mantissa_with_binary_exponent() {
        let mut r = reader("0x1p3");
        assert_eq!(parse_float(&mut r).unwrap().value, 8.0);
    }

    #[test]
    fn parses_binary_and_octal_prefixed_mantissas() {
        let mut r = reader("0b1.1");
        assert_eq!(parse_float(&mut r).unwrap().value, 1.5);
        let mut r = reader("0o1.4");
        assert_eq!(parse_float(&mut r).unwrap().value, 1.5);
    }

    #[test]
    fn uint_or_float_routes_hex_prefixed_float_to_the_float_decoder() {
        let mut r = reader("0x1.8");
        match super::super::parse_uint_or_float(&mut r).unwrap() {
            super::super::UintOrFloat::Float(parsed) => assert_eq!(parsed.value, 1.5),
            super::super::UintOrFloat::Uint(_) => panic!("expected a float"),
        }
    }
}
