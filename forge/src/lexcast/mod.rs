//! Lexical casts: decoders/encoders for literal forms (`spec.md` §4.B).
//!
//! Decoders consume from a [`TokenReader`](crate::source::TokenReader)
//! and are used by the parser; encoders write into any [`std::fmt::Write`]
//! sink and are used by debug/formatted printers. Printing is symmetrical
//! with parsing so that `parse(print(v)) == v` (`spec.md` §8 "Lexical
//! round-trip").

mod char_lit;
mod float_lit;
mod string_lit;
mod uint_lit;

pub use char_lit::{is_char_printable, parse_char_fragment, parse_char_literal, print_char_literal};
pub use float_lit::{parse_float, print_float, ParsedFloat};
pub use string_lit::{parse_string_literal, print_string_literal};
pub use uint_lit::{parse_uint, print_uint, ParsedUint};

use crate::source::TokenReader;

/// Either numeric literal form a digit run can lex to, disambiguated
/// by lookahead for a fractional point or exponent marker before either
/// decoder consumes anything (the tokenizer needs to pick a `TokenKind`
/// up front; `parse_uint`/`parse_float` each assume their own form).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UintOrFloat {
    Uint(ParsedUint),
    Float(ParsedFloat),
}

/// Disambiguates a digit run as uint-vs-float by peeking past any
/// recognized base prefix (`spec.md` §4.B: floats "support base
/// prefixes consistently with ints") before looking for a fractional
/// point or exponent marker, so e.g. `0x1.8` is seen as a float rather
/// than being routed straight to `parse_uint` on the strength of its
/// `0x` prefix alone.
pub fn parse_uint_or_float(reader: &mut TokenReader<'_>) -> CastResult<UintOrFloat> {
    let snapshot = reader.save();

    let base = if reader.peek() == b'0'
        && matches!(reader.peek_at(1), b'b' | b'B' | b'o' | b'O' | b'x' | b'X')
    {
        let base = match reader.peek_at(1) {
            b'b' | b'B' => Base::Binary,
            b'o' | b'O' => Base::Octal,
            _ => Base::Hex,
        };
        reader.step_n(2);
        base
    } else {
        Base::Decimal
    };

    while base.digit_value(reader.peek()).is_some() || reader.peek() == b'_' {
        reader.step();
    }

    // Hex digits include 'e'/'E' as ordinary digit values, so the
    // exponent marker for a hex float is 'p'/'P' instead.
    let is_exponent_marker = if base == Base::Hex {
        matches!(reader.peek(), b'p' | b'P')
    } else {
        matches!(reader.peek(), b'e' | b'E')
    };
    let is_float = (reader.peek() == b'.' && reader.peek_at(1) != b'.') || is_exponent_marker;
    reader.restore(snapshot);

    if is_float {
        parse_float(reader).map(UintOrFloat::Float)
    } else {
        parse_uint(reader).map(UintOrFloat::Uint)
    }
}

/// A decoding failure, carrying the diagnostic code and message text the
/// caller should attach to a [`crate::diagnostics::Message`] at the
/// reader's current range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastError {
    pub code: &'static str,
    pub text: String,
}

impl CastError {
    pub fn new(code: &'static str, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }
}

pub type CastResult<T> = Result<T, CastError>;

/// Numeric literal base, restricted to the four forge accepts
/// (`spec.md` §3 AST invariants: "for literal base, ∈ {2,8,10,16}").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Binary = 2,
    Octal = 8,
    Decimal = 10,
    Hex = 16,
}

impl Base {
    pub fn radix(self) -> u32 {
        self as u32
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Base::Binary => "0b",
            Base::Octal => "0o",
            Base::Decimal => "",
            Base::Hex => "0x",
        }
    }

    fn digit_value(self, c: u8) -> Option<u32> {
        let value = match c {
            b'0'..=b'9' => (c - b'0') as u32,
            b'a'..=b'f' => (c - b'a') as u32 + 10,
            b'A'..=b'F' => (c - b'A') as u32 + 10,
            _ => return None,
        };
        if value < self.radix() {
            Some(value)
        } else {
            None
        }
    }
}
