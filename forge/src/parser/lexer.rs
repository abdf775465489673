//! Tokenizer: turns a `TokenReader` into a flat `Vec<Token>` before the
//! grammar ever sees it (`spec.md` §4.E groups this informally with "the
//! parser"; split out into its own `lexer` module separate from
//! `parser`, minus a `Peekable<Chars>` cursor — this one rides directly
//! on [`crate::source::TokenReader`] so it shares the reader's
//! NUL-terminated-buffer contract).

use crate::diagnostics::codes::is;
use crate::diagnostics::{Message, MessageBuffer, Severity};
use crate::lexcast::{self, CastError, ParsedFloat, ParsedUint};
use crate::location::Range;
use crate::source::TokenReader;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Keyword(&'static str),
    Int(ParsedUint),
    Float(ParsedFloat),
    Char(u32),
    String(Vec<u8>),
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range,
}

const KEYWORDS: &[&str] = &[
    "fn", "return", "if", "else", "while", "struct", "union", "interface", "abstract", "mut",
    "override", "true", "false", "as", "kw", "extends", "const",
];

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn skip_trivia(reader: &mut TokenReader<'_>) {
    loop {
        while reader.peek().is_ascii_whitespace() {
            reader.step();
        }
        if reader.peek() == b'/' && reader.peek_at(1) == b'/' {
            while !reader.is_at_end() && reader.peek() != b'\n' {
                reader.step();
            }
            continue;
        }
        break;
    }
}

fn error_token(start: &Range, err: CastError, buffer: &mut MessageBuffer) {
    buffer.emit(
        Message::new(Severity::Error, err.text)
            .with_code(err.code)
            .with_range(start.clone()),
    );
}

fn range_to(reader: &TokenReader<'_>, start_loc: crate::location::Location) -> Range {
    let end = reader.current_location();
    let length = end.column.saturating_sub(start_loc.column).max(1);
    Range::new(start_loc, length)
}

/// Scans the whole input into tokens, recovering from lexical errors by
/// skipping a single byte and continuing — the same "local
/// synchronization" policy `spec.md` §4.E asks the parser for, applied
/// one layer down.
pub fn tokenize(reader: &mut TokenReader<'_>, buffer: &mut MessageBuffer) -> Vec<Token> {
    let mut tokens = Vec::new();

    loop {
        skip_trivia(reader);
        let start_loc = reader.current_location();

        if reader.is_at_end() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                range: Range::new(start_loc, 0),
            });
            break;
        }

        let c = reader.peek();

        if is_ident_start(c) {
            let mut text = String::new();
            while is_ident_continue(reader.peek()) {
                text.push(reader.peek() as char);
                reader.step();
            }
            let range = range_to(reader, start_loc);
            let kind = match KEYWORDS.iter().find(|k| **k == text) {
                Some(kw) => TokenKind::Keyword(kw),
                None => TokenKind::Identifier(text),
            };
            tokens.push(Token { kind, range });
            continue;
        }

        if c.is_ascii_digit() {
            match lexcast::parse_uint_or_float(reader) {
                Ok(lexcast::UintOrFloat::Uint(value)) => {
                    let range = range_to(reader, start_loc);
                    tokens.push(Token {
                        kind: TokenKind::Int(value),
                        range,
                    });
                }
                Ok(lexcast::UintOrFloat::Float(value)) => {
                    let range = range_to(reader, start_loc);
                    tokens.push(Token {
                        kind: TokenKind::Float(value),
                        range,
                    });
                }
                Err(err) => {
                    let range = range_to(reader, start_loc);
                    error_token(&range, err, buffer);
                    reader.step();
                }
            }
            continue;
        }

        if c == b'\'' {
            match lexcast::parse_char_literal(reader, b'\'') {
                Ok(codepoint) => {
                    let range = range_to(reader, start_loc);
                    tokens.push(Token {
                        kind: TokenKind::Char(codepoint),
                        range,
                    });
                }
                Err(err) => {
                    let range = range_to(reader, start_loc);
                    error_token(&range, err, buffer);
                    reader.step();
                }
            }
            continue;
        }

        if c == b'"' {
            match lexcast::parse_string_literal(reader) {
                Ok(bytes) => {
                    let range = range_to(reader, start_loc);
                    tokens.push(Token {
                        kind: TokenKind::String(bytes),
                        range,
                    });
                }
                Err(err) => {
                    let range = range_to(reader, start_loc);
                    error_token(&range, err, buffer);
                    reader.step();
                }
            }
            continue;
        }

        if let Some(punct) = lex_punct(reader) {
            let range = range_to(reader, start_loc);
            tokens.push(Token {
                kind: TokenKind::Punct(punct),
                range,
            });
            continue;
        }

        buffer.emit(
            Message::new(
                Severity::Error,
                format!("unexpected character '{}'", c as char),
            )
            .with_code(is::UNEXPECTED_TOKEN)
            .with_range(Range::new(start_loc, 1)),
        );
        reader.step();
    }

    tokens
}

const PUNCTUATION_3: &[&str] = &["..."];
const PUNCTUATION_2: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "->",
];
const PUNCTUATION_1: &[&str] = &[
    "{", "}", "(", ")", "[", "]", ",", ";", ":", "?", "~", "&", "*", "+", "-", "/", "%", "!", "=",
    "<", ">", "|", "^", ".",
];

fn lex_punct(reader: &mut TokenReader<'_>) -> Option<&'static str> {
    let three: String = (0..3).map(|i| reader.peek_at(i) as char).collect();
    if let Some(found) = PUNCTUATION_3.iter().find(|p| ***p == *three) {
        reader.step_n(3);
        return Some(found);
    }

    let two: String = (0..2).map(|i| reader.peek_at(i) as char).collect();
    if let Some(found) = PUNCTUATION_2.iter().find(|p| ***p == *two) {
        reader.step_n(2);
        return Some(found);
    }

    let one = reader.peek() as char;
    if let Some(found) = PUNCTUATION_1.iter().find(|p| p.chars().next() == Some(one)) {
        reader.step();
        return Some(found);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn token_kinds(text: &str) -> Vec<TokenKind> {
        let bytes: Vec<u8> = text.bytes().chain([0, 0]).collect();
        let mut reader = TokenReader::new(Arc::from("t.forge"), &bytes);
        let mut buffer = MessageBuffer::new();
        tokenize(&mut reader, &mut buffer)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_keyword_and_identifier() {
        let kinds = token_kinds("fn add");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword("fn"),
                TokenKind::Identifier("add".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_arrow_before_single_dash() {
        let kinds = token_kinds("->");
        assert_eq!(kinds, vec![TokenKind::Punct("->"), TokenKind::Eof]);
    }

    #[test]
    fn skips_line_comments() {
        let kinds = token_kinds("// hello\nfn");
        assert_eq!(kinds, vec![TokenKind::Keyword("fn"), TokenKind::Eof]);
    }

    #[test]
    fn tokenizes_string_literal() {
        let kinds = token_kinds("\"hi\"");
        assert_eq!(kinds, vec![TokenKind::String(b"hi".to_vec()), TokenKind::Eof]);
    }
}
