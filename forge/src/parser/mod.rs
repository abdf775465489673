//! The parser front door (`spec.md` §4.E). Resolves the Open Question
//! that section raised in its own design notes: rather than process-wide
//! mutable globals, a [`ParserContext`] value is built per call and
//! threaded through tokenizing and parsing explicitly, so `parse` is
//! reentrant and thread-safe by construction (`spec.md` §5).

pub mod cursor;
pub mod grammar;
pub mod lexer;

use crate::ast::Node;
use crate::diagnostics::MessageBuffer;
use crate::source::Source;
use cursor::Tokens;

/// Per-call parser state. Currently holds nothing beyond what `parse`
/// needs locally, but exists as the single seam a future setting (e.g.
/// a dialect flag) would hang off of, instead of a process-wide global.
pub struct ParserContext;

impl ParserContext {
    pub fn new() -> Self {
        ParserContext
    }
}

impl Default for ParserContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizes and parses `source`, writing any lexical or syntax
/// diagnostics into `buffer`. Always returns a tree — parse errors
/// degrade individual declarations/statements/types rather than
/// aborting, consistent with the "attempt local synchronization"
/// strategy `spec.md` §4.E calls for.
pub fn parse(source: &Source, buffer: &mut MessageBuffer) -> Node {
    let _context = ParserContext::new();
    let mut reader = source.reader();
    let tokens = lexer::tokenize(&mut reader, buffer);
    let mut cursor = Tokens::new(tokens);
    grammar::parse_program(&mut cursor, buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    #[test]
    fn parses_source_into_declaration_block() {
        let source = Source::from_buffer("t.forge", "x: bool = true;");
        let mut buffer = MessageBuffer::new();
        let ast = parse(&source, &mut buffer);
        assert!(!buffer.had_errors());
        assert!(matches!(ast.kind, NodeKind::DeclarationBlock { .. }));
    }

    #[test]
    fn reports_lexical_error_and_recovers() {
        let source = Source::from_buffer("t.forge", "x: bool = true; @ y: bool = false;");
        let mut buffer = MessageBuffer::new();
        let ast = parse(&source, &mut buffer);
        assert!(buffer.had_errors());
        let NodeKind::DeclarationBlock { children } = ast.kind else {
            panic!("expected declaration-block")
        };
        assert_eq!(children.len(), 2);
    }
}
