//! Recursive-descent grammar productions over the token cursor
//! (`spec.md` §4.E). Declarations, types, statements and expressions
//! each get their own entry point; `parse_expression` climbs precedence
//! using [`BinaryOperator::precedence`](crate::ast::operators::BinaryOperator::precedence)
//! rather than hand-written per-level functions, since the operator set
//! already carries that table.

use super::cursor::Tokens;
use super::lexer::TokenKind;
use crate::ast::operators::{BinaryOperator, UnaryOperator};
use crate::ast::{Node, NodeKind};
use crate::diagnostics::codes::is;
use crate::diagnostics::{Message, MessageBuffer, Severity};
use crate::location::Range;

fn error(tokens: &Tokens, buffer: &mut MessageBuffer, text: impl Into<String>) {
    buffer.emit(
        Message::new(Severity::Error, text)
            .with_code(is::UNEXPECTED_TOKEN)
            .with_range(tokens.peek_range()),
    );
}

fn expect_punct(tokens: &mut Tokens, buffer: &mut MessageBuffer, punct: &str) -> bool {
    if tokens.eat_punct(punct) {
        true
    } else {
        error(tokens, buffer, format!("expected '{punct}'"));
        false
    }
}

fn expect_keyword(tokens: &mut Tokens, buffer: &mut MessageBuffer, keyword: &str) -> bool {
    if tokens.eat_keyword(keyword) {
        true
    } else {
        error(tokens, buffer, format!("expected '{keyword}'"));
        false
    }
}

fn expect_identifier(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Option<String> {
    if let TokenKind::Identifier(name) = tokens.peek().clone() {
        tokens.bump();
        Some(name)
    } else {
        error(tokens, buffer, "expected an identifier");
        None
    }
}

/// Parses a whole program: a sequence of top-level declarations
/// wrapped in a `declaration-block` (`spec.md` §3 "the root node").
pub fn parse_program(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Node {
    let start = tokens.peek_range();
    let mut children = Vec::new();
    while !tokens.is_eof() {
        match parse_declaration(tokens, buffer) {
            Some(node) => children.push(node),
            None => tokens.synchronize(),
        }
    }
    Node::new(NodeKind::DeclarationBlock { children }, start)
}

fn parse_properties_block(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Vec<Node> {
    expect_punct(tokens, buffer, "{");
    let mut properties = Vec::new();
    while !tokens.at_punct("}") && !tokens.is_eof() {
        properties.push(parse_property(tokens, buffer));
        expect_punct(tokens, buffer, ";");
    }
    expect_punct(tokens, buffer, "}");
    properties
}

fn parse_property(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Node {
    let start = tokens.peek_range();
    let spread = tokens.eat_punct("...");
    let name = expect_identifier(tokens, buffer).unwrap_or_default();
    let optional = tokens.eat_punct("?");
    expect_punct(tokens, buffer, ":");
    let property_type = parse_type(tokens, buffer);
    Node::new(
        NodeKind::DeclProperty {
            optional,
            spread,
            name,
            property_type: Box::new(property_type),
        },
        start,
    )
}

pub fn parse_declaration(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Option<Node> {
    let start = tokens.peek_range();

    if tokens.eat_keyword("struct") {
        let name = expect_identifier(tokens, buffer)?;
        let properties = parse_properties_block(tokens, buffer);
        return Some(Node::new(
            NodeKind::DeclStructure { name, properties },
            start,
        ));
    }

    if tokens.eat_keyword("union") {
        let name = expect_identifier(tokens, buffer)?;
        let properties = parse_properties_block(tokens, buffer);
        return Some(Node::new(NodeKind::DeclUnion { name, properties }, start));
    }

    if tokens.at_keyword("abstract") || tokens.at_keyword("interface") {
        let abstract_ = tokens.eat_keyword("abstract");
        expect_keyword(tokens, buffer, "interface");
        let name = expect_identifier(tokens, buffer)?;
        let mut extends = Vec::new();
        if tokens.eat_punct(":") {
            loop {
                extends.push(expect_identifier(tokens, buffer)?);
                if !tokens.eat_punct(",") {
                    break;
                }
            }
        }
        let members = parse_properties_block(tokens, buffer);
        return Some(Node::new(
            NodeKind::DeclInterface {
                abstract_,
                name,
                extends,
                members,
            },
            start,
        ));
    }

    if tokens.at_keyword("mut") || tokens.at_keyword("override") || tokens.at_keyword("fn") {
        let mutable = tokens.eat_keyword("mut");
        let override_ = tokens.eat_keyword("override");
        expect_keyword(tokens, buffer, "fn");
        let name = expect_identifier(tokens, buffer)?;
        expect_punct(tokens, buffer, "(");
        let mut arguments = Vec::new();
        let mut positional_args = Vec::new();
        let mut variadic_positional = false;
        let mut variadic_keyword = false;
        while !tokens.at_punct(")") && !tokens.is_eof() {
            if tokens.eat_punct("...") {
                variadic_positional = true;
            } else {
                let arg_start = tokens.peek_range();
                let keyword = tokens.eat_keyword("kw");
                let property = parse_property(tokens, buffer);
                if keyword {
                    variadic_keyword = true;
                } else {
                    positional_args.push(property.clone());
                }
                let default = if tokens.eat_punct("=") {
                    Some(Box::new(parse_expression(tokens, buffer, 0)))
                } else {
                    None
                };
                arguments.push(Node::new(
                    NodeKind::DeclFunctionArgument {
                        keyword,
                        property: Box::new(property),
                        default,
                    },
                    arg_start,
                ));
            }
            if !tokens.eat_punct(",") {
                break;
            }
        }
        expect_punct(tokens, buffer, ")");
        expect_punct(tokens, buffer, "->");
        let return_type = parse_type(tokens, buffer);
        let function_type = Node::new(
            NodeKind::TypeFunction {
                positional_args,
                variadic_positional,
                variadic_keyword,
                return_type: Box::new(return_type),
            },
            start.clone(),
        );
        let body = parse_statement_block(tokens, buffer);
        return Some(Node::new(
            NodeKind::DeclFunction {
                mutable,
                override_,
                name,
                function_type: Box::new(function_type),
                arguments,
                body: Box::new(body),
            },
            start,
        ));
    }

    parse_assignment_declaration(tokens, buffer)
}

fn parse_assignment_declaration(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Option<Node> {
    let start = tokens.peek_range();
    let name = expect_identifier(tokens, buffer)?;
    expect_punct(tokens, buffer, ":");
    let property_type = parse_type(tokens, buffer);
    let property = Node::new(
        NodeKind::DeclProperty {
            optional: false,
            spread: false,
            name,
            property_type: Box::new(property_type),
        },
        start.clone(),
    );
    expect_punct(tokens, buffer, "=");
    let value = parse_expression(tokens, buffer, 0);
    expect_punct(tokens, buffer, ";");
    Some(Node::new(
        NodeKind::DeclAssignment {
            property: Box::new(property),
            value: Box::new(value),
        },
        start,
    ))
}

pub fn parse_type(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Node {
    let start = tokens.peek_range();

    if let TokenKind::Identifier(name) = tokens.peek().clone() {
        match name.as_str() {
            "void" => {
                tokens.bump();
                return Node::new(NodeKind::TypeVoid, start);
            }
            "bool" => {
                tokens.bump();
                return Node::new(NodeKind::TypeBool, start);
            }
            _ => {}
        }
        if let Some(node) = parse_numeric_type_name(&name) {
            tokens.bump();
            return Node::new(node, start);
        }
        if let Some(node) = parse_float_type_name(&name) {
            tokens.bump();
            return Node::new(node, start);
        }
        tokens.bump();
        return Node::new(NodeKind::TypeSymbol { name }, start);
    }

    if tokens.at_punct("*") || tokens.at_punct("&") {
        let implicit_dereference = tokens.eat_punct("&");
        if !implicit_dereference {
            tokens.eat_punct("*");
        }
        let constant = tokens.eat_keyword("const");
        let pointee = parse_type(tokens, buffer);
        return Node::new(
            NodeKind::TypePointer {
                constant,
                implicit_dereference,
                pointee: Box::new(pointee),
            },
            start,
        );
    }

    if tokens.eat_punct("[") {
        let length = match tokens.peek().clone() {
            TokenKind::Int(value) => {
                tokens.bump();
                value.value
            }
            _ => {
                error(tokens, buffer, "expected an array length");
                0
            }
        };
        expect_punct(tokens, buffer, "]");
        let element = parse_type(tokens, buffer);
        return Node::new(
            NodeKind::TypeArray {
                length,
                element: Box::new(element),
            },
            start,
        );
    }

    if tokens.eat_keyword("fn") {
        expect_punct(tokens, buffer, "(");
        let mut positional_args = Vec::new();
        let mut variadic_positional = false;
        let mut variadic_keyword = false;
        while !tokens.at_punct(")") && !tokens.is_eof() {
            if tokens.eat_punct("...") {
                if tokens.eat_punct("*") {
                    variadic_keyword = true;
                } else {
                    variadic_positional = true;
                }
            } else {
                positional_args.push(parse_type(tokens, buffer));
            }
            if !tokens.eat_punct(",") {
                break;
            }
        }
        expect_punct(tokens, buffer, ")");
        expect_punct(tokens, buffer, "->");
        let return_type = parse_type(tokens, buffer);
        return Node::new(
            NodeKind::TypeFunction {
                positional_args,
                variadic_positional,
                variadic_keyword,
                return_type: Box::new(return_type),
            },
            start,
        );
    }

    error(tokens, buffer, "expected a type");
    tokens.bump();
    Node::new(NodeKind::TypeVoid, start)
}

fn parse_numeric_type_name(name: &str) -> Option<NodeKind> {
    let (unsigned, rest) = match name.strip_prefix('u') {
        Some(rest) => (true, rest),
        None => (false, name.strip_prefix('i')?),
    };
    let bit_width: u8 = rest.parse().ok()?;
    Some(NodeKind::TypeInt { bit_width, unsigned })
}

fn parse_float_type_name(name: &str) -> Option<NodeKind> {
    let rest = name.strip_prefix('f')?;
    let bit_width: u8 = rest.parse().ok()?;
    Some(NodeKind::TypeFloat { bit_width })
}

pub fn parse_statement_block(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Node {
    let start = tokens.peek_range();
    expect_punct(tokens, buffer, "{");
    let mut children = Vec::new();
    while !tokens.at_punct("}") && !tokens.is_eof() {
        match parse_statement(tokens, buffer) {
            Some(node) => children.push(node),
            None => tokens.synchronize(),
        }
    }
    expect_punct(tokens, buffer, "}");
    Node::new(NodeKind::StatementBlock { children }, start)
}

pub fn parse_statement(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Option<Node> {
    let start = tokens.peek_range();

    if tokens.eat_keyword("return") {
        let value = if tokens.at_punct(";") {
            None
        } else {
            Some(Box::new(parse_expression(tokens, buffer, 0)))
        };
        expect_punct(tokens, buffer, ";");
        return Some(Node::new(NodeKind::StmtReturn { value }, start));
    }

    if tokens.at_keyword("if") {
        let mut clauses = Vec::new();
        loop {
            let clause_start = tokens.peek_range();
            expect_keyword(tokens, buffer, "if");
            expect_punct(tokens, buffer, "(");
            let condition = parse_expression(tokens, buffer, 0);
            expect_punct(tokens, buffer, ")");
            let body = parse_statement_block(tokens, buffer);
            clauses.push(Node::new(
                NodeKind::StmtIfConditionalClause {
                    condition: Box::new(condition),
                    body: Box::new(body),
                },
                clause_start,
            ));

            if tokens.eat_keyword("else") {
                if tokens.at_keyword("if") {
                    continue;
                }
                let else_body = parse_statement_block(tokens, buffer);
                return Some(Node::new(
                    NodeKind::StmtIf {
                        clauses,
                        else_body: Some(Box::new(else_body)),
                    },
                    start,
                ));
            }
            break;
        }
        return Some(Node::new(
            NodeKind::StmtIf {
                clauses,
                else_body: None,
            },
            start,
        ));
    }

    if tokens.eat_keyword("while") {
        expect_punct(tokens, buffer, "(");
        let condition = parse_expression(tokens, buffer, 0);
        expect_punct(tokens, buffer, ")");
        let body = parse_statement_block(tokens, buffer);
        return Some(Node::new(
            NodeKind::StmtWhile {
                condition: Box::new(condition),
                body: Box::new(body),
            },
            start,
        ));
    }

    if tokens.at_punct("{") {
        return Some(parse_statement_block(tokens, buffer));
    }

    // `name : type = expr;` is a new-binding declaration; anything else
    // starting with an identifier is a bare expression-statement (e.g. a
    // call). Two tokens of lookahead distinguish them without a cursor
    // save/restore, since a property name is always a bare identifier.
    if matches!(tokens.peek(), TokenKind::Identifier(_)) && looks_like_declaration(tokens) {
        return parse_assignment_declaration(tokens, buffer);
    }

    let value = parse_expression(tokens, buffer, 0);
    expect_punct(tokens, buffer, ";");
    Some(value)
}

/// Peeks one token ahead for `identifier ':'` without consuming.
fn looks_like_declaration(tokens: &Tokens) -> bool {
    matches!(tokens.peek_nth(1), TokenKind::Punct(":"))
}

pub fn parse_expression(tokens: &mut Tokens, buffer: &mut MessageBuffer, min_precedence: u8) -> Node {
    let mut left = parse_unary(tokens, buffer);

    loop {
        let Some(operator) = peek_binary_operator(tokens) else {
            break;
        };
        let precedence = operator.precedence();
        if precedence < min_precedence {
            break;
        }
        tokens.bump();
        let right = parse_expression(tokens, buffer, precedence + 1);
        let start = left.source_range.span(&right.source_range);
        left = Node::new(
            NodeKind::ValueBinary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            start,
        );
    }

    left
}

fn peek_binary_operator(tokens: &Tokens) -> Option<BinaryOperator> {
    let TokenKind::Punct(punct) = tokens.peek() else {
        return None;
    };
    BinaryOperator::from_symbol(punct)
}

fn parse_unary(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Node {
    let start = tokens.peek_range();

    if tokens.eat_punct("-") {
        let operand = parse_unary(tokens, buffer);
        return Node::new(
            NodeKind::ValueUnary {
                operator: UnaryOperator::Negate,
                operand: Box::new(operand),
            },
            start,
        );
    }
    if tokens.eat_punct("!") {
        let operand = parse_unary(tokens, buffer);
        return Node::new(
            NodeKind::ValueUnary {
                operator: UnaryOperator::LogicalNot,
                operand: Box::new(operand),
            },
            start,
        );
    }
    if tokens.eat_punct("~") {
        let operand = parse_unary(tokens, buffer);
        return Node::new(
            NodeKind::ValueUnary {
                operator: UnaryOperator::BitwiseNot,
                operand: Box::new(operand),
            },
            start,
        );
    }
    if tokens.eat_punct("*") {
        let pointer = parse_unary(tokens, buffer);
        return Node::new(
            NodeKind::ValueDereference {
                pointer: Box::new(pointer),
            },
            start,
        );
    }
    if tokens.eat_punct("&") {
        let lvalue = parse_unary(tokens, buffer);
        return Node::new(
            NodeKind::ValueGetAddress {
                lvalue: Box::new(lvalue),
            },
            start,
        );
    }

    parse_postfix(tokens, buffer)
}

fn parse_postfix(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Node {
    let mut node = parse_primary(tokens, buffer);

    loop {
        let start = node.source_range.clone();
        if tokens.eat_punct(".") {
            let member = expect_identifier(tokens, buffer).unwrap_or_default();
            node = Node::new(
                NodeKind::ValueAccess {
                    object: Box::new(node),
                    member,
                },
                start,
            );
            continue;
        }

        if tokens.eat_punct("(") {
            let mut positional_args = Vec::new();
            let mut keyword_args = Vec::new();
            while !tokens.at_punct(")") && !tokens.is_eof() {
                if tokens.eat_punct("~") {
                    let arg_start = tokens.peek_range();
                    let name = expect_identifier(tokens, buffer).unwrap_or_default();
                    expect_punct(tokens, buffer, ":");
                    let value = parse_expression(tokens, buffer, 0);
                    keyword_args.push(Node::new(
                        NodeKind::ValueCallKeywordArgument {
                            name,
                            value: Box::new(value),
                        },
                        arg_start,
                    ));
                } else {
                    positional_args.push(parse_expression(tokens, buffer, 0));
                }
                if !tokens.eat_punct(",") {
                    break;
                }
            }
            expect_punct(tokens, buffer, ")");
            node = Node::new(
                NodeKind::ValueCall {
                    callee: Box::new(node),
                    positional_args,
                    keyword_args,
                },
                start,
            );
            continue;
        }

        if tokens.eat_keyword("as") {
            let target_type = parse_type(tokens, buffer);
            node = Node::new(
                NodeKind::ValueCast {
                    value: Box::new(node),
                    target_type: Box::new(target_type),
                },
                start,
            );
            continue;
        }

        break;
    }

    node
}

fn parse_primary(tokens: &mut Tokens, buffer: &mut MessageBuffer) -> Node {
    let start = tokens.peek_range();

    match tokens.peek().clone() {
        TokenKind::Keyword("true") => {
            tokens.bump();
            Node::new(NodeKind::ValueBool { value: true }, start)
        }
        TokenKind::Keyword("false") => {
            tokens.bump();
            Node::new(NodeKind::ValueBool { value: false }, start)
        }
        TokenKind::Int(parsed) => {
            tokens.bump();
            let value_type = Node::new(
                NodeKind::TypeInt {
                    bit_width: parsed.bit_width,
                    unsigned: parsed.unsigned,
                },
                start.clone(),
            );
            Node::new(
                NodeKind::ValueInt {
                    value: parsed.value,
                    value_type: Box::new(value_type),
                },
                start,
            )
        }
        TokenKind::Float(parsed) => {
            tokens.bump();
            let value_type = Node::new(NodeKind::TypeFloat { bit_width: parsed.bit_width }, start.clone());
            Node::new(
                NodeKind::ValueFloat {
                    value: parsed.value,
                    value_type: Box::new(value_type),
                },
                start,
            )
        }
        TokenKind::Char(codepoint) => {
            tokens.bump();
            Node::new(NodeKind::ValueCharacter { codepoint }, start)
        }
        TokenKind::String(bytes) => {
            tokens.bump();
            Node::new(NodeKind::ValueString { bytes }, start)
        }
        TokenKind::Identifier(name) => {
            tokens.bump();
            Node::new(NodeKind::ValueSymbol { name }, start)
        }
        TokenKind::Punct("(") => {
            tokens.bump();
            let inner = parse_expression(tokens, buffer, 0);
            expect_punct(tokens, buffer, ")");
            inner
        }
        TokenKind::Punct("[") => parse_array_literal(tokens, buffer, start),
        TokenKind::Punct("{") => parse_struct_literal(tokens, buffer, start),
        _ => {
            error(tokens, buffer, "expected an expression");
            tokens.bump();
            Node::new(NodeKind::ValueBool { value: false }, start)
        }
    }
}

fn parse_array_literal(tokens: &mut Tokens, buffer: &mut MessageBuffer, start: Range) -> Node {
    expect_punct(tokens, buffer, "[");
    if tokens.at_punct("]") {
        tokens.bump();
        return Node::new(NodeKind::ValueArray { elements: vec![] }, start);
    }

    let first = parse_expression(tokens, buffer, 0);
    if tokens.eat_punct(";") {
        let count = match tokens.peek().clone() {
            TokenKind::Int(value) => {
                tokens.bump();
                value.value
            }
            _ => {
                error(tokens, buffer, "expected a repeat count");
                0
            }
        };
        expect_punct(tokens, buffer, "]");
        return Node::new(
            NodeKind::ValueArrayRepeated {
                element: Box::new(first),
                count,
            },
            start,
        );
    }

    let mut elements = vec![first];
    while tokens.eat_punct(",") {
        if tokens.at_punct("]") {
            break;
        }
        elements.push(parse_expression(tokens, buffer, 0));
    }
    expect_punct(tokens, buffer, "]");
    Node::new(NodeKind::ValueArray { elements }, start)
}

fn parse_struct_literal(tokens: &mut Tokens, buffer: &mut MessageBuffer, start: Range) -> Node {
    expect_punct(tokens, buffer, "{");
    let mut fields = Vec::new();
    while !tokens.at_punct("}") && !tokens.is_eof() {
        fields.push(parse_expression(tokens, buffer, 0));
        if !tokens.eat_punct(",") {
            break;
        }
    }
    expect_punct(tokens, buffer, "}");
    Node::new(NodeKind::ValueStructure { fields }, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TokenReader;
    use std::sync::Arc;

    fn parse(text: &str) -> (Node, MessageBuffer) {
        let bytes: Vec<u8> = text.bytes().chain([0, 0]).collect();
        let mut reader = TokenReader::new(Arc::from("t.forge"), &bytes);
        let mut buffer = MessageBuffer::new();
        let raw_tokens = super::super::lexer::tokenize(&mut reader, &mut buffer);
        let mut tokens = Tokens::new(raw_tokens);
        (parse_program(&mut tokens, &mut buffer), buffer)
    }

    #[test]
    fn parses_empty_program() {
        let (ast, buffer) = parse("");
        assert!(!buffer.had_errors());
        match ast.kind {
            NodeKind::DeclarationBlock { children } => assert!(children.is_empty()),
            _ => panic!("expected declaration-block"),
        }
    }

    #[test]
    fn parses_assignment_declaration() {
        let (ast, buffer) = parse("x: bool = true;");
        assert!(!buffer.had_errors());
        match ast.kind {
            NodeKind::DeclarationBlock { children } => {
                assert_eq!(children.len(), 1);
                assert!(matches!(children[0].kind, NodeKind::DeclAssignment { .. }));
            }
            _ => panic!("expected declaration-block"),
        }
    }

    #[test]
    fn parses_function_with_return() {
        let (ast, buffer) = parse("fn add(a: i32, b: i32) -> i32 { return a + b; }");
        assert!(!buffer.had_errors());
        match ast.kind {
            NodeKind::DeclarationBlock { children } => {
                assert_eq!(children.len(), 1);
                match &children[0].kind {
                    NodeKind::DeclFunction { name, arguments, .. } => {
                        assert_eq!(name, "add");
                        assert_eq!(arguments.len(), 2);
                    }
                    _ => panic!("expected decl-function"),
                }
            }
            _ => panic!("expected declaration-block"),
        }
    }

    #[test]
    fn binary_precedence_groups_multiply_before_add() {
        let (ast, buffer) = parse("x: i32 = 1 + 2 * 3;");
        assert!(!buffer.had_errors());
        let NodeKind::DeclarationBlock { children } = ast.kind else {
            panic!("expected declaration-block")
        };
        let NodeKind::DeclAssignment { value, .. } = &children[0].kind else {
            panic!("expected decl-assignment")
        };
        match &value.kind {
            NodeKind::ValueBinary { operator, right, .. } => {
                assert_eq!(*operator, BinaryOperator::Add);
                assert!(matches!(right.kind, NodeKind::ValueBinary { operator: BinaryOperator::Multiply, .. }));
            }
            _ => panic!("expected value-binary"),
        }
    }
}
