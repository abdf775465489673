//! Supported-language-features gate (`spec.md` §4.I.1): rejects
//! constructs the backend does not yet handle. This crate's backend
//! contract (`crate::backend`) has no lowering for unions, interfaces,
//! or keyword arguments, so those are gated here rather than discovered
//! as a codegen panic later.

use crate::ast::{Node, NodeKind};
use crate::diagnostics::codes::es;
use crate::diagnostics::{Message, Severity};

/// Walks `node` (not via the generic visitor — this pass only needs a
/// flat recursive descent, not handler composition) collecting one
/// diagnostic per unsupported construct found.
pub fn check(node: &Node) -> Vec<Message> {
    let mut messages = Vec::new();
    walk(node, &mut messages);
    messages
}

fn reject(messages: &mut Vec<Message>, node: &Node, what: &str) {
    messages.push(
        Message::new(Severity::Error, format!("unsupported feature: {what}"))
            .with_code(es::UNSUPPORTED_FEATURE)
            .with_range(node.source_range.clone()),
    );
}

fn walk(node: &Node, messages: &mut Vec<Message>) {
    use NodeKind::*;
    match &node.kind {
        DeclUnion { .. } => reject(messages, node, "union declarations"),
        DeclInterface { .. } => reject(messages, node, "interface declarations"),
        TypeFunction {
            variadic_keyword: true,
            ..
        } => reject(messages, node, "variadic keyword arguments"),
        ValueCall { keyword_args, .. } if !keyword_args.is_empty() => {
            reject(messages, node, "call-site keyword arguments")
        }
        DeclFunctionArgument { keyword: true, .. } => {
            reject(messages, node, "keyword function arguments")
        }
        _ => {}
    }

    for child in children_of(node) {
        walk(child, messages);
    }
}

/// Recurse-only child enumeration (no ordering guarantees needed here,
/// unlike the visitor's acceptor — this pass reports every violation
/// regardless of traversal order).
fn children_of(node: &Node) -> Vec<&Node> {
    use NodeKind::*;
    match &node.kind {
        TypeVoid | TypeBool | TypeInt { .. } | TypeFloat { .. } | TypeSymbol { .. } => vec![],
        TypePointer { pointee, .. } => vec![pointee],
        TypeArray { element, .. } => vec![element],
        TypeFunction {
            positional_args,
            return_type,
            ..
        } => positional_args.iter().chain([&**return_type]).collect(),

        DeclUnion { properties, .. } | DeclStructure { properties, .. } => properties.iter().collect(),
        DeclProperty { property_type, .. } => vec![property_type],
        DeclInterface { members, .. } => members.iter().collect(),
        DeclFunctionArgument { property, default, .. } => {
            let mut v = vec![&**property];
            v.extend(default.as_deref());
            v
        }
        DeclFunction {
            function_type,
            arguments,
            body,
            ..
        } => [&**function_type]
            .into_iter()
            .chain(arguments)
            .chain([&**body])
            .collect(),
        DeclAssignment { property, value } => vec![property, value],
        DeclarationBlock { children } | StatementBlock { children } => children.iter().collect(),

        StmtReturn { value } => value.as_deref().into_iter().collect(),
        StmtIfConditionalClause { condition, body } => vec![condition, body],
        StmtIf { clauses, else_body } => {
            let mut v: Vec<&Node> = clauses.iter().collect();
            v.extend(else_body.as_deref());
            v
        }
        StmtWhile { condition, body } => vec![condition, body],

        ValueBool { .. } | ValueCharacter { .. } | ValueString { .. } | ValueSymbol { .. } => vec![],
        ValueInt { value_type, .. } | ValueFloat { value_type, .. } => vec![value_type],
        ValueArray { elements } => elements.iter().collect(),
        ValueArrayRepeated { element, .. } => vec![element],
        ValueStructure { fields } => fields.iter().collect(),
        ValueCall {
            callee,
            positional_args,
            keyword_args,
        } => [&**callee]
            .into_iter()
            .chain(positional_args)
            .chain(keyword_args)
            .collect(),
        ValueCallKeywordArgument { value, .. } => vec![value],
        ValueCast { value, target_type } => vec![value, target_type],
        ValueUnary { operand, .. } => vec![operand],
        ValueBinary { left, right, .. } => vec![left, right],
        ValueAccess { object, .. } => vec![object],
        ValueDereference { pointer } => vec![pointer],
        ValueGetAddress { lvalue } => vec![lvalue],
    }
}
