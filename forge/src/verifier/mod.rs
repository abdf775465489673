//! The verifier: cooperating visitor handlers sharing a
//! `{message_buffer, scope}` context (`spec.md` §4.I).
//!
//! Composed in order: the supported-features gate (flat recursive
//! descent, §4.I.1), then a single visitor pass that does scope
//! construction (§4.I.2), type resolution (§4.I.3) and return-type
//! checking (§4.I.4) together, since scope frames must be live while
//! resolving and checking types.

mod features;
pub mod type_resolve;

use crate::ast::{Node, NodeKind};
use crate::diagnostics::codes::{es, et};
use crate::diagnostics::{Message, MessageBuffer, Severity};
use crate::scope::Scope;
use crate::visitor::{Handler, Visitor, VisitorStatus};
use std::cell::RefCell;
use std::rc::Rc;

/// Runs the full verifier over `ast`, writing diagnostics into `buffer`.
/// Returns the visitor's completion status: `Ok` on a normal traversal,
/// `Stop` if a handler halted early. A top-level `Skip` is itself
/// unexpected and is reported as an internal diagnostic (`spec.md`
/// §4.I "SKIP at the top-level is unexpected and itself an error").
pub fn verify(ast: &mut Node, buffer: &mut MessageBuffer) -> VisitorStatus {
    for message in features::check(ast) {
        buffer.emit(message);
    }

    let scope = Rc::new(RefCell::new(Scope::new()));
    let return_type_stack: Rc<RefCell<Vec<Node>>> = Rc::new(RefCell::new(Vec::new()));
    let buffer_cell = Rc::new(RefCell::new(std::mem::take(buffer)));

    let mut visitor = Visitor::new();
    register_scope_handlers(&mut visitor, Rc::clone(&scope), Rc::clone(&buffer_cell));
    register_return_type_handlers(
        &mut visitor,
        Rc::clone(&return_type_stack),
        Rc::clone(&scope),
        Rc::clone(&buffer_cell),
    );

    scope.borrow_mut().push_frame();
    let mut parents = Vec::new();
    let status = visitor.accept(ast, &mut parents);
    scope.borrow_mut().pop_frame();

    *buffer = Rc::try_unwrap(buffer_cell)
        .expect("no visitor handler outlives verify()")
        .into_inner();

    if status == VisitorStatus::Skip {
        buffer.emit(Message::new(
            Severity::Internal,
            "verifier traversal returned SKIP at the top level",
        ));
        return VisitorStatus::Ok;
    }

    status
}

fn register_scope_handlers(
    visitor: &mut Visitor<'_>,
    scope: Rc<RefCell<Scope>>,
    buffer: Rc<RefCell<MessageBuffer>>,
) {
    for kind_name in ["declaration-block", "statement-block"] {
        let scope_enter = Rc::clone(&scope);
        let buffer_enter = Rc::clone(&buffer);
        let scope_leave = Rc::clone(&scope);
        visitor.on(
            kind_name,
            Handler {
                on_enter: Some(Box::new(move |node, _parents| {
                    scope_enter.borrow_mut().push_frame();
                    let children = match &node.kind {
                        NodeKind::DeclarationBlock { children }
                        | NodeKind::StatementBlock { children } => children.clone(),
                        _ => Vec::new(),
                    };
                    let duplicates = scope_enter.borrow_mut().load_declarable_children(&children);
                    for dup in duplicates {
                        buffer_enter.borrow_mut().emit(
                            Message::new(
                                Severity::Error,
                                format!("duplicate declaration '{}' in this scope", dup.name),
                            )
                            .with_code(es::DUPLICATE_DECLARATION),
                        );
                    }
                    VisitorStatus::Ok
                })),
                on_leave: Some(Box::new(move |_node, _parents| {
                    // Unwinds even if an inner handler returned STOP,
                    // because `accept` always runs `on_leave` for nodes
                    // it has already entered (`spec.md` §5 "the verifier
                    // MUST unwind scope frames" on early exit).
                    scope_leave.borrow_mut().pop_frame();
                    VisitorStatus::Ok
                })),
            },
        );
    }
}

fn register_return_type_handlers(
    visitor: &mut Visitor<'_>,
    return_types: Rc<RefCell<Vec<Node>>>,
    scope: Rc<RefCell<Scope>>,
    buffer: Rc<RefCell<MessageBuffer>>,
) {
    let push_stack = Rc::clone(&return_types);
    let pop_stack = Rc::clone(&return_types);
    let scope_for_enter = Rc::clone(&scope);
    let scope_for_leave = Rc::clone(&scope);
    visitor.on(
        "decl-function",
        Handler {
            on_enter: Some(Box::new(move |node, _parents| {
                if let NodeKind::DeclFunction {
                    arguments,
                    function_type,
                    ..
                } = &node.kind
                {
                    scope_for_enter.borrow_mut().push_frame();
                    scope_for_enter.borrow_mut().load_arguments(arguments);
                    if let NodeKind::TypeFunction { return_type, .. } = &function_type.kind {
                        push_stack.borrow_mut().push((**return_type).clone());
                    }
                }
                VisitorStatus::Ok
            })),
            on_leave: Some(Box::new(move |_node, _parents| {
                pop_stack.borrow_mut().pop();
                scope_for_leave.borrow_mut().pop_frame();
                VisitorStatus::Ok
            })),
        },
    );

    visitor.on(
        "stmt-return",
        Handler {
            on_enter: Some(Box::new(move |node, _parents| {
                let Some(expected) = return_types.borrow().last().cloned() else {
                    return VisitorStatus::Ok;
                };
                let NodeKind::StmtReturn { value } = &node.kind else {
                    return VisitorStatus::Ok;
                };
                let Some(value) = value else {
                    return VisitorStatus::Ok;
                };

                let scope_ref = scope.borrow();
                match type_resolve::resolve(value, &scope_ref) {
                    Ok(actual) if actual.compare(&expected) => VisitorStatus::Ok,
                    Ok(_) => {
                        buffer.borrow_mut().emit(
                            Message::new(Severity::Error, "mismatched return type")
                                .with_code(et::MISMATCHED_RETURN_TYPE)
                                .with_range(value.source_range.clone()),
                        );
                        VisitorStatus::Skip
                    }
                    Err(err) => {
                        buffer
                            .borrow_mut()
                            .emit(Message::new(Severity::Error, err.text).with_code(err.code));
                        VisitorStatus::Skip
                    }
                }
            })),
            on_leave: None,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::operators::UnaryOperator;
    use crate::location::Range;

    fn int_type(bit_width: u8, unsigned: bool) -> Node {
        Node::synthetic(NodeKind::TypeInt { bit_width, unsigned })
    }

    #[test]
    fn empty_program_verifies_clean() {
        let mut ast = Node::new(
            NodeKind::DeclarationBlock { children: vec![] },
            Range::synthetic(),
        );
        let mut buffer = MessageBuffer::new();
        let status = verify(&mut ast, &mut buffer);
        assert_eq!(status, VisitorStatus::Ok);
        assert!(!buffer.had_errors());
    }

    #[test]
    fn mismatched_return_type_is_reported_and_skipped() {
        let function = Node::synthetic(NodeKind::DeclFunction {
            mutable: false,
            override_: false,
            name: "f".into(),
            function_type: Box::new(Node::synthetic(NodeKind::TypeFunction {
                positional_args: vec![],
                variadic_positional: false,
                variadic_keyword: false,
                return_type: Box::new(int_type(32, false)),
            })),
            arguments: vec![],
            body: Box::new(Node::synthetic(NodeKind::StatementBlock {
                children: vec![Node::synthetic(NodeKind::StmtReturn {
                    value: Some(Box::new(Node::synthetic(NodeKind::ValueFloat {
                        value: 1.0,
                        value_type: Box::new(Node::synthetic(NodeKind::TypeFloat { bit_width: 64 })),
                    }))),
                })],
            })),
        });
        let mut ast = Node::synthetic(NodeKind::DeclarationBlock {
            children: vec![function],
        });

        let mut buffer = MessageBuffer::new();
        verify(&mut ast, &mut buffer);
        assert!(buffer.had_errors());
        assert!(buffer
            .messages()
            .iter()
            .any(|m| m.code == Some(et::MISMATCHED_RETURN_TYPE)));
    }

    #[test]
    fn duplicate_declaration_in_same_frame_is_reported() {
        let assignment = |name: &str| {
            Node::synthetic(NodeKind::DeclAssignment {
                property: Box::new(Node::synthetic(NodeKind::DeclProperty {
                    optional: false,
                    spread: false,
                    name: name.to_string(),
                    property_type: Box::new(Node::synthetic(NodeKind::TypeBool)),
                })),
                value: Box::new(Node::synthetic(NodeKind::ValueBool { value: true })),
            })
        };
        let mut ast = Node::synthetic(NodeKind::DeclarationBlock {
            children: vec![assignment("x"), assignment("x")],
        });

        let mut buffer = MessageBuffer::new();
        verify(&mut ast, &mut buffer);
        assert!(buffer
            .messages()
            .iter()
            .any(|m| m.code == Some(es::DUPLICATE_DECLARATION)));
    }

    #[test]
    fn unsupported_feature_is_reported() {
        let mut ast = Node::synthetic(NodeKind::DeclarationBlock {
            children: vec![Node::synthetic(NodeKind::DeclUnion {
                name: "U".into(),
                properties: vec![],
            })],
        });
        let mut buffer = MessageBuffer::new();
        verify(&mut ast, &mut buffer);
        assert!(buffer
            .messages()
            .iter()
            .any(|m| m.code == Some(es::UNSUPPORTED_FEATURE)));
    }

    #[test]
    fn matching_return_type_has_no_diagnostic() {
        let operand = Node::synthetic(NodeKind::ValueUnary {
            operator: UnaryOperator::Negate,
            operand: Box::new(Node::synthetic(NodeKind::ValueInt {
                value: 1,
                value_type: Box::new(int_type(32, false)),
            })),
        });
        let function = Node::synthetic(NodeKind::DeclFunction {
            mutable: false,
            override_: false,
            name: "f".into(),
            function_type: Box::new(Node::synthetic(NodeKind::TypeFunction {
                positional_args: vec![],
                variadic_positional: false,
                variadic_keyword: false,
                return_type: Box::new(int_type(32, false)),
            })),
            arguments: vec![],
            body: Box::new(Node::synthetic(NodeKind::StatementBlock {
                children: vec![Node::synthetic(NodeKind::StmtReturn {
                    value: Some(Box::new(operand)),
                })],
            })),
        });
        let mut ast = Node::synthetic(NodeKind::DeclarationBlock {
            children: vec![function],
        });

        let mut buffer = MessageBuffer::new();
        verify(&mut ast, &mut buffer);
        assert!(!buffer.had_errors());
    }
}
