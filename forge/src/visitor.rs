//! Generic pre/post-order visitor framework (`spec.md` §4.H).
//!
//! A `Visitor` holds, per kind, an ordered list of handlers; `accept`
//! dispatches through the (`match`-based) acceptor table, invoking
//! `on_enter` handlers before recursing into children in the
//! fixed, per-variant order `spec.md` requires and `on_leave` handlers
//! after. The explicit parent stack lets handlers see their ancestors
//! without the traversal needing raw pointers.

use crate::ast::{Node, NodeKind};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorStatus {
    Ok,
    Skip,
    Stop,
}

pub type HandlerFn<'h> = Box<dyn FnMut(&mut Node, &[*const Node]) -> VisitorStatus + 'h>;

/// A pair of optional callbacks run on entering/leaving a node
/// (`spec.md` §4.H "Each handler is a pair of optional callbacks").
#[derive(Default)]
pub struct Handler<'h> {
    pub on_enter: Option<HandlerFn<'h>>,
    pub on_leave: Option<HandlerFn<'h>>,
}

/// Handlers registered per kind name (`NodeKind::kind_name()`), invoked
/// in insertion order. `user_data` is left to the embedding verifier
/// pass (Rust closures capture their own state, so unlike the original
/// C design there is no untyped `user_data` pointer threaded through
/// here — each handler closes over what it needs).
#[derive(Default)]
pub struct Visitor<'h> {
    handlers: HashMap<&'static str, Vec<Handler<'h>>>,
}

impl<'h> Visitor<'h> {
    pub fn new() -> Self {
        Visitor::default()
    }

    pub fn on(&mut self, kind_name: &'static str, handler: Handler<'h>) {
        self.handlers.entry(kind_name).or_default().push(handler);
    }

    /// Runs the traversal over `node`, honoring STOP/SKIP semantics and
    /// the fixed per-variant child order (`spec.md` §4.H step 2:
    /// "declaration-block children in declaration order; function
    /// arguments before body; if-conditional clauses before
    /// else-body").
    pub fn accept(&mut self, node: &mut Node, parents: &mut Vec<*const Node>) -> VisitorStatus {
        let kind_name = node.kind_name();
        let node_ptr: *const Node = node;

        if let Some(status) = self.run_enter(kind_name, node, parents) {
            if status == VisitorStatus::Stop {
                return VisitorStatus::Stop;
            }
            if status == VisitorStatus::Skip {
                return self.run_leave(kind_name, node, parents).unwrap_or(VisitorStatus::Ok);
            }
        }

        parents.push(node_ptr);
        let status = self.visit_children(node, parents);
        parents.pop();

        if status == VisitorStatus::Stop {
            return VisitorStatus::Stop;
        }

        self.run_leave(kind_name, node, parents).unwrap_or(VisitorStatus::Ok)
    }

    fn run_enter(
        &mut self,
        kind_name: &'static str,
        node: &mut Node,
        parents: &[*const Node],
    ) -> Option<VisitorStatus> {
        let handlers = self.handlers.get_mut(kind_name)?;
        let mut result = VisitorStatus::Ok;
        for handler in handlers.iter_mut() {
            if let Some(cb) = handler.on_enter.as_mut() {
                match cb(node, parents) {
                    VisitorStatus::Stop => return Some(VisitorStatus::Stop),
                    VisitorStatus::Skip => result = VisitorStatus::Skip,
                    VisitorStatus::Ok => {}
                }
            }
        }
        Some(result)
    }

    fn run_leave(
        &mut self,
        kind_name: &'static str,
        node: &mut Node,
        parents: &[*const Node],
    ) -> Option<VisitorStatus> {
        let handlers = self.handlers.get_mut(kind_name)?;
        for handler in handlers.iter_mut() {
            if let Some(cb) = handler.on_leave.as_mut() {
                if cb(node, parents) == VisitorStatus::Stop {
                    return Some(VisitorStatus::Stop);
                }
            }
        }
        Some(VisitorStatus::Ok)
    }

    fn visit_children(&mut self, node: &mut Node, parents: &mut Vec<*const Node>) -> VisitorStatus {
        macro_rules! visit_one {
            ($child:expr) => {
                if self.accept($child, parents) == VisitorStatus::Stop {
                    return VisitorStatus::Stop;
                }
            };
        }
        macro_rules! visit_opt {
            ($child:expr) => {
                if let Some(c) = $child {
                    visit_one!(c);
                }
            };
        }
        macro_rules! visit_list {
            ($list:expr) => {
                for item in $list.iter_mut() {
                    visit_one!(item);
                }
            };
        }

        match &mut node.kind {
            NodeKind::TypeVoid | NodeKind::TypeBool => {}
            NodeKind::TypeInt { .. } | NodeKind::TypeFloat { .. } | NodeKind::TypeSymbol { .. } => {}
            NodeKind::TypePointer { pointee, .. } => visit_one!(pointee),
            NodeKind::TypeArray { element, .. } => visit_one!(element),
            NodeKind::TypeFunction {
                positional_args,
                return_type,
                ..
            } => {
                visit_list!(positional_args);
                visit_one!(return_type);
            }

            NodeKind::DeclUnion { properties, .. } | NodeKind::DeclStructure { properties, .. } => {
                visit_list!(properties);
            }
            NodeKind::DeclProperty { property_type, .. } => visit_one!(property_type),
            NodeKind::DeclInterface { members, .. } => visit_list!(members),
            NodeKind::DeclFunctionArgument { property, default, .. } => {
                visit_one!(property);
                visit_opt!(default);
            }
            NodeKind::DeclFunction {
                function_type,
                arguments,
                body,
                ..
            } => {
                visit_one!(function_type);
                visit_list!(arguments);
                visit_one!(body);
            }
            NodeKind::DeclAssignment { property, value } => {
                visit_one!(property);
                visit_one!(value);
            }
            NodeKind::DeclarationBlock { children } | NodeKind::StatementBlock { children } => {
                visit_list!(children);
            }

            NodeKind::StmtReturn { value } => visit_opt!(value),
            NodeKind::StmtIfConditionalClause { condition, body } => {
                visit_one!(condition);
                visit_one!(body);
            }
            NodeKind::StmtIf { clauses, else_body } => {
                visit_list!(clauses);
                visit_opt!(else_body);
            }
            NodeKind::StmtWhile { condition, body } => {
                visit_one!(condition);
                visit_one!(body);
            }

            NodeKind::ValueBool { .. }
            | NodeKind::ValueCharacter { .. }
            | NodeKind::ValueString { .. }
            | NodeKind::ValueSymbol { .. } => {}
            NodeKind::ValueInt { value_type, .. } | NodeKind::ValueFloat { value_type, .. } => {
                visit_one!(value_type);
            }
            NodeKind::ValueArray { elements } => visit_list!(elements),
            NodeKind::ValueArrayRepeated { element, .. } => visit_one!(element),
            NodeKind::ValueStructure { fields } => visit_list!(fields),
            NodeKind::ValueCall {
                callee,
                positional_args,
                keyword_args,
            } => {
                visit_one!(callee);
                visit_list!(positional_args);
                visit_list!(keyword_args);
            }
            NodeKind::ValueCallKeywordArgument { value, .. } => visit_one!(value),
            NodeKind::ValueCast { value, target_type } => {
                visit_one!(value);
                visit_one!(target_type);
            }
            NodeKind::ValueUnary { operand, .. } => visit_one!(operand),
            NodeKind::ValueBinary { left, right, .. } => {
                visit_one!(left);
                visit_one!(right);
            }
            NodeKind::ValueAccess { object, .. } => visit_one!(object),
            NodeKind::ValueDereference { pointer } => visit_one!(pointer),
            NodeKind::ValueGetAddress { lvalue } => visit_one!(lvalue),
        }

        VisitorStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Range;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn leaf(kind: NodeKind) -> Node {
        Node::new(kind, Range::synthetic())
    }

    #[test]
    fn pre_and_post_order_visit_every_node_once() {
        let mut tree = leaf(NodeKind::ValueUnary {
            operator: crate::ast::operators::UnaryOperator::Negate,
            operand: Box::new(leaf(NodeKind::ValueBool { value: true })),
        });

        let enters = Rc::new(RefCell::new(Vec::new()));
        let leaves = Rc::new(RefCell::new(Vec::new()));

        let mut visitor = Visitor::new();
        {
            let enters = Rc::clone(&enters);
            visitor.on(
                "value-unary",
                Handler {
                    on_enter: Some(Box::new(move |_n, _p| {
                        enters.borrow_mut().push("unary-enter");
                        VisitorStatus::Ok
                    })),
                    on_leave: Some(Box::new({
                        let leaves = Rc::clone(&leaves);
                        move |_n, _p| {
                            leaves.borrow_mut().push("unary-leave");
                            VisitorStatus::Ok
                        }
                    })),
                },
            );
        }
        {
            let enters = Rc::clone(&enters);
            visitor.on(
                "value-bool",
                Handler {
                    on_enter: Some(Box::new(move |_n, _p| {
                        enters.borrow_mut().push("bool-enter");
                        VisitorStatus::Ok
                    })),
                    on_leave: None,
                },
            );
        }

        let mut parents = Vec::new();
        assert_eq!(visitor.accept(&mut tree, &mut parents), VisitorStatus::Ok);
        assert_eq!(*enters.borrow(), vec!["unary-enter", "bool-enter"]);
        assert_eq!(*leaves.borrow(), vec!["unary-leave"]);
        assert!(parents.is_empty());
    }

    #[test]
    fn skip_suppresses_only_its_own_children() {
        let mut tree = leaf(NodeKind::ValueUnary {
            operator: crate::ast::operators::UnaryOperator::Negate,
            operand: Box::new(leaf(NodeKind::ValueBool { value: true })),
        });

        let visited = Rc::new(RefCell::new(Vec::new()));
        let mut visitor = Visitor::new();
        visitor.on(
            "value-unary",
            Handler {
                on_enter: Some(Box::new(|_n, _p| VisitorStatus::Skip)),
                on_leave: None,
            },
        );
        {
            let visited = Rc::clone(&visited);
            visitor.on(
                "value-bool",
                Handler {
                    on_enter: Some(Box::new(move |_n, _p| {
                        visited.borrow_mut().push(());
                        VisitorStatus::Ok
                    })),
                    on_leave: None,
                },
            );
        }

        let mut parents = Vec::new();
        visitor.accept(&mut tree, &mut parents);
        assert!(visited.borrow().is_empty());
    }

    #[test]
    fn stop_halts_traversal_immediately() {
        let mut tree = leaf(NodeKind::DeclarationBlock {
            children: vec![
                leaf(NodeKind::ValueBool { value: true }),
                leaf(NodeKind::ValueBool { value: false }),
            ],
        });

        let visits = Rc::new(RefCell::new(0));
        let mut visitor = Visitor::new();
        {
            let visits = Rc::clone(&visits);
            visitor.on(
                "value-bool",
                Handler {
                    on_enter: Some(Box::new(move |_n, _p| {
                        *visits.borrow_mut() += 1;
                        VisitorStatus::Stop
                    })),
                    on_leave: None,
                },
            );
        }

        let mut parents = Vec::new();
        assert_eq!(
            visitor.accept(&mut tree, &mut parents),
            VisitorStatus::Stop
        );
        assert_eq!(*visits.borrow(), 1);
    }
}
