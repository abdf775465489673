//! A tiny expression/statement interpreter used only by
//! [`crate::harness::fake`] to give the fake backend/loader pair
//! something real to execute — just enough arithmetic, comparisons and
//! control flow to run the simple functions the crate's own tests
//! compile (`spec.md` §4.J step 7 "compare returned integers/floats/
//! booleans against expected literal AST value nodes").

use crate::ast::operators::{BinaryOperator, UnaryOperator};
use crate::ast::{Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

pub fn evaluate(node: &Node) -> Result<EvalValue, String> {
    match &node.kind {
        NodeKind::ValueBool { value } => Ok(EvalValue::Bool(*value)),
        NodeKind::ValueInt { value, .. } => Ok(EvalValue::Int(*value as i64)),
        NodeKind::ValueFloat { value, .. } => Ok(EvalValue::Float(*value)),
        NodeKind::ValueUnary { operator, operand } => {
            let operand = evaluate(operand)?;
            match (operator, operand) {
                (UnaryOperator::Negate, EvalValue::Int(i)) => Ok(EvalValue::Int(-i)),
                (UnaryOperator::Negate, EvalValue::Float(f)) => Ok(EvalValue::Float(-f)),
                (UnaryOperator::LogicalNot, EvalValue::Bool(b)) => Ok(EvalValue::Bool(!b)),
                (UnaryOperator::BitwiseNot, EvalValue::Int(i)) => Ok(EvalValue::Int(!i)),
                _ => Err(format!("unary operator {operator:?} not applicable to operand")),
            }
        }
        NodeKind::ValueBinary { operator, left, right } => {
            evaluate_binary(*operator, evaluate(left)?, evaluate(right)?)
        }
        _ => Err(format!(
            "the fake interpreter does not support '{}'",
            node.kind_name()
        )),
    }
}

fn evaluate_binary(operator: BinaryOperator, left: EvalValue, right: EvalValue) -> Result<EvalValue, String> {
    use BinaryOperator::*;
    match (left, right) {
        (EvalValue::Int(a), EvalValue::Int(b)) => match operator {
            Add => Ok(EvalValue::Int(a + b)),
            Subtract => Ok(EvalValue::Int(a - b)),
            Multiply => Ok(EvalValue::Int(a * b)),
            Divide => Ok(EvalValue::Int(a / b)),
            Modulo => Ok(EvalValue::Int(a % b)),
            ShiftLeft => Ok(EvalValue::Int(a << b)),
            ShiftRight => Ok(EvalValue::Int(a >> b)),
            BitwiseAnd => Ok(EvalValue::Int(a & b)),
            BitwiseOr => Ok(EvalValue::Int(a | b)),
            BitwiseXor => Ok(EvalValue::Int(a ^ b)),
            Equal => Ok(EvalValue::Bool(a == b)),
            NotEqual => Ok(EvalValue::Bool(a != b)),
            LessThan => Ok(EvalValue::Bool(a < b)),
            LessThanOrEqual => Ok(EvalValue::Bool(a <= b)),
            GreaterThan => Ok(EvalValue::Bool(a > b)),
            GreaterThanOrEqual => Ok(EvalValue::Bool(a >= b)),
            LogicalAnd | LogicalOr => Err("logical operators require bool operands".into()),
        },
        (EvalValue::Float(a), EvalValue::Float(b)) => match operator {
            Add => Ok(EvalValue::Float(a + b)),
            Subtract => Ok(EvalValue::Float(a - b)),
            Multiply => Ok(EvalValue::Float(a * b)),
            Divide => Ok(EvalValue::Float(a / b)),
            Equal => Ok(EvalValue::Bool(a == b)),
            NotEqual => Ok(EvalValue::Bool(a != b)),
            LessThan => Ok(EvalValue::Bool(a < b)),
            LessThanOrEqual => Ok(EvalValue::Bool(a <= b)),
            GreaterThan => Ok(EvalValue::Bool(a > b)),
            GreaterThanOrEqual => Ok(EvalValue::Bool(a >= b)),
            _ => Err(format!("operator {operator:?} not applicable to floats")),
        },
        (EvalValue::Bool(a), EvalValue::Bool(b)) => match operator {
            LogicalAnd => Ok(EvalValue::Bool(a && b)),
            LogicalOr => Ok(EvalValue::Bool(a || b)),
            Equal => Ok(EvalValue::Bool(a == b)),
            NotEqual => Ok(EvalValue::Bool(a != b)),
            _ => Err(format!("operator {operator:?} not applicable to bools")),
        },
        _ => Err("mismatched operand types".into()),
    }
}

/// Executes a function body, returning `Some(value)` if a `return` was
/// hit (`value` is `None` for a bare `return;`) or `None` if control
/// fell off the end of the block.
pub fn exec_block(node: &Node) -> Option<Option<EvalValue>> {
    let NodeKind::StatementBlock { children } = &node.kind else {
        return exec_stmt(node);
    };
    for child in children {
        if let Some(result) = exec_stmt(child) {
            return Some(result);
        }
    }
    None
}

fn exec_stmt(node: &Node) -> Option<Option<EvalValue>> {
    match &node.kind {
        NodeKind::StmtReturn { value } => {
            Some(value.as_deref().map(|v| evaluate(v).ok()).unwrap_or(None))
        }
        NodeKind::StmtIf { clauses, else_body } => {
            for clause in clauses {
                let NodeKind::StmtIfConditionalClause { condition, body } = &clause.kind else {
                    continue;
                };
                if matches!(evaluate(condition), Ok(EvalValue::Bool(true))) {
                    return exec_block(body);
                }
            }
            else_body.as_deref().and_then(exec_block)
        }
        NodeKind::StmtWhile { condition, body } => {
            while matches!(evaluate(condition), Ok(EvalValue::Bool(true))) {
                if let Some(result) = exec_block(body) {
                    return Some(result);
                }
            }
            None
        }
        NodeKind::StatementBlock { .. } => exec_block(node),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Range;

    fn int(value: u64) -> Node {
        Node::synthetic(NodeKind::ValueInt {
            value,
            value_type: Box::new(Node::synthetic(NodeKind::TypeInt { bit_width: 32, unsigned: false })),
        })
    }

    #[test]
    fn adds_two_integers() {
        let node = Node::new(
            NodeKind::ValueBinary {
                operator: BinaryOperator::Add,
                left: Box::new(int(1)),
                right: Box::new(int(2)),
            },
            Range::synthetic(),
        );
        assert_eq!(evaluate(&node), Ok(EvalValue::Int(3)));
    }

    #[test]
    fn runs_a_return_statement_inside_a_block() {
        let body = Node::synthetic(NodeKind::StatementBlock {
            children: vec![Node::synthetic(NodeKind::StmtReturn {
                value: Some(Box::new(int(42))),
            })],
        });
        assert_eq!(exec_block(&body), Some(Some(EvalValue::Int(42))));
    }

    #[test]
    fn while_loop_accumulates_and_returns() {
        // Not a real loop-carried variable (the fake interpreter has no
        // mutable bindings); exercises the control-flow path only.
        let body = Node::synthetic(NodeKind::StatementBlock {
            children: vec![
                Node::synthetic(NodeKind::StmtWhile {
                    condition: Box::new(Node::synthetic(NodeKind::ValueBool { value: false })),
                    body: Box::new(Node::synthetic(NodeKind::StatementBlock { children: vec![] })),
                }),
                Node::synthetic(NodeKind::StmtReturn {
                    value: Some(Box::new(Node::synthetic(NodeKind::ValueBool { value: true }))),
                }),
            ],
        });
        assert_eq!(exec_block(&body), Some(Some(EvalValue::Bool(true))));
    }
}
