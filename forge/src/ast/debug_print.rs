//! Canonical debug-print grammar (`spec.md` §6): the primary oracle for
//! parser and clone-round-trip tests, so this must be wholly
//! deterministic — no addresses, no hash-map iteration order.
//!
//! Grammar: each node is `[kind-name]`; each property is an indented
//! `name = value` line (`name[i] = value` for list elements); a `None`
//! child renders as the literal `null`; a subtree beyond `max_depth`
//! renders as `...`. Indentation is 2 spaces per level. A property whose
//! value is itself a node renders its header inline after `=` and nests
//! that child's own properties one level deeper.

use super::{Node, NodeKind};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy)]
pub struct DebugPrintLimits {
    pub max_depth: usize,
    pub max_list_length: usize,
}

impl Default for DebugPrintLimits {
    fn default() -> Self {
        DebugPrintLimits {
            max_depth: usize::MAX,
            max_list_length: usize::MAX,
        }
    }
}

pub fn debug_print(node: &Node, limits: DebugPrintLimits) -> String {
    let mut out = String::new();
    print_node(node, 0, limits, &mut out);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn print_node(node: &Node, depth: usize, limits: DebugPrintLimits, out: &mut String) {
    if depth > limits.max_depth {
        out.push_str("...");
        return;
    }
    out.push('[');
    out.push_str(node.kind_name());
    out.push(']');

    for (name, value) in properties(&node.kind) {
        out.push('\n');
        indent(out, depth + 1);
        let _ = write!(out, "{name} = ");
        print_value(&value, depth + 1, limits, out);
    }
}

fn print_list(name: &str, items: &[Node], depth: usize, limits: DebugPrintLimits, out: &mut String) {
    let truncated = items.len() > limits.max_list_length;
    let shown = items.len().min(limits.max_list_length);
    for (i, item) in items.iter().take(shown).enumerate() {
        out.push('\n');
        indent(out, depth);
        let _ = write!(out, "{name}[{i}] = ");
        print_node(item, depth, limits, out);
    }
    if truncated {
        out.push('\n');
        indent(out, depth);
        let _ = write!(out, "{name}[...] = ...");
    }
}

/// One property value, deferred so list properties can be expanded by
/// the caller instead of being printed inline as a single scalar.
enum PropValue<'a> {
    Scalar(String),
    Node(&'a Node),
    OptionalNode(&'a Option<Box<Node>>),
    List(&'a [Node]),
    StringList(&'a [String]),
}

fn print_value(value: &PropValue<'_>, depth: usize, limits: DebugPrintLimits, out: &mut String) {
    match value {
        PropValue::Scalar(s) => out.push_str(s),
        PropValue::Node(n) => print_node(n, depth, limits, out),
        PropValue::OptionalNode(Some(n)) => print_node(n, depth, limits, out),
        PropValue::OptionalNode(None) => out.push_str("null"),
        PropValue::List(items) => {
            let _ = write!(out, "[{}]", items.len());
            print_list("", items, depth + 1, limits, out);
        }
        PropValue::StringList(items) => {
            out.push_str(&format!("{items:?}"));
        }
    }
}

fn properties(kind: &NodeKind) -> Vec<(&'static str, PropValue<'_>)> {
    use NodeKind::*;
    use PropValue::*;

    match kind {
        TypeVoid | TypeBool => vec![],
        TypeInt { bit_width, unsigned } => vec![
            ("bit_width", Scalar(bit_width.to_string())),
            ("unsigned", Scalar(unsigned.to_string())),
        ],
        TypeFloat { bit_width } => vec![("bit_width", Scalar(bit_width.to_string()))],
        TypeSymbol { name } => vec![("name", Scalar(name.clone()))],
        TypePointer {
            constant,
            implicit_dereference,
            pointee,
        } => vec![
            ("constant", Scalar(constant.to_string())),
            (
                "implicit_dereference",
                Scalar(implicit_dereference.to_string()),
            ),
            ("pointee", Node(pointee)),
        ],
        TypeArray { length, element } => vec![
            ("length", Scalar(length.to_string())),
            ("element", Node(element)),
        ],
        TypeFunction {
            positional_args,
            variadic_positional,
            variadic_keyword,
            return_type,
        } => vec![
            ("positional_args", List(positional_args)),
            (
                "variadic_positional",
                Scalar(variadic_positional.to_string()),
            ),
            ("variadic_keyword", Scalar(variadic_keyword.to_string())),
            ("return_type", Node(return_type)),
        ],

        DeclUnion { name, properties } | DeclStructure { name, properties } => vec![
            ("name", Scalar(name.clone())),
            ("properties", List(properties)),
        ],
        DeclProperty {
            optional,
            spread,
            name,
            property_type,
        } => vec![
            ("optional", Scalar(optional.to_string())),
            ("spread", Scalar(spread.to_string())),
            ("name", Scalar(name.clone())),
            ("property_type", Node(property_type)),
        ],
        DeclInterface {
            abstract_,
            name,
            extends,
            members,
        } => vec![
            ("abstract", Scalar(abstract_.to_string())),
            ("name", Scalar(name.clone())),
            ("extends", StringList(extends)),
            ("members", List(members)),
        ],
        DeclFunctionArgument {
            keyword,
            property,
            default,
        } => vec![
            ("keyword", Scalar(keyword.to_string())),
            ("property", Node(property)),
            ("default", OptionalNode(default)),
        ],
        DeclFunction {
            mutable,
            override_,
            name,
            function_type,
            arguments,
            body,
        } => vec![
            ("mutable", Scalar(mutable.to_string())),
            ("override", Scalar(override_.to_string())),
            ("name", Scalar(name.clone())),
            ("function_type", Node(function_type)),
            ("arguments", List(arguments)),
            ("body", Node(body)),
        ],
        DeclAssignment { property, value } => {
            vec![("property", Node(property)), ("value", Node(value))]
        }
        DeclarationBlock { children } | StatementBlock { children } => vec![("children", List(children))],

        StmtReturn { value } => vec![("value", OptionalNode(value))],
        StmtIfConditionalClause { condition, body } => {
            vec![("condition", Node(condition)), ("body", Node(body))]
        }
        StmtIf { clauses, else_body } => vec![
            ("clauses", List(clauses)),
            ("else_body", OptionalNode(else_body)),
        ],
        StmtWhile { condition, body } => {
            vec![("condition", Node(condition)), ("body", Node(body))]
        }

        ValueBool { value } => vec![("value", Scalar(value.to_string()))],
        ValueInt { value, value_type } => vec![
            ("value", Scalar(value.to_string())),
            ("value_type", Node(value_type)),
        ],
        ValueFloat { value, value_type } => vec![
            ("value", Scalar(value.to_string())),
            ("value_type", Node(value_type)),
        ],
        ValueCharacter { codepoint } => vec![("codepoint", Scalar(codepoint.to_string()))],
        ValueString { bytes } => vec![(
            "bytes",
            Scalar(String::from_utf8_lossy(bytes).into_owned()),
        )],
        ValueArray { elements } => vec![("elements", List(elements))],
        ValueArrayRepeated { element, count } => vec![
            ("element", Node(element)),
            ("count", Scalar(count.to_string())),
        ],
        ValueStructure { fields } => vec![("fields", List(fields))],
        ValueSymbol { name } => vec![("name", Scalar(name.clone()))],
        ValueCall {
            callee,
            positional_args,
            keyword_args,
        } => vec![
            ("callee", Node(callee)),
            ("positional_args", List(positional_args)),
            ("keyword_args", List(keyword_args)),
        ],
        ValueCallKeywordArgument { name, value } => {
            vec![("name", Scalar(name.clone())), ("value", Node(value))]
        }
        ValueCast { value, target_type } => {
            vec![("value", Node(value)), ("target_type", Node(target_type))]
        }
        ValueUnary { operator, operand } => vec![
            ("operator", Scalar(operator.symbol().to_string())),
            ("operand", Node(operand)),
        ],
        ValueBinary {
            operator,
            left,
            right,
        } => vec![
            ("operator", Scalar(operator.symbol().to_string())),
            ("left", Node(left)),
            ("right", Node(right)),
        ],
        ValueAccess { object, member } => {
            vec![("object", Node(object)), ("member", Scalar(member.clone()))]
        }
        ValueDereference { pointer } => vec![("pointer", Node(pointer))],
        ValueGetAddress { lvalue } => vec![("lvalue", Node(lvalue))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Range;

    #[test]
    fn bool_value_matches_scenario_2() {
        let node = Node::new(NodeKind::ValueBool { value: true }, Range::synthetic());
        assert_eq!(
            debug_print(&node, DebugPrintLimits::default()),
            "[value-bool]\n  value = true"
        );
    }

    #[test]
    fn empty_declaration_block_matches_scenario_1() {
        let node = Node::synthetic(NodeKind::DeclarationBlock { children: vec![] });
        assert_eq!(
            debug_print(&node, DebugPrintLimits::default()),
            "[declaration-block]\n  children = [0]"
        );
    }

    #[test]
    fn depth_limit_truncates_subtree() {
        let node = Node::synthetic(NodeKind::ValueUnary {
            operator: crate::ast::operators::UnaryOperator::Negate,
            operand: Box::new(Node::synthetic(NodeKind::ValueBool { value: true })),
        });
        let limits = DebugPrintLimits {
            max_depth: 0,
            max_list_length: usize::MAX,
        };
        let printed = debug_print(&node, limits);
        assert!(printed.contains("..."));
    }

    #[test]
    fn clone_round_trips_to_identical_text() {
        let node = Node::synthetic(NodeKind::ValueInt {
            value: 7,
            value_type: Box::new(Node::synthetic(NodeKind::TypeInt {
                bit_width: 32,
                unsigned: false,
            })),
        });
        let limits = DebugPrintLimits::default();
        assert_eq!(debug_print(&node, limits), debug_print(&node.clone(), limits));
    }
}
