//! Formatted (surface-syntax) printing: renders a node back into the
//! concrete syntax a parser would accept for it (`spec.md` §4.F). Used
//! by a downstream formatter; unlike `debug_print` this is not a test
//! oracle and has no stability guarantee beyond "re-parses".

use super::operators::{BinaryOperator, UnaryOperator};
use super::{Node, NodeKind};

pub fn format_print(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_list(items: &[Node], sep: &str, out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i != 0 {
            out.push_str(sep);
        }
        write_node(item, out);
    }
}

fn write_node(node: &Node, out: &mut String) {
    use NodeKind::*;
    match &node.kind {
        TypeVoid => out.push_str("void"),
        TypeBool => out.push_str("bool"),
        TypeInt { bit_width, unsigned } => {
            out.push(if *unsigned { 'u' } else { 'i' });
            out.push_str(&bit_width.to_string());
        }
        TypeFloat { bit_width } => out.push_str(&format!("f{bit_width}")),
        TypeSymbol { name } => out.push_str(name),
        TypePointer {
            constant,
            implicit_dereference,
            pointee,
        } => {
            out.push(if *implicit_dereference { '&' } else { '*' });
            if *constant {
                out.push_str("const ");
            }
            write_node(pointee, out);
        }
        TypeArray { length, element } => {
            out.push('[');
            out.push_str(&length.to_string());
            out.push(']');
            write_node(element, out);
        }
        TypeFunction {
            positional_args,
            variadic_positional,
            variadic_keyword,
            return_type,
        } => {
            out.push_str("fn(");
            write_list(positional_args, ", ", out);
            if *variadic_positional || *variadic_keyword {
                if !positional_args.is_empty() {
                    out.push_str(", ");
                }
                // The grammar parses keyword-variadic as "..." followed
                // by a single "*" in the same argument slot, never both
                // flags independently (parser/grammar.rs's `fn(...)`
                // type path), so these are mutually exclusive here too.
                out.push_str(if *variadic_keyword { "...*" } else { "..." });
            }
            out.push_str(") -> ");
            write_node(return_type, out);
        }

        DeclUnion { name, properties } => {
            out.push_str("union ");
            out.push_str(name);
            out.push_str(" {\n");
            write_properties(properties, out);
            out.push('}');
        }
        DeclStructure { name, properties } => {
            out.push_str("struct ");
            out.push_str(name);
            out.push_str(" {\n");
            write_properties(properties, out);
            out.push('}');
        }
        DeclProperty {
            optional,
            spread,
            name,
            property_type,
        } => {
            if *spread {
                out.push_str("...");
            }
            out.push_str(name);
            if *optional {
                out.push('?');
            }
            out.push_str(": ");
            write_node(property_type, out);
        }
        DeclInterface {
            abstract_,
            name,
            extends,
            members,
        } => {
            if *abstract_ {
                out.push_str("abstract ");
            }
            out.push_str("interface ");
            out.push_str(name);
            if !extends.is_empty() {
                out.push_str(": ");
                out.push_str(&extends.join(", "));
            }
            out.push_str(" {\n");
            write_properties(members, out);
            out.push('}');
        }
        DeclFunctionArgument {
            keyword,
            property,
            default,
        } => {
            if *keyword {
                out.push_str("kw ");
            }
            write_node(property, out);
            if let Some(value) = default {
                out.push_str(" = ");
                write_node(value, out);
            }
        }
        DeclFunction {
            mutable,
            override_,
            name,
            function_type,
            arguments,
            body,
        } => {
            if *mutable {
                out.push_str("mut ");
            }
            if *override_ {
                out.push_str("override ");
            }
            out.push_str("fn ");
            out.push_str(name);
            out.push('(');
            write_list(arguments, ", ", out);
            out.push(')');
            if let TypeFunction { return_type, .. } = &function_type.kind {
                out.push_str(" -> ");
                write_node(return_type, out);
            }
            out.push(' ');
            write_node(body, out);
        }
        DeclAssignment { property, value } => {
            write_node(property, out);
            out.push_str(" = ");
            write_node(value, out);
            out.push(';');
        }
        DeclarationBlock { children } => {
            for child in children {
                write_node(child, out);
                out.push('\n');
            }
        }

        StmtReturn { value } => {
            out.push_str("return");
            if let Some(value) = value {
                out.push(' ');
                write_node(value, out);
            }
            out.push(';');
        }
        StmtIfConditionalClause { condition, body } => {
            out.push_str("if (");
            write_node(condition, out);
            out.push_str(") ");
            write_node(body, out);
        }
        StmtIf { clauses, else_body } => {
            for (i, clause) in clauses.iter().enumerate() {
                if i != 0 {
                    out.push_str(" else ");
                }
                write_node(clause, out);
            }
            if let Some(body) = else_body {
                out.push_str(" else ");
                write_node(body, out);
            }
        }
        StmtWhile { condition, body } => {
            out.push_str("while (");
            write_node(condition, out);
            out.push_str(") ");
            write_node(body, out);
        }
        StatementBlock { children } => {
            out.push_str("{\n");
            for child in children {
                write_node(child, out);
                out.push('\n');
            }
            out.push('}');
        }

        ValueBool { value } => out.push_str(if *value { "true" } else { "false" }),
        ValueInt { value, value_type } => {
            out.push_str(&value.to_string());
            write_suffix_from_int_type(value_type, out);
        }
        ValueFloat { value, value_type } => {
            let mut text = String::new();
            let bit_width = match &value_type.kind {
                TypeFloat { bit_width } => *bit_width,
                _ => 64,
            };
            crate::lexcast::print_float(*value, bit_width, &mut text);
            out.push_str(&text);
        }
        ValueCharacter { codepoint } => {
            crate::lexcast::print_char_literal(*codepoint, '\'', out);
        }
        ValueString { bytes } => crate::lexcast::print_string_literal(bytes, out),
        ValueArray { elements } => {
            out.push('[');
            write_list(elements, ", ", out);
            out.push(']');
        }
        ValueArrayRepeated { element, count } => {
            out.push('[');
            write_node(element, out);
            out.push_str("; ");
            out.push_str(&count.to_string());
            out.push(']');
        }
        ValueStructure { fields } => {
            out.push_str("{ ");
            write_list(fields, ", ", out);
            out.push_str(" }");
        }
        ValueSymbol { name } => out.push_str(name),
        ValueCall {
            callee,
            positional_args,
            keyword_args,
        } => {
            write_node(callee, out);
            out.push('(');
            write_list(positional_args, ", ", out);
            if !positional_args.is_empty() && !keyword_args.is_empty() {
                out.push_str(", ");
            }
            write_list(keyword_args, ", ", out);
            out.push(')');
        }
        ValueCallKeywordArgument { name, value } => {
            out.push('~');
            out.push_str(name);
            out.push_str(": ");
            write_node(value, out);
        }
        ValueCast { value, target_type } => {
            write_node(value, out);
            out.push_str(" as ");
            write_node(target_type, out);
        }
        ValueUnary { operator, operand } => {
            out.push_str(unary_symbol(*operator));
            write_node(operand, out);
        }
        ValueBinary {
            operator,
            left,
            right,
        } => {
            write_node(left, out);
            out.push(' ');
            out.push_str(binary_symbol(*operator));
            out.push(' ');
            write_node(right, out);
        }
        ValueAccess { object, member } => {
            write_node(object, out);
            out.push('.');
            out.push_str(member);
        }
        ValueDereference { pointer } => {
            out.push('*');
            write_node(pointer, out);
        }
        ValueGetAddress { lvalue } => {
            out.push('&');
            write_node(lvalue, out);
        }
    }
}

fn write_properties(properties: &[Node], out: &mut String) {
    for property in properties {
        out.push_str("  ");
        write_node(property, out);
        out.push_str(";\n");
    }
}

fn write_suffix_from_int_type(value_type: &Node, out: &mut String) {
    if let NodeKind::TypeInt { bit_width, unsigned } = &value_type.kind {
        out.push(if *unsigned { 'u' } else { 'i' });
        out.push_str(&bit_width.to_string());
    }
}

fn unary_symbol(op: UnaryOperator) -> &'static str {
    op.symbol()
}

fn binary_symbol(op: BinaryOperator) -> &'static str {
    op.symbol()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_bool_literal() {
        let node = Node::synthetic(NodeKind::ValueBool { value: true });
        assert_eq!(format_print(&node), "true");
    }

    #[test]
    fn prints_binary_expression() {
        let node = Node::synthetic(NodeKind::ValueBinary {
            operator: BinaryOperator::Add,
            left: Box::new(Node::synthetic(NodeKind::ValueSymbol { name: "a".into() })),
            right: Box::new(Node::synthetic(NodeKind::ValueSymbol { name: "b".into() })),
        });
        assert_eq!(format_print(&node), "a + b");
    }

    #[test]
    fn prints_variadic_function_type_without_a_stray_leading_comma() {
        let node = Node::synthetic(NodeKind::TypeFunction {
            positional_args: vec![],
            variadic_positional: false,
            variadic_keyword: true,
            return_type: Box::new(Node::synthetic(NodeKind::TypeVoid)),
        });
        assert_eq!(format_print(&node), "fn(...*) -> void");
    }

    #[test]
    fn prints_positional_variadic_function_type_after_named_args() {
        let node = Node::synthetic(NodeKind::TypeFunction {
            positional_args: vec![Node::synthetic(NodeKind::TypeBool)],
            variadic_positional: true,
            variadic_keyword: false,
            return_type: Box::new(Node::synthetic(NodeKind::TypeVoid)),
        });
        assert_eq!(format_print(&node), "fn(bool, ...) -> void");
    }

    #[test]
    fn prints_pointer_type() {
        let node = Node::synthetic(NodeKind::TypePointer {
            constant: true,
            implicit_dereference: false,
            pointee: Box::new(Node::synthetic(NodeKind::TypeInt {
                bit_width: 32,
                unsigned: false,
            })),
        });
        assert_eq!(format_print(&node), "*const i32");
    }
}
