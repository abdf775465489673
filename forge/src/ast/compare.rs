//! Structural equality "modulo `source_range`" (`spec.md` §4.F).
//!
//! This can't be a `#[derive(PartialEq)]` because every variant must
//! skip its own `source_range` while still recursing structurally into
//! children, so it is hand-written per kind.

use super::{Node, NodeKind};

pub fn structural_eq(a: &Node, b: &Node) -> bool {
    use NodeKind::*;

    match (&a.kind, &b.kind) {
        (TypeVoid, TypeVoid) | (TypeBool, TypeBool) => true,
        (
            TypeInt {
                bit_width: w1,
                unsigned: u1,
            },
            TypeInt {
                bit_width: w2,
                unsigned: u2,
            },
        ) => w1 == w2 && u1 == u2,
        (TypeFloat { bit_width: w1 }, TypeFloat { bit_width: w2 }) => w1 == w2,
        (TypeSymbol { name: n1 }, TypeSymbol { name: n2 }) => n1 == n2,
        (
            TypePointer {
                constant: c1,
                implicit_dereference: d1,
                pointee: p1,
            },
            TypePointer {
                constant: c2,
                implicit_dereference: d2,
                pointee: p2,
            },
        ) => c1 == c2 && d1 == d2 && structural_eq(p1, p2),
        (
            TypeArray {
                length: l1,
                element: e1,
            },
            TypeArray {
                length: l2,
                element: e2,
            },
        ) => l1 == l2 && structural_eq(e1, e2),
        (
            TypeFunction {
                positional_args: a1,
                variadic_positional: vp1,
                variadic_keyword: vk1,
                return_type: r1,
            },
            TypeFunction {
                positional_args: a2,
                variadic_positional: vp2,
                variadic_keyword: vk2,
                return_type: r2,
            },
        ) => vp1 == vp2 && vk1 == vk2 && eq_list(a1, a2) && structural_eq(r1, r2),

        (
            DeclUnion {
                name: n1,
                properties: p1,
            },
            DeclUnion {
                name: n2,
                properties: p2,
            },
        )
        | (
            DeclStructure {
                name: n1,
                properties: p1,
            },
            DeclStructure {
                name: n2,
                properties: p2,
            },
        ) => n1 == n2 && eq_list(p1, p2),
        (
            DeclProperty {
                optional: o1,
                spread: s1,
                name: n1,
                property_type: t1,
            },
            DeclProperty {
                optional: o2,
                spread: s2,
                name: n2,
                property_type: t2,
            },
        ) => o1 == o2 && s1 == s2 && n1 == n2 && structural_eq(t1, t2),
        (
            DeclInterface {
                abstract_: a1,
                name: n1,
                extends: e1,
                members: m1,
            },
            DeclInterface {
                abstract_: a2,
                name: n2,
                extends: e2,
                members: m2,
            },
        ) => a1 == a2 && n1 == n2 && e1 == e2 && eq_list(m1, m2),
        (
            DeclFunctionArgument {
                keyword: k1,
                property: p1,
                default: d1,
            },
            DeclFunctionArgument {
                keyword: k2,
                property: p2,
                default: d2,
            },
        ) => k1 == k2 && structural_eq(p1, p2) && eq_option(d1, d2),
        (
            DeclFunction {
                mutable: m1,
                override_: o1,
                name: n1,
                function_type: t1,
                arguments: a1,
                body: b1,
            },
            DeclFunction {
                mutable: m2,
                override_: o2,
                name: n2,
                function_type: t2,
                arguments: a2,
                body: b2,
            },
        ) => {
            m1 == m2
                && o1 == o2
                && n1 == n2
                && structural_eq(t1, t2)
                && eq_list(a1, a2)
                && structural_eq(b1, b2)
        }
        (
            DeclAssignment {
                property: p1,
                value: v1,
            },
            DeclAssignment {
                property: p2,
                value: v2,
            },
        ) => structural_eq(p1, p2) && structural_eq(v1, v2),
        (DeclarationBlock { children: c1 }, DeclarationBlock { children: c2 })
        | (StatementBlock { children: c1 }, StatementBlock { children: c2 }) => eq_list(c1, c2),

        (StmtReturn { value: v1 }, StmtReturn { value: v2 }) => eq_option(v1, v2),
        (
            StmtIfConditionalClause {
                condition: c1,
                body: b1,
            },
            StmtIfConditionalClause {
                condition: c2,
                body: b2,
            },
        ) => structural_eq(c1, c2) && structural_eq(b1, b2),
        (
            StmtIf {
                clauses: c1,
                else_body: e1,
            },
            StmtIf {
                clauses: c2,
                else_body: e2,
            },
        ) => eq_list(c1, c2) && eq_option(e1, e2),
        (
            StmtWhile {
                condition: c1,
                body: b1,
            },
            StmtWhile {
                condition: c2,
                body: b2,
            },
        ) => structural_eq(c1, c2) && structural_eq(b1, b2),

        (ValueBool { value: v1 }, ValueBool { value: v2 }) => v1 == v2,
        (
            ValueInt {
                value: v1,
                value_type: t1,
            },
            ValueInt {
                value: v2,
                value_type: t2,
            },
        ) => v1 == v2 && structural_eq(t1, t2),
        (
            ValueFloat {
                value: v1,
                value_type: t1,
            },
            ValueFloat {
                value: v2,
                value_type: t2,
            },
        ) => v1.to_bits() == v2.to_bits() && structural_eq(t1, t2),
        (ValueCharacter { codepoint: c1 }, ValueCharacter { codepoint: c2 }) => c1 == c2,
        (ValueString { bytes: b1 }, ValueString { bytes: b2 }) => b1 == b2,
        (ValueArray { elements: e1 }, ValueArray { elements: e2 }) => eq_list(e1, e2),
        (
            ValueArrayRepeated {
                element: e1,
                count: c1,
            },
            ValueArrayRepeated {
                element: e2,
                count: c2,
            },
        ) => c1 == c2 && structural_eq(e1, e2),
        (ValueStructure { fields: f1 }, ValueStructure { fields: f2 }) => eq_list(f1, f2),
        (ValueSymbol { name: n1 }, ValueSymbol { name: n2 }) => n1 == n2,
        (
            ValueCall {
                callee: c1,
                positional_args: p1,
                keyword_args: k1,
            },
            ValueCall {
                callee: c2,
                positional_args: p2,
                keyword_args: k2,
            },
        ) => structural_eq(c1, c2) && eq_list(p1, p2) && eq_list(k1, k2),
        (
            ValueCallKeywordArgument {
                name: n1,
                value: v1,
            },
            ValueCallKeywordArgument {
                name: n2,
                value: v2,
            },
        ) => n1 == n2 && structural_eq(v1, v2),
        (
            ValueCast {
                value: v1,
                target_type: t1,
            },
            ValueCast {
                value: v2,
                target_type: t2,
            },
        ) => structural_eq(v1, v2) && structural_eq(t1, t2),
        (
            ValueUnary {
                operator: o1,
                operand: x1,
            },
            ValueUnary {
                operator: o2,
                operand: x2,
            },
        ) => o1 == o2 && structural_eq(x1, x2),
        (
            ValueBinary {
                operator: o1,
                left: l1,
                right: r1,
            },
            ValueBinary {
                operator: o2,
                left: l2,
                right: r2,
            },
        ) => o1 == o2 && structural_eq(l1, l2) && structural_eq(r1, r2),
        (
            ValueAccess {
                object: o1,
                member: m1,
            },
            ValueAccess {
                object: o2,
                member: m2,
            },
        ) => m1 == m2 && structural_eq(o1, o2),
        (ValueDereference { pointer: p1 }, ValueDereference { pointer: p2 }) => {
            structural_eq(p1, p2)
        }
        (ValueGetAddress { lvalue: l1 }, ValueGetAddress { lvalue: l2 }) => structural_eq(l1, l2),

        _ => false,
    }
}

fn eq_list(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structural_eq(x, y))
}

fn eq_option(a: &Option<Box<Node>>, b: &Option<Box<Node>>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => structural_eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Range;

    #[test]
    fn equal_modulo_range() {
        let a = Node::new(NodeKind::ValueBool { value: true }, Range::synthetic());
        let mut b = a.clone();
        b.source_range = Range::synthetic();
        assert!(structural_eq(&a, &b));
    }

    #[test]
    fn differing_payload_is_unequal() {
        let a = Node::synthetic(NodeKind::ValueBool { value: true });
        let b = Node::synthetic(NodeKind::ValueBool { value: false });
        assert!(!structural_eq(&a, &b));
    }

    #[test]
    fn differing_kind_is_unequal() {
        let a = Node::synthetic(NodeKind::TypeVoid);
        let b = Node::synthetic(NodeKind::TypeBool);
        assert!(!structural_eq(&a, &b));
    }

    #[test]
    fn clone_compares_equal_to_original() {
        let a = Node::synthetic(NodeKind::ValueInt {
            value: 42,
            value_type: Box::new(Node::synthetic(NodeKind::TypeInt {
                bit_width: 32,
                unsigned: false,
            })),
        });
        assert!(structural_eq(&a, &a.clone()));
    }
}
