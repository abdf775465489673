//! `KindInfo`: the introspectable shape the original node-kind info table
//! carried (`frg_ast_node_kind_info_t` — name, flags, operator symbol),
//! preserved here as data even though dispatch itself is `match`-based
//! (`spec.md` §9 accepts either).

use super::{Node, NodeKind};
use std::ops::{BitOr, BitOrAssign};

/// Category/capability bits for one AST kind. Hand-rolled rather than
/// pulling in a flags crate: six fixed bits, no external dependency
/// earns its keep for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFlags(u8);

impl KindFlags {
    pub const TYPE: KindFlags = KindFlags(0b0000_0001);
    pub const DECLARATION: KindFlags = KindFlags(0b0000_0010);
    pub const STATEMENT: KindFlags = KindFlags(0b0000_0100);
    pub const VALUE: KindFlags = KindFlags(0b0000_1000);
    pub const DECLARABLE: KindFlags = KindFlags(0b0001_0000);
    pub const HAS_OPERATOR: KindFlags = KindFlags(0b0010_0000);

    pub fn contains(self, other: KindFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for KindFlags {
    type Output = KindFlags;
    fn bitor(self, rhs: KindFlags) -> KindFlags {
        KindFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for KindFlags {
    fn bitor_assign(&mut self, rhs: KindFlags) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub name: &'static str,
    pub flags: KindFlags,
}

fn category_flags(kind: &NodeKind) -> KindFlags {
    use NodeKind::*;
    match kind {
        TypeVoid
        | TypeBool
        | TypeInt { .. }
        | TypeFloat { .. }
        | TypeSymbol { .. }
        | TypePointer { .. }
        | TypeArray { .. }
        | TypeFunction { .. } => KindFlags::TYPE,

        DeclUnion { .. }
        | DeclStructure { .. }
        | DeclProperty { .. }
        | DeclInterface { .. }
        | DeclFunctionArgument { .. }
        | DeclFunction { .. }
        | DeclAssignment { .. }
        | DeclarationBlock { .. } => KindFlags::DECLARATION,

        StmtReturn { .. }
        | StmtIfConditionalClause { .. }
        | StmtIf { .. }
        | StmtWhile { .. }
        | StatementBlock { .. } => KindFlags::STATEMENT,

        ValueBool { .. }
        | ValueInt { .. }
        | ValueFloat { .. }
        | ValueCharacter { .. }
        | ValueString { .. }
        | ValueArray { .. }
        | ValueArrayRepeated { .. }
        | ValueStructure { .. }
        | ValueSymbol { .. }
        | ValueCall { .. }
        | ValueCallKeywordArgument { .. }
        | ValueCast { .. }
        | ValueUnary { .. }
        | ValueBinary { .. }
        | ValueAccess { .. }
        | ValueDereference { .. }
        | ValueGetAddress { .. } => KindFlags::VALUE,
    }
}

/// Builds the `KindInfo` record for `node`'s kind. Requesting
/// category-inapplicable data (e.g. `operator_symbol` on a non-operator
/// kind) is satisfied here by an absent bit/`None`, matching `spec.md`
/// §3 "unset function-pointers mean not applicable".
pub fn kind_info(node: &Node) -> KindInfo {
    let mut flags = category_flags(&node.kind);
    if node.is_declarable() {
        flags |= KindFlags::DECLARABLE;
    }
    if node.operator_symbol().is_some() {
        flags |= KindFlags::HAS_OPERATOR;
    }

    KindInfo {
        name: node.kind_name(),
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::operators::UnaryOperator;

    #[test]
    fn value_kind_carries_value_flag() {
        let node = Node::synthetic(NodeKind::ValueBool { value: true });
        let info = kind_info(&node);
        assert!(info.flags.contains(KindFlags::VALUE));
        assert!(!info.flags.contains(KindFlags::DECLARABLE));
    }

    #[test]
    fn operator_kind_carries_has_operator_flag() {
        let node = Node::synthetic(NodeKind::ValueUnary {
            operator: UnaryOperator::Negate,
            operand: Box::new(Node::synthetic(NodeKind::ValueBool { value: true })),
        });
        assert!(kind_info(&node).flags.contains(KindFlags::HAS_OPERATOR));
    }
}
