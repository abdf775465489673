//! The abstract syntax tree: a closed algebra of node variants with
//! uniform per-variant operations (clone, structural compare, debug
//! print, formatted print, declaration-name, visitor traversal order,
//! type resolution).
//!
//! The "single process-wide kind-info table" is realized as compile-time
//! dispatch: `NodeKind` is a closed enum and every operation is a `match`
//! over it. `kind_info` still exposes the name/flags/operator-symbol
//! shape the original table carried, for introspection and testing.

mod compare;
mod debug_print;
mod format_print;
mod kind_info;
pub mod operators;

pub use compare::structural_eq;
pub use debug_print::{debug_print, DebugPrintLimits};
pub use format_print::format_print;
pub use kind_info::{KindFlags, KindInfo};

use crate::location::Range;
use operators::{BinaryOperator, UnaryOperator};

/// A fully owned AST node: the common header (`source_range`) plus a
/// variant-specific payload. The tree owns all of its children — it is
/// a tree, not a DAG (`spec.md` §3 "AST" invariants).
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub source_range: Range,
}

impl Node {
    pub fn new(kind: NodeKind, source_range: Range) -> Self {
        Node { kind, source_range }
    }

    /// Builds a node with the synthetic (non-source) range, for AST
    /// fragments constructed by tests or by the verifier rather than
    /// parsed from source text.
    pub fn synthetic(kind: NodeKind) -> Self {
        Node {
            kind,
            source_range: Range::synthetic(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    pub fn is_declarable(&self) -> bool {
        self.kind.is_declarable()
    }

    /// The canonical name used to key scope insertion, for kinds that
    /// have one. Returns `None` for kinds with no declaration-name
    /// getter in the kind-info table (e.g. `block`, `if`).
    pub fn declaration_name(&self) -> Option<&str> {
        use NodeKind::*;
        match &self.kind {
            DeclUnion { name, .. }
            | DeclStructure { name, .. }
            | DeclInterface { name, .. }
            | DeclFunction { name, .. } => Some(name),
            DeclProperty { name, .. } => Some(name),
            DeclAssignment { property, .. } => property.declaration_name(),
            DeclFunctionArgument { property, .. } => property.declaration_name(),
            _ => None,
        }
    }

    /// The operator symbol for operator-bearing kinds. Unlike most
    /// kind-info slots this is not a fixed-per-kind constant: `value_unary`
    /// and `value_binary` each carry one of several concrete operators, so
    /// the symbol is read from the payload rather than from `KindInfo`
    /// (documented in `DESIGN.md`).
    pub fn operator_symbol(&self) -> Option<&'static str> {
        match &self.kind {
            NodeKind::ValueUnary { operator, .. } => Some(operator.symbol()),
            NodeKind::ValueBinary { operator, .. } => Some(operator.symbol()),
            _ => None,
        }
    }

    pub fn compare(&self, other: &Node) -> bool {
        structural_eq(self, other)
    }

    pub fn debug_print(&self, limits: DebugPrintLimits) -> String {
        debug_print(self, limits)
    }

    pub fn format_print(&self) -> String {
        format_print(self)
    }
}

/// One variant per AST kind named in `spec.md` §3. Grouped by category
/// (type / declaration / statement / value), matching that section's
/// own grouping; `#[declarable]` marks the kinds a declaration block or
/// function argument list inserts into a scope frame by declaration
/// name.
#[derive(Debug, Clone, forge_derive::NodeInfo)]
pub enum NodeKind {
    // ---- Types ----
    TypeVoid,
    TypeBool,
    TypeInt {
        bit_width: u8,
        unsigned: bool,
    },
    TypeFloat {
        bit_width: u8,
    },
    TypeSymbol {
        name: String,
    },
    TypePointer {
        constant: bool,
        implicit_dereference: bool,
        pointee: Box<Node>,
    },
    TypeArray {
        length: u64,
        element: Box<Node>,
    },
    TypeFunction {
        positional_args: Vec<Node>,
        variadic_positional: bool,
        variadic_keyword: bool,
        return_type: Box<Node>,
    },

    // ---- Declarations ----
    #[declarable]
    DeclUnion {
        name: String,
        properties: Vec<Node>,
    },
    #[declarable]
    DeclStructure {
        name: String,
        properties: Vec<Node>,
    },
    DeclProperty {
        optional: bool,
        spread: bool,
        name: String,
        property_type: Box<Node>,
    },
    #[declarable]
    DeclInterface {
        abstract_: bool,
        name: String,
        extends: Vec<String>,
        members: Vec<Node>,
    },
    #[declarable]
    DeclFunctionArgument {
        keyword: bool,
        property: Box<Node>,
        default: Option<Box<Node>>,
    },
    #[declarable]
    DeclFunction {
        mutable: bool,
        override_: bool,
        name: String,
        function_type: Box<Node>,
        /// The function's own `function-argument` declarations, loaded
        /// into the body's scope frame (`spec.md` §4.G "function 'loads
        /// arguments'"). `function_type`'s `positional_args` stay pure
        /// type nodes, matching its `Types` category in `spec.md` §3;
        /// this field is the completion that category can't carry
        /// (names, defaults) and that the scope loader needs.
        arguments: Vec<Node>,
        body: Box<Node>,
    },
    #[declarable]
    DeclAssignment {
        property: Box<Node>,
        value: Box<Node>,
    },
    DeclarationBlock {
        children: Vec<Node>,
    },

    // ---- Statements ----
    StmtReturn {
        value: Option<Box<Node>>,
    },
    StmtIfConditionalClause {
        condition: Box<Node>,
        body: Box<Node>,
    },
    StmtIf {
        clauses: Vec<Node>,
        else_body: Option<Box<Node>>,
    },
    StmtWhile {
        condition: Box<Node>,
        body: Box<Node>,
    },
    StatementBlock {
        children: Vec<Node>,
    },

    // ---- Values ----
    ValueBool {
        value: bool,
    },
    ValueInt {
        value: u64,
        value_type: Box<Node>,
    },
    ValueFloat {
        value: f64,
        value_type: Box<Node>,
    },
    ValueCharacter {
        codepoint: u32,
    },
    ValueString {
        bytes: Vec<u8>,
    },
    ValueArray {
        elements: Vec<Node>,
    },
    ValueArrayRepeated {
        element: Box<Node>,
        count: u64,
    },
    ValueStructure {
        fields: Vec<Node>,
    },
    ValueSymbol {
        name: String,
    },
    ValueCall {
        callee: Box<Node>,
        positional_args: Vec<Node>,
        keyword_args: Vec<Node>,
    },
    ValueCallKeywordArgument {
        name: String,
        value: Box<Node>,
    },
    ValueCast {
        value: Box<Node>,
        target_type: Box<Node>,
    },
    ValueUnary {
        operator: UnaryOperator,
        operand: Box<Node>,
    },
    ValueBinary {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    ValueAccess {
        object: Box<Node>,
        member: String,
    },
    ValueDereference {
        pointer: Box<Node>,
    },
    ValueGetAddress {
        lvalue: Box<Node>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_name_reads_through_assignment_property() {
        let node = Node::synthetic(NodeKind::DeclAssignment {
            property: Box::new(Node::synthetic(NodeKind::DeclProperty {
                optional: false,
                spread: false,
                name: "x".into(),
                property_type: Box::new(Node::synthetic(NodeKind::TypeBool)),
            })),
            value: Box::new(Node::synthetic(NodeKind::ValueBool { value: true })),
        });
        assert_eq!(node.declaration_name(), Some("x"));
    }

    #[test]
    fn block_has_no_declaration_name() {
        let node = Node::synthetic(NodeKind::DeclarationBlock { children: vec![] });
        assert_eq!(node.declaration_name(), None);
    }

    #[test]
    fn declarable_flag_matches_spec_categories() {
        assert!(Node::synthetic(NodeKind::DeclFunction {
            mutable: false,
            override_: false,
            name: "f".into(),
            function_type: Box::new(Node::synthetic(NodeKind::TypeFunction {
                positional_args: vec![],
                variadic_positional: false,
                variadic_keyword: false,
                return_type: Box::new(Node::synthetic(NodeKind::TypeVoid)),
            })),
            arguments: vec![],
            body: Box::new(Node::synthetic(NodeKind::StatementBlock { children: vec![] })),
        })
        .is_declarable());
        assert!(!Node::synthetic(NodeKind::DeclarationBlock { children: vec![] }).is_declarable());
    }

    #[test]
    fn operator_symbol_reads_from_payload() {
        let node = Node::synthetic(NodeKind::ValueUnary {
            operator: UnaryOperator::Negate,
            operand: Box::new(Node::synthetic(NodeKind::ValueBool { value: true })),
        });
        assert_eq!(node.operator_symbol(), Some("-"));
    }
}
