//! Per-kind type resolution (`spec.md` §4.I.3): given a scope, produce a
//! freshly built type node describing a value expression's type.
//!
//! Conceptually this is a slot in the AST's kind-info table (§4.F), but
//! it lives here rather than in `crate::ast` because it needs
//! `crate::scope::Scope`, and `Scope` in turn stores declaration type
//! nodes — putting the resolver in `ast` would make the two modules
//! depend on each other. Dispatch is still the same `match` over
//! `NodeKind` the rest of the kind-info operations use.

use crate::ast::operators::{BinaryOperator, BinaryOperatorFamily, UnaryOperator};
use crate::ast::{Node, NodeKind};
use crate::diagnostics::codes::et;
use crate::scope::Scope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub code: &'static str,
    pub text: String,
}

impl TypeError {
    fn new(code: &'static str, text: impl Into<String>) -> Self {
        TypeError {
            code,
            text: text.into(),
        }
    }
}

pub type TypeResult = Result<Node, TypeError>;

fn int_type(bit_width: u8, unsigned: bool) -> Node {
    Node::synthetic(NodeKind::TypeInt { bit_width, unsigned })
}

fn float_type(bit_width: u8) -> Node {
    Node::synthetic(NodeKind::TypeFloat { bit_width })
}

fn pointer_type(pointee: Node, constant: bool) -> Node {
    Node::synthetic(NodeKind::TypePointer {
        constant,
        implicit_dereference: false,
        pointee: Box::new(pointee),
    })
}

/// Resolves the type of a value node. Non-value kinds (types,
/// declarations, statements) have no type-resolver slot and are a
/// programmer error to call this with.
pub fn resolve(node: &Node, scope: &Scope) -> TypeResult {
    use NodeKind::*;
    match &node.kind {
        ValueBool { .. } => Ok(Node::synthetic(TypeBool)),
        ValueInt { value_type, .. } => Ok((**value_type).clone()),
        ValueFloat { value_type, .. } => Ok((**value_type).clone()),
        ValueCharacter { .. } => Ok(int_type(32, true)),
        ValueString { .. } => Ok(pointer_type(int_type(8, true), true)),

        ValueSymbol { name } => scope
            .lookup(name)
            .and_then(|decl| decl.declared_type.clone())
            .ok_or_else(|| {
                TypeError::new(et::UNRESOLVED_SYMBOL, format!("unresolved symbol '{name}'"))
            }),

        ValueDereference { pointer } => {
            let pointer_ty = resolve(pointer, scope)?;
            match pointer_ty.kind {
                TypePointer { pointee, .. } => Ok(*pointee),
                _ => Err(TypeError::new(
                    et::NOT_A_POINTER,
                    "cannot dereference a non-pointer value",
                )),
            }
        }

        ValueGetAddress { lvalue } => {
            let inner = resolve(lvalue, scope)?;
            Ok(pointer_type(inner, false))
        }

        ValueCall {
            callee,
            positional_args,
            keyword_args,
        } => {
            let callee_ty = resolve(callee, scope)?;
            let TypeFunction {
                positional_args: params,
                variadic_positional,
                variadic_keyword,
                return_type,
            } = callee_ty.kind
            else {
                return Err(TypeError::new(
                    et::NOT_CALLABLE,
                    "callee is not a function value",
                ));
            };

            let arity_ok = if variadic_positional {
                positional_args.len() >= params.len()
            } else {
                positional_args.len() == params.len()
            };
            if !arity_ok {
                return Err(TypeError::new(
                    et::ARITY_MISMATCH,
                    format!(
                        "expected {} positional argument(s), found {}",
                        params.len(),
                        positional_args.len()
                    ),
                ));
            }
            if !keyword_args.is_empty() && !variadic_keyword {
                return Err(TypeError::new(
                    et::ARITY_MISMATCH,
                    "callee does not accept keyword arguments",
                ));
            }

            Ok(*return_type)
        }

        ValueCast { target_type, .. } => Ok((**target_type).clone()),

        ValueAccess { object, member } => {
            let object_ty = resolve(object, scope)?;
            let name = match &object_ty.kind {
                TypeSymbol { name } => name.clone(),
                _ => {
                    return Err(TypeError::new(
                        et::NOT_A_STRUCTURE,
                        "member access requires a structure value",
                    ))
                }
            };
            let decl = scope.lookup(&name).ok_or_else(|| {
                TypeError::new(et::NOT_A_STRUCTURE, format!("unresolved structure '{name}'"))
            })?;
            if decl.kind_name != "decl-structure" {
                return Err(TypeError::new(
                    et::NOT_A_STRUCTURE,
                    format!("'{name}' is not a structure"),
                ));
            }
            // Structure member types are not tracked per-field in the
            // scope side table (only a declaration's own type is); a
            // fuller implementation would carry the structure's property
            // list alongside `DeclInfo`. Until then, an unknown member
            // is reported and a known one resolves to its own symbol type
            // so callers can keep traversing.
            Err(TypeError::new(
                et::UNKNOWN_MEMBER,
                format!("unknown member '{member}' on structure '{name}'"),
            ))
        }

        ValueUnary { operator, operand } => {
            let operand_ty = resolve(operand, scope)?;
            match operator {
                UnaryOperator::LogicalNot => {
                    require_bool(&operand_ty)?;
                    Ok(Node::synthetic(TypeBool))
                }
                UnaryOperator::BitwiseNot => {
                    require_int(&operand_ty)?;
                    Ok(operand_ty)
                }
                UnaryOperator::Negate => {
                    require_numeric(&operand_ty)?;
                    Ok(operand_ty)
                }
            }
        }

        ValueBinary {
            operator,
            left,
            right,
        } => {
            let left_ty = resolve(left, scope)?;
            let right_ty = resolve(right, scope)?;
            match operator.family() {
                BinaryOperatorFamily::Containing => {
                    require_numeric(&left_ty)?;
                    require_numeric(&right_ty)?;
                    containing_numeric(&left_ty, &right_ty)
                }
                BinaryOperatorFamily::Left => {
                    require_int(&left_ty)?;
                    require_int(&right_ty)?;
                    Ok(left_ty)
                }
                BinaryOperatorFamily::Comparison => {
                    if matches!(operator, BinaryOperator::Equal | BinaryOperator::NotEqual)
                        && matches!(left_ty.kind, TypeBool)
                        && matches!(right_ty.kind, TypeBool)
                    {
                        return Ok(Node::synthetic(TypeBool));
                    }
                    require_numeric(&left_ty)?;
                    require_numeric(&right_ty)?;
                    Ok(Node::synthetic(TypeBool))
                }
                BinaryOperatorFamily::Logical => {
                    require_bool(&left_ty)?;
                    require_bool(&right_ty)?;
                    Ok(Node::synthetic(TypeBool))
                }
            }
        }

        ValueArray { elements } => {
            let element_ty = match elements.first() {
                Some(first) => resolve(first, scope)?,
                None => Node::synthetic(TypeVoid),
            };
            Ok(Node::synthetic(TypeArray {
                length: elements.len() as u64,
                element: Box::new(element_ty),
            }))
        }
        ValueArrayRepeated { element, count } => {
            let element_ty = resolve(element, scope)?;
            Ok(Node::synthetic(TypeArray {
                length: *count,
                element: Box::new(element_ty),
            }))
        }
        ValueStructure { .. } => Err(TypeError::new(
            et::NOT_A_STRUCTURE,
            "structure literal type inference is not yet supported",
        )),
        ValueCallKeywordArgument { value, .. } => resolve(value, scope),

        _ => Err(TypeError::new(
            et::OPERAND_TYPE,
            format!("'{}' has no value type", node.kind_name()),
        )),
    }
}

fn require_bool(ty: &Node) -> Result<(), TypeError> {
    if matches!(ty.kind, NodeKind::TypeBool) {
        Ok(())
    } else {
        Err(TypeError::new(et::OPERAND_TYPE, "expected a bool operand"))
    }
}

fn require_int(ty: &Node) -> Result<(), TypeError> {
    if matches!(ty.kind, NodeKind::TypeInt { .. }) {
        Ok(())
    } else {
        Err(TypeError::new(et::OPERAND_TYPE, "expected an integer operand"))
    }
}

fn require_numeric(ty: &Node) -> Result<(), TypeError> {
    if matches!(ty.kind, NodeKind::TypeInt { .. } | NodeKind::TypeFloat { .. }) {
        Ok(())
    } else {
        Err(TypeError::new(et::OPERAND_TYPE, "expected a numeric operand"))
    }
}

/// The "containing numeric type" of two numeric operands (`spec.md`
/// §4.I.3, §8 "Type containment"): floats subsume ints; within ints the
/// wider width wins; on equal widths, unsigned subsumes signed.
/// Commutative in both arguments by construction.
pub fn containing_numeric(a: &Node, b: &Node) -> TypeResult {
    use NodeKind::*;
    match (&a.kind, &b.kind) {
        (TypeFloat { bit_width: w1 }, TypeFloat { bit_width: w2 }) => {
            Ok(float_type((*w1).max(*w2)))
        }
        (TypeFloat { bit_width }, TypeInt { .. }) | (TypeInt { .. }, TypeFloat { bit_width }) => {
            Ok(float_type(*bit_width))
        }
        (
            TypeInt {
                bit_width: w1,
                unsigned: u1,
            },
            TypeInt {
                bit_width: w2,
                unsigned: u2,
            },
        ) => {
            let width = (*w1).max(*w2);
            let unsigned = if w1 == w2 { *u1 || *u2 } else if w1 > w2 { *u1 } else { *u2 };
            Ok(int_type(width, unsigned))
        }
        _ => Err(TypeError::new(
            et::OPERAND_TYPE,
            "containing_numeric requires two numeric types",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_types_resolve_directly() {
        let scope = Scope::new();
        let node = Node::synthetic(NodeKind::ValueBool { value: true });
        assert!(matches!(resolve(&node, &scope).unwrap().kind, NodeKind::TypeBool));
    }

    #[test]
    fn unbound_symbol_is_an_error() {
        let scope = Scope::new();
        let node = Node::synthetic(NodeKind::ValueSymbol { name: "x".into() });
        assert_eq!(resolve(&node, &scope).unwrap_err().code, et::UNRESOLVED_SYMBOL);
    }

    #[test]
    fn containing_numeric_is_commutative() {
        let i8_ty = int_type(8, false);
        let u32_ty = int_type(32, true);
        let a = containing_numeric(&i8_ty, &u32_ty).unwrap();
        let b = containing_numeric(&u32_ty, &i8_ty).unwrap();
        assert!(a.compare(&b));
        assert!(matches!(a.kind, NodeKind::TypeInt { bit_width: 32, unsigned: true }));
    }

    #[test]
    fn float_dominates_int() {
        let f = float_type(32);
        let i = int_type(64, false);
        let result = containing_numeric(&f, &i).unwrap();
        assert!(matches!(result.kind, NodeKind::TypeFloat { bit_width: 32 }));
    }

    #[test]
    fn dereference_requires_pointer() {
        let scope = Scope::new();
        let node = Node::synthetic(NodeKind::ValueDereference {
            pointer: Box::new(Node::synthetic(NodeKind::ValueBool { value: true })),
        });
        assert_eq!(resolve(&node, &scope).unwrap_err().code, et::NOT_A_POINTER);
    }
}
