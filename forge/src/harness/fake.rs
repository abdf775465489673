//! An in-memory `CodegenBackend` + loader pair so the compilation-test
//! harness can drive its whole pipeline — compile, write an object, link,
//! load, call a function — without a real LLVM backend or dynamic linker
//! (`spec.md` §1 "Non-goals" excludes both from this crate's scope).
//!
//! `FakeBackend::write_object` and `FakeLoader::load` share one registry
//! keyed by output path, so "linking" is really just handing the
//! already-compiled function list from the write side to the load side.

use super::eval::{exec_block, EvalValue};
use super::Loader;
use crate::ast::{debug_print, DebugPrintLimits, Node, NodeKind};
use crate::backend::CodegenBackend;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A compiled module: the ordered list of top-level functions, kept as
/// `Vec` rather than `HashMap` so `print`'s textual IR is deterministic
/// and comparable across runs (`spec.md` §4.J "IR text compares equal
/// byte-for-byte").
#[derive(Debug, Clone)]
pub struct FakeModule {
    functions: Vec<(String, Node)>,
}

type Registry = Rc<RefCell<HashMap<PathBuf, Vec<(String, Node)>>>>;

#[derive(Debug)]
pub struct FakeCompileError(pub String);

impl fmt::Display for FakeCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct FakeBackend {
    registry: Registry,
}

impl CodegenBackend for FakeBackend {
    type Module = FakeModule;
    type Error = FakeCompileError;

    fn compile(&self, ast: &Node) -> Result<Self::Module, Self::Error> {
        let NodeKind::DeclarationBlock { children } = &ast.kind else {
            return Err(FakeCompileError(
                "codegen root must be a declaration-block".into(),
            ));
        };
        let mut functions = Vec::new();
        for child in children {
            if let NodeKind::DeclFunction { name, body, .. } = &child.kind {
                functions.push((name.clone(), body.as_ref().clone()));
            }
        }
        Ok(FakeModule { functions })
    }

    fn print(&self, module: &Self::Module, out: &mut dyn fmt::Write) -> fmt::Result {
        for (name, body) in &module.functions {
            writeln!(out, "fn {name}:")?;
            writeln!(out, "{}", debug_print(body, DebugPrintLimits::default()))?;
        }
        Ok(())
    }

    fn write_object(&self, module: &Self::Module, path: &Path) -> io::Result<()> {
        self.registry
            .borrow_mut()
            .insert(path.to_path_buf(), module.functions.clone());
        Ok(())
    }
}

pub struct FakeHandle {
    functions: Vec<(String, Node)>,
}

#[derive(Debug)]
pub struct FakeLoadError(pub String);

impl fmt::Display for FakeLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct FakeLoader {
    registry: Registry,
}

impl Loader for FakeLoader {
    type Handle = FakeHandle;
    type Error = FakeLoadError;

    fn load(&self, path: &Path) -> Result<Self::Handle, Self::Error> {
        let functions = self
            .registry
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| FakeLoadError(format!("no object was ever linked at {}", path.display())))?;
        Ok(FakeHandle { functions })
    }

    fn get_function(&self, handle: &Self::Handle, name: &str) -> Option<Box<dyn Fn() -> Option<EvalValue>>> {
        let body = handle
            .functions
            .iter()
            .find(|(candidate, _)| candidate == name)?
            .1
            .clone();
        Some(Box::new(move || exec_block(&body).flatten()))
    }
}

/// Builds a `FakeBackend`/`FakeLoader` pair sharing one write-then-read
/// registry, standing in for "compile, link, then dlopen the result".
pub fn new_pair() -> (FakeBackend, FakeLoader) {
    let registry: Registry = Rc::new(RefCell::new(HashMap::new()));
    (
        FakeBackend { registry: registry.clone() },
        FakeLoader { registry },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::operators::BinaryOperator;
    use crate::location::Range;

    fn int_type() -> Node {
        Node::synthetic(NodeKind::TypeInt { bit_width: 32, unsigned: false })
    }

    fn int(value: u64) -> Node {
        Node::synthetic(NodeKind::ValueInt { value, value_type: Box::new(int_type()) })
    }

    fn answer_function() -> Node {
        Node::synthetic(NodeKind::DeclFunction {
            mutable: false,
            override_: false,
            name: "answer".to_string(),
            function_type: Box::new(Node::synthetic(NodeKind::TypeFunction {
                positional_args: vec![],
                variadic_positional: false,
                variadic_keyword: false,
                return_type: Box::new(int_type()),
            })),
            arguments: vec![],
            body: Box::new(Node::synthetic(NodeKind::StatementBlock {
                children: vec![Node::synthetic(NodeKind::StmtReturn {
                    value: Some(Box::new(Node::new(
                        NodeKind::ValueBinary {
                            operator: BinaryOperator::Add,
                            left: Box::new(int(40)),
                            right: Box::new(int(2)),
                        },
                        Range::synthetic(),
                    ))),
                })],
            })),
        })
    }

    #[test]
    fn compiles_links_loads_and_calls_a_function() {
        let (backend, loader) = new_pair();
        let ast = Node::synthetic(NodeKind::DeclarationBlock { children: vec![answer_function()] });
        let module = backend.compile(&ast).expect("compiles");
        let path = PathBuf::from("/tmp/fake.so");
        backend.write_object(&module, &path).expect("writes");

        let handle = loader.load(&path).expect("loads");
        let call = loader.get_function(&handle, "answer").expect("function exists");
        assert_eq!(call(), Some(EvalValue::Int(42)));
    }

    #[test]
    fn loading_an_unlinked_path_fails() {
        let (_backend, loader) = new_pair();
        assert!(loader.load(Path::new("/tmp/missing.so")).is_err());
    }
}
