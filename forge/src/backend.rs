//! The codegen backend contract (`spec.md` §6 "Backend codegen
//! contract"). This crate specifies only the interface the front end
//! requires of a backend — no concrete LLVM/Cranelift implementation is
//! in scope (`spec.md` §1 "Non-goals"). A fake, in-memory implementation
//! for tests lives in [`crate::harness::fake`].

use crate::ast::Node;
use std::fmt;
use std::io;
use std::path::Path;

/// A codegen backend, consumed by the harness (`spec.md` §4.J step 5).
/// `Module` carries its own teardown via `Drop` rather than an explicit
/// `destroy` operation (`SPEC_FULL.md` §6 "`destroy` ... satisfied by
/// `Drop`").
pub trait CodegenBackend {
    type Module;
    type Error: fmt::Display;

    /// Lowers a verified AST root into a `Module`, or fails.
    fn compile(&self, ast: &Node) -> Result<Self::Module, Self::Error>;

    /// Emits textual IR for `module` into `out`.
    fn print(&self, module: &Self::Module, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Writes `module` as an object file at `path`.
    fn write_object(&self, module: &Self::Module, path: &Path) -> io::Result<()>;
}
