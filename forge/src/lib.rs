//! Front-end and middle-end of the forge ahead-of-time compiler: lexing,
//! parsing, AST representation, scope, the visitor framework, semantic
//! verification, diagnostic machinery and a compilation-test harness.
//! Code generation and linking are specified as traits
//! ([`backend::CodegenBackend`], [`linker`]) for an external
//! implementation to satisfy; this crate ships only a fake, in-memory
//! one for its own tests (`harness::fake`).

pub mod ast;
pub mod backend;
pub mod diagnostics;
pub mod harness;
pub mod lexcast;
pub mod linker;
pub mod location;
pub mod parser;
pub mod scope;
pub mod source;
pub mod verifier;
pub mod visitor;
