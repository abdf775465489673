//! In-process compilation-test helpers (`spec.md` §4.J). Earlier
//! versions of crates like this one shell out to a built compiler
//! binary and compare subprocess output; this harness runs entirely
//! in-memory (`forge::harness`), so these helpers call it directly
//! instead of spawning anything.

use forge::harness::{self, fake, Loader, TestKind, TestOptions};
use forge::linker::{LinkerConfig, SpawnOutcome, Spawner};
use std::path::{Path, PathBuf};

struct NoopSpawner;

impl Spawner for NoopSpawner {
    fn spawn(&self, _program: &Path, _args: &[String]) -> std::io::Result<SpawnOutcome> {
        Ok(SpawnOutcome { success: true, exit_code: Some(0) })
    }
}

fn object_path_for(source_path: &str) -> PathBuf {
    PathBuf::from(format!("/tmp/forge-test-{}.so", source_path.replace(['/', '.'], "_")))
}

/// Runs `source_text` through the full pipeline and asserts it links
/// and loads successfully, returning the function-call surface for
/// further assertions.
pub fn check_compilation_succeeds(source_path: &str, source_text: &str) -> Result<(), String> {
    let (backend, loader) = fake::new_pair();
    let spawner = NoopSpawner;
    let mut options = TestOptions::new(TestKind::ExpectSuccess, source_path, source_text);
    options.linker_config = Some(LinkerConfig { path: PathBuf::from("/usr/bin/ld.lld") });
    options.object_path = object_path_for(source_path);
    harness::run(&backend, &loader, &spawner, &mut options)
}

/// Like [`check_compilation_succeeds`], but also asserts that calling
/// `function_name` with no arguments returns `expected`.
pub fn check_function_returns(
    source_path: &str,
    source_text: &str,
    function_name: &str,
    expected: harness::eval::EvalValue,
) -> Result<(), String> {
    let (backend, loader) = fake::new_pair();
    let spawner = NoopSpawner;
    let mut options = TestOptions::new(TestKind::ExpectSuccess, source_path, source_text);
    options.linker_config = Some(LinkerConfig { path: PathBuf::from("/usr/bin/ld.lld") });
    options.object_path = object_path_for(source_path);
    harness::run(&backend, &loader, &spawner, &mut options)?;

    let handle = loader
        .load(&options.object_path)
        .map_err(|err| format!("unable to reload after a successful run: {err}"))?;
    harness::assert_function_returns_value(&loader, &handle, function_name, expected)
}

/// Asserts that `source_text` is rejected during parsing.
pub fn check_unable_to_parse(source_path: &str, source_text: &str) -> Result<(), String> {
    let (backend, loader) = fake::new_pair();
    let spawner = NoopSpawner;
    let mut options = TestOptions::new(TestKind::ExpectUnableToParse, source_path, source_text);
    harness::run(&backend, &loader, &spawner, &mut options)
}

/// Asserts that `source_text` parses but is rejected during
/// verification.
pub fn check_unable_to_verify(source_path: &str, source_text: &str) -> Result<(), String> {
    let (backend, loader) = fake::new_pair();
    let spawner = NoopSpawner;
    let mut options = TestOptions::new(TestKind::ExpectUnableToVerify, source_path, source_text);
    harness::run(&backend, &loader, &spawner, &mut options)
}
