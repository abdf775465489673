//! The linker contract (`spec.md` §6 "Linker contract", §9 "Linker
//! support"). `LinkerConfig::detect` searches `PATH` for one of three
//! well-known LLD frontends; `link` builds the argv exactly as `spec.md`
//! specifies and spawns it through a [`Spawner`] so tests can substitute
//! a fake process instead of shelling out for real.

use crate::diagnostics::codes::fl;
use crate::diagnostics::{Message, MessageBuffer, Severity};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// The three linker frontends this crate knows how to drive, tried in
/// this order (`original_source/forge-compiler/include/forge/linking/configuration.h`'s
/// documented preference).
const CANDIDATES: &[&str] = &["ld.lld", "ld64.lld", "lld-link"];

#[derive(Debug, Clone)]
pub struct LinkerConfig {
    pub path: PathBuf,
}

impl LinkerConfig {
    /// Searches every directory on `PATH` for the first candidate name
    /// found, in `CANDIDATES` order.
    pub fn detect() -> Option<Self> {
        let path_var = std::env::var_os("PATH")?;
        for dir in std::env::split_paths(&path_var) {
            for candidate in CANDIDATES {
                let full = dir.join(candidate);
                if full.is_file() {
                    return Some(LinkerConfig { path: full });
                }
            }
        }
        None
    }

    /// Like [`Self::detect`], but scans `PATH` only once per process —
    /// it doesn't change between one run's compile/link calls, and the
    /// harness re-links on every test.
    pub fn detect_cached() -> Option<&'static Self> {
        static CACHE: OnceCell<Option<LinkerConfig>> = OnceCell::new();
        CACHE.get_or_init(Self::detect).as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Executable,
    SharedLibrary,
}

/// The outcome of spawning a linker process, abstracted so tests can
/// supply a fake without actually exec'ing anything.
pub struct SpawnOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
}

/// Abstracts process launch so `link` is testable without a real LLD
/// binary on `PATH` (`SPEC_FULL.md` §6 "spawns via a small `Spawner`
/// trait so tests can substitute a fake process").
pub trait Spawner {
    fn spawn(&self, program: &Path, args: &[String]) -> std::io::Result<SpawnOutcome>;
}

/// Spawns the real system linker via `std::process::Command`.
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn(&self, program: &Path, args: &[String]) -> std::io::Result<SpawnOutcome> {
        let status = std::process::Command::new(program).args(args).status()?;
        Ok(SpawnOutcome {
            success: status.success(),
            exit_code: status.code(),
        })
    }
}

/// Builds the argv for `mode` and `objects`, per `spec.md` §6: "When
/// `mode=shared-library`, the argument vector prepends `--shared`, then
/// `-o output_path`, then all object paths."
fn build_argv(mode: LinkMode, output_path: &Path, objects: &[PathBuf]) -> Vec<String> {
    let mut argv = Vec::new();
    if mode == LinkMode::SharedLibrary {
        argv.push("--shared".to_string());
    }
    argv.push("-o".to_string());
    argv.push(output_path.display().to_string());
    argv.extend(objects.iter().map(|p| p.display().to_string()));
    argv
}

/// Links `objects` into `output_path`, emitting `fl-*` diagnostics into
/// `buffer` on failure (`spec.md` §6, §7 "Link errors").
pub fn link(
    buffer: &mut MessageBuffer,
    linker_config: Option<&LinkerConfig>,
    spawner: &dyn Spawner,
    mode: LinkMode,
    output_path: &Path,
    objects: &[PathBuf],
) -> bool {
    let Some(config) = linker_config else {
        log::error!("no linker detected on PATH");
        buffer.emit(
            Message::new(Severity::Error, "no linker detected on PATH").with_code(fl::NO_LINKER),
        );
        return false;
    };

    let argv = build_argv(mode, output_path, objects);
    log::debug!("invoking {} {:?}", config.path.display(), argv);

    match spawner.spawn(&config.path, &argv) {
        Ok(outcome) if outcome.success => {
            log::info!("linked {}", output_path.display());
            true
        }
        Ok(outcome) => {
            log::warn!("linker exited with status {:?}", outcome.exit_code);
            buffer.emit(
                Message::new(
                    Severity::Error,
                    format!(
                        "linker exited with status {:?}; argv = {:?}",
                        outcome.exit_code, argv
                    ),
                )
                .with_code(fl::EXITED_NONZERO),
            );
            false
        }
        Err(err) => {
            log::warn!("unable to spawn linker: {err}");
            buffer.emit(
                Message::new(Severity::Error, format!("unable to spawn linker: {err}"))
                    .with_code(fl::UNABLE_TO_SPAWN),
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSpawner {
        outcome: std::cell::RefCell<Option<SpawnOutcome>>,
    }

    impl FakeSpawner {
        fn succeeding() -> Self {
            FakeSpawner {
                outcome: std::cell::RefCell::new(Some(SpawnOutcome {
                    success: true,
                    exit_code: Some(0),
                })),
            }
        }

        fn failing() -> Self {
            FakeSpawner {
                outcome: std::cell::RefCell::new(Some(SpawnOutcome {
                    success: false,
                    exit_code: Some(1),
                })),
            }
        }
    }

    impl Spawner for FakeSpawner {
        fn spawn(&self, _program: &Path, _args: &[String]) -> std::io::Result<SpawnOutcome> {
            Ok(self.outcome.borrow_mut().take().expect("spawn called once"))
        }
    }

    #[test]
    fn no_linker_detected_emits_fl_3() {
        let mut buffer = MessageBuffer::new();
        let spawner = FakeSpawner::succeeding();
        let ok = link(
            &mut buffer,
            None,
            &spawner,
            LinkMode::Executable,
            Path::new("a.out"),
            &[],
        );
        assert!(!ok);
        assert!(buffer.messages().iter().any(|m| m.code == Some(fl::NO_LINKER)));
    }

    #[test]
    fn successful_link_emits_no_diagnostics() {
        let mut buffer = MessageBuffer::new();
        let config = LinkerConfig { path: PathBuf::from("/usr/bin/ld.lld") };
        let spawner = FakeSpawner::succeeding();
        let ok = link(
            &mut buffer,
            Some(&config),
            &spawner,
            LinkMode::SharedLibrary,
            Path::new("lib.so"),
            &[PathBuf::from("a.o")],
        );
        assert!(ok);
        assert!(!buffer.had_errors());
    }

    #[test]
    fn nonzero_exit_emits_fl_2() {
        let mut buffer = MessageBuffer::new();
        let config = LinkerConfig { path: PathBuf::from("/usr/bin/ld.lld") };
        let spawner = FakeSpawner::failing();
        let ok = link(
            &mut buffer,
            Some(&config),
            &spawner,
            LinkMode::Executable,
            Path::new("a.out"),
            &[PathBuf::from("a.o")],
        );
        assert!(!ok);
        assert!(buffer
            .messages()
            .iter()
            .any(|m| m.code == Some(fl::EXITED_NONZERO)));
    }

    #[test]
    fn shared_library_argv_prepends_shared_flag() {
        let argv = build_argv(LinkMode::SharedLibrary, Path::new("lib.so"), &[PathBuf::from("a.o")]);
        assert_eq!(argv, vec!["--shared", "-o", "lib.so", "a.o"]);
    }

    #[test]
    fn executable_argv_has_no_shared_flag() {
        let argv = build_argv(LinkMode::Executable, Path::new("a.out"), &[PathBuf::from("a.o")]);
        assert_eq!(argv, vec!["-o", "a.out", "a.o"]);
    }
}
