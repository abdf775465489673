//! The `forge` command-line driver: wires the library's parse/verify
//! pipeline and the in-memory fake backend (`spec.md` §1 reserves a real
//! codegen backend and linker as external collaborators; this binary
//! uses `forge::harness::fake` so `dump-ir`/`compile` have something
//! concrete to run) behind the CLI surface `spec.md` §6 describes.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use forge::ast::DebugPrintLimits;
use forge::backend::CodegenBackend;
use forge::diagnostics::MessageBuffer;
use forge::harness::fake;
use forge::linker::{self, LinkMode, LinkerConfig, SpawnOutcome, Spawner};
use forge::source::{Source, SourceContext};
use forge::{parser, verifier};
use std::path::PathBuf;
use std::process::ExitCode;

struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn(&self, program: &std::path::Path, args: &[String]) -> std::io::Result<SpawnOutcome> {
        let status = std::process::Command::new(program).args(args).status()?;
        Ok(SpawnOutcome { success: status.success(), exit_code: status.code() })
    }
}

fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok()?.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn init_logging(cli: &Cli) {
    let debug_from_env = env_flag("FORGE_DEBUG").unwrap_or(false);
    let level = if cli.trace {
        log::LevelFilter::Trace
    } else if cli.debug || debug_from_env {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simple_logger::init_with_level(level.to_level().unwrap_or(log::Level::Info)).ok();
}

/// Whether diagnostics should carry ANSI color, resolved once per run
/// from `--color-mode`/`FORGE_COLOR_MODE` (`spec.md` §9 "push all
/// color... choices behind a single stream-capability value computed
/// once per stream").
fn color_enabled(cli: &Cli) -> bool {
    use cli::ColorMode;
    let mode = cli.color_mode.unwrap_or_else(|| match std::env::var("FORGE_COLOR_MODE").as_deref() {
        Ok("disabled") => ColorMode::Disabled,
        Ok("enabled") => ColorMode::Enabled,
        _ => ColorMode::Auto,
    });
    match mode {
        ColorMode::Disabled => false,
        ColorMode::Enabled => true,
        ColorMode::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
    }
}

fn render(buffer: &MessageBuffer, ctx: &SourceContext, color: bool) {
    let text = buffer.render_all(ctx);
    if color && buffer.had_errors() {
        print!("\x1b[31m{text}\x1b[0m");
    } else {
        print!("{text}");
    }
}

fn load_source(path: &PathBuf) -> Result<Source, ExitCode> {
    Source::from_file(path).map_err(|err| {
        eprintln!("error: unable to read '{}': {err}", path.display());
        ExitCode::FAILURE
    })
}

fn parse_and_verify(source: &Source) -> (forge::ast::Node, MessageBuffer) {
    let mut buffer = MessageBuffer::new();
    let mut ast = parser::parse(source, &mut buffer);
    if !buffer.had_errors() {
        verifier::verify(&mut ast, &mut buffer);
    }
    (ast, buffer)
}

fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    let color = color_enabled(&cli);

    match &cli.command {
        Commands::DumpAst { source } => {
            let source = match load_source(source) {
                Ok(s) => s,
                Err(code) => return code,
            };
            let (ast, buffer) = parse_and_verify(&source);
            println!("{}", ast.debug_print(DebugPrintLimits::default()));
            let mut ctx = SourceContext::new();
            ctx.insert(source);
            render(&buffer, &ctx, color);
            if buffer.had_errors() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }

        Commands::DumpIr { source } => {
            let source = match load_source(source) {
                Ok(s) => s,
                Err(code) => return code,
            };
            let (ast, buffer) = parse_and_verify(&source);
            if buffer.had_errors() {
                let mut ctx = SourceContext::new();
                ctx.insert(source);
                render(&buffer, &ctx, color);
                return ExitCode::FAILURE;
            }
            let (backend, _loader) = fake::new_pair();
            match backend.compile(&ast) {
                Ok(module) => {
                    let mut text = String::new();
                    backend.print(&module, &mut text).expect("writing to a String cannot fail");
                    println!("{text}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("error: codegen failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Compile { source, output_path } => {
            let source_value = match load_source(source) {
                Ok(s) => s,
                Err(code) => return code,
            };
            let (ast, mut buffer) = parse_and_verify(&source_value);
            if buffer.had_errors() {
                let mut ctx = SourceContext::new();
                ctx.insert(source_value);
                render(&buffer, &ctx, color);
                return ExitCode::FAILURE;
            }

            let (backend, _loader) = fake::new_pair();
            let module = match backend.compile(&ast) {
                Ok(module) => module,
                Err(err) => {
                    eprintln!("error: codegen failed: {err}");
                    return ExitCode::FAILURE;
                }
            };

            let object_path = output_path.clone().unwrap_or_else(|| PathBuf::from("a.out"));
            if let Err(err) = backend.write_object(&module, &object_path) {
                eprintln!("error: unable to write object: {err}");
                return ExitCode::FAILURE;
            }

            let linked = linker::link(
                &mut buffer,
                LinkerConfig::detect_cached(),
                &SystemSpawner,
                LinkMode::Executable,
                &object_path,
                &[object_path.clone()],
            );

            let mut ctx = SourceContext::new();
            ctx.insert(source_value);
            render(&buffer, &ctx, color);

            if linked { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }

        Commands::Link { objects } => {
            let mut buffer = MessageBuffer::new();
            let output_path = PathBuf::from("a.out");
            let linked = linker::link(
                &mut buffer,
                LinkerConfig::detect_cached(),
                &SystemSpawner,
                LinkMode::Executable,
                &output_path,
                objects,
            );
            render(&buffer, &SourceContext::new(), color);
            if linked { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }

        Commands::Help { command } => {
            match command {
                Some(name) => println!("no detailed help is available for '{name}' yet; try --help"),
                None => println!("{}", <Cli as clap::CommandFactory>::command().render_long_help()),
            }
            ExitCode::SUCCESS
        }

        Commands::Version { short } => {
            if *short {
                println!(env!("CARGO_PKG_VERSION"));
            } else {
                println!("forge {}", env!("CARGO_PKG_VERSION"));
            }
            ExitCode::SUCCESS
        }
    }
}

fn main() -> ExitCode {
    run()
}
