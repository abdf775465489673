//! CLI argument parsing for the `forge` driver (`spec.md` §6 "CLI
//! surface").

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "forge", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Controls ANSI color in rendered diagnostics. Falls back to
    /// `FORGE_COLOR_MODE` when not given on the command line.
    #[arg(long, value_enum, global = true)]
    pub color_mode: Option<ColorMode>,

    /// Enable debug-level logging. Falls back to `FORGE_DEBUG`.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable trace-level logging (implies `--debug`).
    #[arg(long, global = true)]
    pub trace: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    Disabled,
    #[default]
    Auto,
    Enabled,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parses, verifies, compiles and links a source file.
    Compile {
        source: PathBuf,

        /// Where to write the linked artifact.
        #[arg(short, long)]
        output_path: Option<PathBuf>,
    },

    /// Parses a source file and prints its AST using the debug-print
    /// grammar.
    DumpAst { source: PathBuf },

    /// Parses, verifies and compiles a source file, printing the
    /// backend's textual IR.
    DumpIr { source: PathBuf },

    /// Links object files into an executable.
    Link { objects: Vec<PathBuf> },

    /// Prints help for the tool or a given command.
    Help { command: Option<String> },

    /// Prints version information.
    Version {
        #[arg(long)]
        short: bool,
    },
}
