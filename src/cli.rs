//! Command-line surface for the `as` driver binary (spec §6). The
//! simulator binary takes a single positional `.obj` path and needs no
//! derive-based parser of its own.

use std::path::PathBuf;

use clap::Parser;

/// `as [OPTIONS] <file> [<file>...]`
#[derive(Debug, Parser)]
#[command(name = "as", about = "Assemble toy assembly source into .bin/.hex/.lst/.obj/.sym")]
pub struct Args {
    /// After lexing, dump each token's AST block.
    #[arg(long)]
    pub print_ast: bool,

    /// Treat warnings as errors.
    #[arg(short = 'e', long = "error")]
    pub warnings_as_errors: bool,

    /// Suppress stdout/stderr output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Suppress warnings (no effect if `-e` is set).
    #[arg(long)]
    pub no_warn: bool,

    /// Disable ANSI escapes.
    #[arg(long, visible_alias = "no-colour")]
    pub no_color: bool,

    /// Source files to assemble. Empty is handled explicitly by the
    /// binary (spec: "No input files" -> exit 1), not by clap's own
    /// usage-error exit code.
    pub files: Vec<PathBuf>,
}
