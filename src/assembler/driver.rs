//! C9: per-file orchestration plus the five on-disk output artifacts.
//!
//! Runs the tokenizer, binder, parser, and encoder in sequence, gating
//! each stage on the previous one leaving no errors on the bus, then
//! writes `.bin`/`.hex`/`.lst`/`.obj`/`.sym` next to the source file.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assembler::binder::bind_operands;
use crate::assembler::encoder::encode;
use crate::assembler::parser::parse;
use crate::assembler::symbol::SymbolTable;
use crate::assembler::tokenizer::tokenize_file;
use crate::diagnostics::NotificationBus;
use crate::source::SourceFile;
use crate::token::{AssembledWord, Token, TokenKind};

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Driver-level flags, distinct from the notification bus's own
/// `warning_as_error` since `print_ast` governs a side effect the bus
/// knows nothing about.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub warning_as_error: bool,
    pub print_ast: bool,
}

/// Per-file result the CLI uses for exit-status aggregation (spec §6:
/// "sum of per-file failure counts").
pub struct AssembleOutcome {
    pub path: PathBuf,
    pub error_count: usize,
    pub warning_count: usize,
}

impl AssembleOutcome {
    pub fn failed(&self) -> bool {
        self.error_count > 0
    }
}

pub fn assemble_file(
    path: &Path,
    options: &Options,
    bus: &mut NotificationBus,
) -> Result<AssembleOutcome, AssembleError> {
    let contents = fs::read_to_string(path).map_err(|source| AssembleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let source = SourceFile::from_string(path.display().to_string(), contents);

    let tokens = tokenize_file(&source, bus);
    let tokens = bind_operands(tokens, &source, bus);

    if options.print_ast {
        print_ast(&tokens);
    }

    let symbols = parse(&tokens, bus);

    if bus.has_errors() {
        return Ok(outcome(path, bus));
    }

    let words = encode(&tokens, &symbols, bus);

    if bus.has_errors() {
        return Ok(outcome(path, bus));
    }

    write_outputs(path, &words, &symbols).map_err(|source| AssembleError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(outcome(path, bus))
}

fn outcome(path: &Path, bus: &NotificationBus) -> AssembleOutcome {
    AssembleOutcome {
        path: path.to_path_buf(),
        error_count: bus.error_count(),
        warning_count: bus.warning_count(),
    }
}

/// One block per top-level token, nested lines per operand, rendered
/// right after tokenizing+binding and before the parser runs — matching
/// the original's `Token::compileAST()` call site.
fn print_ast(tokens: &[Token]) {
    for token in tokens {
        if token.kind == TokenKind::None {
            continue;
        }
        println!("{}", token.kind.describe());
        for operand in &token.operands {
            println!("  {} {}", operand.kind.describe(), operand.lexeme);
        }
    }
}

fn write_outputs(path: &Path, words: &[AssembledWord], symbols: &SymbolTable) -> io::Result<()> {
    let mut bin_file = fs::File::create(path.with_extension("bin"))?;
    let mut hex_file = fs::File::create(path.with_extension("hex"))?;
    let mut lst_file = fs::File::create(path.with_extension("lst"))?;
    let mut obj_file = fs::File::create(path.with_extension("obj"))?;
    let mut sym_file = fs::File::create(path.with_extension("sym"))?;

    for word in words {
        writeln!(bin_file, "{:016b}", word.bin)?;
        writeln!(hex_file, "{:04X}", word.bin)?;
        writeln!(lst_file, "{}", word.listing)?;
        obj_file.write_all(&word.bin.to_be_bytes())?;
    }

    write!(
        sym_file,
        "// Symbol table\n// Scope Level 0:\n//\t{:<30} Page Address\n//\t{:-<30} ------------\n",
        "Symbol Name", ""
    )?;
    for symbol in symbols.iter() {
        writeln!(sym_file, "//\t{:<30} {:04X}", symbol.name, symbol.address)?;
    }

    Ok(())
}
