//! Front-end orchestration
//!
//! Loads a source file, seeds the builtin functions into a fresh root scope,
//! runs the parser and writes the requested dumps to the output file.

use crate::parser::lexer::Lexer;
use crate::parser::{Ast, ParseError, Parser};
use crate::symbols::{SymbolEntry, SymbolTable};
use crate::types::Type;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What to read, where to write and which dumps to produce
#[derive(Debug, Clone)]
pub struct Options {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dump_ast: bool,
    pub dump_tokens: bool,
}

impl Options {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Options {
            input: input.into(),
            output: PathBuf::from("a.out"),
            dump_ast: false,
            dump_tokens: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Functions every program can call without declaring them
const BUILTINS: [(&str, Type); 3] = [
    ("getint", Type::Int),
    ("putint", Type::Void),
    ("putch", Type::Void),
];

/// Install the builtin functions into the root scope
pub fn seed_builtins(symbols: &mut SymbolTable) {
    for (name, return_type) in BUILTINS {
        let ty = Type::function(return_type, Vec::new());
        symbols.install(name, SymbolEntry::identifier(name, ty, 0));
    }
}

/// Parse `source` against a root scope holding only the builtins
pub fn parse_source(source: &str) -> Result<Ast, ParseError> {
    let mut symbols = SymbolTable::new();
    seed_builtins(&mut symbols);
    Parser::with_symbols(source, symbols)?.parse_program()
}

/// One token per line, with its position
pub fn dump_tokens(source: &str) -> Result<String, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut out = String::new();
    for token in &tokens {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}\t{}", token.location(), token);
    }
    Ok(out)
}

/// Parse the input file and write the requested dumps to the output file.
///
/// The output file is created even when no dump is requested. Nothing is
/// written when parsing fails.
pub fn run(options: &Options) -> Result<(), DriverError> {
    let source = fs::read_to_string(&options.input).map_err(|source| DriverError::Read {
        path: options.input.clone(),
        source,
    })?;
    log::info!("parsing {}", options.input.display());

    let mut out = String::new();
    if options.dump_tokens {
        out.push_str(&dump_tokens(&source)?);
    }

    let ast = parse_source(&source)?;
    let count = ast
        .root
        .as_ref()
        .map_or(0, |root| root.statements().len());
    log::info!("parsed {} top-level statements", count);

    if options.dump_ast {
        out.push_str(&ast.to_text());
    }

    write_output(&options.output, &out)?;
    log::info!("wrote {}", options.output.display());
    Ok(())
}

fn write_output(path: &Path, text: &str) -> Result<(), DriverError> {
    fs::write(path, text).map_err(|source| DriverError::Write {
        path: path.to_path_buf(),
        source,
    })
}
