//! Source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), resolving names through the scope chain
//! - [`ast`]: AST node definitions
//! - [`render`]: Indented text form of the AST
//!
//! # Supported Language
//!
//! - Types: `int`, `void`, `const`
//! - Statements: declarations, function definitions, blocks, assignments,
//!   `if`/`else`, `while`, `break`, `continue`, `return`
//! - Expressions: arithmetic, relational, logical, prefix unary, function calls
//! - Function parameters may carry default values
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one function per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod render;
mod statements;

pub use ast::Ast;
pub use parse::{ErrorKind, ParseError, Parser};
