//! # Introduction
//!
//! sysy-parse reads a small C-like language and builds an abstract syntax tree
//! in which every identifier is already bound to the symbol entry it refers
//! to. Name resolution happens while parsing: the parser owns a scope chain,
//! opens and closes scopes as it enters and leaves blocks and functions, and
//! rejects any use of a name that no enclosing scope declares.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ SymbolTable) → AST → text trace
//! ```
//!
//! 1. [`parser`]: tokenises the source, parses it and renders the AST.
//! 2. [`symbols`]: symbol entries and the [`symbols::SymbolTable`] scope chain.
//! 3. [`types`]: `int`, `void`, `const` and function types.
//! 4. [`driver`]: builtin seeding and file-level orchestration for the CLI.
//!
//! ## Example
//!
//! ```
//! let ast = sysy_parse::driver::parse_source("int main() { return getint(); }").unwrap();
//! assert!(ast.to_text().starts_with("program\n    FunctionDefine function name: main"));
//! ```

pub mod driver;
pub mod parser;
pub mod symbols;
pub mod types;
