//! Symbol model for the parser
//!
//! This module provides the name-resolution data the grammar consults while it
//! builds the tree:
//! - [`entry`]: [`SymbolEntry`] variants (identifier, constant, temporary) and the
//!   shared [`Symbol`] handle
//! - [`table`]: [`SymbolTable`], the chain of nested scopes
//!
//! # Ownership
//!
//! Entries are reference counted. A scope holds a handle for as long as the scope
//! is live; every AST node that resolved to the entry holds another. Closing a
//! scope therefore drops only the scope's map, and nodes built inside it keep
//! pointing at valid entries.

pub mod entry;
pub mod table;

pub use entry::{next_temporary_label, Symbol, SymbolEntry};
pub use table::{ScopeError, SymbolTable};
