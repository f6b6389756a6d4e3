//! Scope chain
//!
//! [`SymbolTable`] keeps the live scopes as a stack: the last scope is the
//! current one and each scope's parent is the one below it. The root scope
//! (level 0) is created with the table and holds globals and builtins.
//!
//! # Shadowing
//!
//! `install` only ever writes into the current scope. A name bound in an outer
//! scope is shadowed, not replaced, so it becomes visible again as soon as the
//! inner scope is closed. Redeclaring a name in the *same* scope silently
//! overwrites the earlier binding.

use super::entry::Symbol;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// `exit_scope` was called with only the root scope open
    #[error("cannot exit the root scope")]
    Underflow,
}

#[derive(Debug, Default)]
struct Scope {
    symbols: FxHashMap<String, Symbol>,
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Table with an empty root scope
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    /// Open a new empty scope nested in the current one
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
        log::debug!("enter scope {}", self.level());
    }

    /// Discard the current scope and make its parent current
    pub fn exit_scope(&mut self) -> Result<(), ScopeError> {
        if self.scopes.len() <= 1 {
            return Err(ScopeError::Underflow);
        }
        log::debug!("exit scope {}", self.level());
        self.scopes.pop();
        Ok(())
    }

    /// Bind `name` in the current scope
    pub fn install(&mut self, name: &str, symbol: Symbol) {
        let level = self.level();
        let scope = &mut self.scopes[level];
        if scope.symbols.insert(name.to_string(), symbol).is_some() {
            log::warn!("'{}' redeclared in scope {}", name, level);
        } else {
            log::debug!("install '{}' in scope {}", name, level);
        }
    }

    /// Resolve `name`, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
            .cloned()
    }

    /// Nesting depth of the current scope (root = 0)
    pub fn level(&self) -> usize {
        self.scopes.len() - 1
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
