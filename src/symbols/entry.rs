//! Symbol entries
//!
//! A [`SymbolEntry`] is the resolved identity behind a name or a synthesized
//! value. Entries never change after creation; a redeclaration in an inner
//! scope produces a new entry that shadows the old one.

use crate::types::Type;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared handle to an entry, held by scopes and AST nodes alike
pub type Symbol = Rc<SymbolEntry>;

static TEMPORARY_LABEL: AtomicUsize = AtomicUsize::new(0);

/// Next label for a temporary. Labels are unique for the whole process, across
/// scopes and across parses.
pub fn next_temporary_label() -> usize {
    TEMPORARY_LABEL.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolEntry {
    /// Declared variable, parameter or function
    Identifier { name: String, ty: Type, scope: usize },
    /// Integer literal occurrence
    Constant { value: i32, ty: Type },
    /// Result of a computed expression; not addressable by name
    Temporary { label: usize, ty: Type },
}

impl SymbolEntry {
    pub fn identifier(name: impl Into<String>, ty: Type, scope: usize) -> Symbol {
        Rc::new(SymbolEntry::Identifier {
            name: name.into(),
            ty,
            scope,
        })
    }

    pub fn constant(value: i32) -> Symbol {
        Rc::new(SymbolEntry::Constant {
            value,
            ty: Type::Int,
        })
    }

    /// Fresh `int` temporary with the next process-wide label
    pub fn temporary() -> Symbol {
        let label = next_temporary_label();
        log::trace!("synthesized temporary t{}", label);
        Rc::new(SymbolEntry::Temporary {
            label,
            ty: Type::Int,
        })
    }

    pub fn ty(&self) -> &Type {
        match self {
            SymbolEntry::Identifier { ty, .. }
            | SymbolEntry::Constant { ty, .. }
            | SymbolEntry::Temporary { ty, .. } => ty,
        }
    }

    /// Declaration depth, for identifiers only
    pub fn scope(&self) -> Option<usize> {
        match self {
            SymbolEntry::Identifier { scope, .. } => Some(*scope),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SymbolEntry::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Literal value, for constants only
    pub fn value(&self) -> Option<i32> {
        match self {
            SymbolEntry::Constant { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<usize> {
        match self {
            SymbolEntry::Temporary { label, .. } => Some(*label),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolEntry::Identifier { name, .. } => write!(f, "{}", name),
            SymbolEntry::Constant { value, .. } => write!(f, "{}", value),
            SymbolEntry::Temporary { label, .. } => write!(f, "t{}", label),
        }
    }
}
