// AST (Abstract Syntax Tree) definitions for the parser

use crate::symbols::Symbol;
use crate::types::Type;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sequential node number, assigned at construction (debug use only)
pub type NodeId = usize;

static NODE_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn next_node_id() -> NodeId {
    NODE_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Binary operators, lowest precedence group last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Multiplicative
    Mul,
    Div,
    Mod,
    // Additive
    Add,
    Sub,
    // Relational and equality (one precedence level)
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    // Logical
    And,
    Or,
}

/// Prefix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,    // -x
    Pos,    // +x
    Not,    // !x
    PreInc, // ++x
    PreDec, // --x
}

#[derive(Debug, Clone)]
pub enum Expr {
    BinaryOp {
        id: NodeId,
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        result: Symbol,
    },
    UnaryOp {
        id: NodeId,
        op: UnOp,
        operand: Box<Expr>,
        result: Symbol,
    },
    Identifier {
        id: NodeId,
        symbol: Symbol,
        /// Literal default value, set for function parameters only
        value: Option<i32>,
    },
    FunctionCall {
        id: NodeId,
        callee: Symbol,
        args: Option<ParameterList>,
    },
    Literal {
        id: NodeId,
        symbol: Symbol,
    },
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr, result: Symbol) -> Self {
        Expr::BinaryOp {
            id: next_node_id(),
            op,
            left: Box::new(left),
            right: Box::new(right),
            result,
        }
    }

    pub fn unary(op: UnOp, operand: Expr, result: Symbol) -> Self {
        Expr::UnaryOp {
            id: next_node_id(),
            op,
            operand: Box::new(operand),
            result,
        }
    }

    pub fn identifier(symbol: Symbol) -> Self {
        Expr::Identifier {
            id: next_node_id(),
            symbol,
            value: None,
        }
    }

    pub fn identifier_with_value(symbol: Symbol, value: i32) -> Self {
        Expr::Identifier {
            id: next_node_id(),
            symbol,
            value: Some(value),
        }
    }

    pub fn call(callee: Symbol, args: Option<ParameterList>) -> Self {
        Expr::FunctionCall {
            id: next_node_id(),
            callee,
            args,
        }
    }

    pub fn literal(symbol: Symbol) -> Self {
        Expr::Literal {
            id: next_node_id(),
            symbol,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Expr::BinaryOp { id, .. }
            | Expr::UnaryOp { id, .. }
            | Expr::Identifier { id, .. }
            | Expr::FunctionCall { id, .. }
            | Expr::Literal { id, .. } => *id,
        }
    }

    /// The entry standing for this expression's value
    pub fn symbol(&self) -> &Symbol {
        match self {
            Expr::BinaryOp { result, .. } | Expr::UnaryOp { result, .. } => result,
            Expr::Identifier { symbol, .. } | Expr::Literal { symbol, .. } => symbol,
            Expr::FunctionCall { callee, .. } => callee,
        }
    }
}

/// Function parameter after installation in the parameter scope
#[derive(Debug, Clone)]
pub struct Parameter {
    /// `Expr::Identifier` for the installed entry
    pub ident: Expr,
    pub default: Option<Expr>,
}

impl Parameter {
    pub fn name(&self) -> &str {
        self.ident.symbol().name().unwrap_or_default()
    }

    pub fn ty(&self) -> &Type {
        self.ident.symbol().ty()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Parameters of a definition, or arguments of a call
#[derive(Debug, Clone)]
pub enum ParameterList {
    Formal(Vec<Parameter>),
    Arguments(Vec<Expr>),
}

impl ParameterList {
    pub fn len(&self) -> usize {
        match self {
            ParameterList::Formal(params) => params.len(),
            ParameterList::Arguments(args) => args.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Names of one declaration statement with their initializers.
///
/// Keyed by name: entries come back in lexicographic order, not source order,
/// and a name repeated in the same statement keeps its last initializer.
#[derive(Debug, Default)]
pub struct DeclarationList {
    names: BTreeMap<String, Option<Expr>>,
}

impl DeclarationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, init: Option<Expr>) {
        self.names.insert(name, init);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IntoIterator for DeclarationList {
    type Item = (String, Option<Expr>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Option<Expr>>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Sequence {
        id: NodeId,
        first: Box<Stmt>,
        next: Box<Stmt>,
    },
    Block {
        id: NodeId,
        inner: Box<Stmt>,
    },
    Declaration {
        id: NodeId,
        /// `Expr::Identifier` of each installed name, with its initializer
        decls: Vec<(Expr, Option<Expr>)>,
    },
    If {
        id: NodeId,
        condition: Expr,
        then_branch: Box<Stmt>,
    },
    IfElse {
        id: NodeId,
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    While {
        id: NodeId,
        condition: Expr,
        body: Box<Stmt>,
    },
    Break {
        id: NodeId,
    },
    Continue {
        id: NodeId,
    },
    Return {
        id: NodeId,
        expr: Expr,
    },
    Expression {
        id: NodeId,
        expr: Expr,
    },
    Assign {
        id: NodeId,
        target: Expr,
        expr: Expr,
    },
    Empty {
        id: NodeId,
    },
    EmptyBlock {
        id: NodeId,
    },
    FunctionDef {
        id: NodeId,
        symbol: Symbol,
        params: Option<ParameterList>,
        body: Box<Stmt>,
    },
}

impl Stmt {
    /// Chain statements into a right-nested `Sequence`; `None` when empty
    pub fn sequence(stmts: Vec<Stmt>) -> Option<Stmt> {
        stmts.into_iter().rev().reduce(|next, first| Stmt::Sequence {
            id: next_node_id(),
            first: Box::new(first),
            next: Box::new(next),
        })
    }

    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Sequence { id, .. }
            | Stmt::Block { id, .. }
            | Stmt::Declaration { id, .. }
            | Stmt::If { id, .. }
            | Stmt::IfElse { id, .. }
            | Stmt::While { id, .. }
            | Stmt::Break { id }
            | Stmt::Continue { id }
            | Stmt::Return { id, .. }
            | Stmt::Expression { id, .. }
            | Stmt::Assign { id, .. }
            | Stmt::Empty { id }
            | Stmt::EmptyBlock { id }
            | Stmt::FunctionDef { id, .. } => *id,
        }
    }

    /// Flatten a `Sequence` chain back into its statements
    pub fn statements(&self) -> Vec<&Stmt> {
        let mut stmts = Vec::new();
        let mut current = self;
        while let Stmt::Sequence { first, next, .. } = current {
            stmts.extend(first.statements());
            current = next;
        }
        stmts.push(current);
        stmts
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Ast {
    pub root: Option<Stmt>,
}

impl Ast {
    pub fn new(root: Stmt) -> Self {
        Ast { root: Some(root) }
    }

    pub fn into_root(mut self) -> Option<Stmt> {
        self.root.take()
    }
}

// Sequence chains grow with the statement count; take the tree apart with an
// explicit worklist instead of recursive drop glue.
impl Drop for Ast {
    fn drop(&mut self) {
        let mut pending: Vec<Stmt> = self.root.take().into_iter().collect();
        while let Some(stmt) = pending.pop() {
            match stmt {
                Stmt::Sequence { first, next, .. } => {
                    pending.push(*first);
                    pending.push(*next);
                }
                Stmt::Block { inner, .. } => pending.push(*inner),
                Stmt::If { then_branch, .. } => pending.push(*then_branch),
                Stmt::IfElse {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    pending.push(*then_branch);
                    pending.push(*else_branch);
                }
                Stmt::While { body, .. } | Stmt::FunctionDef { body, .. } => pending.push(*body),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Stmt {
        Stmt::Empty { id: next_node_id() }
    }

    #[test]
    fn test_sequence_is_right_nested() {
        let seq = Stmt::sequence(vec![empty(), empty(), empty()]).unwrap();
        match &seq {
            Stmt::Sequence { first, next, .. } => {
                assert!(matches!(**first, Stmt::Empty { .. }));
                assert!(matches!(**next, Stmt::Sequence { .. }));
            }
            _ => panic!("Expected sequence"),
        }
        assert_eq!(seq.statements().len(), 3);
    }

    #[test]
    fn test_sequence_of_one_is_unwrapped() {
        assert!(matches!(
            Stmt::sequence(vec![empty()]),
            Some(Stmt::Empty { .. })
        ));
        assert!(Stmt::sequence(Vec::new()).is_none());
    }

    #[test]
    fn test_node_ids_increase() {
        let a = empty();
        let b = empty();
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_long_chain_flattens_and_drops() {
        let stmts: Vec<Stmt> = (0..50_000).map(|_| empty()).collect();
        let root = Stmt::sequence(stmts).unwrap();
        assert_eq!(root.statements().len(), 50_000);
        drop(Ast::new(root));
    }

    #[test]
    fn test_into_root() {
        let ast = Ast::new(empty());
        assert!(matches!(ast.into_root(), Some(Stmt::Empty { .. })));
        assert!(Ast::default().into_root().is_none());
    }

    #[test]
    fn test_declaration_list_orders_by_name() {
        let mut list = DeclarationList::new();
        list.insert("b".to_string(), None);
        list.insert("a".to_string(), None);
        list.insert("b".to_string(), None);
        let names: Vec<String> = list.into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
