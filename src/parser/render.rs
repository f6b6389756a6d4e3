//! Indented text rendering of the AST
//!
//! Produces the line-oriented trace written by the `-a` flag: one construct per
//! line, children indented four columns past their parent, in evaluation order.
//!
//! ```text
//! program
//!     FunctionDefine function name: main, type: int()
//!         CompoundStmt
//!             ReturnStmt
//!                 IntegerLiteral	value: 0	type: int
//! ```
//!
//! Rendering only reads symbol entries; it never touches the scope chain.

use crate::parser::ast::*;
use std::fmt::{self, Write};

const INDENT: usize = 4;

const SPACES: &str = "                                                                ";

fn line(out: &mut impl Write, level: usize, args: fmt::Arguments<'_>) -> fmt::Result {
    // Indentation is unbounded: a long statement sequence nests one step per statement
    let mut remaining = level;
    while remaining > 0 {
        let step = remaining.min(SPACES.len());
        out.write_str(&SPACES[..step])?;
        remaining -= step;
    }
    out.write_fmt(args)?;
    out.write_char('\n')
}

impl BinOp {
    pub fn tag(&self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::Mod => "delivery",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Lt => "less",
            BinOp::Gt => "more",
            BinOp::Le => "lesseq",
            BinOp::Ge => "moreeq",
            BinOp::Eq => "equal",
            BinOp::Ne => "unequal",
        }
    }
}

impl UnOp {
    pub fn tag(&self) -> &'static str {
        match self {
            UnOp::Neg => "umnus",
            // Positive shares the logical-not tag in the reference trace
            UnOp::Pos | UnOp::Not => "non",
            UnOp::PreInc => "inplus",
            UnOp::PreDec => "inminus",
        }
    }
}

impl Expr {
    pub fn render(&self, out: &mut impl Write, level: usize) -> fmt::Result {
        match self {
            Expr::BinaryOp {
                op, left, right, ..
            } => {
                line(out, level, format_args!("BinaryExpr\top: {}", op.tag()))?;
                left.render(out, level + INDENT)?;
                right.render(out, level + INDENT)
            }
            Expr::UnaryOp { op, operand, .. } => {
                line(out, level, format_args!("SingleExpr\top:{}", op.tag()))?;
                operand.render(out, level + INDENT)
            }
            Expr::Identifier { symbol, .. } => line(
                out,
                level,
                format_args!(
                    "Id\tname: {}\tscope: {}\ttype: {}",
                    symbol,
                    symbol.scope().unwrap_or_default(),
                    symbol.ty()
                ),
            ),
            Expr::FunctionCall { callee, args, .. } => {
                line(out, level, format_args!("FunctionExpr:"))?;
                line(
                    out,
                    level + INDENT,
                    format_args!(
                        "FunctionCall function name: {}, type: {}",
                        callee,
                        callee.ty()
                    ),
                )?;
                match args {
                    Some(args) => args.render(out, level + 2 * INDENT),
                    None => Ok(()),
                }
            }
            Expr::Literal { symbol, .. } => line(
                out,
                level,
                format_args!("IntegerLiteral\tvalue: {}\ttype: {}", symbol, symbol.ty()),
            ),
        }
    }
}

impl ParameterList {
    pub fn render(&self, out: &mut impl Write, level: usize) -> fmt::Result {
        line(out, level, format_args!("ParameterList:"))?;
        match self {
            ParameterList::Formal(params) => {
                for param in params {
                    param.ident.render(out, level + INDENT)?;
                    match (&param.ident, &param.default) {
                        (Expr::Identifier { value: Some(v), .. }, _) => {
                            line(out, level + INDENT, format_args!("value: {}", v))?
                        }
                        (_, Some(default)) => default.render(out, level + 2 * INDENT)?,
                        _ => {}
                    }
                }
                Ok(())
            }
            ParameterList::Arguments(args) => {
                for arg in args {
                    arg.render(out, level + INDENT)?;
                }
                Ok(())
            }
        }
    }
}

impl Stmt {
    pub fn render(&self, out: &mut impl Write, level: usize) -> fmt::Result {
        let child = level + INDENT;
        match self {
            Stmt::Sequence { .. } => {
                let mut level = level;
                let mut current = self;
                while let Stmt::Sequence { first, next, .. } = current {
                    line(out, level, format_args!("Sequence"))?;
                    first.render(out, level + INDENT)?;
                    level += INDENT;
                    current = next;
                }
                current.render(out, level)
            }
            Stmt::Block { inner, .. } => {
                line(out, level, format_args!("CompoundStmt"))?;
                inner.render(out, child)
            }
            Stmt::Declaration { decls, .. } => {
                line(out, level, format_args!("DeclStmt"))?;
                for (ident, init) in decls {
                    ident.render(out, child)?;
                    if let Some(init) = init {
                        init.render(out, child)?;
                    }
                }
                Ok(())
            }
            Stmt::If {
                condition,
                then_branch,
                ..
            } => {
                line(out, level, format_args!("IfStmt"))?;
                condition.render(out, child)?;
                then_branch.render(out, child)
            }
            Stmt::IfElse {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                line(out, level, format_args!("IfElseStmt"))?;
                condition.render(out, child)?;
                then_branch.render(out, child)?;
                else_branch.render(out, child)
            }
            Stmt::While {
                condition, body, ..
            } => {
                line(out, level, format_args!("WhileStmt"))?;
                condition.render(out, child)?;
                body.render(out, child)
            }
            Stmt::Break { .. } => line(out, level, format_args!("BreakStmt")),
            Stmt::Continue { .. } => line(out, level, format_args!("ContinueStmt")),
            Stmt::Return { expr, .. } => {
                line(out, level, format_args!("ReturnStmt"))?;
                expr.render(out, child)
            }
            Stmt::Expression { expr, .. } => {
                line(out, level, format_args!("ExprStmt"))?;
                expr.render(out, child)
            }
            Stmt::Assign { target, expr, .. } => {
                line(out, level, format_args!("AssignStmt"))?;
                target.render(out, child)?;
                expr.render(out, child)
            }
            Stmt::Empty { .. } => line(out, level, format_args!("EmptyStmt")),
            Stmt::EmptyBlock { .. } => line(out, level, format_args!("EmptyBlock")),
            Stmt::FunctionDef {
                symbol,
                params,
                body,
                ..
            } => {
                line(
                    out,
                    level,
                    format_args!(
                        "FunctionDefine function name: {}, type: {}",
                        symbol,
                        symbol.ty()
                    ),
                )?;
                if let Some(params) = params {
                    params.render(out, child)?;
                }
                body.render(out, child)
            }
        }
    }
}

impl Ast {
    /// Render the whole program, starting with the `program` header line
    pub fn render(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "program")?;
        match &self.root {
            Some(root) => root.render(out, INDENT),
            None => Ok(()),
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut text);
        text
    }
}
