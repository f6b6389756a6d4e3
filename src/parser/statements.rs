//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Declarations and function definitions (delegated to `declarations`)
//! - Control flow: `if`, `if`/`else`, `while`
//! - Jump statements: `return`, `break`, `continue`
//! - Compound statements: `{ ... }`, each with its own scope
//! - Assignments `x = expr;`, expression statements and the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! statement ::= decl_stmt | func_def | block | if_stmt | while_stmt
//!             | return_stmt | break_stmt | continue_stmt
//!             | assign_stmt | expr_stmt | ";"
//! block     ::= "{" statement* "}"
//! if_stmt   ::= "if" "(" expr ")" statement [ "else" statement ]
//! ```
//!
//! An `else` always belongs to the nearest unmatched `if`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.nested(Self::statement)
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.is_type_keyword() {
            return if self.is_function_definition() {
                self.parse_function_definition()
            } else {
                self.parse_declaration()
            };
        }

        if self.check(&Token::LBrace(loc)) {
            return self.parse_block();
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement();
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement();
        }

        if self.match_token(&Token::Return(loc)) {
            let expr = self.parse_expression()?;
            self.expect_semicolon("after return value")?;
            return Ok(Stmt::Return {
                id: next_node_id(),
                expr,
            });
        }

        if self.match_token(&Token::Break(loc)) {
            self.expect_semicolon("after 'break'")?;
            return Ok(Stmt::Break { id: next_node_id() });
        }

        if self.match_token(&Token::Continue(loc)) {
            self.expect_semicolon("after 'continue'")?;
            return Ok(Stmt::Continue { id: next_node_id() });
        }

        if self.match_token(&Token::Semicolon(loc)) {
            return Ok(Stmt::Empty { id: next_node_id() });
        }

        // Assignment: identifier followed by '='
        if let Token::Ident(name, _) = self.peek_token() {
            if matches!(self.peek_ahead(1), Some(Token::Eq(_))) {
                self.advance(); // consume identifier
                self.advance(); // consume '='
                return self.parse_assignment(&name, loc);
            }
        }

        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(Stmt::Expression {
            id: next_node_id(),
            expr,
        })
    }

    /// Parse block: { statements }, inside a fresh scope
    pub(crate) fn parse_block(&mut self) -> Result<Stmt, ParseError> {
        self.expect_lbrace("to open block")?;
        self.symbols.enter_scope();

        let mut statements = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        self.expect_rbrace("after block")?;
        self.exit_scope()?;

        Ok(match Stmt::sequence(statements) {
            Some(inner) => Stmt::Block {
                id: next_node_id(),
                inner: Box::new(inner),
            },
            None => Stmt::EmptyBlock { id: next_node_id() },
        })
    }

    /// Parse if statement: if (cond) stmt [else stmt]
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);

        if self.match_token(&Token::Else(self.current_location())) {
            let else_branch = Box::new(self.parse_statement()?);
            return Ok(Stmt::IfElse {
                id: next_node_id(),
                condition,
                then_branch,
                else_branch,
            });
        }

        Ok(Stmt::If {
            id: next_node_id(),
            condition,
            then_branch,
        })
    }

    /// Parse while statement: while (cond) stmt
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            id: next_node_id(),
            condition,
            body,
        })
    }

    /// Parse the rest of `name = expr ;` once `name =` is consumed
    fn parse_assignment(&mut self, name: &str, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let target = Expr::identifier(self.resolve(name, loc)?);
        let expr = self.parse_expression()?;
        self.expect_semicolon("after assignment")?;

        Ok(Stmt::Assign {
            id: next_node_id(),
            target,
            expr,
        })
    }
}
