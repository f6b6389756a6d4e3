//! Expression parsing implementation
//!
//! This module handles parsing of expressions using one recursive descent
//! level per precedence group. All binary operators are left-associative.
//!
//! # Precedence
//!
//! From loosest to tightest:
//!
//! | Level | Operators |
//! |---|---|
//! | logical or | `\|\|` |
//! | logical and | `&&` |
//! | relational | `< > <= >= == !=` |
//! | additive | `+ -` |
//! | multiplicative | `* / %` |
//! | unary (prefix) | `- + ! ++ --` |
//! | primary | literals, identifiers, calls, `( expr )` |
//!
//! Every operator node gets a fresh `int` temporary standing for its result.
//! Identifiers and callees are resolved through the scope chain when read.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use crate::symbols::SymbolEntry;

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_logical_or)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        self.binary_chain(Self::parse_logical_and, |token| match token {
            Token::OrOr(_) => Some(BinOp::Or),
            _ => None,
        })
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        self.binary_chain(Self::parse_relational, |token| match token {
            Token::AndAnd(_) => Some(BinOp::And),
            _ => None,
        })
    }

    /// Parse relational and equality (<, >, <=, >=, ==, !=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        self.binary_chain(Self::parse_additive, |token| match token {
            Token::Lt(_) => Some(BinOp::Lt),
            Token::Gt(_) => Some(BinOp::Gt),
            Token::Le(_) => Some(BinOp::Le),
            Token::Ge(_) => Some(BinOp::Ge),
            Token::EqEq(_) => Some(BinOp::Eq),
            Token::NotEq(_) => Some(BinOp::Ne),
            _ => None,
        })
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        self.binary_chain(Self::parse_multiplicative, |token| match token {
            Token::Plus(_) => Some(BinOp::Add),
            Token::Minus(_) => Some(BinOp::Sub),
            _ => None,
        })
    }

    /// Parse multiplicative (*, /, %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.binary_chain(Self::parse_unary, |token| match token {
            Token::Star(_) => Some(BinOp::Mul),
            Token::Slash(_) => Some(BinOp::Div),
            Token::Percent(_) => Some(BinOp::Mod),
            _ => None,
        })
    }

    /// Left-associative `operand { op operand }`
    ///
    /// Each operator wraps everything to its left, so every link counts as one
    /// nesting level until the chain ends.
    fn binary_chain(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
        operator: impl Fn(&Token) -> Option<BinOp>,
    ) -> Result<Expr, ParseError> {
        let outer = self.depth;
        let result = self.binary_links(operand, operator);
        self.depth = outer;
        result
    }

    fn binary_links(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
        operator: impl Fn(&Token) -> Option<BinOp>,
    ) -> Result<Expr, ParseError> {
        let mut left = operand(self)?;

        while let Some(op) = operator(self.peek()) {
            self.advance();
            self.enter_level()?;
            let right = operand(self)?;
            left = Expr::binary(op, left, right, SymbolEntry::temporary());
        }

        Ok(left)
    }

    /// Parse prefix unary (-, +, !, ++, --)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Minus(_) => UnOp::Neg,
            Token::Plus(_) => UnOp::Pos,
            Token::Bang(_) => UnOp::Not,
            Token::PlusPlus(_) => UnOp::PreInc,
            Token::MinusMinus(_) => UnOp::PreDec,
            _ => return self.parse_primary(),
        };
        self.advance();

        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::unary(op, operand, SymbolEntry::temporary()))
    }

    /// Parse primary: literal, identifier, call or parenthesized expression
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::IntLiteral(value, _) => {
                self.advance();
                Ok(Expr::literal(SymbolEntry::constant(value)))
            }
            Token::Ident(name, _) => {
                self.advance();
                if self.match_token(&Token::LParen(self.current_location())) {
                    return self.parse_call(&name, loc);
                }
                Ok(Expr::identifier(self.resolve(&name, loc)?))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            _ => Err(self.syntax_error(format!("Expected expression, found {}", self.peek()))),
        }
    }

    /// Parse the rest of a call once `name (` is consumed
    fn parse_call(&mut self, name: &str, loc: SourceLocation) -> Result<Expr, ParseError> {
        let callee = self.resolve(name, loc)?;

        if self.match_token(&Token::RParen(self.current_location())) {
            return Ok(Expr::call(callee, None));
        }

        let mut args = Vec::new();
        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rparen("after arguments")?;

        Ok(Expr::call(callee, Some(ParameterList::Arguments(args))))
    }
}
