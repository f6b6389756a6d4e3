//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: types, declaration statements and function definitions
//! - `statements`: statements, blocks and the dangling-else rule
//! - `expressions`: the binary precedence cascade, unary operators and primaries
//!
//! # Scope coupling
//!
//! The parser owns the [`SymbolTable`] and mutates it while it reads tokens:
//! blocks and parameter lists open scopes, declarations install entries, and
//! every identifier use is resolved the moment it is read. An unresolved name
//! aborts the parse.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use crate::symbols::{ScopeError, Symbol, SymbolTable};
use thiserror::Error;

/// Deepest statement and expression nesting the parser accepts
pub const MAX_NESTING_DEPTH: usize = 200;

/// Parser error type
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Parse error at {location}: {message}")]
    Syntax {
        message: String,
        location: SourceLocation,
    },

    #[error("Undefined identifier '{name}' at {location}")]
    UndefinedIdentifier {
        name: String,
        location: SourceLocation,
    },

    /// Broken parser invariant, not caused by the input
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Coarse classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    UndefinedIdentifier,
    Internal,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lex(_) | ParseError::Syntax { .. } => ErrorKind::Syntax,
            ParseError::UndefinedIdentifier { .. } => ErrorKind::UndefinedIdentifier,
            ParseError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            ParseError::Lex(err) => Some(err.location),
            ParseError::Syntax { location, .. }
            | ParseError::UndefinedIdentifier { location, .. } => Some(*location),
            ParseError::Internal { .. } => None,
        }
    }
}

impl From<ScopeError> for ParseError {
    fn from(err: ScopeError) -> Self {
        ParseError::Internal {
            message: err.to_string(),
        }
    }
}

/// Recursive descent parser for the source language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) symbols: SymbolTable,
    pub(crate) depth: usize,
}

impl Parser {
    /// Parser over `source` with an empty root scope
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::with_symbols(source, SymbolTable::new())
    }

    /// Parser over `source` resolving against a pre-seeded scope chain
    pub fn with_symbols(source: &str, symbols: SymbolTable) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens, symbols))
    }

    /// Parser over an already lexed stream; the stream must end with `Eof`
    pub fn from_tokens(mut tokens: Vec<Token>, symbols: SymbolTable) -> Self {
        if !matches!(tokens.last(), Some(Token::Eof(_))) {
            let loc = tokens
                .last()
                .map(Token::location)
                .unwrap_or_else(|| SourceLocation::new(1, 1));
            tokens.push(Token::Eof(loc));
        }
        Self {
            tokens,
            position: 0,
            symbols,
            depth: 0,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Parse the entire program: one or more statements up to end of input
    pub fn parse_program(&mut self) -> Result<Ast, ParseError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        match Stmt::sequence(statements) {
            Some(root) => {
                log::debug!("parsed program, root node {}", root.id());
                Ok(Ast::new(root))
            }
            None => Err(self.syntax_error(format!("Expected statement, found {}", self.peek()))),
        }
    }

    // ===== Scope helpers =====

    /// Resolve an identifier use through the scope chain
    pub(crate) fn resolve(&self, name: &str, location: SourceLocation) -> Result<Symbol, ParseError> {
        self.symbols
            .lookup(name)
            .ok_or_else(|| ParseError::UndefinedIdentifier {
                name: name.to_string(),
                location,
            })
    }

    pub(crate) fn exit_scope(&mut self) -> Result<(), ParseError> {
        Ok(self.symbols.exit_scope()?)
    }

    // ===== Helper methods =====

    /// Take one more nesting level, failing past [`MAX_NESTING_DEPTH`]
    pub(crate) fn enter_level(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.syntax_error(format!(
                "nesting too deep (limit {})",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one nesting level deeper
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.enter_level()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn syntax_error(&self, message: String) -> ParseError {
        ParseError::Syntax {
            message,
            location: self.current_location(),
        }
    }

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(
            self.peek(),
            Token::Int(_) | Token::Void(_) | Token::Const(_)
        )
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(self.syntax_error(format!("Expected identifier, found {}", self.peek())))
        }
    }
}
