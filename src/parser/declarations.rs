//! Declaration parsing implementation
//!
//! This module handles the type-led statements:
//!
//! - Variable declarations: `int a, b = 1, c;`
//! - Function definitions: `int f(int x, int y = 2) { ... }`
//! - Type parsing: `int`, `void`, `const [int]`
//! - Formal parameter lists with optional default values
//!
//! # Grammar
//!
//! ```text
//! decl_stmt   ::= type declarator { "," declarator } ";"
//! declarator  ::= identifier [ "=" expr ]
//! func_def    ::= type identifier "(" [ params ] ")" block
//! params      ::= param { "," param }
//! param       ::= type identifier [ "=" expr ]
//! type        ::= "int" | "void" | "const" [ "int" ]
//! ```
//!
//! # Function registration
//!
//! A function's own entry is installed in the enclosing scope before its
//! parameter scope opens, so the body can call the function recursively.
//! Parameter defaults are parsed first and resolve in the enclosing scope,
//! where the function itself is not visible yet.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use crate::symbols::SymbolEntry;
use crate::types::Type;
use std::rc::Rc;

/// A parameter as read, before it has a scope to live in
struct FormalParam {
    name: String,
    ty: Type,
    default: Option<Expr>,
}

impl Parser {
    /// Whether the upcoming tokens read `type identifier "("`
    pub(crate) fn is_function_definition(&mut self) -> bool {
        let saved_pos = self.position;
        let is_function = self.parse_type().is_ok()
            && self.expect_identifier().is_ok()
            && self.check(&Token::LParen(self.current_location()));
        self.position = saved_pos;
        is_function
    }

    /// Parse declaration statement: type name [= expr] {, name [= expr]} ;
    pub(crate) fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let ty = self.parse_type()?;

        let mut list = DeclarationList::new();
        loop {
            let name = self.expect_identifier()?;
            let init = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            list.insert(name, init);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_semicolon("after declaration")?;

        // Names are installed only once the whole statement is read, in name order
        let level = self.symbols.level();
        let mut decls = Vec::with_capacity(list.len());
        for (name, init) in list {
            let symbol = SymbolEntry::identifier(name.as_str(), ty.clone(), level);
            self.symbols.install(&name, Rc::clone(&symbol));
            decls.push((Expr::identifier(symbol), init));
        }

        Ok(Stmt::Declaration {
            id: next_node_id(),
            decls,
        })
    }

    /// Parse function definition: type name(params) { body }
    pub(crate) fn parse_function_definition(&mut self) -> Result<Stmt, ParseError> {
        let return_type = self.parse_type()?;
        let name = self.expect_identifier()?;

        self.expect_lparen("after function name")?;

        let params = if self.check(&Token::RParen(self.current_location())) {
            self.install_function(&name, return_type, Vec::new());
            self.symbols.enter_scope();
            None
        } else {
            let formals = self.parse_parameter_list()?;
            let param_types = formals.iter().map(|param| param.ty.clone()).collect();
            self.install_function(&name, return_type, param_types);
            self.symbols.enter_scope();
            Some(self.install_parameters(formals))
        };

        self.expect_rparen("after parameters")?;

        let body = self.parse_block()?;

        self.exit_scope()?;

        let symbol = self.symbols.lookup(&name).ok_or_else(|| ParseError::Internal {
            message: format!("function '{}' is not in scope after its definition", name),
        })?;

        Ok(Stmt::FunctionDef {
            id: next_node_id(),
            symbol,
            params,
            body: Box::new(body),
        })
    }

    fn install_function(&mut self, name: &str, return_type: Type, params: Vec<Type>) {
        let level = self.symbols.level();
        let symbol = SymbolEntry::identifier(name, Type::function(return_type, params), level);
        self.symbols.install(name, symbol);
    }

    /// Install read parameters into the current (parameter) scope
    fn install_parameters(&mut self, formals: Vec<FormalParam>) -> ParameterList {
        let level = self.symbols.level();
        let params = formals
            .into_iter()
            .map(|param| {
                let symbol = SymbolEntry::identifier(param.name.as_str(), param.ty, level);
                self.symbols.install(&param.name, Rc::clone(&symbol));

                let literal = match &param.default {
                    Some(Expr::Literal { symbol, .. }) => symbol.value(),
                    _ => None,
                };
                let ident = match literal {
                    Some(value) => Expr::identifier_with_value(symbol, value),
                    None => Expr::identifier(symbol),
                };

                Parameter {
                    ident,
                    default: param.default,
                }
            })
            .collect();

        ParameterList::Formal(params)
    }

    /// Parse parameter list: type name [= expr] {, type name [= expr]}
    fn parse_parameter_list(&mut self) -> Result<Vec<FormalParam>, ParseError> {
        let mut params = Vec::new();

        loop {
            let ty = self.parse_type()?;
            let name = self.expect_identifier()?;
            let default = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            params.push(FormalParam { name, ty, default });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse type: int | void | const [int]
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        if self.match_token(&Token::Int(self.current_location())) {
            Ok(Type::Int)
        } else if self.match_token(&Token::Void(self.current_location())) {
            Ok(Type::Void)
        } else if self.match_token(&Token::Const(self.current_location())) {
            self.match_token(&Token::Int(self.current_location()));
            Ok(Type::Const)
        } else {
            Err(self.syntax_error(format!("Expected type, found {}", self.peek())))
        }
    }
}
