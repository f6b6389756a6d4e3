//! Builtin types of the source language
//!
//! Types are plain values: two types are equal when they have the same shape.
//! The parser never checks types against each other; it only attaches them to
//! symbol entries so that later passes and the AST trace can read them back.

use std::fmt;

/// Function signature: return type plus ordered parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub return_type: Box<Type>,
    pub params: Vec<Type>,
}

impl FunctionType {
    pub fn new(return_type: Type, params: Vec<Type>) -> Self {
        FunctionType {
            return_type: Box::new(return_type),
            params,
        }
    }
}

/// Type representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Void,
    Const,
    Function(FunctionType),
}

impl Type {
    pub fn function(return_type: Type, params: Vec<Type>) -> Self {
        Type::Function(FunctionType::new(return_type, params))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Void => write!(f, "void"),
            Type::Const => write!(f, "const"),
            Type::Function(func) => {
                write!(f, "{}(", func.return_type)?;
                for (i, param) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")")
            }
        }
    }
}
