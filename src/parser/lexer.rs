//! Lexer (tokenizer) for source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Whitespace, `//` line comments and `/* */` block comments are skipped.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i32, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Int(SourceLocation),
    Void(SourceLocation),
    Const(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    Break(SourceLocation),
    Continue(SourceLocation),
    Return(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Logical
    AndAnd(SourceLocation), // &&
    OrOr(SourceLocation),   // ||
    Bang(SourceLocation),   // !

    // Assignment
    Eq(SourceLocation),      // =
    PlusEq(SourceLocation),  // +=
    MinusEq(SourceLocation), // -=
    StarEq(SourceLocation),  // *=
    SlashEq(SourceLocation), // /=

    // Increment/Decrement
    PlusPlus(SourceLocation),   // ++
    MinusMinus(SourceLocation), // --

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Int(loc)
            | Token::Void(loc)
            | Token::Const(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::Break(loc)
            | Token::Continue(loc)
            | Token::Return(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::AndAnd(loc)
            | Token::OrOr(loc)
            | Token::Bang(loc)
            | Token::Eq(loc)
            | Token::PlusEq(loc)
            | Token::MinusEq(loc)
            | Token::StarEq(loc)
            | Token::SlashEq(loc)
            | Token::PlusPlus(loc)
            | Token::MinusMinus(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

/// Reserved words and the token each one lexes to
const KEYWORDS: &[(&str, fn(SourceLocation) -> Token)] = &[
    ("int", Token::Int),
    ("void", Token::Void),
    ("const", Token::Const),
    ("if", Token::If),
    ("else", Token::Else),
    ("while", Token::While),
    ("break", Token::Break),
    ("continue", Token::Continue),
    ("return", Token::Return),
];

impl Token {
    /// Source spelling of a fixed token; `None` for literals, names and `Eof`
    pub fn spelling(&self) -> Option<&'static str> {
        let text = match self {
            Token::IntLiteral(..) | Token::Ident(..) | Token::Eof(_) => return None,
            Token::Int(_) => "int",
            Token::Void(_) => "void",
            Token::Const(_) => "const",
            Token::If(_) => "if",
            Token::Else(_) => "else",
            Token::While(_) => "while",
            Token::Break(_) => "break",
            Token::Continue(_) => "continue",
            Token::Return(_) => "return",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Star(_) => "*",
            Token::Slash(_) => "/",
            Token::Percent(_) => "%",
            Token::EqEq(_) => "==",
            Token::NotEq(_) => "!=",
            Token::Lt(_) => "<",
            Token::Le(_) => "<=",
            Token::Gt(_) => ">",
            Token::Ge(_) => ">=",
            Token::AndAnd(_) => "&&",
            Token::OrOr(_) => "||",
            Token::Bang(_) => "!",
            Token::Eq(_) => "=",
            Token::PlusEq(_) => "+=",
            Token::MinusEq(_) => "-=",
            Token::StarEq(_) => "*=",
            Token::SlashEq(_) => "/=",
            Token::PlusPlus(_) => "++",
            Token::MinusMinus(_) => "--",
            Token::LParen(_) => "(",
            Token::RParen(_) => ")",
            Token::LBrace(_) => "{",
            Token::RBrace(_) => "}",
            Token::LBracket(_) => "[",
            Token::RBracket(_) => "]",
            Token::Semicolon(_) => ";",
            Token::Comma(_) => ",",
        };
        Some(text)
    }

    fn keyword(word: &str, loc: SourceLocation) -> Option<Token> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == word)
            .map(|(_, make)| make(loc))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.spelling()) {
            (Token::IntLiteral(n, _), _) => write!(f, "int literal {}", n),
            (Token::Ident(name, _), _) => write!(f, "identifier '{}'", name),
            (_, Some(text)) => write!(f, "'{}'", text),
            (_, None) => f.write_str("end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Character-level scanner producing [`Token`]s with their start positions
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, ending with [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia()?;
            let loc = self.current_location();
            match self.advance() {
                Some(ch) => tokens.push(self.next_token(ch, loc)?),
                None => {
                    tokens.push(Token::Eof(loc));
                    break;
                }
            }
        }

        log::debug!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Token starting with the already consumed `ch`
    fn next_token(&mut self, ch: char, loc: SourceLocation) -> Result<Token, LexError> {
        let token: fn(SourceLocation) -> Token = match ch {
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => {
                let word = self.word(ch);
                return Ok(Token::keyword(&word, loc).unwrap_or(Token::Ident(word, loc)));
            }

            '+' if self.match_char('+') => Token::PlusPlus,
            '+' => self.with_eq(Token::PlusEq, Token::Plus),
            '-' if self.match_char('-') => Token::MinusMinus,
            '-' => self.with_eq(Token::MinusEq, Token::Minus),
            '*' => self.with_eq(Token::StarEq, Token::Star),
            '/' => self.with_eq(Token::SlashEq, Token::Slash),
            '=' => self.with_eq(Token::EqEq, Token::Eq),
            '!' => self.with_eq(Token::NotEq, Token::Bang),
            '<' => self.with_eq(Token::Le, Token::Lt),
            '>' => self.with_eq(Token::Ge, Token::Gt),
            '&' if self.match_char('&') => Token::AndAnd,
            '|' if self.match_char('|') => Token::OrOr,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ';' => Token::Semicolon,
            ',' => Token::Comma,

            _ => {
                return Err(LexError::new(
                    format!("Unexpected character: '{}'", ch),
                    loc,
                ))
            }
        };
        Ok(token(loc))
    }

    /// Pick `with` when an `=` follows, consuming it
    fn with_eq(
        &mut self,
        with: fn(SourceLocation) -> Token,
        without: fn(SourceLocation) -> Token,
    ) -> fn(SourceLocation) -> Token {
        if self.match_char('=') {
            with
        } else {
            without
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while `accept` holds and return them
    fn eat_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek().filter(|&ch| accept(ch)) {
            text.push(ch);
            self.advance();
        }
        text
    }

    /// Decimal literal, or hexadecimal after a `0x`/`0X` prefix
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let (digits, radix) = if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            let digits = self.eat_while(|ch| ch.is_ascii_hexdigit());
            if digits.is_empty() {
                return Err(LexError::new("Hexadecimal literal has no digits", loc));
            }
            (digits, 16)
        } else {
            let rest = self.eat_while(|ch| ch.is_ascii_digit());
            (format!("{}{}", first, rest), 10)
        };

        i32::from_str_radix(&digits, radix)
            .map(|value| Token::IntLiteral(value, loc))
            .map_err(|_| LexError::new(format!("Integer literal out of range: {}", digits), loc))
    }

    fn word(&mut self, first: char) -> String {
        let mut word = String::from(first);
        word.push_str(&self.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_'));
        word
    }

    /// Skip whitespace, `//` comments and `/* */` comments
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            self.eat_while(|ch| ch.is_ascii_whitespace());
            match (self.peek(), self.peek_ahead(1)) {
                (Some('/'), Some('/')) => {
                    self.eat_while(|ch| ch != '\n');
                }
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.current_location();
        self.step_over("/*");

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.step_over("*/");
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new("Unterminated block comment", start))
    }

    /// Step over `text`, which the caller has already matched
    fn step_over(&mut self, text: &str) {
        for _ in text.chars() {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("int main() { return 0; }");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "main"));
        assert!(matches!(tokens[2], Token::LParen(_)));
        assert!(matches!(tokens[3], Token::RParen(_)));
        assert!(matches!(tokens[4], Token::LBrace(_)));
        assert!(matches!(tokens[5], Token::Return(_)));
        assert!(matches!(tokens[6], Token::IntLiteral(0, _)));
        assert!(matches!(tokens[7], Token::Semicolon(_)));
        assert!(matches!(tokens[8], Token::RBrace(_)));
        assert!(matches!(tokens[9], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("++ -- += -= == != && || <= >= ! %");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::PlusPlus(_)));
        assert!(matches!(tokens[1], Token::MinusMinus(_)));
        assert!(matches!(tokens[2], Token::PlusEq(_)));
        assert!(matches!(tokens[3], Token::MinusEq(_)));
        assert!(matches!(tokens[4], Token::EqEq(_)));
        assert!(matches!(tokens[5], Token::NotEq(_)));
        assert!(matches!(tokens[6], Token::AndAnd(_)));
        assert!(matches!(tokens[7], Token::OrOr(_)));
        assert!(matches!(tokens[8], Token::Le(_)));
        assert!(matches!(tokens[9], Token::Ge(_)));
        assert!(matches!(tokens[10], Token::Bang(_)));
        assert!(matches!(tokens[11], Token::Percent(_)));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("int x; // comment\nint y; /* block\ncomment */ int z;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
        assert!(matches!(tokens[3], Token::Int(_)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "y"));
        assert!(matches!(tokens[5], Token::Semicolon(_)));
        assert!(matches!(tokens[6], Token::Int(_)));
        assert!(matches!(tokens[7], Token::Ident(ref s, _) if s == "z"));
    }

    #[test]
    fn test_hex_literal_and_locations() {
        let mut lexer = Lexer::new("x\n  = 0x1F;");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[1].location(), SourceLocation::new(2, 3));
        assert!(matches!(tokens[2], Token::IntLiteral(31, _)));
    }

    #[test]
    fn test_errors() {
        assert!(Lexer::new("int a = 99999999999;").tokenize().is_err());
        assert!(Lexer::new("a & b").tokenize().is_err());

        let err = Lexer::new("/* open").tokenize().unwrap_err();
        assert!(err.message.contains("Unterminated"));
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_hex_prefix_needs_digits() {
        let err = Lexer::new("int a = 0x;").tokenize().unwrap_err();
        assert_eq!(err.message, "Hexadecimal literal has no digits");
        assert_eq!(err.location, SourceLocation::new(1, 9));

        assert!(Lexer::new("0xg").tokenize().is_err());
        let tokens = Lexer::new("0X7fffffff 0").tokenize().unwrap();
        assert!(matches!(tokens[0], Token::IntLiteral(i32::MAX, _)));
        assert!(matches!(tokens[1], Token::IntLiteral(0, _)));
    }

    #[test]
    fn test_out_of_range_literal_message() {
        let err = Lexer::new("2147483648").tokenize().unwrap_err();
        assert_eq!(err.message, "Integer literal out of range: 2147483648");
    }

    #[test]
    fn test_keywords_need_whole_words() {
        let tokens = Lexer::new("int integer returned return_ _if").tokenize().unwrap();
        assert!(matches!(tokens[0], Token::Int(_)));
        for token in &tokens[1..5] {
            assert!(matches!(token, Token::Ident(..)), "{token} should be an identifier");
        }
    }

    #[test]
    fn test_display_uses_spelling() {
        let tokens = Lexer::new("while <= x 7").tokenize().unwrap();
        let shown: Vec<String> = tokens.iter().map(Token::to_string).collect();
        assert_eq!(
            shown,
            ["'while'", "'<='", "identifier 'x'", "int literal 7", "end of file"]
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_input() {
        let tokens = Lexer::new("x // trailing").tokenize().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].location(), SourceLocation::new(1, 14));
    }
}
