use std::fmt;

use thiserror::Error;

/// A 1-based line and column in a path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JSONPathErrorType {
    LexerError,
    SyntaxError,
    AstError,
}

impl fmt::Display for JSONPathErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JSONPathErrorType::LexerError => f.write_str("lexer"),
            JSONPathErrorType::SyntaxError => f.write_str("parser"),
            JSONPathErrorType::AstError => f.write_str("ast"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {msg}{}", at(.position))]
pub struct JSONPathError {
    pub kind: JSONPathErrorType,
    pub msg: String,
    pub position: Option<Position>,
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(pos) => format!(" at {pos}"),
        None => String::new(),
    }
}

impl JSONPathError {
    pub fn new(kind: JSONPathErrorType, msg: String, position: Option<Position>) -> Self {
        Self {
            kind,
            msg,
            position,
        }
    }

    pub fn lexer(msg: String, position: Position) -> Self {
        Self {
            kind: JSONPathErrorType::LexerError,
            msg,
            position: Some(position),
        }
    }

    pub fn syntax(msg: String, position: Position) -> Self {
        Self {
            kind: JSONPathErrorType::SyntaxError,
            msg,
            position: Some(position),
        }
    }

    pub fn ast(msg: String) -> Self {
        Self {
            kind: JSONPathErrorType::AstError,
            msg,
            position: None,
        }
    }
}
