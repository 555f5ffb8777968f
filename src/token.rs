use core::fmt;
use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::errors::Position;

pub const EOP: char = '\0';

/// Reserved words. Keywords are matched case-insensitively, but tokens keep
/// their source spelling so that they can double as keys (`$.Size`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    Abs,
    BigInt,
    Boolean,
    Ceiling,
    Date,
    Datetime,
    Decimal,
    Double,
    Exists,
    Flag,
    Floor,
    Integer,
    Is,
    KeyValue,
    Last,
    Lax,
    LikeRegex,
    Number,
    Size,
    Starts,
    Strict,
    String,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    To,
    Type,
    Unknown,
    With,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Keyword> = {
        use Keyword::*;
        HashMap::from([
            ("abs", Abs),
            ("bigint", BigInt),
            ("boolean", Boolean),
            ("ceiling", Ceiling),
            ("date", Date),
            ("datetime", Datetime),
            ("decimal", Decimal),
            ("double", Double),
            ("exists", Exists),
            ("flag", Flag),
            ("floor", Floor),
            ("integer", Integer),
            ("is", Is),
            ("keyvalue", KeyValue),
            ("last", Last),
            ("lax", Lax),
            ("like_regex", LikeRegex),
            ("number", Number),
            ("size", Size),
            ("starts", Starts),
            ("strict", Strict),
            ("string", String),
            ("time", Time),
            ("time_tz", TimeTz),
            ("timestamp", Timestamp),
            ("timestamp_tz", TimestampTz),
            ("to", To),
            ("type", Type),
            ("unknown", Unknown),
            ("with", With),
        ])
    };
}

/// Classify an identifier. `true`, `false` and `null` are case-sensitive,
/// every other keyword is not.
pub fn lookup_keyword(ident: &str) -> Option<TokenType> {
    match ident {
        "true" => return Some(TokenType::True),
        "false" => return Some(TokenType::False),
        "null" => return Some(TokenType::Null),
        _ => (),
    }

    KEYWORDS
        .get(ident.to_ascii_lowercase().as_str())
        .map(|keyword| TokenType::Keyword {
            keyword: *keyword,
            value: ident.to_string().into_boxed_str(),
        })
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    Eop,
    Error { msg: Box<str> },

    Root,
    Current,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Dot,
    Comma,
    Filter,
    Wild,
    DoubleWild,
    Plus,
    Minus,
    Slash,
    Percent,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,

    Name { value: Box<str> },
    String { value: Box<str> },
    Variable { value: Box<str> },
    Int { value: Box<str> },
    Float { value: Box<str> },
    True,
    False,
    Null,
    Keyword { keyword: Keyword, value: Box<str> },
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Eop => f.write_str("end of path"),
            TokenType::Error { msg } => write!(f, "error: {}", *msg),
            TokenType::Root => f.write_str("'$'"),
            TokenType::Current => f.write_str("'@'"),
            TokenType::LParen => f.write_str("'('"),
            TokenType::RParen => f.write_str("')'"),
            TokenType::LBracket => f.write_str("'['"),
            TokenType::RBracket => f.write_str("']'"),
            TokenType::LBrace => f.write_str("'{'"),
            TokenType::RBrace => f.write_str("'}'"),
            TokenType::Dot => f.write_str("'.'"),
            TokenType::Comma => f.write_str("','"),
            TokenType::Filter => f.write_str("'?'"),
            TokenType::Wild => f.write_str("'*'"),
            TokenType::DoubleWild => f.write_str("'**'"),
            TokenType::Plus => f.write_str("'+'"),
            TokenType::Minus => f.write_str("'-'"),
            TokenType::Slash => f.write_str("'/'"),
            TokenType::Percent => f.write_str("'%'"),
            TokenType::Not => f.write_str("'!'"),
            TokenType::Eq => f.write_str("'=='"),
            TokenType::Ne => f.write_str("'!='"),
            TokenType::Lt => f.write_str("'<'"),
            TokenType::Le => f.write_str("'<='"),
            TokenType::Gt => f.write_str("'>'"),
            TokenType::Ge => f.write_str("'>='"),
            TokenType::And => f.write_str("'&&'"),
            TokenType::Or => f.write_str("'||'"),
            TokenType::Name { value } => write!(f, "identifier '{}'", *value),
            TokenType::String { value } => write!(f, "string \"{}\"", *value),
            TokenType::Variable { value } => write!(f, "variable '${}'", *value),
            TokenType::Int { value } => write!(f, "integer {}", *value),
            TokenType::Float { value } => write!(f, "number {}", *value),
            TokenType::True => f.write_str("'true'"),
            TokenType::False => f.write_str("'false'"),
            TokenType::Null => f.write_str("'null'"),
            TokenType::Keyword { value, .. } => write!(f, "'{}'", *value),
        }
    }
}

/// A path token, as produced by the lexer.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenType,
    pub span: (usize, usize),
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenType, start: usize, end: usize, position: Position) -> Self {
        Self {
            kind,
            span: (start, end),
            position,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenType::Keyword { keyword, .. } => Some(keyword),
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}
