//! Path tokenizer.
//!
//! [`Lexer::next_token`] produces one token per call. Lexical errors do not
//! stop the lexer: each is recorded with its line and column, an error token
//! is emitted and scanning resumes. [`lex`] reports the first recorded error.
use crate::{
    errors::{JSONPathError, Position},
    escape::{combine_surrogates, is_high_surrogate, is_low_surrogate, simple_escape},
    number::{parse_float, parse_integer},
    token::{lookup_keyword, Token, TokenType, EOP},
};

use std::str::CharIndices;

const TRAILING_JUNK: &str = "trailing junk after numeric literal";

pub struct Lexer<'q> {
    query: &'q str,

    chars: CharIndices<'q>,
    start: usize,
    pos: usize,

    line: usize,
    line_start: usize,
    start_position: Position,

    errors: Vec<JSONPathError>,
}

impl<'q> Lexer<'q> {
    pub fn new(query: &'q str) -> Self {
        Self {
            query,
            chars: query.char_indices(),
            start: 0,
            pos: 0,
            line: 1,
            line_start: 0,
            start_position: Position::new(1, 1),
            errors: Vec::new(),
        }
    }

    /// Lexical errors recorded so far, in the order they were found.
    pub fn errors(&self) -> &[JSONPathError] {
        &self.errors
    }

    /// Scan the whole query, up to and including the end-of-path token.
    pub fn run(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenType::Eop;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.ignore_whitespace();

        if self.peek() == '/' && self.peek_nth(1) == '*' {
            return match self.skip_comment() {
                Ok(()) => self.next_token(),
                Err(msg) => self.error(msg),
            };
        }

        let ch = match self.next() {
            Some(ch) => ch,
            None => return self.emit(TokenType::Eop),
        };

        match ch {
            '$' => self.lex_dollar(),
            '@' => self.emit(TokenType::Current),
            '(' => self.emit(TokenType::LParen),
            ')' => self.emit(TokenType::RParen),
            '[' => self.emit(TokenType::LBracket),
            ']' => self.emit(TokenType::RBracket),
            '{' => self.emit(TokenType::LBrace),
            '}' => self.emit(TokenType::RBrace),
            ',' => self.emit(TokenType::Comma),
            '?' => self.emit(TokenType::Filter),
            '+' => self.emit(TokenType::Plus),
            '-' => self.emit(TokenType::Minus),
            '/' => self.emit(TokenType::Slash),
            '%' => self.emit(TokenType::Percent),
            '.' => {
                if is_digit(self.peek()) {
                    self.lex_number('.')
                } else {
                    self.emit(TokenType::Dot)
                }
            }
            '*' => {
                if self.accept('*') {
                    self.emit(TokenType::DoubleWild)
                } else {
                    self.emit(TokenType::Wild)
                }
            }
            '"' => match self.scan_string() {
                Ok(value) => self.emit(TokenType::String {
                    value: value.into_boxed_str(),
                }),
                Err(msg) => self.emit(TokenType::Error {
                    msg: msg.into_boxed_str(),
                }),
            },
            '=' => {
                if self.accept('=') {
                    self.emit(TokenType::Eq)
                } else {
                    self.error(String::from("unexpected '=', did you mean '=='?"))
                }
            }
            '!' => {
                if self.accept('=') {
                    self.emit(TokenType::Ne)
                } else {
                    self.emit(TokenType::Not)
                }
            }
            '<' => {
                if self.accept('=') {
                    self.emit(TokenType::Le)
                } else if self.accept('>') {
                    self.emit(TokenType::Ne)
                } else {
                    self.emit(TokenType::Lt)
                }
            }
            '>' => {
                if self.accept('=') {
                    self.emit(TokenType::Ge)
                } else {
                    self.emit(TokenType::Gt)
                }
            }
            '&' => {
                if self.accept('&') {
                    self.emit(TokenType::And)
                } else {
                    self.error(String::from("unexpected '&', did you mean '&&'?"))
                }
            }
            '|' => {
                if self.accept('|') {
                    self.emit(TokenType::Or)
                } else {
                    self.error(String::from("unexpected '|', did you mean '||'?"))
                }
            }
            c if is_digit(c) => self.lex_number(c),
            c if is_name_first(c) => self.lex_name(c),
            c => self.error(format!("unexpected character {:?}", c)),
        }
    }

    fn emit(&mut self, kind: TokenType) -> Token {
        let token = Token::new(kind, self.start, self.pos, self.start_position);
        self.ignore();
        token
    }

    fn value(&self) -> &str {
        self.query
            .get(self.start..self.pos)
            .unwrap_or_default()
    }

    fn next(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();

            #[cfg(debug_assertions)]
            debug_assert!(
                self.pos <= self.query.len(),
                "current position is out of bounds"
            );

            if ch == '\n' {
                self.line += 1;
                self.line_start = self.pos;
            }

            Some(ch)
        } else {
            None
        }
    }

    fn ignore(&mut self) {
        self.start = self.pos;
        self.start_position = self.position();
    }

    fn position(&self) -> Position {
        let column = self.query[self.line_start..self.pos].chars().count() + 1;
        Position::new(self.line, column)
    }

    fn peek(&self) -> char {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> char {
        match self.chars.clone().nth(n) {
            Some((_, ch)) => ch,
            None => EOP,
        }
    }

    fn accept(&mut self, ch: char) -> bool {
        if self.peek() == ch {
            self.next();
            true
        } else {
            false
        }
    }

    fn accept_run(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let mut accepted = false;
        while pred(self.peek()) {
            self.next();
            accepted = true;
        }
        accepted
    }

    /// Accept digits of `radix`, allowing single `_` separators between them.
    fn accept_digits(&mut self, radix: u32) -> bool {
        let mut accepted = false;
        loop {
            if self.peek().is_digit(radix) {
                self.next();
                accepted = true;
            } else if accepted && self.peek() == '_' && self.peek_nth(1).is_digit(radix) {
                self.next();
            } else {
                return accepted;
            }
        }
    }

    fn ignore_whitespace(&mut self) -> bool {
        #[cfg(debug_assertions)]
        debug_assert!(
            self.pos == self.start,
            "must emit or ignore before eating whitespace"
        );

        if self.accept_run(is_whitespace_char) {
            self.ignore();
            true
        } else {
            false
        }
    }

    fn record(&mut self, msg: &str) {
        self.errors
            .push(JSONPathError::lexer(msg.to_string(), self.position()));
    }

    fn error(&mut self, msg: String) -> Token {
        self.record(&msg);
        self.emit(TokenType::Error {
            msg: msg.into_boxed_str(),
        })
    }

    fn skip_comment(&mut self) -> Result<(), String> {
        self.next(); // '/'
        self.next(); // '*'

        loop {
            match self.next() {
                Some('*') if self.peek() == '/' => {
                    self.next();
                    self.ignore();
                    return Ok(());
                }
                Some(_) => (),
                None => return Err(String::from("unexpected end of comment")),
            }
        }
    }

    fn lex_dollar(&mut self) -> Token {
        if self.accept('"') {
            return match self.scan_string() {
                Ok(value) => self.emit(TokenType::Variable {
                    value: value.into_boxed_str(),
                }),
                Err(msg) => self.emit(TokenType::Error {
                    msg: msg.into_boxed_str(),
                }),
            };
        }

        let first = self.peek();
        if is_name_char(first) || first == '\\' {
            self.next();
            return match self.scan_name(first) {
                Ok((value, _)) => self.emit(TokenType::Variable {
                    value: value.into_boxed_str(),
                }),
                Err(msg) => self.emit(TokenType::Error {
                    msg: msg.into_boxed_str(),
                }),
            };
        }

        self.emit(TokenType::Root)
    }

    fn lex_name(&mut self, first: char) -> Token {
        match self.scan_name(first) {
            Ok((value, escaped)) => {
                if !escaped {
                    if let Some(kind) = lookup_keyword(&value) {
                        return self.emit(kind);
                    }
                }
                self.emit(TokenType::Name {
                    value: value.into_boxed_str(),
                })
            }
            Err(msg) => self.emit(TokenType::Error {
                msg: msg.into_boxed_str(),
            }),
        }
    }

    /// Scan an identifier whose first character has already been consumed,
    /// decoding escapes. Also reports whether any escape was seen.
    fn scan_name(&mut self, first: char) -> Result<(String, bool), String> {
        let mut value = String::new();
        let mut escaped = false;
        let mut failure: Option<String> = None;
        let mut ch = first;

        loop {
            if ch == '\\' {
                escaped = true;
                match self.lex_escape() {
                    Ok(c) => value.push(c),
                    Err(msg) => {
                        self.record(&msg);
                        failure.get_or_insert(msg);
                    }
                }
            } else {
                value.push(ch);
            }

            let next = self.peek();
            if is_name_char(next) || next == '\\' {
                self.next();
                ch = next;
            } else {
                break;
            }
        }

        match failure {
            Some(msg) => Err(msg),
            None => Ok((value, escaped)),
        }
    }

    /// Scan the rest of a double-quoted string, the opening quote having been
    /// consumed. Every problem is recorded; the first one is returned.
    fn scan_string(&mut self) -> Result<String, String> {
        let mut value = String::new();
        let mut failure: Option<String> = None;

        loop {
            match self.next() {
                None => {
                    let msg = String::from("unexpected end of quoted string");
                    self.record(&msg);
                    return Err(failure.unwrap_or(msg));
                }
                Some('"') => break,
                Some('\\') => match self.lex_escape() {
                    Ok(c) => value.push(c),
                    Err(msg) => {
                        self.record(&msg);
                        failure.get_or_insert(msg);
                    }
                },
                Some(c) if (c as u32) < 0x20 => {
                    let msg = format!("unescaped control character {:?} in string literal", c);
                    self.record(&msg);
                    failure.get_or_insert(msg);
                }
                Some(c) => value.push(c),
            }
        }

        match failure {
            Some(msg) => Err(msg),
            None => Ok(value),
        }
    }

    /// Decode one escape sequence, the backslash having been consumed.
    fn lex_escape(&mut self) -> Result<char, String> {
        match self.next() {
            None => Err(String::from("unexpected end after backslash")),
            Some('x') => match self.lex_hex_digits(2) {
                Some(0) => Err(String::from("\\x00 cannot be converted to text")),
                Some(code_point) => char::from_u32(code_point)
                    .ok_or_else(|| String::from("invalid hexadecimal character sequence")),
                None => Err(String::from("invalid hexadecimal character sequence")),
            },
            Some('u') => self.lex_unicode_escape(),
            Some(c) => simple_escape(c).ok_or_else(|| format!("invalid escape sequence '\\{c}'")),
        }
    }

    fn lex_unicode_escape(&mut self) -> Result<char, String> {
        let mut code_point = self.lex_code_unit()?;

        if is_low_surrogate(code_point) {
            return Err(String::from("unexpected low surrogate in Unicode escape"));
        }

        if is_high_surrogate(code_point) {
            if !(self.peek() == '\\' && self.peek_nth(1) == 'u') {
                return Err(String::from("unpaired high surrogate in Unicode escape"));
            }
            self.next();
            self.next();

            let low = self.lex_code_unit()?;
            if !is_low_surrogate(low) {
                return Err(String::from("unpaired high surrogate in Unicode escape"));
            }
            code_point = combine_surrogates(code_point, low);
        }

        if code_point == 0 {
            return Err(String::from("\\u0000 cannot be converted to text"));
        }

        char::from_u32(code_point).ok_or_else(|| String::from("invalid Unicode code point"))
    }

    /// `HHHH` or `{H..H}` after `\u`.
    fn lex_code_unit(&mut self) -> Result<u32, String> {
        if !self.accept('{') {
            return self
                .lex_hex_digits(4)
                .ok_or_else(|| String::from("invalid Unicode escape sequence"));
        }

        let mut code_point: u32 = 0;
        let mut count = 0;
        while let Some(digit) = self.peek().to_digit(16) {
            if count == 6 {
                return Err(String::from("invalid Unicode escape sequence"));
            }
            self.next();
            code_point = code_point * 16 + digit;
            count += 1;
        }

        if count == 0 || !self.accept('}') {
            return Err(String::from("invalid Unicode escape sequence"));
        }

        Ok(code_point)
    }

    fn lex_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value: u32 = 0;
        for _ in 0..count {
            let digit = self.peek().to_digit(16)?;
            self.next();
            value = value * 16 + digit;
        }
        Some(value)
    }

    fn lex_number(&mut self, first: char) -> Token {
        if first == '0' && matches!(self.peek(), 'b' | 'B' | 'o' | 'O' | 'x' | 'X') {
            return self.lex_radix_integer();
        }

        let mut is_float = false;

        if first == '.' {
            self.accept_digits(10);
            is_float = true;
        } else {
            if first == '0' {
                if is_digit(self.peek()) || self.peek() == '_' {
                    return self.junk();
                }
            } else if self.peek() == '_' && is_digit(self.peek_nth(1)) {
                self.next();
                self.accept_digits(10);
            } else {
                self.accept_digits(10);
            }

            if self.peek() == '.' {
                let after = self.peek_nth(1);
                if is_digit(after) {
                    self.next();
                    self.accept_digits(10);
                    is_float = true;
                } else if after == '.' || (matches!(after, 'e' | 'E') && self.exponent_at(2)) {
                    // `1.` followed by an exponent or by another accessor dot
                    self.next();
                    is_float = true;
                }
            }
        }

        if matches!(self.peek(), 'e' | 'E') && self.exponent_at(1) {
            self.next();
            if !self.accept('+') {
                self.accept('-');
            }
            self.accept_digits(10);
            is_float = true;
        }

        if is_name_char(self.peek()) {
            return self.junk();
        }

        let value = self.value().to_string();

        if is_float {
            match parse_float(&value) {
                Some(_) => self.emit(TokenType::Float {
                    value: value.into_boxed_str(),
                }),
                None => self.error(String::from("number out of range")),
            }
        } else if parse_integer(&value).is_some() {
            self.emit(TokenType::Int {
                value: value.into_boxed_str(),
            })
        } else if parse_float(&value).is_some() {
            // too big for an integer, keep it as a float
            self.emit(TokenType::Float {
                value: value.into_boxed_str(),
            })
        } else {
            self.error(String::from("number out of range"))
        }
    }

    /// True if an exponent (optional sign, then a digit) starts `n` chars ahead.
    fn exponent_at(&self, n: usize) -> bool {
        match self.peek_nth(n) {
            '+' | '-' => is_digit(self.peek_nth(n + 1)),
            c => is_digit(c),
        }
    }

    fn lex_radix_integer(&mut self) -> Token {
        let (radix, name) = match self.next() {
            Some('b' | 'B') => (2, "binary"),
            Some('o' | 'O') => (8, "octal"),
            _ => (16, "hexadecimal"),
        };

        if !self.accept_digits(radix) {
            self.accept_run(is_name_char);
            return self.error(format!("invalid {name} integer"));
        }

        if radix == 16 && self.hex_float_ahead() {
            self.accept_run(|c| is_name_char(c) || c == '.' || c == '+' || c == '-');
            return self.error(String::from(
                "hexadecimal floating-point literals are not supported",
            ));
        }

        if is_name_char(self.peek()) {
            return self.junk();
        }

        let value = self.value().to_string();
        match parse_integer(&value) {
            Some(_) => self.emit(TokenType::Int {
                value: value.into_boxed_str(),
            }),
            None => self.error(String::from("number out of range")),
        }
    }

    /// A `p` exponent, possibly after a hexadecimal fraction, follows.
    fn hex_float_ahead(&self) -> bool {
        match self.peek() {
            'p' | 'P' => true,
            '.' => {
                let mut n = 1;
                while self.peek_nth(n).is_ascii_hexdigit() || self.peek_nth(n) == '_' {
                    n += 1;
                }
                matches!(self.peek_nth(n), 'p' | 'P')
            }
            _ => false,
        }
    }

    fn junk(&mut self) -> Token {
        self.accept_run(is_name_char);
        self.error(String::from(TRAILING_JUNK))
    }
}

pub fn tokenize(query: &str) -> Vec<Token> {
    Lexer::new(query).run()
}

pub fn lex(query: &str) -> Result<Vec<Token>, JSONPathError> {
    let mut lexer = Lexer::new(query);
    let tokens = lexer.run();

    match lexer.errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(tokens),
    }
}

fn is_name_first(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '\\'
}

fn is_name_char(ch: char) -> bool {
    ch != EOP && (ch.is_alphanumeric() || ch == '_')
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_whitespace_char(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\r' | '\t' | '\x0C')
}
