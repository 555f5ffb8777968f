//! A Pratt parser from path tokens to a validated [`JSONPath`].
//!
//! Every parse function returns a [`Node`]. Whether that node is a value
//! expression or a boolean predicate is checked where the grammar cares:
//! `&&`, `||`, `!` and filters want predicates, while arithmetic,
//! comparisons, `starts with`, `like_regex`, `exists` and subscripts want
//! value expressions.
use crate::{
    errors::{JSONPathError, Position},
    lexer::lex,
    like_regex::RegexFlags,
    node::{
        fold_unary_or_number, link_nodes, BinaryOperator, Constant, Method, Node, UnaryOperator,
        ANY_LAST,
    },
    number::parse_integer,
    path::JSONPath,
    token::{Keyword, Token, TokenType},
};

static EOP_TOKEN: Token = Token {
    kind: TokenType::Eop,
    span: (0, 0),
    position: Position { line: 1, column: 1 },
};

const PRECEDENCE_LOWEST: u8 = 0;
const PRECEDENCE_LOGICAL_OR: u8 = 1;
const PRECEDENCE_LOGICAL_AND: u8 = 2;
const PRECEDENCE_RELATIONAL: u8 = 3;
const PRECEDENCE_ADDITIVE: u8 = 4;
const PRECEDENCE_MULTIPLICATIVE: u8 = 5;
const PRECEDENCE_PREFIX: u8 = 6;

/// Verbose syntax errors list at most this many alternatives, most likely
/// first.
const MAX_EXPECTED: usize = 4;

const EXPECT_PRIMARY: &[&str] = &[
    "'$'",
    "a literal",
    "'('",
    "'-'",
    "'!'",
    "'@'",
    "a variable",
    "'last'",
    "'+'",
    "'exists'",
];

/// A token stream that keeps returning the end-of-path token once exhausted.
struct Tokens {
    tokens: Vec<Token>,
    index: usize,
}

impl Tokens {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        self.tokens
            .get(self.index + n)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOP_TOKEN)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        token
    }
}

#[derive(Debug, Default, Clone)]
pub struct Parser {
    verbose: bool,
}

impl Parser {
    pub fn new() -> Self {
        Parser { verbose: false }
    }

    /// When set, syntax errors also list a few tokens that would have been
    /// accepted in place of the offending one.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn parse(&self, query: &str) -> Result<JSONPath, JSONPathError> {
        let mut it = Tokens::new(lex(query)?);
        let lax = self.parse_mode(&mut it);
        let root = self.parse_expression(&mut it, PRECEDENCE_LOWEST)?;

        // parse_expression should have consumed all tokens
        match it.peek() {
            Token {
                kind: TokenType::Eop,
                ..
            } => {
                let predicate = root.is_predicate();
                JSONPath::new(root, lax, predicate)
            }
            token => Err(self.unexpected(token, &["end of path"])),
        }
    }

    fn parse_mode(&self, it: &mut Tokens) -> bool {
        match it.peek().keyword() {
            Some(Keyword::Strict) => {
                it.next();
                false
            }
            Some(Keyword::Lax) => {
                it.next();
                true
            }
            _ => true,
        }
    }

    fn parse_expression(&self, it: &mut Tokens, precedence: u8) -> Result<Node, JSONPathError> {
        let start = it.peek().position;
        let mut left = self.parse_prefix(it)?;

        loop {
            if self.precedence(&it.peek().kind) <= precedence {
                break;
            }
            left = self.parse_infix_expression(it, left, start)?;
        }

        Ok(left)
    }

    fn precedence(&self, kind: &TokenType) -> u8 {
        match kind {
            TokenType::Or => PRECEDENCE_LOGICAL_OR,
            TokenType::And => PRECEDENCE_LOGICAL_AND,
            TokenType::Eq
            | TokenType::Ne
            | TokenType::Lt
            | TokenType::Le
            | TokenType::Gt
            | TokenType::Ge
            | TokenType::Keyword {
                keyword: Keyword::Starts | Keyword::LikeRegex,
                ..
            } => PRECEDENCE_RELATIONAL,
            TokenType::Plus | TokenType::Minus => PRECEDENCE_ADDITIVE,
            TokenType::Wild | TokenType::Slash | TokenType::Percent => PRECEDENCE_MULTIPLICATIVE,
            _ => PRECEDENCE_LOWEST,
        }
    }

    fn parse_prefix(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        match it.peek().kind {
            TokenType::Plus | TokenType::Minus => self.parse_signed_expression(it),
            TokenType::Not => self.parse_not_expression(it),
            TokenType::LParen => self.parse_grouped_expression(it),
            TokenType::Keyword {
                keyword: Keyword::Exists,
                ..
            } => self.parse_exists(it),
            _ => self.parse_accessor_expression(it),
        }
    }

    fn parse_signed_expression(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        let operator = match it.next().kind {
            TokenType::Minus => UnaryOperator::Minus,
            _ => UnaryOperator::Plus,
        };
        let position = it.peek().position;
        let operand = self.parse_expression(it, PRECEDENCE_PREFIX)?;
        let operand = expect_expression(operand, position)?;
        Ok(fold_unary_or_number(operator, operand))
    }

    fn parse_not_expression(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        it.next(); // eat '!'

        match it.peek().kind {
            TokenType::LParen => {
                it.next();
                let position = it.peek().position;
                let predicate = self.parse_expression(it, PRECEDENCE_LOWEST)?;
                let predicate = expect_predicate(predicate, position)?;
                self.close_paren(it)?;
                Ok(Node::unary(UnaryOperator::Not, Some(predicate)))
            }
            TokenType::Keyword {
                keyword: Keyword::Exists,
                ..
            } => {
                let exists = self.parse_exists(it)?;
                Ok(Node::unary(UnaryOperator::Not, Some(exists)))
            }
            _ => Err(self.unexpected(it.peek(), &["'('", "'exists'"])),
        }
    }

    fn parse_exists(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        it.next(); // eat 'exists'
        self.expect(it, TokenType::LParen)?;
        let position = it.peek().position;
        let operand = self.parse_expression(it, PRECEDENCE_LOWEST)?;
        let operand = expect_expression(operand, position)?;
        self.close_paren(it)?;
        Ok(Node::unary(UnaryOperator::Exists, Some(operand)))
    }

    fn parse_grouped_expression(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        it.next(); // eat open paren
        let expr = self.parse_expression(it, PRECEDENCE_LOWEST)?;
        self.close_paren(it)?;

        // a parenthesized value or predicate can head a new accessor chain
        if is_accessor_start(&it.peek().kind) {
            let mut nodes = vec![expr];
            self.parse_accessors(it, &mut nodes)?;
            return Ok(link_nodes(nodes));
        }

        if it.peek().is_keyword(Keyword::Is) {
            let token = it.next();
            if !expr.is_predicate() {
                return Err(JSONPathError::syntax(
                    String::from("'is unknown' must follow a parenthesized predicate"),
                    token.position,
                ));
            }
            if !it.peek().is_keyword(Keyword::Unknown) {
                return Err(self.unexpected(it.peek(), &["'unknown'"]));
            }
            it.next();
            return Ok(Node::unary(UnaryOperator::IsUnknown, Some(expr)));
        }

        Ok(expr)
    }

    /// A primary value followed by zero or more accessors.
    fn parse_accessor_expression(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        let primary = match &it.peek().kind {
            TokenType::Root => Node::constant(Constant::Root),
            TokenType::Current => Node::constant(Constant::Current),
            TokenType::Keyword {
                keyword: Keyword::Last,
                ..
            } => Node::constant(Constant::Last),
            TokenType::True => Node::constant(Constant::True),
            TokenType::False => Node::constant(Constant::False),
            TokenType::Null => Node::constant(Constant::Null),
            TokenType::String { value } => Node::string(value),
            TokenType::Variable { value } => Node::variable(value),
            TokenType::Int { value } => Node::integer(value),
            TokenType::Float { value } => Node::numeric(value),
            _ => return Err(self.unexpected(it.peek(), EXPECT_PRIMARY)),
        };
        it.next();

        let mut nodes = vec![primary];
        self.parse_accessors(it, &mut nodes)?;
        Ok(link_nodes(nodes))
    }

    fn parse_accessors(&self, it: &mut Tokens, nodes: &mut Vec<Node>) -> Result<(), JSONPathError> {
        loop {
            match it.peek().kind {
                TokenType::Dot => {
                    it.next();
                    nodes.push(self.parse_dot_accessor(it)?);
                }
                TokenType::LBracket => nodes.push(self.parse_array_accessor(it)?),
                TokenType::Filter => nodes.push(self.parse_filter(it)?),
                _ => return Ok(()),
            }
        }
    }

    fn parse_dot_accessor(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        let token = it.next();

        match &token.kind {
            TokenType::Wild => Ok(Node::constant(Constant::AnyKey)),
            TokenType::DoubleWild => self.parse_any(it),
            TokenType::Keyword { keyword, value } => {
                if it.peek().kind == TokenType::LParen {
                    if let Some(node) = self.parse_method(it, *keyword)? {
                        return Ok(node);
                    }
                }
                Ok(Node::key(value))
            }
            TokenType::Name { value } | TokenType::String { value } => Ok(Node::key(value)),
            TokenType::True => Ok(Node::key("true")),
            TokenType::False => Ok(Node::key("false")),
            TokenType::Null => Ok(Node::key("null")),
            _ => Err(self.unexpected(
                &token,
                &["an identifier", "a string", "'*'", "'**'", "a method"],
            )),
        }
    }

    /// A method call, if `keyword` names a method. The next token is the
    /// opening parenthesis.
    fn parse_method(&self, it: &mut Tokens, keyword: Keyword) -> Result<Option<Node>, JSONPathError> {
        let method = match keyword {
            Keyword::Abs => Method::Abs,
            Keyword::Size => Method::Size,
            Keyword::Type => Method::Type,
            Keyword::Floor => Method::Floor,
            Keyword::Ceiling => Method::Ceiling,
            Keyword::Double => Method::Double,
            Keyword::KeyValue => Method::KeyValue,
            Keyword::BigInt => Method::BigInt,
            Keyword::Boolean => Method::Boolean,
            Keyword::Date => Method::Date,
            Keyword::Integer => Method::Integer,
            Keyword::Number => Method::Number,
            Keyword::String => Method::String,
            Keyword::Decimal => return self.parse_decimal(it).map(Some),
            Keyword::Datetime => return self.parse_datetime(it).map(Some),
            Keyword::Time => return self.parse_precision(it, UnaryOperator::Time).map(Some),
            Keyword::TimeTz => return self.parse_precision(it, UnaryOperator::TimeTz).map(Some),
            Keyword::Timestamp => {
                return self
                    .parse_precision(it, UnaryOperator::Timestamp)
                    .map(Some)
            }
            Keyword::TimestampTz => {
                return self
                    .parse_precision(it, UnaryOperator::TimestampTz)
                    .map(Some)
            }
            _ => return Ok(None),
        };

        it.next(); // eat open paren
        self.expect(it, TokenType::RParen)?;
        Ok(Some(Node::method(method)))
    }

    fn parse_decimal(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        it.next(); // eat open paren
        let mut args: Vec<Node> = Vec::new();

        if it.peek().kind != TokenType::RParen {
            loop {
                args.push(self.parse_signed_integer(it)?);
                match it.peek().kind {
                    TokenType::Comma if args.len() < 2 => {
                        it.next();
                    }
                    TokenType::Comma => {
                        return Err(JSONPathError::syntax(
                            String::from(".decimal() takes at most 2 arguments"),
                            it.peek().position,
                        ));
                    }
                    _ => break,
                }
            }
        }

        self.expect(it, TokenType::RParen)?;
        Ok(Node::decimal(args))
    }

    fn parse_signed_integer(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        let sign = match it.peek().kind {
            TokenType::Plus => Some(UnaryOperator::Plus),
            TokenType::Minus => Some(UnaryOperator::Minus),
            _ => None,
        };
        if sign.is_some() {
            it.next();
        }

        match &it.peek().kind {
            TokenType::Int { value } => {
                let node = Node::integer(value);
                it.next();
                Ok(match sign {
                    Some(operator) => fold_unary_or_number(operator, node),
                    None => node,
                })
            }
            _ => Err(self.unexpected(it.peek(), &["an integer"])),
        }
    }

    fn parse_datetime(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        it.next(); // eat open paren
        let template = match &it.peek().kind {
            TokenType::String { value } => Some(Node::string(value)),
            _ => None,
        };
        if template.is_some() {
            it.next();
        }
        self.expect(it, TokenType::RParen)?;
        Ok(Node::unary(UnaryOperator::Datetime, template))
    }

    fn parse_precision(&self, it: &mut Tokens, operator: UnaryOperator) -> Result<Node, JSONPathError> {
        it.next(); // eat open paren
        let precision = match &it.peek().kind {
            TokenType::Int { value } => Some(Node::integer(value)),
            _ => None,
        };
        if precision.is_some() {
            it.next();
        }
        self.expect(it, TokenType::RParen)?;
        Ok(Node::unary(operator, precision))
    }

    /// `**`, `**{n}` or `**{n to m}`, the `**` having been consumed.
    fn parse_any(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        if it.peek().kind != TokenType::LBrace {
            return Ok(Node::any(0, -1));
        }

        it.next(); // eat '{'
        let first = self.parse_any_level(it)?;
        let last = if it.peek().is_keyword(Keyword::To) {
            it.next();
            self.parse_any_level(it)?
        } else {
            first
        };
        self.expect(it, TokenType::RBrace)?;
        Ok(Node::any(first, last))
    }

    fn parse_any_level(&self, it: &mut Tokens) -> Result<i64, JSONPathError> {
        let token = it.next();
        match &token.kind {
            TokenType::Keyword {
                keyword: Keyword::Last,
                ..
            } => Ok(-1),
            TokenType::Int { value } => match parse_integer(value) {
                Some(level) if (0..i64::from(ANY_LAST)).contains(&level) => Ok(level),
                _ => Err(JSONPathError::syntax(
                    format!("wildcard level {} is out of range", value),
                    token.position,
                )),
            },
            _ => Err(self.unexpected(&token, &["an integer", "'last'"])),
        }
    }

    fn parse_array_accessor(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        let open = it.next(); // eat '['

        if it.peek().kind == TokenType::Wild && it.peek_nth(1).kind == TokenType::RBracket {
            it.next();
            it.next();
            return Ok(Node::constant(Constant::AnyArray));
        }

        let mut subscripts: Vec<Node> = Vec::new();

        loop {
            let position = it.peek().position;
            let from = self.parse_expression(it, PRECEDENCE_LOWEST)?;
            let from = expect_expression(from, position)?;

            let to = if it.peek().is_keyword(Keyword::To) {
                it.next();
                let position = it.peek().position;
                let to = self.parse_expression(it, PRECEDENCE_LOWEST)?;
                Some(expect_expression(to, position)?)
            } else {
                None
            };

            subscripts.push(Node::subscript(from, to));

            match it.peek().kind {
                TokenType::Comma => {
                    it.next();
                }
                TokenType::RBracket => {
                    it.next();
                    break;
                }
                TokenType::Eop => {
                    return Err(JSONPathError::syntax(
                        String::from("unclosed array subscript"),
                        open.position,
                    ));
                }
                _ => return Err(self.unexpected(it.peek(), &["','", "']'", "'to'"])),
            }
        }

        Ok(Node::array_index(subscripts))
    }

    fn parse_filter(&self, it: &mut Tokens) -> Result<Node, JSONPathError> {
        it.next(); // eat '?'
        self.expect(it, TokenType::LParen)?;
        let position = it.peek().position;
        let predicate = self.parse_expression(it, PRECEDENCE_LOWEST)?;
        let predicate = expect_predicate(predicate, position)?;
        self.close_paren(it)?;
        Ok(Node::unary(UnaryOperator::Filter, Some(predicate)))
    }

    fn parse_infix_expression(
        &self,
        it: &mut Tokens,
        left: Node,
        start: Position,
    ) -> Result<Node, JSONPathError> {
        let token = it.next();
        let precedence = self.precedence(&token.kind);

        let operator = match &token.kind {
            TokenType::Or | TokenType::And => {
                let left = expect_predicate(left, start)?;
                let position = it.peek().position;
                let right = self.parse_expression(it, precedence)?;
                let right = expect_predicate(right, position)?;
                let operator = if token.kind == TokenType::Or {
                    BinaryOperator::Or
                } else {
                    BinaryOperator::And
                };
                return Ok(Node::binary(operator, Some(left), Some(right)));
            }
            TokenType::Keyword {
                keyword: Keyword::Starts,
                ..
            } => return self.parse_starts_with(it, left, start),
            TokenType::Keyword {
                keyword: Keyword::LikeRegex,
                ..
            } => return self.parse_like_regex(it, left, start),
            TokenType::Eq => BinaryOperator::Eq,
            TokenType::Ne => BinaryOperator::Ne,
            TokenType::Lt => BinaryOperator::Lt,
            TokenType::Le => BinaryOperator::Le,
            TokenType::Gt => BinaryOperator::Gt,
            TokenType::Ge => BinaryOperator::Ge,
            TokenType::Plus => BinaryOperator::Add,
            TokenType::Minus => BinaryOperator::Sub,
            TokenType::Wild => BinaryOperator::Mul,
            TokenType::Slash => BinaryOperator::Div,
            TokenType::Percent => BinaryOperator::Mod,
            _ => return Err(self.unexpected(&token, &[])),
        };

        let left = expect_expression(left, start)?;
        let position = it.peek().position;
        let right = self.parse_expression(it, precedence)?;
        let right = expect_expression(right, position)?;
        Ok(Node::binary(operator, Some(left), Some(right)))
    }

    fn parse_starts_with(&self, it: &mut Tokens, left: Node, start: Position) -> Result<Node, JSONPathError> {
        if !it.peek().is_keyword(Keyword::With) {
            return Err(self.unexpected(it.peek(), &["'with'"]));
        }
        it.next();

        let left = expect_expression(left, start)?;
        let token = it.next();
        let initial = match &token.kind {
            TokenType::String { value } => Node::string(value),
            TokenType::Variable { value } => Node::variable(value),
            _ => return Err(self.unexpected(&token, &["a string", "a variable"])),
        };

        Ok(Node::binary(BinaryOperator::StartsWith, Some(left), Some(initial)))
    }

    fn parse_like_regex(&self, it: &mut Tokens, left: Node, start: Position) -> Result<Node, JSONPathError> {
        let left = expect_expression(left, start)?;

        let pattern_token = it.next();
        let pattern = match &pattern_token.kind {
            TokenType::String { value } => value.to_string(),
            _ => return Err(self.unexpected(&pattern_token, &["a string"])),
        };

        let mut flags = String::new();
        if it.peek().is_keyword(Keyword::Flag) {
            it.next();
            let flags_token = it.next();
            match &flags_token.kind {
                TokenType::String { value } => flags.push_str(value),
                _ => return Err(self.unexpected(&flags_token, &["a string"])),
            }
            RegexFlags::parse(&flags)
                .map_err(|err| JSONPathError::syntax(err.msg, flags_token.position))?;
        }

        Node::like_regex(left, &pattern, &flags)
            .map_err(|err| JSONPathError::syntax(err.msg, pattern_token.position))
    }

    fn expect(&self, it: &mut Tokens, kind: TokenType) -> Result<Token, JSONPathError> {
        if it.peek().kind == kind {
            Ok(it.next())
        } else {
            let expected = kind.to_string();
            Err(self.unexpected(it.peek(), &[expected.as_str()]))
        }
    }

    fn close_paren(&self, it: &mut Tokens) -> Result<(), JSONPathError> {
        match it.peek().kind {
            TokenType::RParen => {
                it.next();
                Ok(())
            }
            TokenType::Eop => Err(JSONPathError::syntax(
                String::from("unbalanced parentheses"),
                it.peek().position,
            )),
            _ => Err(self.unexpected(it.peek(), &["')'"])),
        }
    }

    fn unexpected(&self, token: &Token, expected: &[&str]) -> JSONPathError {
        let mut msg = match token.kind {
            TokenType::Eop => String::from("unexpected end of path"),
            ref kind => format!("unexpected {}", kind),
        };

        if self.verbose && !expected.is_empty() {
            let alternatives: Vec<&str> = expected.iter().take(MAX_EXPECTED).copied().collect();
            msg.push_str(", expecting ");
            msg.push_str(&alternatives.join(" or "));
            if expected.len() > MAX_EXPECTED {
                msg.push_str(" or ...");
            }
        }

        JSONPathError::syntax(msg, token.position)
    }
}

fn is_accessor_start(kind: &TokenType) -> bool {
    matches!(
        kind,
        TokenType::Dot | TokenType::LBracket | TokenType::Filter
    )
}

fn expect_predicate(node: Node, position: Position) -> Result<Node, JSONPathError> {
    if node.is_predicate() {
        Ok(node)
    } else {
        Err(JSONPathError::syntax(
            String::from("expected a predicate, found a value expression"),
            position,
        ))
    }
}

fn expect_expression(node: Node, position: Position) -> Result<Node, JSONPathError> {
    if node.is_predicate() {
        Err(JSONPathError::syntax(
            String::from("expected a value expression, found a predicate"),
            position,
        ))
    } else {
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::JSONPathErrorType;
    use crate::node::NodeType;

    fn parse(query: &str) -> JSONPath {
        Parser::new().parse(query).unwrap()
    }

    fn error(query: &str) -> JSONPathError {
        Parser::new().parse(query).unwrap_err()
    }

    #[test]
    fn chain_of_accessors() {
        let path = parse("$.abs().foo");
        let root = path.root();
        assert_eq!(root.kind, NodeType::Constant(Constant::Root));
        let method = root.next().unwrap();
        assert_eq!(method.kind, NodeType::Method(Method::Abs));
        let key = method.next().unwrap();
        assert_eq!(
            key.kind,
            NodeType::Key {
                name: "foo".to_string()
            }
        );
        assert!(key.next().is_none());
    }

    #[test]
    fn keyword_keys() {
        let path = parse("$.size.TYPE.true");
        assert_eq!(path.to_string(), "$.\"size\".\"TYPE\".\"true\"");
    }

    #[test]
    fn keyword_method_is_case_insensitive() {
        assert_eq!(parse("$.SIZE()").to_string(), "$.size()");
    }

    #[test]
    fn grouped_head_of_new_chain() {
        let path = parse("(1 + 2).abs()");
        let root = path.root();
        assert!(matches!(
            root.kind,
            NodeType::Binary {
                operator: BinaryOperator::Add,
                ..
            }
        ));
        assert_eq!(root.next().unwrap().kind, NodeType::Method(Method::Abs));
        assert!(!path.is_predicate());
    }

    #[test]
    fn grouped_chain_is_extended() {
        let path = parse("($.a).b");
        assert_eq!(path.to_string(), "$.\"a\".\"b\"");
    }

    #[test]
    fn mode() {
        assert!(parse("$").is_lax());
        assert!(parse("lax $").is_lax());
        assert!(parse("strict $").is_strict());
        assert!(parse("STRICT $").is_strict());
    }

    #[test]
    fn predicate_at_top_level() {
        assert!(parse("$.a == 1").is_predicate());
        assert!(!parse("$.a + 1").is_predicate());
        assert!(parse("exists ($.a)").is_predicate());
        assert!(!parse("(exists ($.a)).type()").is_predicate());
    }

    #[test]
    fn left_associative_arithmetic() {
        let path = parse("1 - 2 - 3");
        match &path.root().kind {
            NodeType::Binary { left, right, .. } => {
                assert!(matches!(
                    left.as_deref().map(|n| &n.kind),
                    Some(NodeType::Binary {
                        operator: BinaryOperator::Sub,
                        ..
                    })
                ));
                assert!(matches!(
                    right.as_deref().map(|n| &n.kind),
                    Some(NodeType::Integer(_))
                ));
            }
            _ => panic!("expected a binary node"),
        }
    }

    #[test]
    fn folded_negative_literal() {
        let path = parse("-42");
        assert_eq!(path.root(), &Node::integer("-42"));
        assert_eq!(path.to_string(), "-42");
    }

    #[test]
    fn decimal_arguments() {
        assert_eq!(parse("$.decimal()").to_string(), "$.decimal()");
        assert_eq!(parse("$.decimal(+6, -2)").to_string(), "$.decimal(6,-2)");
        let err = error("$.decimal(1, 2, 3)");
        assert_eq!(err.msg, ".decimal() takes at most 2 arguments");
        assert_eq!(err.position, Some(Position::new(1, 15)));
    }

    #[test]
    fn datetime_arguments() {
        assert_eq!(
            parse("$.datetime(\"HH24:MI\")").to_string(),
            "$.datetime(\"HH24:MI\")"
        );
        assert_eq!(parse("$.time_tz(3)").to_string(), "$.time_tz(3)");
        assert_eq!(parse("$.timestamp()").to_string(), "$.timestamp()");
        assert!(Parser::new().parse("$.time(\"x\")").is_err());
    }

    #[test]
    fn any_levels() {
        assert_eq!(parse("$.**").to_string(), "$.**");
        assert_eq!(parse("$.**{2}").to_string(), "$.**{2}");
        assert_eq!(parse("$.**{1 to last}").to_string(), "$.**{1 to last}");
        assert_eq!(parse("$.**{last}").to_string(), "$.**{last}");
        assert_eq!(
            error("$.**{4294967295}").msg,
            "wildcard level 4294967295 is out of range"
        );
    }

    #[test]
    fn not_requires_delimited_predicate() {
        assert!(Parser::new().parse("$ ? (!(@ == 1))").is_ok());
        assert!(Parser::new().parse("$ ? (!exists (@.a))").is_ok());
        assert_eq!(error("$ ? (!@)").msg, "unexpected '@'");
    }

    #[test]
    fn is_unknown() {
        assert_eq!(
            parse("$ ? ((@ == 1) is unknown)").to_string(),
            "$?((@ == 1) is unknown)"
        );
        assert_eq!(
            error("$ ? ((@.a) is unknown)").msg,
            "'is unknown' must follow a parenthesized predicate"
        );
    }

    #[test]
    fn filter_requires_predicate() {
        let err = error("$ ? (@.a)");
        assert_eq!(err.kind, JSONPathErrorType::SyntaxError);
        assert_eq!(err.msg, "expected a predicate, found a value expression");
        assert_eq!(err.position, Some(Position::new(1, 6)));
    }

    #[test]
    fn comparisons_are_not_associative() {
        let err = error("1 == 1 == 1");
        assert_eq!(err.msg, "expected a value expression, found a predicate");
        assert_eq!(err.position, Some(Position::new(1, 1)));
    }

    #[test]
    fn logical_operands_must_be_predicates() {
        assert_eq!(
            error("$ ? (@.a && @.b == 1)").msg,
            "expected a predicate, found a value expression"
        );
    }

    #[test]
    fn starts_with_initial() {
        assert_eq!(
            parse("$ ? (@ starts with $x)").to_string(),
            "$?(@ starts with $\"x\")"
        );
        assert_eq!(error("$ ? (@ starts with 1)").msg, "unexpected integer 1");
        assert_eq!(error("$ ? (@ starts \"a\")").msg, "unexpected string \"a\"");
    }

    #[test]
    fn like_regex_errors_are_syntax_errors() {
        let err = error("$ ? (@ like_regex \"(\")");
        assert_eq!(err.kind, JSONPathErrorType::SyntaxError);
        assert_eq!(err.position, Some(Position::new(1, 19)));

        let err = error("$ ? (@ like_regex \"a\" flag \"z\")");
        assert_eq!(
            err.to_string(),
            "parser: unrecognized flag character 'z' in LIKE_REGEX predicate at 1:28"
        );
    }

    #[test]
    fn array_subscripts() {
        assert_eq!(
            parse("$[1, 2 to 3, last - 1]").to_string(),
            "$[1,2 to 3,last - 1]"
        );
        assert_eq!(parse("$[*]").to_string(), "$[*]");
        assert_eq!(error("$[1, 2").msg, "unclosed array subscript");
    }

    #[test]
    fn unbalanced_parentheses() {
        assert_eq!(error("$ ? (@ == 1").msg, "unbalanced parentheses");
        assert_eq!(error("(1 + 2").msg, "unbalanced parentheses");
    }

    #[test]
    fn empty_path() {
        let err = error("");
        assert_eq!(err.to_string(), "parser: unexpected end of path at 1:1");
        assert!(Parser::new().parse("strict").is_err());
    }

    #[test]
    fn trailing_tokens() {
        assert_eq!(error("$ $").to_string(), "parser: unexpected '$' at 1:3");
        assert_eq!(error("$.a)").msg, "unexpected ')'");
    }

    #[test]
    fn lexer_errors_pass_through() {
        let err = error("$.\"abc");
        assert_eq!(err.kind, JSONPathErrorType::LexerError);
    }

    #[test]
    fn verbose_errors() {
        let parser = Parser::new().verbose(true);
        let err = parser.parse("").unwrap_err();
        assert_eq!(
            err.msg,
            "unexpected end of path, expecting '$' or a literal or '(' or '-' or ..."
        );
        let err = parser.parse("$ ? (").unwrap_err();
        assert!(err.msg.contains("a literal"));
        let err = parser.parse("$ ? (!@)").unwrap_err();
        assert_eq!(err.msg, "unexpected '@', expecting '(' or 'exists'");
        let err = parser.parse("$.a)").unwrap_err();
        assert_eq!(err.msg, "unexpected ')', expecting end of path");
    }

    #[test]
    fn quiet_errors_have_no_alternatives() {
        assert_eq!(error("$ ? (!@)").msg, "unexpected '@'");
    }
}
