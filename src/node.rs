//! Syntax tree nodes.
//!
//! A path is a tree of [`Node`]s. Operators hold their operands as boxed
//! children, while accessor sequences such as `$.a[0].b` are threaded through
//! each node's `next` link, one owned successor per node. Rendering a node
//! with [`fmt::Display`] reproduces path text with the minimum parentheses
//! needed to read back the same tree.
use std::fmt::{self, Write};

use regex::Regex;

use crate::{
    errors::JSONPathError,
    escape::write_quoted,
    like_regex::{compile, RegexFlags},
    number::{format_decimal, parse_float, parse_integer},
};

/// Sentinel for an unbounded (`last`) level of a `**` wildcard.
pub const ANY_LAST: u32 = u32::MAX;

/// Priority of nodes that never need parentheses.
const PRIORITY_ATOMIC: u8 = 6;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Constant {
    Root,
    Current,
    Last,
    AnyArray,
    AnyKey,
    True,
    False,
    Null,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Root => f.write_char('$'),
            Constant::Current => f.write_char('@'),
            Constant::Last => f.write_str("last"),
            Constant::AnyArray => f.write_str("[*]"),
            Constant::AnyKey => f.write_char('*'),
            Constant::True => f.write_str("true"),
            Constant::False => f.write_str("false"),
            Constant::Null => f.write_str("null"),
        }
    }
}

/// Zero-argument item methods.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Method {
    Abs,
    Size,
    Type,
    Floor,
    Ceiling,
    Double,
    KeyValue,
    BigInt,
    Boolean,
    Date,
    Integer,
    Number,
    String,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Abs => "abs",
            Method::Size => "size",
            Method::Type => "type",
            Method::Floor => "floor",
            Method::Ceiling => "ceiling",
            Method::Double => "double",
            Method::KeyValue => "keyvalue",
            Method::BigInt => "bigint",
            Method::Boolean => "boolean",
            Method::Date => "date",
            Method::Integer => "integer",
            Method::Number => "number",
            Method::String => "string",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}()", self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    StartsWith,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Subscript,
    Decimal,
}

impl BinaryOperator {
    pub fn priority(&self) -> u8 {
        match self {
            BinaryOperator::Or => 0,
            BinaryOperator::And => 1,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Le
            | BinaryOperator::Gt
            | BinaryOperator::Ge
            | BinaryOperator::StartsWith => 2,
            BinaryOperator::Add | BinaryOperator::Sub => 3,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 4,
            BinaryOperator::Subscript | BinaryOperator::Decimal => PRIORITY_ATOMIC,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::And => f.write_str("&&"),
            BinaryOperator::Or => f.write_str("||"),
            BinaryOperator::Eq => f.write_str("=="),
            BinaryOperator::Ne => f.write_str("!="),
            BinaryOperator::Lt => f.write_str("<"),
            BinaryOperator::Le => f.write_str("<="),
            BinaryOperator::Gt => f.write_str(">"),
            BinaryOperator::Ge => f.write_str(">="),
            BinaryOperator::StartsWith => f.write_str("starts with"),
            BinaryOperator::Add => f.write_char('+'),
            BinaryOperator::Sub => f.write_char('-'),
            BinaryOperator::Mul => f.write_char('*'),
            BinaryOperator::Div => f.write_char('/'),
            BinaryOperator::Mod => f.write_char('%'),
            BinaryOperator::Subscript => f.write_str("to"),
            BinaryOperator::Decimal => f.write_str(".decimal()"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Exists,
    Not,
    IsUnknown,
    Plus,
    Minus,
    Filter,
    Datetime,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
}

impl UnaryOperator {
    pub fn priority(&self) -> u8 {
        match self {
            UnaryOperator::Plus | UnaryOperator::Minus => 5,
            _ => PRIORITY_ATOMIC,
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Exists => f.write_str("exists"),
            UnaryOperator::Not => f.write_char('!'),
            UnaryOperator::IsUnknown => f.write_str("is unknown"),
            UnaryOperator::Plus => f.write_char('+'),
            UnaryOperator::Minus => f.write_char('-'),
            UnaryOperator::Filter => f.write_char('?'),
            UnaryOperator::Datetime => f.write_str(".datetime"),
            UnaryOperator::Time => f.write_str(".time"),
            UnaryOperator::TimeTz => f.write_str(".time_tz"),
            UnaryOperator::Timestamp => f.write_str(".timestamp"),
            UnaryOperator::TimestampTz => f.write_str(".timestamp_tz"),
        }
    }
}

/// A non-integer numeric literal. Two values are equal when their canonical
/// forms are, whatever their source spelling. The canonical form is exact;
/// `value` is the nearest `f64`.
#[derive(Debug, Clone)]
pub struct Numeric {
    literal: String,
    canonical: String,
    value: f64,
}

impl Numeric {
    /// The literal as written in the path.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// An integer literal, possibly written in binary, octal or hexadecimal
/// and with `_` separators.
#[derive(Debug, Clone)]
pub struct Integer {
    literal: String,
    canonical: String,
    value: i64,
}

impl Integer {
    /// The literal as written in the path.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// The value in plain decimal.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// A `like_regex` predicate with its pattern already compiled.
#[derive(Debug, Clone)]
pub struct LikeRegex {
    operand: Box<Node>,
    pattern: String,
    flags: RegexFlags,
    regex: Regex,
}

impl LikeRegex {
    pub fn operand(&self) -> &Node {
        &self.operand
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for LikeRegex {
    fn eq(&self, other: &Self) -> bool {
        self.operand == other.operand && self.pattern == other.pattern && self.flags == other.flags
    }
}

#[derive(Debug, Clone)]
pub enum NodeType {
    Constant(Constant),
    Method(Method),
    String {
        value: String,
    },
    Key {
        name: String,
    },
    Variable {
        name: String,
    },
    Numeric(Numeric),
    Integer(Integer),
    Binary {
        operator: BinaryOperator,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Option<Box<Node>>,
    },
    Regex(LikeRegex),
    ArrayIndex {
        subscripts: Vec<Node>,
    },
    Any {
        first: u32,
        last: u32,
    },
}

/// Number literals compare by value across `Numeric` and `Integer`, so
/// `1.e1` equals the `10` it renders as.
impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        use NodeType as T;
        match (self, other) {
            (T::Constant(a), T::Constant(b)) => a == b,
            (T::Method(a), T::Method(b)) => a == b,
            (T::String { value: a }, T::String { value: b }) => a == b,
            (T::Key { name: a }, T::Key { name: b }) => a == b,
            (T::Variable { name: a }, T::Variable { name: b }) => a == b,
            (T::Numeric(a), T::Numeric(b)) => a == b,
            (T::Integer(a), T::Integer(b)) => a == b,
            (T::Numeric(a), T::Integer(b)) | (T::Integer(b), T::Numeric(a)) => {
                a.canonical() == b.canonical()
            }
            (
                T::Binary {
                    operator: op_a,
                    left: left_a,
                    right: right_a,
                },
                T::Binary {
                    operator: op_b,
                    left: left_b,
                    right: right_b,
                },
            ) => op_a == op_b && left_a == left_b && right_a == right_b,
            (
                T::Unary {
                    operator: op_a,
                    operand: a,
                },
                T::Unary {
                    operator: op_b,
                    operand: b,
                },
            ) => op_a == op_b && a == b,
            (T::Regex(a), T::Regex(b)) => a == b,
            (T::ArrayIndex { subscripts: a }, T::ArrayIndex { subscripts: b }) => a == b,
            (
                T::Any {
                    first: first_a,
                    last: last_a,
                },
                T::Any {
                    first: first_b,
                    last: last_b,
                },
            ) => first_a == first_b && last_a == last_b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeType,
    next: Option<Box<Node>>,
}

impl Node {
    pub fn new(kind: NodeType) -> Self {
        Node { kind, next: None }
    }

    pub fn constant(constant: Constant) -> Self {
        Node::new(NodeType::Constant(constant))
    }

    pub fn method(method: Method) -> Self {
        Node::new(NodeType::Method(method))
    }

    pub fn string(value: &str) -> Self {
        Node::new(NodeType::String {
            value: value.to_string(),
        })
    }

    pub fn key(name: &str) -> Self {
        Node::new(NodeType::Key {
            name: name.to_string(),
        })
    }

    pub fn variable(name: &str) -> Self {
        Node::new(NodeType::Variable {
            name: name.to_string(),
        })
    }

    /// Panics if `literal` is not a valid float literal; the lexer never
    /// produces one.
    pub fn numeric(literal: &str) -> Self {
        match (parse_float(literal), format_decimal(literal)) {
            (Some(value), Some(canonical)) => Node::new(NodeType::Numeric(Numeric {
                literal: literal.to_string(),
                canonical,
                value,
            })),
            _ => panic!("invalid numeric literal {:?}", literal),
        }
    }

    /// Panics if `literal` is not a valid integer literal in `i64` range;
    /// the lexer never produces one.
    pub fn integer(literal: &str) -> Self {
        match parse_integer(literal) {
            Some(value) => Node::new(NodeType::Integer(Integer {
                literal: literal.to_string(),
                canonical: value.to_string(),
                value,
            })),
            None => panic!("invalid integer literal {:?}", literal),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Option<Node>, right: Option<Node>) -> Self {
        Node::new(NodeType::Binary {
            operator,
            left: left.map(Box::new),
            right: right.map(Box::new),
        })
    }

    /// One array subscript, `from` or `from to to`.
    pub fn subscript(from: Node, to: Option<Node>) -> Self {
        Node::binary(BinaryOperator::Subscript, Some(from), to)
    }

    /// `.decimal()` with an optional precision and scale. Panics when given
    /// more than two arguments.
    pub fn decimal(args: Vec<Node>) -> Self {
        if args.len() > 2 {
            panic!(
                ".decimal() takes at most 2 arguments but {} were given",
                args.len()
            );
        }

        let mut it = args.into_iter();
        let precision = it.next();
        let scale = it.next();
        Node::binary(BinaryOperator::Decimal, precision, scale)
    }

    pub fn unary(operator: UnaryOperator, operand: Option<Node>) -> Self {
        Node::new(NodeType::Unary {
            operator,
            operand: operand.map(Box::new),
        })
    }

    /// Build a `like_regex` predicate, validating `flags` and compiling
    /// `pattern`.
    pub fn like_regex(operand: Node, pattern: &str, flags: &str) -> Result<Self, JSONPathError> {
        let flags = RegexFlags::parse(flags)?;
        let regex = compile(pattern, flags)?;
        Ok(Node::new(NodeType::Regex(LikeRegex {
            operand: Box::new(operand),
            pattern: pattern.to_string(),
            flags,
            regex,
        })))
    }

    pub fn array_index(subscripts: Vec<Node>) -> Self {
        Node::new(NodeType::ArrayIndex { subscripts })
    }

    /// A `**` wildcard. Negative or out of range levels mean `last`.
    pub fn any(first: i64, last: i64) -> Self {
        Node::new(NodeType::Any {
            first: any_level(first),
            last: any_level(last),
        })
    }

    /// The chain successor, if any.
    pub fn next(&self) -> Option<&Node> {
        self.next.as_deref()
    }

    /// Binding strength from 0 (`||`) to 6 (never parenthesized).
    pub fn priority(&self) -> u8 {
        match &self.kind {
            NodeType::Binary { operator, .. } => operator.priority(),
            NodeType::Unary { operator, .. } => operator.priority(),
            _ => PRIORITY_ATOMIC,
        }
    }

    /// True if this node is a boolean predicate rather than a value
    /// expression. A predicate heading an accessor chain is a value.
    pub fn is_predicate(&self) -> bool {
        if self.next.is_some() {
            return false;
        }

        match &self.kind {
            NodeType::Binary { operator, .. } => matches!(
                operator,
                BinaryOperator::And
                    | BinaryOperator::Or
                    | BinaryOperator::Eq
                    | BinaryOperator::Ne
                    | BinaryOperator::Lt
                    | BinaryOperator::Le
                    | BinaryOperator::Gt
                    | BinaryOperator::Ge
                    | BinaryOperator::StartsWith
            ),
            NodeType::Unary { operator, .. } => matches!(
                operator,
                UnaryOperator::Exists | UnaryOperator::Not | UnaryOperator::IsUnknown
            ),
            NodeType::Regex(_) => true,
            _ => false,
        }
    }

    /// Attach `node` after the last node of this chain.
    fn append(&mut self, node: Node) {
        let mut tail = &mut self.next;
        while let Some(n) = tail {
            tail = &mut n.next;
        }
        *tail = Some(Box::new(node));
    }

    /// Write this node and its chain successors. `in_key` is set for chain
    /// successors, `parens` asks operator nodes to wrap themselves.
    pub(crate) fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
        in_key: bool,
        parens: bool,
    ) -> fmt::Result {
        match &self.kind {
            NodeType::Constant(constant) => {
                if in_key && *constant == Constant::AnyKey {
                    f.write_char('.')?;
                }
                write!(f, "{constant}")?;
            }
            NodeType::Method(method) => write!(f, "{method}")?,
            NodeType::String { value } => write_quoted(f, value)?,
            NodeType::Key { name } => {
                if in_key {
                    f.write_char('.')?;
                }
                write_quoted(f, name)?;
            }
            NodeType::Variable { name } => {
                f.write_char('$')?;
                write_quoted(f, name)?;
            }
            NodeType::Numeric(numeric) => self.render_number(f, numeric)?,
            NodeType::Integer(integer) => self.render_number(f, integer)?,
            NodeType::Binary {
                operator,
                left,
                right,
            } => self.render_binary(f, *operator, left.as_deref(), right.as_deref(), parens)?,
            NodeType::Unary { operator, operand } => {
                self.render_unary(f, *operator, operand.as_deref(), parens)?
            }
            NodeType::Regex(like_regex) => {
                let parens = parens || self.next.is_some();
                if parens {
                    f.write_char('(')?;
                }
                like_regex.operand().render(f, false, true)?;
                f.write_str(" like_regex ")?;
                write_quoted(f, like_regex.pattern())?;
                if !like_regex.flags().is_empty() {
                    write!(f, " flag \"{}\"", like_regex.flags())?;
                }
                if parens {
                    f.write_char(')')?;
                }
            }
            NodeType::ArrayIndex { subscripts } => {
                f.write_char('[')?;
                for (i, subscript) in subscripts.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    subscript.render(f, false, false)?;
                }
                f.write_char(']')?;
            }
            NodeType::Any { first, last } => {
                if in_key {
                    f.write_char('.')?;
                }
                render_any(f, *first, *last)?;
            }
        }

        if let Some(next) = &self.next {
            next.render(f, true, true)?;
        }

        Ok(())
    }

    fn render_number(&self, f: &mut fmt::Formatter<'_>, number: &impl fmt::Display) -> fmt::Result {
        // (42).a, not 42.a
        if self.next.is_some() {
            write!(f, "({number})")
        } else {
            write!(f, "{number}")
        }
    }

    fn render_binary(
        &self,
        f: &mut fmt::Formatter<'_>,
        operator: BinaryOperator,
        left: Option<&Node>,
        right: Option<&Node>,
        parens: bool,
    ) -> fmt::Result {
        match operator {
            BinaryOperator::Subscript => {
                if let Some(left) = left {
                    left.render(f, false, false)?;
                }
                if let Some(right) = right {
                    f.write_str(" to ")?;
                    right.render(f, false, false)?;
                }
                Ok(())
            }
            BinaryOperator::Decimal => {
                f.write_str(".decimal(")?;
                if let Some(left) = left {
                    left.render(f, false, false)?;
                }
                if let Some(right) = right {
                    f.write_char(',')?;
                    right.render(f, false, false)?;
                }
                f.write_char(')')
            }
            _ => {
                let parens = parens || self.next.is_some();
                let priority = operator.priority();
                if parens {
                    f.write_char('(')?;
                }
                if let Some(left) = left {
                    left.render(f, false, left.priority() <= priority)?;
                }
                write!(f, " {operator} ")?;
                if let Some(right) = right {
                    right.render(f, false, right.priority() <= priority)?;
                }
                if parens {
                    f.write_char(')')?;
                }
                Ok(())
            }
        }
    }

    fn render_unary(
        &self,
        f: &mut fmt::Formatter<'_>,
        operator: UnaryOperator,
        operand: Option<&Node>,
        parens: bool,
    ) -> fmt::Result {
        let chained = self.next.is_some();

        match operator {
            UnaryOperator::Plus | UnaryOperator::Minus => {
                let parens = parens || chained;
                if parens {
                    f.write_char('(')?;
                }
                write!(f, "{operator}")?;
                if let Some(operand) = operand {
                    operand.render(f, false, operand.priority() <= operator.priority())?;
                }
                if parens {
                    f.write_char(')')?;
                }
                Ok(())
            }
            UnaryOperator::Exists | UnaryOperator::Not | UnaryOperator::IsUnknown => {
                if chained {
                    f.write_char('(')?;
                }
                match operator {
                    UnaryOperator::Exists => f.write_str("exists (")?,
                    UnaryOperator::Not => f.write_str("!(")?,
                    _ => f.write_char('(')?,
                }
                if let Some(operand) = operand {
                    operand.render(f, false, false)?;
                }
                f.write_char(')')?;
                if operator == UnaryOperator::IsUnknown {
                    f.write_str(" is unknown")?;
                }
                if chained {
                    f.write_char(')')?;
                }
                Ok(())
            }
            UnaryOperator::Filter => {
                f.write_str("?(")?;
                if let Some(operand) = operand {
                    operand.render(f, false, false)?;
                }
                f.write_char(')')
            }
            UnaryOperator::Datetime
            | UnaryOperator::Time
            | UnaryOperator::TimeTz
            | UnaryOperator::Timestamp
            | UnaryOperator::TimestampTz => {
                write!(f, "{operator}(")?;
                if let Some(operand) = operand {
                    operand.render(f, false, false)?;
                }
                f.write_char(')')
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false, false)
    }
}

fn any_level(level: i64) -> u32 {
    u32::try_from(level).unwrap_or(ANY_LAST)
}

fn render_any(f: &mut fmt::Formatter<'_>, first: u32, last: u32) -> fmt::Result {
    let level = |n: u32| {
        if n == ANY_LAST {
            String::from("last")
        } else {
            n.to_string()
        }
    };

    if first == 0 && last == ANY_LAST {
        f.write_str("**")
    } else if first == last {
        write!(f, "**{{{}}}", level(first))
    } else {
        write!(f, "**{{{} to {}}}", level(first), level(last))
    }
}

/// Thread `nodes` into one accessor chain, left to right, and return its
/// head. If the first node already has successors, the rest are appended
/// after its current tail. Panics when `nodes` is empty.
pub fn link_nodes(nodes: Vec<Node>) -> Node {
    let mut it = nodes.into_iter();
    let mut head = match it.next() {
        Some(node) => node,
        None => panic!("link_nodes called with no nodes"),
    };

    for node in it {
        head.append(node);
    }

    head
}

/// Apply unary `+` or `-` to `node`. A sign applied directly to a numeric
/// literal is folded into the literal, so `-42` stays a number. Panics for
/// any other operator.
pub fn fold_unary_or_number(operator: UnaryOperator, node: Node) -> Node {
    if !matches!(operator, UnaryOperator::Plus | UnaryOperator::Minus) {
        panic!("cannot fold unary operator {:?} into a number", operator);
    }

    if node.next.is_none() {
        match (operator, &node.kind) {
            (UnaryOperator::Plus, NodeType::Integer(_) | NodeType::Numeric(_)) => return node,
            (UnaryOperator::Minus, NodeType::Integer(integer)) => {
                let literal = negate_literal(integer.literal());
                if parse_integer(&literal).is_some() {
                    return Node::integer(&literal);
                }
            }
            (UnaryOperator::Minus, NodeType::Numeric(numeric)) => {
                return Node::numeric(&negate_literal(numeric.literal()));
            }
            _ => (),
        }
    }

    Node::unary(operator, Some(node))
}

fn negate_literal(literal: &str) -> String {
    if let Some(rest) = literal.strip_prefix('-') {
        rest.to_string()
    } else if let Some(rest) = literal.strip_prefix('+') {
        format!("-{rest}")
    } else {
        format!("-{literal}")
    }
}
