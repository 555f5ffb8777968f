use std::{fmt, str::FromStr};

use crate::{errors::JSONPathError, node::Node, parser::Parser, validate::validate};

use lazy_static::lazy_static;

lazy_static! {
    static ref PARSER: Parser = Parser::new();
}

/// A parsed and validated SQL/JSON path.
#[derive(Debug, Clone, PartialEq)]
pub struct JSONPath {
    root: Node,
    lax: bool,
    predicate: bool,
}

impl JSONPath {
    /// Wrap `root`, checking where `@` and `last` appear.
    pub fn new(root: Node, lax: bool, predicate: bool) -> Result<Self, JSONPathError> {
        validate(&root)?;
        Ok(JSONPath {
            root,
            lax,
            predicate,
        })
    }

    /// Parse `query` with the default parser.
    pub fn parse(query: &str) -> Result<Self, JSONPathError> {
        PARSER.parse(query)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// True if the path is a boolean predicate rather than an accessor chain.
    pub fn is_predicate(&self) -> bool {
        self.predicate
    }

    pub fn is_lax(&self) -> bool {
        self.lax
    }

    pub fn is_strict(&self) -> bool {
        !self.lax
    }

    /// The canonical text of this path. Parsing it again gives back an
    /// equal path.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for JSONPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.lax {
            f.write_str("strict ")?;
        }
        self.root.render(f, false, true)
    }
}

impl FromStr for JSONPath {
    type Err = JSONPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JSONPath::parse(s)
    }
}
