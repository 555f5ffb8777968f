//! A SQL/JSON path parser, producing a validated syntax tree that can be
//! printed back to canonical path text. Paths are parsed only, never
//! evaluated.
//!
//! ## Parsing
//!
//! ```
//! use sqljson_path::{errors::JSONPathError, parse};
//!
//! fn main() -> Result<(), JSONPathError> {
//!     let path = parse("strict $.store.book[0 to last] ? (@.price < 10)")?;
//!     assert!(path.is_strict());
//!     assert!(!path.is_predicate());
//!     println!("{:#?}", path.root());
//!     Ok(())
//! }
//! ```
//!
//! A [`JSONPath`] is displayed in its canonical form, with keys quoted,
//! numbers normalized and just enough parentheses to read back the same
//! tree.
//!
//! ```
//! let path = sqljson_path::parse("$.a ? (@.b == 0x1F && @.c starts with \"x\")").unwrap();
//! assert_eq!(
//!     path.to_string(),
//!     "$.\"a\"?(@.\"b\" == 31 && @.\"c\" starts with \"x\")"
//! );
//! ```
//!
//! ## Errors
//!
//! Lexical and syntax errors carry the line and column of the offending
//! input. Misplaced `@` and `last` are reported after parsing, without a
//! position.
//!
//! ```text
//! parser: unexpected end of path at 1:4
//! ast: @ is not allowed in root expressions
//! ```
//!
//! Use [`Parser::verbose`] to have syntax errors list a few of the tokens
//! that would have been accepted.
pub mod errors;
mod escape;
pub mod lexer;
pub mod like_regex;
pub mod node;
mod number;
pub mod parser;
pub mod path;
pub mod token;
mod validate;

pub use errors::JSONPathError;
pub use errors::JSONPathErrorType;
pub use like_regex::RegexFlags;
pub use node::fold_unary_or_number;
pub use node::link_nodes;
pub use node::BinaryOperator;
pub use node::Constant;
pub use node::Integer;
pub use node::LikeRegex;
pub use node::Method;
pub use node::Node;
pub use node::NodeType;
pub use node::Numeric;
pub use node::UnaryOperator;
pub use parser::Parser;
pub use path::JSONPath;

/// Parse `query` into a validated [`JSONPath`].
pub fn parse(query: &str) -> Result<JSONPath, JSONPathError> {
    JSONPath::parse(query)
}
