//! Context rules that the grammar does not enforce.
//!
//! `@` is only meaningful inside a filter or `exists` argument, and `last`
//! only inside an array subscript. Both are checked here, over the finished
//! tree, including every chain successor.
use crate::{
    errors::JSONPathError,
    node::{Constant, Node, NodeType, UnaryOperator},
};

/// Check `root` and everything below it.
pub fn validate(root: &Node) -> Result<(), JSONPathError> {
    validate_node(Some(root), 0, false)
}

fn validate_node(node: Option<&Node>, depth: usize, in_subscript: bool) -> Result<(), JSONPathError> {
    let node = match node {
        Some(node) => node,
        None => return Ok(()),
    };

    match &node.kind {
        NodeType::Constant(Constant::Current) if depth == 0 => {
            return Err(JSONPathError::ast(String::from(
                "@ is not allowed in root expressions",
            )));
        }
        NodeType::Constant(Constant::Last) if !in_subscript => {
            return Err(JSONPathError::ast(String::from(
                "LAST is allowed only in array subscripts",
            )));
        }
        NodeType::Binary { left, right, .. } => {
            validate_node(left.as_deref(), depth, in_subscript)?;
            validate_node(right.as_deref(), depth, in_subscript)?;
        }
        NodeType::Unary { operator, operand } => {
            let depth = match operator {
                UnaryOperator::Filter | UnaryOperator::Exists => depth + 1,
                _ => depth,
            };
            validate_node(operand.as_deref(), depth, in_subscript)?;
        }
        NodeType::Regex(like_regex) => {
            validate_node(Some(like_regex.operand()), depth, in_subscript)?;
        }
        NodeType::ArrayIndex { subscripts } => {
            for subscript in subscripts {
                validate_node(Some(subscript), depth, true)?;
            }
        }
        _ => (),
    }

    validate_node(node.next(), depth, in_subscript)
}
