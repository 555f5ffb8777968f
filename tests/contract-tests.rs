use sqljson_path::{fold_unary_or_number, link_nodes, Node, UnaryOperator};

#[test]
#[should_panic(expected = "link_nodes called with no nodes")]
fn link_nothing() {
    link_nodes(Vec::new());
}

#[test]
#[should_panic(expected = "invalid integer literal")]
fn malformed_integer() {
    Node::integer("0x");
}

#[test]
#[should_panic(expected = "invalid numeric literal")]
fn non_finite_numeric() {
    Node::numeric("1e999");
}

#[test]
#[should_panic(expected = ".decimal() takes at most 2 arguments but 3 were given")]
fn decimal_with_three_arguments() {
    Node::decimal(vec![
        Node::integer("10"),
        Node::integer("2"),
        Node::integer("1"),
    ]);
}

#[test]
#[should_panic(expected = "cannot fold unary operator Filter into a number")]
fn fold_filter() {
    fold_unary_or_number(UnaryOperator::Filter, Node::integer("1"));
}

#[test]
fn any_clamps_negative_bounds() {
    assert_eq!(Node::any(-5, -1).to_string(), "**{last}");
    assert_eq!(Node::any(0, -1).to_string(), "**");
}
