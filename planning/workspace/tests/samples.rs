//! Checks the syntax tree and the position resolver on every PDDL file of the data folder.

use pddl_workspace::{DocumentPositionResolver, PositionResolver, SyntaxNode, SyntaxTree};
use test_each_file::test_each_file;

test_each_file! { for ["pddl"] in "./planning/workspace/tests/data" => test }

fn check_node(node: SyntaxNode<'_>) {
    assert!(node.start() <= node.end());
    if let Some(parent) = node.parent() {
        assert!(parent.start() <= node.start() && node.end() <= parent.end());
    }
    if node.is_bracket() {
        let children: String = node.children().map(|c| c.text()).collect();
        assert_eq!(children, node.nested_text(), "children of {node:?} do not cover its content");
    }
    for child in node.children() {
        check_node(child);
    }
}

fn test([input]: [&str; 1]) {
    let tree = SyntaxTree::parse(input);
    assert_eq!(tree.text(), input);
    assert_eq!(tree.root().text(), input);
    for bracket in tree.root().find_descendants(|n| n.is_bracket()) {
        check_node(bracket);
    }
    let top_level: String = tree.root().children().map(|c| c.text()).collect();
    assert_eq!(top_level, input);

    let resolver = DocumentPositionResolver::new(input);
    for offset in 0..=input.len() {
        let position = resolver.resolve_to_position(offset);
        assert_eq!(resolver.resolve_to_offset(position), offset, "at {position}");
    }
    for node in tree.root().find_descendants(|_| true) {
        if node.start() < node.end() {
            let found = tree.node_at(node.start());
            assert!(found == node || found.ancestors().any(|a| a == node));
        }
        let range = node.range(&resolver);
        assert!(range.start.at_or_before(&range.end));
    }
}
