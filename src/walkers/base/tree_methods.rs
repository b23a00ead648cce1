// Tree navigation methods for BaseWalker

use super::walker::BaseWalker;
use tree_sitter::Node;

impl<'a> BaseWalker<'a> {
    /// Find first child by type
    pub fn find_child_by_type<'t>(&self, node: &Node<'t>, child_type: &str) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|child| child.kind() == child_type);
        found
    }

    /// Find first child whose type is any of `types`
    pub fn find_child_by_types<'t>(&self, node: &Node<'t>, types: &[&str]) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|child| types.contains(&child.kind()));
        found
    }

    /// Find children by type
    pub fn find_children_by_type<'t>(&self, node: &Node<'t>, child_type: &str) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|child| child.kind() == child_type)
            .collect()
    }

    /// Find nodes by type anywhere below `node` (including itself)
    pub fn find_nodes_by_type<'t>(&self, node: &Node<'t>, node_type: &str) -> Vec<Node<'t>> {
        let mut nodes = Vec::new();
        self.find_nodes_by_type_recursive(node, node_type, &mut nodes);
        nodes
    }

    #[allow(clippy::only_used_in_recursion)] // &self used in recursive calls
    fn find_nodes_by_type_recursive<'t>(
        &self,
        node: &Node<'t>,
        node_type: &str,
        nodes: &mut Vec<Node<'t>>,
    ) {
        if node.kind() == node_type {
            nodes.push(*node);
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.find_nodes_by_type_recursive(&child, node_type, nodes);
        }
    }

    /// Get field text safely
    pub fn get_field_text(&self, node: &Node, field_name: &str) -> Option<&'a str> {
        node.child_by_field_name(field_name)
            .map(|field_node| self.get_node_text(&field_node))
    }

    /// Anonymous child token with the given text (`async`, `static`, `?.`)
    pub fn has_token_child(&self, node: &Node, token: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|child| !child.is_named() && child.kind() == token);
        found
    }
}
