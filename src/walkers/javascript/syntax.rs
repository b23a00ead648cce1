// JavaScript Walker Syntax - language-level features
//
// Arrow functions, async/await, destructuring, spread, optional chaining,
// nullish coalescing, BigInt literals and template literals.

use crate::types::Confidence;
use crate::walkers::base::BaseWalker;
use tree_sitter::Node;

/// Node kinds that start a new function scope
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function_declaration",
    "generator_function",
    "arrow_function",
    "method_definition",
];

pub(super) struct SyntaxRules;

impl SyntaxRules {
    pub(super) fn visit_arrow_function(base: &mut BaseWalker, node: Node) {
        let params = base
            .get_field_text(&node, "parameters")
            .or_else(|| base.get_field_text(&node, "parameter"))
            .unwrap_or("");
        base.emit(
            "arrow-functions",
            node.start_byte(),
            format!("arrow function {} =>", params),
            Confidence::High,
        );
    }

    /// Anonymous `async` keyword token
    pub(super) fn visit_async_keyword(base: &mut BaseWalker, node: Node) {
        let context = node
            .parent()
            .map(|parent| base.get_node_text(&parent))
            .and_then(|text| text.lines().next())
            .unwrap_or("async")
            .to_string();
        base.emit("async-functions", node.start_byte(), context, Confidence::High);
    }

    /// Anonymous `await` keyword token
    pub(super) fn visit_await_keyword(base: &mut BaseWalker, node: Node) {
        let context = node
            .parent()
            .map(|parent| base.get_node_text(&parent))
            .unwrap_or("await");
        base.emit("async-await", node.start_byte(), context, Confidence::High);

        if !Self::inside_function(&node) {
            base.emit("top-level-await", node.start_byte(), context, Confidence::Medium);
        }
    }

    fn inside_function(node: &Node) -> bool {
        let mut current = node.parent();
        while let Some(parent) = current {
            if FUNCTION_KINDS.contains(&parent.kind()) {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    pub(super) fn visit_variable_declarator(base: &mut BaseWalker, node: Node) {
        if let Some(name) = node.child_by_field_name("name") {
            if matches!(name.kind(), "object_pattern" | "array_pattern") {
                let context = base.get_node_text(&node);
                base.emit(
                    "destructuring-assignment",
                    name.start_byte(),
                    context,
                    Confidence::High,
                );
            }
        }

        if let Some(value) = node.child_by_field_name("value") {
            if let Some(template) = base.find_nodes_by_type(&value, "template_string").first() {
                let context = base.get_node_text(&node);
                base.emit(
                    "template-literals",
                    template.start_byte(),
                    context,
                    Confidence::High,
                );
            }
        }
    }

    /// `[a, b] = [b, a]`
    pub(super) fn visit_assignment(base: &mut BaseWalker, node: Node) {
        if let Some(left) = node.child_by_field_name("left") {
            if matches!(left.kind(), "object_pattern" | "array_pattern") {
                let context = base.get_node_text(&node);
                base.emit(
                    "destructuring-assignment",
                    left.start_byte(),
                    context,
                    Confidence::High,
                );
            }
        }
    }

    pub(super) fn visit_spread(base: &mut BaseWalker, node: Node) {
        let context = base.get_node_text(&node);
        base.emit("spread-operator", node.start_byte(), context, Confidence::High);
    }

    pub(super) fn visit_optional_chain(base: &mut BaseWalker, node: Node) {
        let context = node
            .parent()
            .map(|parent| base.get_node_text(&parent))
            .unwrap_or("?.");
        base.emit("optional-chaining", node.start_byte(), context, Confidence::High);
    }

    pub(super) fn visit_binary_expression(base: &mut BaseWalker, node: Node) {
        let Some(operator) = node.child_by_field_name("operator") else {
            return;
        };
        if operator.kind() == "??" {
            let context = base.get_node_text(&node);
            base.emit(
                "nullish-coalescing",
                operator.start_byte(),
                context,
                Confidence::High,
            );
        }
    }

    pub(super) fn visit_number(base: &mut BaseWalker, node: Node) {
        let literal = base.get_node_text(&node);
        // 123n, 0xFFn
        if literal.ends_with('n') {
            base.emit("bigint", node.start_byte(), literal, Confidence::High);
        }
    }

    pub(super) fn visit_template_string(base: &mut BaseWalker, node: Node) {
        let context = base.get_node_text(&node);
        base.emit("template-literals", node.start_byte(), context, Confidence::High);
    }
}
