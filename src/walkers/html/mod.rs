// HTML Walker
//
// Detects modern elements, custom elements and feature-bearing attributes,
// and hands <script>/<style> bodies to the JavaScript and CSS walkers.

mod elements;
mod embedded;
mod helpers;

use crate::walkers::base::{BaseWalker, Walker};
use elements::ElementRules;
use embedded::EmbeddedRules;
use tree_sitter::Node;

pub struct HtmlWalker<'a> {
    base: BaseWalker<'a>,
}

impl<'a> HtmlWalker<'a> {
    pub fn new(base: BaseWalker<'a>) -> Self {
        Self { base }
    }

    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit_node(child);
        }
    }
}

impl<'a> Walker<'a> for HtmlWalker<'a> {
    fn base(&mut self) -> &mut BaseWalker<'a> {
        &mut self.base
    }

    fn into_base(self) -> BaseWalker<'a> {
        self.base
    }

    fn visit_node(&mut self, node: Node) {
        match node.kind() {
            "start_tag" | "self_closing_tag" => {
                ElementRules::visit_tag(&mut self.base, node);
                return;
            }
            "script_element" => EmbeddedRules::visit_script(&mut self.base, node),
            "style_element" => EmbeddedRules::visit_style(&mut self.base, node),
            "comment" | "text" | "raw_text" | "doctype" | "end_tag" => return,
            _ => {}
        }

        self.visit_children(node);
    }
}
