// JavaScript / TypeScript Walker
//
// One walker serves the javascript, typescript and tsx grammars; the node
// kinds it dispatches on are shared by all three.

mod calls;
mod classes;
mod syntax;

use crate::walkers::base::{BaseWalker, Walker};
use calls::CallRules;
use classes::ClassRules;
use syntax::SyntaxRules;
use tree_sitter::Node;

pub struct JavaScriptWalker<'a> {
    base: BaseWalker<'a>,
}

impl<'a> JavaScriptWalker<'a> {
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

impl<'a> Walker<'a> for JavaScriptWalker<'a> {
    fn base(&mut self) -> &mut BaseWalker<'a> {
        &mut self.base
    }

    fn into_base(self) -> BaseWalker<'a> {
        self.base
    }

    fn visit_node(&mut self, node: Node) {
        let base = &mut self.base;
        match node.kind() {
            "member_expression" => CallRules::visit_member_expression(base, node),
            "call_expression" => CallRules::visit_call_expression(base, node),
            "new_expression" => CallRules::visit_new_expression(base, node),
            "arrow_function" => SyntaxRules::visit_arrow_function(base, node),
            "async" if !node.is_named() => SyntaxRules::visit_async_keyword(base, node),
            "await" if !node.is_named() => SyntaxRules::visit_await_keyword(base, node),
            "variable_declarator" => SyntaxRules::visit_variable_declarator(base, node),
            "assignment_expression" => SyntaxRules::visit_assignment(base, node),
            "spread_element" => SyntaxRules::visit_spread(base, node),
            "optional_chain" | "?." => SyntaxRules::visit_optional_chain(base, node),
            "binary_expression" => SyntaxRules::visit_binary_expression(base, node),
            "number" => SyntaxRules::visit_number(base, node),
            "template_string" => SyntaxRules::visit_template_string(base, node),
            "class_declaration" | "abstract_class_declaration" => ClassRules::visit_class(base, node),
            "class" if node.is_named() => ClassRules::visit_class(base, node),
            "comment" | "string" | "regex" => return,
            _ => {}
        }

        self.visit_children(node);
    }
}
