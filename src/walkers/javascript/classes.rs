// JavaScript Walker Classes - class syntax, private and static members

use crate::types::Confidence;
use crate::walkers::base::BaseWalker;
use tree_sitter::Node;

pub(super) struct ClassRules;

impl ClassRules {
    pub(super) fn visit_class(base: &mut BaseWalker, node: Node) {
        let name = base.get_field_text(&node, "name").unwrap_or("<anonymous>");
        base.emit(
            "es6-class",
            node.start_byte(),
            format!("class {}", name),
            Confidence::High,
        );

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };

        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            if !member.is_named() || member.kind() == "comment" {
                continue;
            }
            Self::visit_member(base, member, name);
        }
    }

    fn visit_member(base: &mut BaseWalker, member: Node, class_name: &str) {
        let text = base.get_node_text(&member);
        let summary = text.lines().next().unwrap_or("").trim();

        if member.kind() == "class_static_block" {
            base.emit(
                "class-static-members",
                member.start_byte(),
                format!("static block in {}", class_name),
                Confidence::High,
            );
            return;
        }

        if let Some(private) = base.find_child_by_type(&member, "private_property_identifier") {
            base.emit(
                "class-private-fields",
                private.start_byte(),
                format!("{} in class {}", summary, class_name),
                Confidence::High,
            );
        }

        if base.has_token_child(&member, "static") {
            base.emit(
                "class-static-members",
                member.start_byte(),
                format!("{} in class {}", summary, class_name),
                Confidence::High,
            );
        }
    }
}
