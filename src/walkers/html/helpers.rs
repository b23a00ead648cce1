use crate::walkers::base::BaseWalker;
use tree_sitter::Node;

/// One parsed attribute of a start tag
pub(super) struct Attribute<'a> {
    pub name: String,
    pub value: Option<&'a str>,
    pub start: usize,
}

/// HTML-specific helper utilities
pub(super) struct HtmlHelpers;

impl HtmlHelpers {
    /// The start_tag / self_closing_tag of an element-like node
    pub(super) fn find_tag<'t>(base: &BaseWalker, node: &Node<'t>) -> Option<Node<'t>> {
        if matches!(node.kind(), "start_tag" | "self_closing_tag") {
            return Some(*node);
        }
        base.find_child_by_types(node, &["start_tag", "self_closing_tag"])
    }

    /// Lowercase tag name of a start_tag / self_closing_tag
    pub(super) fn extract_tag_name(base: &BaseWalker, tag: &Node) -> Option<String> {
        base.find_child_by_type(tag, "tag_name")
            .map(|name| base.get_node_text(&name).to_ascii_lowercase())
    }

    /// Attributes in source order
    pub(super) fn extract_attributes<'a>(base: &BaseWalker<'a>, tag: &Node) -> Vec<Attribute<'a>> {
        base.find_children_by_type(tag, "attribute")
            .into_iter()
            .filter_map(|attribute| extract_attribute_name_value(base, attribute))
            .collect()
    }

    pub(super) fn attribute_value<'a>(attributes: &[Attribute<'a>], name: &str) -> Option<&'a str> {
        attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .and_then(|attribute| attribute.value)
    }
}

/// Extract attribute name and value from attribute node
fn extract_attribute_name_value<'a>(base: &BaseWalker<'a>, attr_node: Node) -> Option<Attribute<'a>> {
    let mut name = None;
    let mut value = None;

    let mut cursor = attr_node.walk();
    for child in attr_node.children(&mut cursor) {
        match child.kind() {
            "attribute_name" => {
                name = Some(base.get_node_text(&child).to_ascii_lowercase());
            }
            "attribute_value" | "quoted_attribute_value" => {
                let text = base.get_node_text(&child);
                // Remove quotes if present
                value = Some(text.trim_matches(|c| c == '"' || c == '\''));
            }
            _ => {}
        }
    }

    name.map(|name| Attribute {
        name,
        value,
        start: attr_node.start_byte(),
    })
}
